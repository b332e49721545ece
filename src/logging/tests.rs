// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
    assert_eq!(LogLevel::from_u8(9), None);
}

#[test]
fn test_filter_strings_quiet_the_http_stack() {
    assert_eq!(LogLevel::SILENT.to_filter_string(), "off");
    assert!(LogLevel::DEBUG.to_filter_string().contains("hyper=info"));
    assert!(LogLevel::TRACE.to_filter_string().starts_with("trace,"));
    assert_eq!(LogLevel::DUMP.to_filter_string(), "trace");
}

#[test]
fn test_log_level_serde_as_number() {
    let json = serde_json::to_string(&LogLevel::WARN).unwrap();
    assert_eq!(json, "2");
    assert!(serde_json::from_str::<LogLevel>("7").is_err());
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert!(config.log_file().is_none());
    assert!(!config.json());
    assert!(config.show_timestamps());

    let json = LogConfig::builder().with_json(true).build();
    assert!(json.json());
}
