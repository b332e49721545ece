// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;

use super::*;
use crate::config::types::AuthConfig;
use crate::error::{ErrorKind, GhError};

fn gate() -> AccessGate {
    AccessGate::builder()
        .admin("adm")
        .editor("ed")
        .read("rd")
        .tokens(BTreeMap::from([("table-writer".to_string(), Capability::Write)]))
        .build()
}

#[test]
fn test_capability_order() {
    assert!(Capability::Read < Capability::Write);
    assert!(Capability::Write < Capability::Admin);
    assert_eq!("ADMIN".parse::<Capability>(), Ok(Capability::Admin));
    assert!("owner".parse::<Capability>().is_err());
}

#[test]
fn test_authorize_resolution() {
    let gate = gate();
    assert_eq!(gate.authorize("adm"), Some(Capability::Admin));
    assert_eq!(gate.authorize("ed"), Some(Capability::Write));
    assert_eq!(gate.authorize("rd"), Some(Capability::Read));
    assert_eq!(gate.authorize("table-writer"), Some(Capability::Write));
    assert_eq!(gate.authorize("nope"), None);
    assert_eq!(gate.authorize(""), None);
}

#[test]
fn test_configured_secret_wins_over_table() {
    let gate = AccessGate::builder()
        .read("shared")
        .tokens(BTreeMap::from([("shared".to_string(), Capability::Admin)]))
        .build();
    assert_eq!(gate.authorize("shared"), Some(Capability::Read));
}

#[test]
fn test_empty_secret_never_matches() {
    let gate = AccessGate::builder().admin("").build();
    assert_eq!(gate.authorize(""), None);
    assert!(!gate.has_credentials());
}

#[test]
fn test_demo_tokens_are_opt_in() {
    let mut config = AuthConfig::default();
    let off = AccessGate::from_config(&config);
    assert_eq!(off.authorize("your-admin-uuid-here"), None);

    config.allow_demo_tokens = true;
    let on = AccessGate::from_config(&config);
    assert_eq!(on.authorize("your-admin-uuid-here"), Some(Capability::Admin));
    assert_eq!(on.authorize("your-editor-uuid-here"), Some(Capability::Write));
    assert_eq!(on.authorize("your-read-uuid-here"), Some(Capability::Read));
}

#[test]
fn test_every_operation_against_every_capability() {
    let gate = gate();
    let callers = [
        ("rd", Capability::Read),
        ("ed", Capability::Write),
        ("adm", Capability::Admin),
    ];

    for op in Operation::ALL {
        for (token, cap) in callers {
            let result = gate.require(Some(token), op);
            if cap >= op.required() {
                assert_eq!(result.ok(), Some(cap), "{op} with {cap}");
            } else {
                let kind = result.map_err(|e| e.kind());
                assert_eq!(kind, Err(ErrorKind::Forbidden), "{op} with {cap}");
            }
        }
        let missing = gate.require(None, op).map_err(|e| e.kind());
        assert_eq!(missing, Err(ErrorKind::Unauthorized));
        let unknown = gate.require(Some("bogus"), op).map_err(|e| e.kind());
        assert_eq!(unknown, Err(ErrorKind::Unauthorized));
    }
}

#[test]
fn test_only_delete_repo_needs_admin() {
    let admin_only: Vec<_> = Operation::ALL
        .into_iter()
        .filter(|op| op.required() == Capability::Admin)
        .collect();
    assert_eq!(admin_only, [Operation::DeleteRepository]);
}

#[test]
fn test_forbidden_message() {
    let err = gate()
        .require(Some("ed"), Operation::DeleteRepository)
        .unwrap_err();
    assert!(matches!(err, GhError::Auth(_)));
    insta::assert_snapshot!(err.public_message(), @"delete-repo requires admin permission, caller has write");
}

#[test]
fn test_debug_hides_secrets() {
    let rendered = format!("{:?}", gate());
    assert!(!rendered.contains("adm\""));
    assert!(rendered.contains("[hidden]"));
}
