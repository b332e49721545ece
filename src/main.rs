// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Serve | Share | VerifyShare | Options | Inis | Version
//! ```

use std::process::ExitCode;

use ghman::cli::global::GlobalOptions;
use ghman::cli::{self, Cli, Command};
use ghman::cmd::config::{run_inis_command, run_options_command};
use ghman::cmd::serve::run_serve_command;
use ghman::cmd::share::{run_share_command, run_verify_share_command};
use ghman::config::loader::ConfigLoader;
use ghman::config::types::GlobalConfig;
use ghman::config::{Config, DEFAULT_FILE, ENV_PREFIX};
use ghman::logging::init_logging;
use ghman::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let config = if cli.skips_config() {
        None
    } else {
        match load_config(&cli) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Failed to load config: {e:#}");
                return ExitCode::FAILURE;
            }
        }
    };

    let log_config = config.as_ref().map_or_else(
        || log_config_from_cli(&cli.global),
        |config| log_config_from(&config.global),
    );
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config.as_ref()).await
}

fn log_config_from(global: &GlobalConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .with_json(global.json_logs)
        .build()
}

fn log_config_from_cli(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .with_json(global.json_logs)
        .build()
}

async fn dispatch_command(cli: &Cli, config: Option<&Config>) -> ExitCode {
    let result = match (&cli.command, config) {
        (Some(Command::Version), _) => {
            handle_version_command();
            Ok(())
        }
        (Some(Command::Inis), _) => {
            run_inis_command(&config_files(&cli.global).format_loaded_files());
            Ok(())
        }
        (Some(Command::Options), Some(config)) => {
            run_options_command(config);
            Ok(())
        }
        (Some(Command::Serve(_)), Some(config)) => run_serve_command(config).await,
        (Some(Command::Share(args)), Some(config)) => run_share_command(args, config),
        (Some(Command::VerifyShare(args)), Some(config)) => run_verify_share_command(args, config),
        (Some(_), None) => Err(anyhow::anyhow!("configuration was not loaded")),
        (None, _) => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn config_files(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_FILE);
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader
}

fn load_config(cli: &Cli) -> ghman::error::Result<Config> {
    let mut loader = config_files(&cli.global).with_env_prefix(ENV_PREFIX);
    for option in &cli.global.options {
        loader = loader.set_option(option)?;
    }
    for (key, value) in cli.config_overrides() {
        loader = loader.set(key, value)?;
    }
    loader.build()
}
