// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          serve / share / config
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML + env, layered      |
//!              '-------------+-------------'
//!                            v
//!                     server (axum)
//!                 |          |           |
//!                 v          v           v
//!               auth       tree        share
//!             AccessGate  bulk ops   signed links
//!                            |           |
//!                            v           v
//!              ,---------------------------,
//!              |  store   ContentStore     |
//!              |  GitHubStore, catalog     |
//!              '---------------------------'
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod auth;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod share;
pub mod store;
pub mod tree;
