// ghman: GitHub Repository Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Offline share-link commands for ghman.

use anyhow::bail;

use crate::cli::share::{ShareArgs, VerifyShareArgs};
use crate::config::Config;
use crate::error::Result;
use crate::share::{ShareLink, ShareSigner};
use crate::store::github::cache_buster;

/// Base URL for offline links: flag, then `server.public_url`, then the bind address.
#[must_use]
pub fn link_base(args: &ShareArgs, config: &Config) -> String {
    args.base_url
        .clone()
        .or_else(|| config.server.public_url.clone())
        .unwrap_or_else(|| format!("http://{}", config.server.bind))
}

/// Issue a link exactly as the running service would.
///
/// # Errors
///
/// Returns an error if the base URL is not a valid base.
pub fn issue_link(args: &ShareArgs, config: &Config) -> Result<ShareLink> {
    let signer = ShareSigner::new(config.share.secret.as_str());
    let link = signer.issue(
        &link_base(args, config),
        &args.path,
        args.encode.map(Into::into),
        cache_buster(),
    )?;
    Ok(link)
}

/// Main handler for share command.
///
/// # Errors
///
/// Returns an error if the link cannot be built.
pub fn run_share_command(args: &ShareArgs, config: &Config) -> Result<()> {
    let link = issue_link(args, config)?;
    if ShareSigner::new(config.share.secret.as_str()).is_default() {
        tracing::warn!("signing with the built-in default secret");
    }
    println!("{}", link.url);
    println!("sign: {}", link.sign);
    Ok(())
}

/// Main handler for verify-share command.
///
/// # Errors
///
/// Returns an error if the signature does not match.
pub fn run_verify_share_command(args: &VerifyShareArgs, config: &Config) -> Result<()> {
    let signer = ShareSigner::new(config.share.secret.as_str());
    if !signer.verify(&args.path, &args.sign) {
        bail!("invalid share link signature for '{}'", args.path);
    }
    println!("valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::share::EncodeArg;

    fn config(secret: &str) -> Config {
        let mut config = Config::default();
        config.share.secret = secret.to_string();
        config
    }

    fn share_args(base_url: Option<&str>) -> ShareArgs {
        ShareArgs {
            path: "octo/docs/main/a.md".to_string(),
            encode: None,
            base_url: base_url.map(str::to_string),
        }
    }

    #[test]
    fn test_link_base_precedence() {
        let mut config = config("s3cret");
        assert_eq!(link_base(&share_args(None), &config), "http://127.0.0.1:8787");

        config.server.public_url = Some("https://files.example.com".to_string());
        assert_eq!(link_base(&share_args(None), &config), "https://files.example.com");
        assert_eq!(
            link_base(&share_args(Some("https://other.example.com")), &config),
            "https://other.example.com"
        );
    }

    #[test]
    fn test_issue_link_signs_path() {
        let mut args = share_args(Some("https://files.example.com"));
        args.encode = Some(EncodeArg::Base64);
        let link = issue_link(&args, &config("s3cret")).unwrap();
        assert_eq!(link.sign, "rxkrea");
        assert!(link.url.starts_with(
            "https://files.example.com/share/octo%2Fdocs%2Fmain%2Fa.md?sign=rxkrea&encode=base64&t="
        ));
    }

    #[test]
    fn test_verify_share() {
        let config = config("s3cret");
        let good = VerifyShareArgs {
            path: "octo/docs/main/a.md".to_string(),
            sign: "rxkrea".to_string(),
        };
        assert!(run_verify_share_command(&good, &config).is_ok());

        let bad = VerifyShareArgs {
            sign: "1sa559".to_string(),
            ..good
        };
        assert!(run_verify_share_command(&bad, &config).is_err());
    }
}
