//! Config subcommand handlers.

use std::fmt::Write as _;
use std::io::BufRead;

use serde::Serialize;
use tabled::Tabled;

use cephdash_config::{
    Config, KEYRING_SERVICE, Profile, config_path, keyring_user, load_config, parse_url,
    save_config,
};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with secrets masked, for display.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
    cfg
}

/// TOML-like rendering of an already redacted config.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "refresh_interval_secs = {}", cfg.defaults.refresh_interval_secs);

    for name in cfg.profile_names() {
        let p = &cfg.profiles[&name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "url = \"{}\"", p.url);
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if let Some(ref pw) = p.password {
            let _ = writeln!(out, "password = \"{pw}\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(ref token) = p.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(secs) = p.refresh_interval_secs {
            let _ = writeln!(out, "refresh_interval_secs = {secs}");
        }
    }

    out.trim_end().to_owned()
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct ProfileSummary {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Default")]
    default: bool,
}

fn profile_summaries(cfg: &Config) -> Vec<ProfileSummary> {
    let default = cfg.default_profile.as_deref().unwrap_or("default");
    cfg.profile_names()
        .into_iter()
        .map(|name| ProfileSummary {
            url: cfg.profiles[&name].url.clone(),
            default: name == default,
            name,
        })
        .collect()
}

fn profile_not_found(cfg: &Config, name: String) -> CliError {
    let available = cfg.profile_names();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

/// First line of `reader` without its line terminator; rejects empty input.
fn read_secret(mut reader: impl BufRead) -> Result<String, CliError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let secret = line.trim_end_matches(['\r', '\n']);
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password read from stdin is empty".into(),
        });
    }
    Ok(secret.to_owned())
}

/// Insert or replace profile `name`. The first profile created becomes
/// the default when the configured default does not exist.
fn upsert_profile(
    cfg: &mut Config,
    name: &str,
    profile: Profile,
    force: bool,
) -> Result<(), CliError> {
    if cfg.profiles.contains_key(name) && !force {
        return Err(CliError::ProfileExists { name: name.into() });
    }
    cfg.profiles.insert(name.to_owned(), profile);

    let default_exists = cfg
        .default_profile
        .as_ref()
        .is_some_and(|d| cfg.profiles.contains_key(d));
    if !default_exists {
        cfg.default_profile = Some(name.to_owned());
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            name,
            url,
            username,
            password_env,
            insecure,
            force,
        } => {
            parse_url(&url)?;
            let mut cfg = load_config()?;
            let profile = Profile {
                url,
                username,
                password_env,
                insecure: insecure.then_some(true),
                ..Profile::default()
            };
            upsert_profile(&mut cfg, &name, profile, force)?;
            let path = save_config(&cfg)?;

            if !global.quiet {
                eprintln!("✓ Profile '{name}' written to {}", path.display());
                eprintln!("  Store a password with: cephdash config set-password --profile {name}");
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&load_config()?);
            let out = output::render_single(global.output, &cfg, format_config, |_| {
                config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = load_config()?;
            if cfg.profiles.is_empty() {
                if !global.quiet {
                    eprintln!("No profiles configured. Run: cephdash config init --url <URL>");
                }
                return Ok(());
            }
            let out = output::render_list(
                global.output,
                &profile_summaries(&cfg),
                ProfileSummary::clone,
                |p| p.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, name));
            }
            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = load_config()?;
            let name = profile.unwrap_or_else(|| cfg.active_profile_name(global.profile.as_deref()));
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, name));
            }

            let secret = read_secret(std::io::stdin().lock())?;
            keyring::Entry::new(KEYRING_SERVICE, &keyring_user(&name))?.set_password(&secret)?;
            if !global.quiet {
                eprintln!("✓ Password for '{name}' stored in system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn profile(url: &str) -> Profile {
        Profile {
            url: url.into(),
            ..Profile::default()
        }
    }

    #[test]
    fn redaction_masks_secrets_only() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                username: Some("admin".into()),
                password: Some("hunter2".into()),
                token: Some("abc".into()),
                ..profile("https://mgr:8443")
            },
        );
        let shown = format_config(&redacted(&cfg));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("\"abc\""));
        assert!(shown.contains("username = \"admin\""));
        assert!(shown.contains("[profiles.lab]"));
    }

    #[test]
    fn first_profile_becomes_default() {
        let mut cfg = Config::default();
        upsert_profile(&mut cfg, "lab", profile("https://a"), false)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));

        upsert_profile(&mut cfg, "prod", profile("https://b"), false)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
    }

    #[test]
    fn existing_profile_needs_force() {
        let mut cfg = Config {
            profiles: HashMap::from([("lab".to_owned(), profile("https://a"))]),
            ..Config::default()
        };
        let err = upsert_profile(&mut cfg, "lab", profile("https://b"), false).err();
        assert!(matches!(err, Some(CliError::ProfileExists { .. })));

        upsert_profile(&mut cfg, "lab", profile("https://b"), true)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cfg.profiles["lab"].url, "https://b");
    }

    #[test]
    fn summaries_mark_the_default() {
        let cfg = Config {
            default_profile: Some("b".into()),
            profiles: HashMap::from([
                ("b".to_owned(), profile("https://b")),
                ("a".to_owned(), profile("https://a")),
            ]),
            ..Config::default()
        };
        let rows = profile_summaries(&cfg);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "a");
        assert!(!rows[0].default);
        assert!(rows[1].default);
    }

    #[test]
    fn secret_is_read_without_newline() {
        let secret = read_secret("s3cret\r\n".as_bytes()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(secret, "s3cret");
        assert!(read_secret("\n".as_bytes()).is_err());
    }
}
