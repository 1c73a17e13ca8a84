//! Resolve a `DashboardConfig` from the config file, the active profile,
//! and global CLI overrides.

use cephdash_config::{Config, Profile, config_path, load_config, profile_to_dashboard_config};
use cephdash_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the config file and build the connection config for this run.
pub fn build_dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = load_config()?;
    resolve(&cfg, global)
}

/// Pick the active profile (or synthesize one from flags) and apply
/// command-line overrides on top of it.
pub fn resolve(cfg: &Config, global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => apply_overrides(profile.clone(), global),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name.clone(),
                available: cfg.profile_names().join(", "),
            });
        }
        None => {
            let url = global.url.clone().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            apply_overrides(
                Profile {
                    url,
                    ..Profile::default()
                },
                global,
            )
        }
    };

    tracing::debug!(profile = %profile_name, url = %profile.url, "resolved dashboard profile");
    Ok(profile_to_dashboard_config(&profile, &profile_name, &cfg.defaults)?)
}

fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(ref url) = global.url {
        profile.url.clone_from(url);
    }
    if global.username.is_some() {
        profile.username.clone_from(&global.username);
    }
    if global.token.is_some() {
        profile.token.clone_from(&global.token);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    profile
}
