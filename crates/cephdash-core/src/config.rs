// ── Runtime connection configuration ──
//
// These types describe *how* to reach a Ceph dashboard and how often to
// poll it. They carry credential data and tuning, but never touch disk:
// the CLI constructs a `DashboardConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use cephdash_api::TlsMode;

/// Polling period the console uses for the filesystem tabs.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);
/// Prevent a zero or near-zero interval from turning into a busy loop.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// How to authenticate with the dashboard.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Username/password exchanged for a bearer token via `POST /api/auth`.
    Credentials {
        username: String,
        password: SecretString,
    },
    /// A bearer token issued out of band.
    Token(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed dashboard certificates).
    DangerAcceptInvalid,
}

impl TlsVerification {
    pub(crate) fn to_mode(&self) -> TlsMode {
        match self {
            Self::SystemDefaults => TlsMode::System,
            Self::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            Self::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Refresh tuning for a [`RefreshController`](crate::RefreshController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    interval: Duration,
}

impl RefreshConfig {
    /// Build a config, clamping the interval to [`MIN_REFRESH_INTERVAL`].
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_REFRESH_INTERVAL),
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Time between two fetches of the same subscription.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

/// Configuration for connecting to a single dashboard.
///
/// Built by the CLI, passed to [`connect`](crate::connect).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Dashboard URL (e.g., `https://mgr-host:8443`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Tab polling behaviour.
    pub refresh: RefreshConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_clamped() {
        assert_eq!(RefreshConfig::from_secs(0).interval(), MIN_REFRESH_INTERVAL);
        assert_eq!(
            RefreshConfig::new(Duration::from_secs(30)).interval(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn default_matches_console_period() {
        assert_eq!(RefreshConfig::default().interval(), DEFAULT_REFRESH_INTERVAL);
    }
}
