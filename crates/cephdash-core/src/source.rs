// ── Tab data sources ──
//
// The controller only knows `TabsSource`. The dashboard HTTP client is
// the production implementation; tests plug in their own.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use cephdash_api::transport::TransportConfig;
use cephdash_api::DashboardClient;

use crate::config::{AuthCredentials, DashboardConfig};
use crate::error::CoreError;
use crate::model::{Filesystem, TabsPayload};

/// Anything that can fetch the tab payload of a filesystem.
///
/// Called once per new selection and once per refresh tick. Retries,
/// caching and transport are the implementation's business.
pub trait TabsSource: Send + Sync + 'static {
    fn fetch_tabs(&self, fs_id: i64) -> impl Future<Output = Result<TabsPayload, CoreError>> + Send;
}

impl TabsSource for DashboardClient {
    async fn fetch_tabs(&self, fs_id: i64) -> Result<TabsPayload, CoreError> {
        match self.get_tabs(fs_id).await {
            Ok(raw) => Ok(TabsPayload::from(raw)),
            Err(e) if e.is_not_found() => Err(CoreError::FilesystemNotFound {
                identifier: fs_id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

impl<T: TabsSource> TabsSource for Arc<T> {
    fn fetch_tabs(&self, fs_id: i64) -> impl Future<Output = Result<TabsPayload, CoreError>> + Send {
        T::fetch_tabs(self, fs_id)
    }
}

/// Build a client from `config` and authenticate it.
pub async fn connect(config: &DashboardConfig) -> Result<DashboardClient, CoreError> {
    let transport = TransportConfig {
        tls: config.tls.to_mode(),
        timeout: config.timeout,
    };
    let client = DashboardClient::new(config.url.clone(), &transport)?;

    match &config.auth {
        AuthCredentials::Credentials { username, password } => {
            client.login(username, password).await?;
            debug!(%username, "session authentication successful");
        }
        AuthCredentials::Token(token) => {
            client.set_token(token.clone());
            debug!("using pre-issued token, skipping login");
        }
    }

    Ok(client)
}

/// End the session `connect` opened.
///
/// Only session logins are logged out; a pre-issued token belongs to
/// whoever issued it. A failed logout is logged, never returned.
pub async fn disconnect(client: &DashboardClient, config: &DashboardConfig) {
    if matches!(config.auth, AuthCredentials::Credentials { .. }) {
        if let Err(e) = client.logout().await {
            warn!(error = %e, "logout failed (non-fatal)");
        }
    }
    debug!("disconnected");
}

/// List filesystems in the order the dashboard returns them.
pub async fn list_filesystems(client: &DashboardClient) -> Result<Vec<Filesystem>, CoreError> {
    let raw = client.list_filesystems().await?;
    Ok(raw.iter().map(Filesystem::from).collect())
}

/// Find filesystem `fs_id` in the listing.
pub async fn find_filesystem(client: &DashboardClient, fs_id: i64) -> Result<Filesystem, CoreError> {
    list_filesystems(client)
        .await?
        .into_iter()
        .find(|fs| fs.id == Some(fs_id))
        .ok_or_else(|| CoreError::FilesystemNotFound {
            identifier: fs_id.to_string(),
        })
}
