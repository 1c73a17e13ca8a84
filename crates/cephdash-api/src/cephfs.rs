// CephFS endpoints
//
// Filesystem listing (what the console's selection table shows) and the
// per-filesystem tab payload that the refresh controller polls.

use tracing::trace;

use crate::client::DashboardClient;
use crate::error::Error;
use crate::models::{RawFilesystem, RawTabs};

impl DashboardClient {
    /// List all filesystems: `GET /api/cephfs`.
    pub async fn list_filesystems(&self) -> Result<Vec<RawFilesystem>, Error> {
        let url = self.api_url("api/cephfs")?;
        let filesystems: Vec<RawFilesystem> = self.get(url).await?;
        trace!(count = filesystems.len(), "listed filesystems");
        Ok(filesystems)
    }

    /// Fetch the detail tabs of one filesystem: `GET /ui-api/cephfs/{id}/tabs`.
    pub async fn get_tabs(&self, fs_id: i64) -> Result<RawTabs, Error> {
        let url = self.api_url(&format!("ui-api/cephfs/{fs_id}/tabs"))?;
        self.get(url).await
    }
}
