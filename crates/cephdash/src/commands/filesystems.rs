//! Filesystem listing.

use tabled::Tabled;

use cephdash_core::{DashboardClient, Filesystem, list_filesystems};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FilesystemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Max MDS")]
    max_mds: String,
    #[tabled(rename = "Daemons")]
    daemons: String,
}

impl From<&Filesystem> for FilesystemRow {
    fn from(fs: &Filesystem) -> Self {
        Self {
            id: fs.id.map(|id| id.to_string()).unwrap_or_default(),
            name: fs.name.clone(),
            max_mds: fs.max_mds.map(|n| n.to_string()).unwrap_or_default(),
            daemons: fs.daemon_names().join(", "),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &DashboardClient, global: &GlobalOpts) -> Result<(), CliError> {
    let filesystems = list_filesystems(client).await?;
    tracing::debug!(count = filesystems.len(), "listed filesystems");

    let out = output::render_list(global.output, &filesystems, |fs| FilesystemRow::from(fs), |fs| {
        fs.id.map(|id| id.to_string()).unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cephdash_core::SelectionRow;

    #[test]
    fn row_joins_daemons_in_listing_order() {
        let fs = Filesystem {
            id: Some(1),
            name: "cephfs".into(),
            max_mds: Some(2),
            mdsmap: SelectionRow::new(1, [("gid_2", "mds-b"), ("gid_1", "mds-a")]).mdsmap,
        };
        let row = FilesystemRow::from(&fs);
        assert_eq!(row.id, "1");
        assert_eq!(row.max_mds, "2");
        assert_eq!(row.daemons, "mds-b, mds-a");
    }
}
