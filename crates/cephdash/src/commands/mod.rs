//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod config_cmd;
pub mod filesystems;
pub mod tabs;
pub mod watch;

use std::sync::Arc;

use cephdash_core::{DashboardClient, DashboardConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a dashboard-bound command to the appropriate handler, then
/// close the session whether or not the command succeeded.
pub async fn dispatch(
    cmd: Command,
    client: DashboardClient,
    dashboard: &DashboardConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = Arc::new(client);
    let result = match cmd {
        Command::Filesystems => filesystems::handle(&client, global).await,
        Command::Tabs(args) => tabs::handle(&client, args, global).await,
        Command::Watch(args) => watch::handle(Arc::clone(&client), dashboard, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    };

    cephdash_core::disconnect(&client, dashboard).await;
    result
}
