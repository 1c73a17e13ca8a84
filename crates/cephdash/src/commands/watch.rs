//! Continuous view of one filesystem, driven by a `RefreshController`.
//!
//! The filesystem is selected once; every payload the controller applies
//! is rendered until Ctrl-C or `--count` updates.

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info};

use cephdash_core::{
    DashboardClient, DashboardConfig, RefreshConfig, RefreshController, TabsPayload, Transition,
    find_filesystem,
};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: Arc<DashboardClient>,
    dashboard: &DashboardConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let fs = find_filesystem(&client, args.id).await?;
    let refresh = args.interval.map_or(dashboard.refresh, RefreshConfig::new);
    let color = output::should_color(global.color);

    let mut controller = RefreshController::new(client, refresh);
    let mut details = controller.details_stream();

    if let Transition::Subscribed { identity, handle } =
        controller.on_selection_changed(&[fs.selection_row()])
    {
        info!(%identity, %handle, interval = ?refresh.interval(), "watching filesystem");
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut shown: Option<Arc<TabsPayload>> = None;
    let mut updates = 0_u64;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                debug!("interrupted");
                break;
            }
            next = details.changed() => {
                if next.is_none() {
                    break;
                }
                // Resets publish empty defaults; only applied payloads are shown.
                let Some(payload) = controller.store().staged() else {
                    continue;
                };
                if shown.as_ref().is_some_and(|prev| Arc::ptr_eq(prev, &payload)) {
                    continue;
                }

                let out = output::render_tabs(
                    global.output,
                    args.section,
                    &payload.details,
                    &payload.clients,
                    color,
                )?;
                if global.output == OutputFormat::Table && !global.quiet {
                    let at = controller
                        .last_update()
                        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
                        .unwrap_or_default();
                    let mds = controller.display_name().unwrap_or_else(|| "-".into());
                    println!("── {} ({mds}) @ {at} ──", fs.name);
                }
                output::print_output(&out, global.quiet);

                shown = Some(payload);
                updates += 1;
                if args.count.is_some_and(|n| updates >= n) {
                    break;
                }
            }
        }
    }

    controller.dispose();
    Ok(())
}
