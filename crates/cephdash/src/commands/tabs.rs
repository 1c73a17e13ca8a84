//! One-shot fetch of a filesystem's tab data.

use cephdash_core::{DashboardClient, TabsSource};

use crate::cli::{GlobalOpts, TabsArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &DashboardClient, args: TabsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let payload = client.fetch_tabs(args.id).await?;
    let out = output::render_tabs(
        global.output,
        args.section,
        &payload.details,
        &payload.clients,
        output::should_color(global.color),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
