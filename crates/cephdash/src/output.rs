//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use bytesize::ByteSize;
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use tabled::{Table, Tabled, settings::Style};

use cephdash_core::{CacheStatus, Client, ClientsView, CounterSeries, Pool, Rank, TabBundle};

use crate::cli::{ColorMode, OutputFormat, TabSection};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn paint_status(status: CacheStatus, color: bool) -> String {
    let label = status.to_string();
    if !color {
        return label;
    }
    match status {
        CacheStatus::ValueOk => label.green().to_string(),
        CacheStatus::ValueStale => label.yellow().to_string(),
        CacheStatus::ValueNone => label.dimmed().to_string(),
        CacheStatus::ValueException => label.red().to_string(),
    }
}

fn paint_state(state: &str, color: bool) -> String {
    if !color {
        return state.to_owned();
    }
    match state {
        "active" => state.green().to_string(),
        s if s.starts_with("up:") || s.contains("replay") => state.yellow().to_string(),
        _ => state.red().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since detail views don't map onto one `Tabled` row type.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

// ── Tab rows ─────────────────────────────────────────────────────────

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "Rank")]
    rank: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Daemon")]
    mds: String,
    #[tabled(rename = "Activity")]
    activity: String,
    #[tabled(rename = "Dentries")]
    dns: u64,
    #[tabled(rename = "Inodes")]
    inos: u64,
    #[tabled(rename = "Dirs")]
    dirs: u64,
    #[tabled(rename = "Caps")]
    caps: u64,
}

impl RankRow {
    fn new(r: &Rank, color: bool) -> Self {
        Self {
            rank: r.rank.clone(),
            state: paint_state(&r.state, color),
            mds: r.mds.clone(),
            activity: format!("{:.1} req/s", r.activity),
            dns: r.dns,
            inos: r.inos,
            dirs: r.dirs,
            caps: r.caps,
        }
    }
}

#[derive(Tabled)]
struct PoolRow {
    #[tabled(rename = "Pool")]
    name: String,
    #[tabled(rename = "Type")]
    pool_type: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Available")]
    avail: String,
    #[tabled(rename = "Usage")]
    usage: String,
}

impl From<&Pool> for PoolRow {
    fn from(p: &Pool) -> Self {
        Self {
            name: p.name.clone(),
            pool_type: p.pool_type.clone(),
            used: ByteSize::b(p.used).to_string(),
            avail: ByteSize::b(p.avail).to_string(),
            usage: format!("{:.1}%", p.usage_ratio() * 100.0),
        }
    }
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Type")]
    client_type: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Host")]
    hostname: String,
    #[tabled(rename = "Root")]
    root: String,
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        Self {
            id: c.id,
            client_type: c.client_type.clone(),
            state: c.state.clone(),
            version: c.version.clone(),
            hostname: c.hostname.clone(),
            root: c.root.clone(),
        }
    }
}

#[derive(Tabled)]
struct CounterRow {
    #[tabled(rename = "Daemon")]
    daemon: String,
    #[tabled(rename = "Counter")]
    counter: String,
    #[tabled(rename = "Latest")]
    latest: String,
    #[tabled(rename = "Samples")]
    samples: usize,
}

fn counter_rows(series: &CounterSeries) -> impl Iterator<Item = CounterRow> + '_ {
    series.counters.iter().map(|(counter, samples)| CounterRow {
        daemon: series.name.clone(),
        counter: counter.clone(),
        latest: samples
            .last()
            .map_or_else(|| "-".into(), |(_, value)| format!("{value:.2}")),
        samples: samples.len(),
    })
}

// ── Tab rendering ────────────────────────────────────────────────────

/// Structured value for one section, as emitted by the serde formats.
pub fn section_value(
    section: TabSection,
    details: &TabBundle,
    clients: &ClientsView,
) -> Result<Value, CliError> {
    let value = match section {
        TabSection::All => json!({ "details": details, "clients": clients }),
        TabSection::Ranks => json!({ "ranks": details.ranks, "standbys": details.standbys }),
        TabSection::Pools => serde_json::to_value(&details.pools)?,
        TabSection::Clients => serde_json::to_value(clients)?,
        TabSection::Counters => serde_json::to_value(&details.mds_counters)?,
    };
    Ok(value)
}

/// Human-readable rendering of a section for table mode.
pub fn render_tabs_table(
    section: TabSection,
    details: &TabBundle,
    clients: &ClientsView,
    color: bool,
) -> String {
    let mut blocks = Vec::new();

    if section == TabSection::All {
        let standbys = if details.standbys.is_empty() {
            "-"
        } else {
            details.standbys.as_str()
        };
        blocks.push(format!(
            "Filesystem: {}\nStandbys:   {standbys}\nClients:    {} ({})",
            details.name,
            clients.data.len(),
            paint_status(clients.status, color),
        ));
    }

    if matches!(section, TabSection::All | TabSection::Ranks) {
        let rows: Vec<RankRow> = details.ranks.iter().map(|r| RankRow::new(r, color)).collect();
        blocks.push(format!("Ranks\n{}", render_table(&rows)));
        if section == TabSection::Ranks && !details.standbys.is_empty() {
            blocks.push(format!("Standbys: {}", details.standbys));
        }
    }

    if matches!(section, TabSection::All | TabSection::Pools) {
        let rows: Vec<PoolRow> = details.pools.iter().map(PoolRow::from).collect();
        blocks.push(format!("Pools\n{}", render_table(&rows)));
    }

    if matches!(section, TabSection::All | TabSection::Counters) {
        let rows: Vec<CounterRow> = details.mds_counters.values().flat_map(counter_rows).collect();
        blocks.push(format!("Performance counters\n{}", render_table(&rows)));
    }

    if matches!(section, TabSection::All | TabSection::Clients) {
        let rows: Vec<ClientRow> = clients.data.iter().map(ClientRow::from).collect();
        blocks.push(format!(
            "Clients [{}]\n{}",
            paint_status(clients.status, color),
            render_table(&rows)
        ));
    }

    blocks.join("\n\n")
}

/// Plain rendering: one line per rank, pool, client or counter.
pub fn render_tabs_plain(section: TabSection, details: &TabBundle, clients: &ClientsView) -> String {
    let mut lines = Vec::new();
    if matches!(section, TabSection::All | TabSection::Ranks) {
        lines.extend(
            details
                .ranks
                .iter()
                .map(|r| format!("{}\t{}\t{}", r.rank, r.mds, r.state)),
        );
    }
    if matches!(section, TabSection::All | TabSection::Pools) {
        lines.extend(details.pools.iter().map(|p| format!("{}\t{}", p.name, p.pool_type)));
    }
    if matches!(section, TabSection::All | TabSection::Counters) {
        lines.extend(
            details
                .mds_counters
                .values()
                .flat_map(|s| s.counters.keys().map(move |c| format!("{}\t{c}", s.name))),
        );
    }
    if matches!(section, TabSection::All | TabSection::Clients) {
        lines.extend(clients.data.iter().map(|c| format!("{}\t{}", c.id, c.hostname)));
    }
    lines.join("\n")
}

/// Render the tab data of one filesystem in the chosen format.
pub fn render_tabs(
    format: OutputFormat,
    section: TabSection,
    details: &TabBundle,
    clients: &ClientsView,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(render_tabs_table(section, details, clients, color)),
        OutputFormat::Plain => Ok(render_tabs_plain(section, details, clients)),
        structured => {
            let value = section_value(section, details, clients)?;
            render_single(structured, &value, Value::to_string, Value::to_string)
        }
    }
}
