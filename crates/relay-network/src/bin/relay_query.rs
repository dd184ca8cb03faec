//! Relay Network Query CLI
//!
//! Loads a network snapshot and answers connectivity questions about it.
//!
//! Usage:
//!   relay-query --snapshot data/network.json route KSC "Relay 3"
//!   relay-query --snapshot data/network.json --model additive neighbors 2
//!   relay-query --snapshot data/network.json --output report.json stats
//!   relay-query --snapshot data/network.json command "Mun Lander"

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use relay_network::{Link, LinkKind, Network, NetworkSettings, NetworkSnapshot, NodeId, RangeModelKind, TopologyStats};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "relay-query", about = "Query links and routes in a relay network snapshot")]
struct Args {
    /// Path to network snapshot JSON file
    #[arg(short, long, default_value = "data/network.json")]
    snapshot: PathBuf,

    /// Override the snapshot's range model
    #[arg(long, value_enum)]
    model: Option<ModelArg>,

    /// Override the multiple-antenna multiplier
    #[arg(long)]
    multiplier: Option<f64>,

    /// Abort route searches after this many expansions
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output (ignored when RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    query: Query,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModelArg {
    Standard,
    Additive,
}

impl From<ModelArg> for RangeModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Standard => RangeModelKind::Standard,
            ModelArg::Additive => RangeModelKind::Additive,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Query {
    /// Minimum-delay route between two nodes (id or name)
    Route { from: String, to: String },
    /// Links currently available from a node
    Neighbors { node: String },
    /// Link counts over the whole network
    Stats,
    /// Route to the nearest command station
    Command { node: String },
}

#[derive(Serialize)]
struct Report<T: Serialize> {
    generated_at: DateTime<Utc>,
    range_model: RangeModelKind,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize)]
struct RouteReport {
    from: String,
    to: String,
    exists: bool,
    hops: Vec<String>,
    distance_m: Option<f64>,
    delay_s: Option<f64>,
}

#[derive(Serialize)]
struct LinkReport {
    to: String,
    kind: LinkKind,
    distance_m: f64,
}

#[derive(Serialize)]
struct NeighborsReport {
    node: String,
    links: Vec<LinkReport>,
}

#[derive(Serialize)]
struct CommandReport {
    node: String,
    station: Option<String>,
    local_control: bool,
    signal_delay_s: Option<f64>,
    route: RouteReport,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    info!("{}", "=".repeat(60));
    info!("Relay Network Query");
    info!("{}", "=".repeat(60));

    let snapshot = NetworkSnapshot::load(&args.snapshot)?;
    let mut network = Network::from_snapshot(snapshot)?;
    let settings = apply_overrides(network.settings().clone(), &args);
    settings.validate()?;
    network.set_settings(settings);
    info!("Range model: {:?}", network.settings().range_model);

    let range_model = network.settings().range_model;
    let generated_at = Utc::now();

    let json = match &args.query {
        Query::Route { from, to } => {
            let from = resolve(&network, from)?;
            let to = resolve(&network, to)?;
            let body = route_report(&network, &network.solve(from, to));
            info!("Route {} -> {}: exists={}", body.from, body.to, body.exists);
            serde_json::to_value(Report { generated_at, range_model, body })?
        }
        Query::Neighbors { node } => {
            let id = resolve(&network, node)?;
            let links: Vec<LinkReport> = network
                .find_neighbors(id)
                .iter()
                .filter_map(|link| link_report(&network, id, link))
                .collect();
            info!("{} has {} links", name_of(&network, id), links.len());
            let body = NeighborsReport { node: name_of(&network, id), links };
            serde_json::to_value(Report { generated_at, range_model, body })?
        }
        Query::Stats => {
            let body: TopologyStats = network.topology().stats();
            info!(
                "{} nodes, {} links ({} omni, {} dish), {} isolated",
                body.total_nodes, body.total_links, body.omni_links, body.dish_links, body.isolated_nodes
            );
            serde_json::to_value(Report { generated_at, range_model, body })?
        }
        Query::Command { node } => {
            let id = resolve(&network, node)?;
            let route = network.connection_to_command(id);
            let delay = network.signal_delay(id);
            let reached = route.exists() || route.delay() == 0.0;
            let body = CommandReport {
                node: name_of(&network, id),
                station: reached.then(|| name_of(&network, route.goal())),
                local_control: network.node(id).is_some_and(|n| n.local_control),
                signal_delay_s: delay.is_finite().then_some(delay),
                route: route_report(&network, &route),
            };
            info!("{} -> command: {}", body.node, route);
            serde_json::to_value(Report { generated_at, range_model, body })?
        }
    };

    write_report(args.output.as_ref(), &json)?;
    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    // Logs go to stderr so stdout carries only the report
    if std::env::var_os("RUST_LOG").is_some() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let level = if verbose { Level::DEBUG } else { Level::INFO };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn apply_overrides(mut settings: NetworkSettings, args: &Args) -> NetworkSettings {
    if let Some(model) = args.model {
        settings.range_model = model.into();
    }
    if let Some(multiplier) = args.multiplier {
        settings.multiple_antenna_multiplier = multiplier;
    }
    if args.max_expansions.is_some() {
        settings.max_expansions = args.max_expansions;
    }
    settings
}

/// Numeric id first, then exact name
fn resolve(network: &Network, key: &str) -> Result<NodeId> {
    if let Ok(raw) = key.parse::<u32>() {
        if network.node(NodeId(raw)).is_some() {
            return Ok(NodeId(raw));
        }
    }
    network
        .nodes()
        .iter()
        .find(|n| n.name == key)
        .map(|n| n.id)
        .ok_or_else(|| anyhow!("no node with id or name {:?}", key))
}

fn name_of(network: &Network, id: NodeId) -> String {
    network
        .node(id)
        .map(|n| n.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn route_report(network: &Network, route: &relay_network::Route) -> RouteReport {
    RouteReport {
        from: name_of(network, route.start()),
        to: name_of(network, route.goal()),
        exists: route.exists(),
        hops: route.nodes().iter().map(|&n| name_of(network, n)).collect(),
        distance_m: route.distance().is_finite().then_some(route.distance()),
        delay_s: route.delay().is_finite().then_some(route.delay()),
    }
}

fn link_report(network: &Network, from: NodeId, link: &Link) -> Option<LinkReport> {
    let to = link.other(from)?;
    Some(LinkReport {
        to: name_of(network, to),
        kind: link.kind(),
        distance_m: link.distance(),
    })
}

fn write_report(output: Option<&PathBuf>, json: &serde_json::Value) -> Result<()> {
    match output {
        Some(path) => {
            info!("Writing report to {:?}", path);
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, json)?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut writer, json)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
