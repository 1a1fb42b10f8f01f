use chrono::Local;
use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use topogen::config;
use topogen::orchestrator::{self, FlowVariant, GenerationRequest, LinkVariant};
use topogen::topology::types::{FlowSpec, LinkAttributes, LinkProfile, TopologyParams};

/// Datacenter topology and traffic-flow generator for NS-3 style simulators
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a spine-leaf topology
    SpineLeaf {
        /// Number of spine switches
        #[arg(short, long, default_value_t = 2)]
        spine: usize,

        /// Number of leaf switches
        #[arg(short, long, default_value_t = 3)]
        leaf: usize,

        /// Number of hosts attached to each leaf switch
        #[arg(short = 'n', long, default_value_t = 3)]
        hosts_per_leaf: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate a fat-tree topology
    FatTree {
        /// Fat-tree arity (must be even)
        #[arg(short, long, default_value_t = 4)]
        k: usize,

        /// Number of hosts attached to each edge switch
        #[arg(short = 'n', long, default_value_t = 3)]
        hosts_per_edge: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate a BCube topology
    Bcube {
        /// BCube port count (n switches per level, n^2 hosts)
        #[arg(short, long, default_value_t = 4)]
        n: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate from a YAML profile
    FromConfig {
        /// Path to the generation profile
        #[arg(short, long)]
        config: PathBuf,

        /// Delete pre-existing output files before generating
        #[arg(long)]
        clean: bool,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output path for the topology file (`-` for stdout)
    #[arg(short = 'f', long)]
    topology_file: Option<PathBuf>,

    /// Output path for the flow file (`-` for stdout)
    #[arg(long)]
    flow_file: Option<PathBuf>,

    /// Optional path for a JSON run manifest
    #[arg(long)]
    manifest_file: Option<PathBuf>,

    /// Delete pre-existing output files before generating
    #[arg(long)]
    clean: bool,

    /// Bandwidth between switches
    #[arg(long, default_value = "100Gbps")]
    switch_to_switch_bandwidth: String,

    /// Delay between switches
    #[arg(long, default_value = "0.001ms")]
    switch_to_switch_delay: String,

    /// Error rate between switches
    #[arg(long, default_value = "0")]
    switch_to_switch_error_rate: String,

    /// Bandwidth between switch and host
    #[arg(long, default_value = "100Gbps")]
    switch_to_host_bandwidth: String,

    /// Delay between switch and host
    #[arg(long, default_value = "0.001ms")]
    switch_to_host_delay: String,

    /// Error rate between switch and host
    #[arg(long, default_value = "0")]
    switch_to_host_error_rate: String,

    /// PFC priority attached to every flow
    #[arg(long, default_value_t = 0)]
    pfc_priority: u8,

    /// Destination port attached to every flow
    #[arg(long, default_value_t = 0)]
    port: u16,

    /// Flow payload in bytes (upper bound with --random-payload)
    #[arg(long, default_value_t = 0)]
    payload: u64,

    /// Flow start time
    #[arg(long, default_value_t = 0.0)]
    initial_time: f64,

    /// Draw each flow payload uniformly from 0..=payload
    #[arg(long)]
    random_payload: bool,

    /// Seed for --random-payload (reproducible runs)
    #[arg(long, requires = "random_payload")]
    seed: Option<u64>,

    /// Degrade every other link (5Gbps, 10ms, 0.5 error rate)
    #[arg(long)]
    degraded_links: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting topogen");

    let (request, clean) = match cli.command {
        Command::SpineLeaf {
            spine,
            leaf,
            hosts_per_leaf,
            output,
        } => build_request(
            TopologyParams::SpineLeaf {
                spine,
                leaf,
                hosts_per_leaf,
            },
            output,
        ),
        Command::FatTree {
            k,
            hosts_per_edge,
            output,
        } => build_request(TopologyParams::FatTree { k, hosts_per_edge }, output),
        Command::Bcube { n, output } => build_request(TopologyParams::Bcube { n }, output),
        Command::FromConfig { config, clean } => {
            info!("Loading generation profile from '{}'", config.display());
            (profile_request(config::load_profile(&config)?), clean)
        }
    };

    if clean {
        orchestrator::clean_outputs(&request)?;
    }

    let report = orchestrator::generate(&request)?;

    info!(
        "Done: topology written to '{}', flows written to '{}'",
        report.topology_file, report.flow_file
    );

    Ok(())
}

/// Assemble a generation request from CLI flags
fn build_request(params: TopologyParams, output: OutputArgs) -> (GenerationRequest, bool) {
    let clean = output.clean;
    let request = GenerationRequest {
        topology: params,
        links: LinkProfile {
            switch_to_switch: LinkAttributes {
                bandwidth: output.switch_to_switch_bandwidth,
                delay: output.switch_to_switch_delay,
                error_rate: output.switch_to_switch_error_rate,
            },
            switch_to_host: LinkAttributes {
                bandwidth: output.switch_to_host_bandwidth,
                delay: output.switch_to_host_delay,
                error_rate: output.switch_to_host_error_rate,
            },
        },
        flow: FlowSpec {
            pfc_priority: output.pfc_priority,
            port: output.port,
            payload: output.payload,
            initial_time: output.initial_time,
        },
        link_variant: if output.degraded_links {
            LinkVariant::Degraded
        } else {
            LinkVariant::Default
        },
        flow_variant: if output.random_payload {
            FlowVariant::RandomPayload { seed: output.seed }
        } else {
            FlowVariant::Default
        },
        topology_path: output
            .topology_file
            .unwrap_or_else(|| default_path("topology")),
        flow_path: output.flow_file.unwrap_or_else(|| default_path("flow")),
        manifest_path: output.manifest_file,
    };
    (request, clean)
}

/// Assemble a generation request from a loaded profile
fn profile_request(profile: config::Profile) -> GenerationRequest {
    GenerationRequest {
        topology: profile.topology,
        links: profile.links,
        flow: profile.flows,
        link_variant: if profile.degraded_links {
            LinkVariant::Degraded
        } else {
            LinkVariant::Default
        },
        flow_variant: if profile.random_payload {
            FlowVariant::RandomPayload { seed: profile.seed }
        } else {
            FlowVariant::Default
        },
        topology_path: profile
            .output
            .topology_file
            .unwrap_or_else(|| default_path("topology")),
        flow_path: profile
            .output
            .flow_file
            .unwrap_or_else(|| default_path("flow")),
        manifest_path: profile.output.manifest_file,
    }
}

/// Timestamped default output filename, e.g. `topology_2026-08-30-12-00-00.txt`
fn default_path(prefix: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    PathBuf::from(format!("{}_{}.txt", prefix, timestamp))
}
