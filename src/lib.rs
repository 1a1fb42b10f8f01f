//! # Topogen - Datacenter topology and traffic-flow generator
//!
//! This library generates the topology (edge list) and traffic-flow input
//! files consumed by offline, NS-3 style network simulators.
//!
//! ## Overview
//!
//! Topogen synthesizes multi-tier datacenter networks - Spine-Leaf, Fat-Tree,
//! and BCube - as a sequence of deterministic connection patterns between
//! adjacent levels of nodes (core/spine switches, aggregation switches,
//! edge/leaf switches, hosts). Node identifiers are allocated as contiguous
//! ranges, one level after another, so every run is reproducible and no
//! identifier is ever reused.
//!
//! ## Key Features
//!
//! - **Three topology families**: Spine-Leaf, Fat-Tree (parameterized by `k`),
//!   and BCube (parameterized by `n`)
//! - **Deterministic output**: identical parameters produce byte-identical
//!   topology and flow files
//! - **Pluggable emitters**: file, console, or in-memory sinks; degraded-link
//!   and random-payload strategy variants
//! - **Flow generation**: full ordered host-pair cross product with
//!   configurable PFC priority, port, payload, and start time
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `topology`: the link-generation engine - connection patterns, level
//!   chaining, and per-kind topology builders
//! - `emit`: output sinks and the link/flow emitter strategies
//! - `config`: YAML generation profiles mirroring the CLI parameters
//! - `orchestrator`: high-level orchestration of a generation run
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use topogen::orchestrator::{self, FlowVariant, GenerationRequest, LinkVariant};
//! use topogen::topology::types::{FlowSpec, LinkProfile, TopologyParams};
//!
//! let request = GenerationRequest {
//!     topology: TopologyParams::SpineLeaf { spine: 2, leaf: 3, hosts_per_leaf: 3 },
//!     links: LinkProfile::default(),
//!     flow: FlowSpec::default(),
//!     link_variant: LinkVariant::Default,
//!     flow_variant: FlowVariant::Default,
//!     topology_path: "topology.txt".into(),
//!     flow_path: "flow.txt".into(),
//!     manifest_path: None,
//! };
//!
//! let report = orchestrator::generate(&request)?;
//! println!("{} links, {} flows", report.edges, report.flows);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Output Format
//!
//! The topology file is line-oriented text:
//!
//! ```text
//! <totalNodes> <totalSwitches> <totalHosts>
//! <switch ids, space separated>
//! <src> <dst> <bandwidth> <delay> <errorRate>    (one line per link)
//! ```
//!
//! The flow file starts with the flow count, followed by one line per flow:
//! `<src> <dst> <pfcPriority> <port> <payload> <initialTime>`.
//!
//! ## Error Handling
//!
//! Module boundaries use dedicated error enums (`TopologyError`,
//! `EmitterError`); the orchestration layer returns
//! `Result<T, color_eyre::eyre::Error>` with context attached.

pub mod config;
pub mod emit;
pub mod orchestrator;
pub mod topology;
