//! Generation run orchestrator.
//!
//! This module coordinates one end-to-end generation: it opens the output
//! sinks, assembles the emitter variants, runs the topology builder, flushes
//! everything, and optionally writes a JSON run manifest next to the primary
//! outputs.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::Serialize;

use crate::emit::{
    ConsoleSink, DefaultFlowEmitter, DefaultLinkEmitter, DegradedLinkEmitter, FileSink,
    FlowEmitter, LinkEmitter, OutputSink, RandomPayloadFlowEmitter,
};
use crate::topology::types::{FlowSpec, LinkProfile, NodeTotals, TopologyParams};
use crate::topology::TopologyBuilder;

/// Which link emitter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkVariant {
    Default,
    /// Every other link gets degraded fixed attributes
    Degraded,
}

/// Which flow emitter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowVariant {
    Default,
    /// Payloads drawn uniformly from 0..=payload, optionally seeded
    RandomPayload { seed: Option<u64> },
}

/// Everything one generation run needs
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub topology: TopologyParams,
    pub links: LinkProfile,
    pub flow: FlowSpec,
    pub link_variant: LinkVariant,
    pub flow_variant: FlowVariant,
    /// Topology file destination; `-` writes to stdout
    pub topology_path: PathBuf,
    /// Flow file destination; `-` writes to stdout
    pub flow_path: PathBuf,
    /// Optional JSON run manifest destination
    pub manifest_path: Option<PathBuf>,
}

/// Summary of a completed run, also serialized as the manifest
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub topology: TopologyParams,
    pub totals: NodeTotals,
    pub edges: usize,
    pub flows: usize,
    pub topology_file: String,
    pub flow_file: String,
}

/// Run one complete generation
pub fn generate(request: &GenerationRequest) -> Result<GenerationReport> {
    request.topology.validate()?;

    info!(
        "Generating {} topology into '{}' (flows into '{}')",
        request.topology.kind(),
        request.topology_path.display(),
        request.flow_path.display()
    );

    let topology_sink = open_sink(&request.topology_path)?;
    let flow_sink = open_sink(&request.flow_path)?;

    let mut link_emitter: Box<dyn LinkEmitter> = match request.link_variant {
        LinkVariant::Default => Box::new(DefaultLinkEmitter::new(topology_sink)),
        LinkVariant::Degraded => Box::new(DegradedLinkEmitter::new(topology_sink)),
    };
    let mut flow_emitter: Box<dyn FlowEmitter> = match request.flow_variant {
        FlowVariant::Default => Box::new(DefaultFlowEmitter::new(flow_sink)),
        FlowVariant::RandomPayload { seed } => {
            Box::new(RandomPayloadFlowEmitter::new(flow_sink, seed))
        }
    };

    let mut builder = TopologyBuilder::new(
        request.topology.clone(),
        request.links.clone(),
        request.flow.clone(),
        link_emitter.as_mut(),
        flow_emitter.as_mut(),
    );
    let construct = builder.construct()?;

    link_emitter.finish()?;
    flow_emitter.finish()?;

    let report = GenerationReport {
        topology: request.topology.clone(),
        totals: construct.totals,
        edges: construct.edges,
        flows: construct.flows,
        topology_file: request.topology_path.display().to_string(),
        flow_file: request.flow_path.display().to_string(),
    };

    if let Some(manifest_path) = &request.manifest_path {
        write_manifest(manifest_path, &report)?;
    }

    info!(
        "Generated {} topology: {} nodes ({} switches, {} hosts), {} links, {} flows",
        report.topology.kind(),
        report.totals.nodes,
        report.totals.switches,
        report.totals.hosts,
        report.edges,
        report.flows
    );

    Ok(report)
}

/// Delete any pre-existing output files named by the request
pub fn clean_outputs(request: &GenerationRequest) -> Result<()> {
    let mut paths = vec![&request.topology_path, &request.flow_path];
    if let Some(manifest_path) = &request.manifest_path {
        paths.push(manifest_path);
    }
    for path in paths {
        if path != Path::new("-") && path.exists() {
            fs::remove_file(path)
                .wrap_err_with(|| format!("Failed to remove previous output '{}'", path.display()))?;
            info!("Removed previous output '{}'", path.display());
        }
    }
    Ok(())
}

fn open_sink(path: &Path) -> Result<Box<dyn OutputSink>> {
    if path == Path::new("-") {
        Ok(Box::new(ConsoleSink::new()))
    } else {
        let sink = FileSink::create(path)
            .wrap_err_with(|| format!("Failed to create output file '{}'", path.display()))?;
        Ok(Box::new(sink))
    }
}

fn write_manifest(path: &Path, report: &GenerationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).wrap_err("Failed to serialize run manifest")?;
    fs::write(path, json)
        .wrap_err_with(|| format!("Failed to write run manifest '{}'", path.display()))?;
    info!("Run manifest written to '{}'", path.display());
    Ok(())
}
