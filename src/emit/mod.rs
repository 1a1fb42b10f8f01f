//! Output sinks and edge/flow emitters.
//!
//! The topology engine never writes text itself; it drives the `LinkEmitter`
//! and `FlowEmitter` collaborators defined here, which render lines into an
//! `OutputSink` (file, console, or in-memory buffer).

pub mod flow;
pub mod link;
pub mod sink;

pub use flow::{DefaultFlowEmitter, FlowEmitter, RandomPayloadFlowEmitter};
pub use link::{DefaultLinkEmitter, DegradedLinkEmitter, LinkEmitter};
pub use sink::{ConsoleSink, FileSink, MemorySink, OutputSink};

/// Errors raised by emitters.
///
/// Emission failures are fatal to a generation run; the engine never retries.
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    #[error("failed to write to output sink: {0}")]
    Io(#[from] std::io::Error),
}
