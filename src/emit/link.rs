//! Link emitters.
//!
//! A `LinkEmitter` receives the topology engine's declarations and links and
//! renders them as topology-file lines. Variants differ only in the
//! attributes they attach; the (src, dst) sequence is always the engine's.

use crate::emit::sink::OutputSink;
use crate::emit::EmitterError;
use crate::topology::types::{LinkAttributes, NodeId, NodeTotals};

/// Bandwidth substituted by the degraded-link emitter
const DEGRADED_BANDWIDTH: &str = "5Gbps";
/// Delay substituted by the degraded-link emitter
const DEGRADED_DELAY: &str = "10ms";
/// Error rate substituted by the degraded-link emitter
const DEGRADED_ERROR_RATE: &str = "0.5";

/// Receives topology declarations and links, in emission order
pub trait LinkEmitter {
    /// Called once, before anything else, with the derived node totals
    fn declare_nodes(&mut self, totals: &NodeTotals) -> Result<(), EmitterError>;

    /// Called once with every switch id, in declaration order
    fn declare_switches(&mut self, ids: &[NodeId]) -> Result<(), EmitterError>;

    /// Called once per generated link
    fn link(&mut self, src: NodeId, dst: NodeId, attrs: &LinkAttributes)
        -> Result<(), EmitterError>;

    /// Called after the last link; flushes any buffered output
    fn finish(&mut self) -> Result<(), EmitterError>;
}

/// Renders the standard topology-file lines into a sink
pub struct DefaultLinkEmitter<S: OutputSink> {
    sink: S,
}

impl<S: OutputSink> DefaultLinkEmitter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Consume the emitter and hand back its sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: OutputSink> LinkEmitter for DefaultLinkEmitter<S> {
    fn declare_nodes(&mut self, totals: &NodeTotals) -> Result<(), EmitterError> {
        self.sink.write_str(&format!(
            "{} {} {}\n",
            totals.nodes, totals.switches, totals.hosts
        ))?;
        Ok(())
    }

    fn declare_switches(&mut self, ids: &[NodeId]) -> Result<(), EmitterError> {
        let mut line = String::new();
        for id in ids {
            line.push_str(&format!("{} ", id));
        }
        line.push('\n');
        self.sink.write_str(&line)?;
        Ok(())
    }

    fn link(
        &mut self,
        src: NodeId,
        dst: NodeId,
        attrs: &LinkAttributes,
    ) -> Result<(), EmitterError> {
        self.sink.write_str(&format!(
            "{} {} {} {} {}\n",
            src, dst, attrs.bandwidth, attrs.delay, attrs.error_rate
        ))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), EmitterError> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Emits every other link with degraded fixed attributes (5Gbps, 10ms, 0.5
/// error rate), for simulating lossy fabrics. Link pairs and counts are
/// identical to the default emitter.
pub struct DegradedLinkEmitter<S: OutputSink> {
    inner: DefaultLinkEmitter<S>,
    emitted: usize,
}

impl<S: OutputSink> DegradedLinkEmitter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            inner: DefaultLinkEmitter::new(sink),
            emitted: 0,
        }
    }

    pub fn into_sink(self) -> S {
        self.inner.into_sink()
    }
}

impl<S: OutputSink> LinkEmitter for DegradedLinkEmitter<S> {
    fn declare_nodes(&mut self, totals: &NodeTotals) -> Result<(), EmitterError> {
        self.inner.declare_nodes(totals)
    }

    fn declare_switches(&mut self, ids: &[NodeId]) -> Result<(), EmitterError> {
        self.inner.declare_switches(ids)
    }

    fn link(
        &mut self,
        src: NodeId,
        dst: NodeId,
        attrs: &LinkAttributes,
    ) -> Result<(), EmitterError> {
        let degrade = self.emitted % 2 == 0;
        self.emitted += 1;
        if degrade {
            let degraded = LinkAttributes {
                bandwidth: DEGRADED_BANDWIDTH.to_string(),
                delay: DEGRADED_DELAY.to_string(),
                error_rate: DEGRADED_ERROR_RATE.to_string(),
            };
            self.inner.link(src, dst, &degraded)
        } else {
            self.inner.link(src, dst, attrs)
        }
    }

    fn finish(&mut self) -> Result<(), EmitterError> {
        self.inner.finish()
    }
}
