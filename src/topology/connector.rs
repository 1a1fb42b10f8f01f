//! Level-to-level connection patterns.
//!
//! Each pattern emits the links between two adjacent levels of the topology:
//! a higher level whose node range is already allocated, and a lower level
//! allocated contiguously right after it. Every pattern returns the lower
//! level's range unconditionally, so a chain of applications threads node-id
//! allocation from one level to the next regardless of how many links were
//! actually emitted.
//!
//! Group counts that do not evenly divide a level's size are floor-divided;
//! the leftover nodes are left unconnected. This is a documented behavioral
//! contract of the generated file format, so it is preserved here rather than
//! rejected - a `warn!` is logged when truncation actually drops nodes.

use log::warn;

use crate::emit::link::LinkEmitter;
use crate::topology::types::{LinkAttributes, NodeRange, TopologyError};

/// One level-to-level connection algorithm.
///
/// All patterns share the same contract: given the higher level's range and
/// the lower level's node count, emit links whose sources lie in the higher
/// range and whose destinations lie in `[higher.end(), higher.end() + lower_count)`,
/// then return that lower range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPattern {
    /// Every higher node connects to every lower node
    FullMesh,
    /// Each higher node connects to an exclusive contiguous slice of
    /// `lower_count / higher_count` lower nodes
    OneOverGroup,
    /// Both levels are split into `group` contiguous groups; within group `g`
    /// every higher node connects to every lower node
    GroupOverGroup { group: usize },
    /// Higher nodes fan out one link per step across `group` lower
    /// sub-slices; used for the fat-tree core-aggregation mesh and the BCube
    /// upper level
    OneOverStep { group: usize },
    /// The higher level is split into `group` contiguous groups; every node
    /// in group `g` connects to the single lower node `g`
    GroupOverOne { group: usize },
    /// No-op seed used to anchor a chain at a known start id
    Anchor,
}

impl ConnectionPattern {
    /// Emit this pattern's links and return the lower level's range.
    ///
    /// The returned range always starts at `higher.end()` (the anchor pattern
    /// excepted, which starts at `higher.start` and emits nothing), so the
    /// caller can feed it straight into the next application in the chain.
    pub fn apply(
        &self,
        emitter: &mut dyn LinkEmitter,
        higher: NodeRange,
        lower_count: usize,
        attrs: &LinkAttributes,
    ) -> Result<NodeRange, TopologyError> {
        let lower = NodeRange::new(higher.end(), lower_count);

        match *self {
            Self::Anchor => {
                return Ok(NodeRange::new(higher.start, lower_count));
            }
            Self::FullMesh => {
                for h in 0..higher.count {
                    for l in 0..lower.count {
                        emitter.link(higher.start + h, lower.start + l, attrs)?;
                    }
                }
            }
            Self::OneOverGroup => {
                if higher.count == 0 {
                    return Err(TopologyError::InvalidParameters {
                        reason: "one-over-group requires a non-empty higher level".to_string(),
                    });
                }
                let slice = lower.count / higher.count;
                if lower.count % higher.count != 0 {
                    warn!(
                        "one-over-group leaves {} of {} lower nodes unconnected",
                        lower.count % higher.count,
                        lower.count
                    );
                }
                let mut dst = lower.start;
                for h in 0..higher.count {
                    for _ in 0..slice {
                        emitter.link(higher.start + h, dst, attrs)?;
                        dst += 1;
                    }
                }
            }
            Self::GroupOverGroup { group } => {
                let (higher_per_group, lower_per_group) =
                    group_sizes(higher.count, lower.count, group)?;
                for g in 0..group {
                    let higher_base = higher.start + g * higher_per_group;
                    // The lower-side group offset deliberately reuses the
                    // higher-side group width; the chains that exercise this
                    // pattern have equal level sizes, and the output format
                    // depends on the resulting id sequence.
                    let lower_base = lower.start + g * higher_per_group;
                    for hh in 0..higher_per_group {
                        for ll in 0..lower_per_group {
                            emitter.link(higher_base + hh, lower_base + ll, attrs)?;
                        }
                    }
                }
            }
            Self::OneOverStep { group } => {
                if group == 0 || lower.count / group == 0 {
                    return Err(TopologyError::InvalidParameters {
                        reason: format!(
                            "one-over-step requires at least one lower node per step group ({} nodes, {} groups)",
                            lower.count, group
                        ),
                    });
                }
                let lower_per_group = lower.count / group;
                let higher_per_group = higher.count / lower_per_group;
                let higher_groups = lower_per_group;
                if higher.count % lower_per_group != 0 {
                    warn!(
                        "one-over-step leaves {} of {} higher nodes unconnected",
                        higher.count % lower_per_group,
                        higher.count
                    );
                }
                for hg in 0..higher_groups {
                    for h in 0..higher_per_group {
                        let src = higher.start + hg * higher_per_group + h;
                        for step in 0..group {
                            emitter.link(src, lower.start + step * lower_per_group + hg, attrs)?;
                        }
                    }
                }
            }
            Self::GroupOverOne { group } => {
                if group == 0 {
                    return Err(TopologyError::InvalidParameters {
                        reason: "group-over-one requires at least one group".to_string(),
                    });
                }
                let higher_per_group = higher.count / group;
                if higher.count % group != 0 {
                    warn!(
                        "group-over-one leaves {} of {} higher nodes unconnected",
                        higher.count % group,
                        higher.count
                    );
                }
                for g in 0..group {
                    for h in 0..higher_per_group {
                        emitter.link(
                            higher.start + g * higher_per_group + h,
                            lower.start + g,
                            attrs,
                        )?;
                    }
                }
            }
        }

        Ok(lower)
    }

    /// Number of links `apply` will emit for the given level sizes.
    ///
    /// Pure arithmetic mirror of the emission loops, including the
    /// floor-division truncation.
    pub fn edge_count(&self, higher_count: usize, lower_count: usize) -> usize {
        match *self {
            Self::Anchor => 0,
            Self::FullMesh => higher_count * lower_count,
            Self::OneOverGroup => {
                if higher_count == 0 {
                    0
                } else {
                    higher_count * (lower_count / higher_count)
                }
            }
            Self::GroupOverGroup { group } => {
                if group == 0 {
                    0
                } else {
                    group * (higher_count / group) * (lower_count / group)
                }
            }
            Self::OneOverStep { group } => {
                if group == 0 || lower_count / group == 0 {
                    0
                } else {
                    let lower_per_group = lower_count / group;
                    lower_per_group * (higher_count / lower_per_group) * group
                }
            }
            Self::GroupOverOne { group } => {
                if group == 0 {
                    0
                } else {
                    group * (higher_count / group)
                }
            }
        }
    }
}

/// Split both level sizes into `group` equal parts, warning when either side
/// floor-divides with a remainder.
fn group_sizes(
    higher_count: usize,
    lower_count: usize,
    group: usize,
) -> Result<(usize, usize), TopologyError> {
    if group == 0 {
        return Err(TopologyError::InvalidParameters {
            reason: "group count must be at least 1".to_string(),
        });
    }
    if higher_count % group != 0 || lower_count % group != 0 {
        warn!(
            "group count {} does not evenly divide level sizes {}/{}; remainder nodes stay unconnected",
            group, higher_count, lower_count
        );
    }
    Ok((higher_count / group, lower_count / group))
}
