//! Core data model for topology generation.
//!
//! This file defines node identifiers and ranges, per-kind topology
//! parameters, derived node totals, and the link/flow attribute bags shared
//! between the engine and the emitter layer.

use serde::{Deserialize, Serialize};

/// Default bandwidth attached to generated links
pub const DEFAULT_BANDWIDTH: &str = "100Gbps";
/// Default propagation delay attached to generated links
pub const DEFAULT_DELAY: &str = "0.001ms";
/// Default error rate attached to generated links
pub const DEFAULT_ERROR_RATE: &str = "0";

/// Node identifier, globally unique within one generated topology.
///
/// Identifiers are assigned by contiguous range allocation, one level after
/// another, and are never reused or reassigned.
pub type NodeId = usize;

/// Errors produced by the topology engine
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("invalid topology parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("link/flow emission failed: {0}")]
    Emitter(#[from] crate::emit::EmitterError),
}

/// A contiguous half-open interval of node identifiers, `[start, start+count)`.
///
/// Each level of a topology occupies one range; ranges assigned to successive
/// levels are contiguous and never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRange {
    /// First identifier in the range
    pub start: NodeId,
    /// Number of identifiers in the range
    pub count: usize,
}

impl NodeRange {
    pub fn new(start: NodeId, count: usize) -> Self {
        Self { start, count }
    }

    /// First identifier past the end of the range.
    ///
    /// This is where the next level's range begins when levels are chained.
    pub fn end(&self) -> NodeId {
        self.start + self.count
    }

    /// Returns true if `id` falls inside the range
    pub fn contains(&self, id: NodeId) -> bool {
        id >= self.start && id < self.end()
    }

    /// Iterates over the identifiers in the range
    pub fn iter(&self) -> std::ops::Range<NodeId> {
        self.start..self.end()
    }
}

/// Node counts derived from the topology parameters.
///
/// These are written as the first line of the topology file:
/// `<nodes> <switches> <hosts>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeTotals {
    /// Total number of nodes (switches + hosts)
    pub nodes: usize,
    /// Total number of switches across all levels
    pub switches: usize,
    /// Total number of hosts
    pub hosts: usize,
}

/// Size parameters for one topology kind.
///
/// Doubles as the YAML/JSON representation used by generation profiles and
/// run manifests (`kind: spine_leaf | fat_tree | bcube`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyParams {
    /// Two switch tiers; every spine connects to every leaf, hosts hang off
    /// the leaves in equal contiguous slices.
    SpineLeaf {
        spine: usize,
        leaf: usize,
        hosts_per_leaf: usize,
    },
    /// Three switch tiers sized from the arity `k`: `k^2/4` core switches and
    /// `k^2/2` each of aggregation and edge switches.
    FatTree { k: usize, hosts_per_edge: usize },
    /// Two switch levels of `n` switches each with `n^2` hosts between them.
    Bcube { n: usize },
}

impl TopologyParams {
    /// Short kind name used in log lines and manifests
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SpineLeaf { .. } => "spine_leaf",
            Self::FatTree { .. } => "fat_tree",
            Self::Bcube { .. } => "bcube",
        }
    }

    /// Validate size parameters, failing fast before any emission.
    ///
    /// Divisibility of level sizes by group counts is deliberately not
    /// checked here: group mismatches floor-divide and leave the remainder
    /// unconnected (see the connector module).
    pub fn validate(&self) -> Result<(), TopologyError> {
        match *self {
            Self::SpineLeaf {
                spine,
                leaf,
                hosts_per_leaf,
            } => {
                if spine == 0 || leaf == 0 || hosts_per_leaf == 0 {
                    return Err(TopologyError::InvalidParameters {
                        reason: format!(
                            "spine-leaf counts must all be at least 1 (spine={}, leaf={}, hosts_per_leaf={})",
                            spine, leaf, hosts_per_leaf
                        ),
                    });
                }
            }
            Self::FatTree { k, hosts_per_edge } => {
                if k < 2 || k % 2 != 0 {
                    return Err(TopologyError::InvalidParameters {
                        reason: format!("fat-tree arity must be an even number >= 2 (k={})", k),
                    });
                }
                if hosts_per_edge == 0 {
                    return Err(TopologyError::InvalidParameters {
                        reason: "fat-tree hosts_per_edge must be at least 1".to_string(),
                    });
                }
            }
            Self::Bcube { n } => {
                if n < 2 {
                    return Err(TopologyError::InvalidParameters {
                        reason: format!("bcube port count must be at least 2 (n={})", n),
                    });
                }
            }
        }
        Ok(())
    }

    /// Compute total node, switch, and host counts for this topology
    pub fn totals(&self) -> NodeTotals {
        let (switches, hosts) = match *self {
            Self::SpineLeaf {
                spine,
                leaf,
                hosts_per_leaf,
            } => (spine + leaf, leaf * hosts_per_leaf),
            Self::FatTree { k, hosts_per_edge } => {
                let core = k * k / 4;
                let agg = k * k / 2;
                let edge = k * k / 2;
                (core + agg + edge, edge * hosts_per_edge)
            }
            Self::Bcube { n } => (2 * n, n * n),
        };
        NodeTotals {
            nodes: switches + hosts,
            switches,
            hosts,
        }
    }

    /// Identifier list of every switch, in declaration order.
    ///
    /// Spine-Leaf and Fat-Tree allocate all switch levels first, so their
    /// switch ids are simply `0..switches`. BCube interleaves hosts between
    /// its two switch levels: top-level switches come first, then `n^2` host
    /// ids, then the bottom-level switches.
    pub fn switch_ids(&self) -> Vec<NodeId> {
        match *self {
            Self::SpineLeaf { .. } | Self::FatTree { .. } => {
                (0..self.totals().switches).collect()
            }
            Self::Bcube { n } => {
                let mut ids: Vec<NodeId> = (0..n).collect();
                ids.extend(n + n * n..n + n * n + n);
                ids
            }
        }
    }
}

/// Attribute bag attached to every generated link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttributes {
    pub bandwidth: String,
    pub delay: String,
    pub error_rate: String,
}

impl Default for LinkAttributes {
    fn default() -> Self {
        Self {
            bandwidth: DEFAULT_BANDWIDTH.to_string(),
            delay: DEFAULT_DELAY.to_string(),
            error_rate: DEFAULT_ERROR_RATE.to_string(),
        }
    }
}

/// Link attributes per link class.
///
/// Inter-switch levels use `switch_to_switch`; levels that touch hosts use
/// `switch_to_host` (both BCube levels touch hosts).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkProfile {
    #[serde(default)]
    pub switch_to_switch: LinkAttributes,
    #[serde(default)]
    pub switch_to_host: LinkAttributes,
}

/// Attribute bag attached to every generated flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowSpec {
    #[serde(default)]
    pub pfc_priority: u8,
    #[serde(default)]
    pub port: u16,
    /// Payload in bytes; the random-payload strategy treats this as an
    /// inclusive upper bound
    #[serde(default)]
    pub payload: u64,
    #[serde(default)]
    pub initial_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_range_arithmetic() {
        let range = NodeRange::new(5, 9);
        assert_eq!(range.end(), 14);
        assert!(range.contains(5));
        assert!(range.contains(13));
        assert!(!range.contains(14));
        assert!(!range.contains(4));
        assert_eq!(range.iter().count(), 9);
    }

    #[test]
    fn test_spine_leaf_totals() {
        let params = TopologyParams::SpineLeaf {
            spine: 2,
            leaf: 3,
            hosts_per_leaf: 3,
        };
        let totals = params.totals();
        assert_eq!(totals.switches, 5);
        assert_eq!(totals.hosts, 9);
        assert_eq!(totals.nodes, 14);
        assert_eq!(params.switch_ids(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_fat_tree_totals() {
        let params = TopologyParams::FatTree {
            k: 4,
            hosts_per_edge: 3,
        };
        let totals = params.totals();
        // 4 core + 8 agg + 8 edge switches, 24 hosts
        assert_eq!(totals.switches, 20);
        assert_eq!(totals.hosts, 24);
        assert_eq!(totals.nodes, 44);
    }

    #[test]
    fn test_bcube_totals_and_switch_ids() {
        let params = TopologyParams::Bcube { n: 4 };
        let totals = params.totals();
        assert_eq!(totals.switches, 8);
        assert_eq!(totals.hosts, 16);
        assert_eq!(totals.nodes, 24);
        // Top-level switches, then bottom-level switches past the host gap
        assert_eq!(params.switch_ids(), vec![0, 1, 2, 3, 20, 21, 22, 23]);
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        let params = TopologyParams::SpineLeaf {
            spine: 0,
            leaf: 3,
            hosts_per_leaf: 3,
        };
        assert!(matches!(
            params.validate(),
            Err(TopologyError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_odd_fat_tree_arity() {
        let params = TopologyParams::FatTree {
            k: 5,
            hosts_per_edge: 3,
        };
        assert!(params.validate().is_err());
        let params = TopologyParams::FatTree {
            k: 6,
            hosts_per_edge: 3,
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_small_bcube() {
        assert!(TopologyParams::Bcube { n: 1 }.validate().is_err());
        assert!(TopologyParams::Bcube { n: 2 }.validate().is_ok());
    }

    #[test]
    fn test_params_yaml_round_trip() {
        let params = TopologyParams::FatTree {
            k: 4,
            hosts_per_edge: 3,
        };
        let yaml = serde_yaml::to_string(&params).unwrap();
        assert!(yaml.contains("fat_tree"));
        let parsed: TopologyParams = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, params);
    }
}
