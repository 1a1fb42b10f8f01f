//! Topology construction and level chaining.
//!
//! The builder turns one set of topology parameters into the full output
//! sequence: node declaration, switch declaration, link generation, then flow
//! generation. Link generation folds an explicit ordered list of level steps,
//! carrying the running node range from each pattern application into the
//! next, which keeps the chaining invariant (contiguous, non-overlapping
//! level ranges) visible and independently testable.

use std::collections::HashSet;

use log::info;

use crate::emit::flow::FlowEmitter;
use crate::emit::link::LinkEmitter;
use crate::topology::connector::ConnectionPattern;
use crate::topology::types::{
    FlowSpec, LinkAttributes, LinkProfile, NodeId, NodeRange, NodeTotals, TopologyError,
    TopologyParams,
};

/// Which attribute set a level's links carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    SwitchToSwitch,
    SwitchToHost,
}

/// One level-connection step in a topology chain
#[derive(Debug, Clone, Copy)]
pub struct LevelStep {
    pub pattern: ConnectionPattern,
    /// Node count of the level being attached below the running range
    pub lower_count: usize,
    pub class: LinkClass,
    /// Human-readable name of the level pair, for log lines
    pub label: &'static str,
}

/// Ordered connection chain for a topology kind: the anchor range of the top
/// level plus the steps that attach each subsequent level.
pub fn level_plan(params: &TopologyParams) -> (NodeRange, Vec<LevelStep>) {
    match *params {
        TopologyParams::SpineLeaf {
            spine,
            leaf,
            hosts_per_leaf,
        } => (
            NodeRange::new(0, spine),
            vec![
                LevelStep {
                    pattern: ConnectionPattern::FullMesh,
                    lower_count: leaf,
                    class: LinkClass::SwitchToSwitch,
                    label: "spine-leaf",
                },
                LevelStep {
                    pattern: ConnectionPattern::OneOverGroup,
                    lower_count: leaf * hosts_per_leaf,
                    class: LinkClass::SwitchToHost,
                    label: "leaf-host",
                },
            ],
        ),
        TopologyParams::FatTree { k, hosts_per_edge } => {
            let core = k * k / 4;
            let agg = k * k / 2;
            let edge = k * k / 2;
            (
                NodeRange::new(0, core),
                vec![
                    LevelStep {
                        pattern: ConnectionPattern::OneOverStep { group: k },
                        lower_count: agg,
                        class: LinkClass::SwitchToSwitch,
                        label: "core-aggregation",
                    },
                    LevelStep {
                        pattern: ConnectionPattern::GroupOverGroup { group: k },
                        lower_count: edge,
                        class: LinkClass::SwitchToSwitch,
                        label: "aggregation-edge",
                    },
                    LevelStep {
                        pattern: ConnectionPattern::OneOverGroup,
                        lower_count: edge * hosts_per_edge,
                        class: LinkClass::SwitchToHost,
                        label: "edge-host",
                    },
                ],
            )
        }
        TopologyParams::Bcube { n } => (
            NodeRange::new(0, n),
            vec![
                LevelStep {
                    pattern: ConnectionPattern::OneOverStep { group: n },
                    lower_count: n * n,
                    class: LinkClass::SwitchToHost,
                    label: "level1-host",
                },
                LevelStep {
                    pattern: ConnectionPattern::GroupOverOne { group: n },
                    lower_count: n,
                    class: LinkClass::SwitchToHost,
                    label: "host-level0",
                },
            ],
        ),
    }
}

/// Summary of one completed construction
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ConstructReport {
    pub totals: NodeTotals,
    /// Number of links emitted
    pub edges: usize,
    /// Number of flows emitted
    pub flows: usize,
}

/// Orchestrates one topology generation run against a pair of emitters.
///
/// `construct` performs node declaration, switch declaration, link
/// generation, and flow generation in that fixed order; later phases consume
/// identifier sets computed by earlier ones.
pub struct TopologyBuilder<'a> {
    params: TopologyParams,
    links: LinkProfile,
    flow: FlowSpec,
    link_emitter: &'a mut dyn LinkEmitter,
    flow_emitter: &'a mut dyn FlowEmitter,
}

impl<'a> TopologyBuilder<'a> {
    pub fn new(
        params: TopologyParams,
        links: LinkProfile,
        flow: FlowSpec,
        link_emitter: &'a mut dyn LinkEmitter,
        flow_emitter: &'a mut dyn FlowEmitter,
    ) -> Self {
        Self {
            params,
            links,
            flow,
            link_emitter,
            flow_emitter,
        }
    }

    /// Run the full construction sequence and return its summary
    pub fn construct(&mut self) -> Result<ConstructReport, TopologyError> {
        self.params.validate()?;

        let totals = self.params.totals();
        let switch_ids = self.params.switch_ids();

        info!(
            "Building {} topology: {} nodes ({} switches, {} hosts)",
            self.params.kind(),
            totals.nodes,
            totals.switches,
            totals.hosts
        );

        self.link_emitter.declare_nodes(&totals)?;
        self.link_emitter.declare_switches(&switch_ids)?;

        let edges = self.build_links()?;
        let flows = self.build_flows(&totals, &switch_ids)?;

        info!(
            "{} topology complete: {} links, {} flows",
            self.params.kind(),
            edges,
            flows
        );

        Ok(ConstructReport {
            totals,
            edges,
            flows,
        })
    }

    /// Fold the level plan left to right, threading each step's returned
    /// range into the next step's higher range.
    fn build_links(&mut self) -> Result<usize, TopologyError> {
        let (anchor, steps) = level_plan(&self.params);
        let mut current = anchor;
        let mut edges = 0;

        for step in steps {
            info!(
                "Connecting {} level with {:?}: {} over {} nodes starting at id {}",
                step.label, step.pattern, current.count, step.lower_count, current.start
            );
            edges += step.pattern.edge_count(current.count, step.lower_count);
            let attrs = self.link_attrs(step.class).clone();
            current = step
                .pattern
                .apply(self.link_emitter, current, step.lower_count, &attrs)?;
        }

        Ok(edges)
    }

    /// Emit one flow per ordered host pair.
    ///
    /// The host set is every node id not declared as a switch; for BCube this
    /// is exactly the gap between the two switch levels.
    fn build_flows(
        &mut self,
        totals: &NodeTotals,
        switch_ids: &[NodeId],
    ) -> Result<usize, TopologyError> {
        let switches: HashSet<NodeId> = switch_ids.iter().copied().collect();
        let hosts: Vec<NodeId> = (0..totals.nodes).filter(|id| !switches.contains(id)).collect();

        let flows = hosts.len() * hosts.len().saturating_sub(1);
        info!("Generating {} flows across {} hosts", flows, hosts.len());

        self.flow_emitter.begin(flows)?;
        for &src in &hosts {
            for &dst in &hosts {
                if src != dst {
                    self.flow_emitter.flow(src, dst, &self.flow)?;
                }
            }
        }

        Ok(flows)
    }

    fn link_attrs(&self, class: LinkClass) -> &LinkAttributes {
        match class {
            LinkClass::SwitchToSwitch => &self.links.switch_to_switch,
            LinkClass::SwitchToHost => &self.links.switch_to_host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::EmitterError;

    #[derive(Default)]
    struct RecordingLinks {
        totals: Option<NodeTotals>,
        switches: Vec<NodeId>,
        edges: Vec<(NodeId, NodeId)>,
    }

    impl LinkEmitter for RecordingLinks {
        fn declare_nodes(&mut self, totals: &NodeTotals) -> Result<(), EmitterError> {
            self.totals = Some(*totals);
            Ok(())
        }

        fn declare_switches(&mut self, ids: &[NodeId]) -> Result<(), EmitterError> {
            self.switches = ids.to_vec();
            Ok(())
        }

        fn link(
            &mut self,
            src: NodeId,
            dst: NodeId,
            _attrs: &LinkAttributes,
        ) -> Result<(), EmitterError> {
            self.edges.push((src, dst));
            Ok(())
        }

        fn finish(&mut self) -> Result<(), EmitterError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingFlows {
        announced: Option<usize>,
        flows: Vec<(NodeId, NodeId)>,
    }

    impl FlowEmitter for RecordingFlows {
        fn begin(&mut self, flow_count: usize) -> Result<(), EmitterError> {
            self.announced = Some(flow_count);
            Ok(())
        }

        fn flow(
            &mut self,
            src: NodeId,
            dst: NodeId,
            _spec: &FlowSpec,
        ) -> Result<(), EmitterError> {
            self.flows.push((src, dst));
            Ok(())
        }

        fn finish(&mut self) -> Result<(), EmitterError> {
            Ok(())
        }
    }

    fn construct(params: TopologyParams) -> (ConstructReport, RecordingLinks, RecordingFlows) {
        let mut links = RecordingLinks::default();
        let mut flows = RecordingFlows::default();
        let report = TopologyBuilder::new(
            params,
            LinkProfile::default(),
            FlowSpec::default(),
            &mut links,
            &mut flows,
        )
        .construct()
        .unwrap();
        (report, links, flows)
    }

    #[test]
    fn test_spine_leaf_scenario() {
        let (report, links, flows) = construct(TopologyParams::SpineLeaf {
            spine: 2,
            leaf: 3,
            hosts_per_leaf: 3,
        });

        assert_eq!(report.totals.nodes, 14);
        assert_eq!(report.totals.switches, 5);
        assert_eq!(report.totals.hosts, 9);
        assert_eq!(report.edges, 15);
        assert_eq!(report.flows, 72);

        assert_eq!(links.switches, vec![0, 1, 2, 3, 4]);

        // Full mesh between spines {0,1} and leaves {2,3,4}
        assert_eq!(
            &links.edges[..6],
            &[(0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4)]
        );
        // Hosts 5..14 split into three slices under leaves 2, 3, 4
        assert_eq!(
            &links.edges[6..],
            &[
                (2, 5),
                (2, 6),
                (2, 7),
                (3, 8),
                (3, 9),
                (3, 10),
                (4, 11),
                (4, 12),
                (4, 13)
            ]
        );

        assert_eq!(flows.announced, Some(72));
        assert_eq!(flows.flows.len(), 72);
        assert_eq!(flows.flows[0], (5, 6));
        assert!(flows.flows.iter().all(|(src, dst)| {
            src != dst && (5..14).contains(src) && (5..14).contains(dst)
        }));
    }

    #[test]
    fn test_bcube_scenario() {
        let (report, links, flows) = construct(TopologyParams::Bcube { n: 4 });

        assert_eq!(report.totals.nodes, 24);
        assert_eq!(report.totals.switches, 8);
        assert_eq!(report.totals.hosts, 16);
        assert_eq!(report.edges, 32);
        assert_eq!(report.flows, 16 * 15);

        assert_eq!(links.switches, vec![0, 1, 2, 3, 20, 21, 22, 23]);
        assert_eq!(links.edges.len(), 32);

        // First level: top switch s reaches host 4 + 4*step + s
        for (src, dst) in &links.edges[..16] {
            assert!(*src < 4);
            assert_eq!((dst - 4) % 4, *src);
        }
        // Second level: each block of four hosts collapses onto one bottom switch
        for (src, dst) in &links.edges[16..] {
            assert!((4..20).contains(src));
            assert_eq!(*dst, 20 + (src - 4) / 4);
        }

        // Flows run over the host gap only
        assert!(flows
            .flows
            .iter()
            .all(|(src, dst)| (4..20).contains(src) && (4..20).contains(dst)));
    }

    #[test]
    fn test_fat_tree_scenario() {
        let (report, links, _flows) = construct(TopologyParams::FatTree {
            k: 4,
            hosts_per_edge: 3,
        });

        assert_eq!(report.totals.nodes, 44);
        assert_eq!(report.totals.switches, 20);
        assert_eq!(report.totals.hosts, 24);
        // 16 core-agg + 16 agg-edge + 24 edge-host
        assert_eq!(report.edges, 56);
        assert_eq!(report.flows, 24 * 23);
        assert_eq!(links.edges.len(), 56);

        // Level ranges: core 0..4, agg 4..12, edge 12..20, hosts 20..44
        for (src, dst) in &links.edges[..16] {
            assert!(*src < 4 && (4..12).contains(dst));
        }
        for (src, dst) in &links.edges[16..32] {
            assert!((4..12).contains(src) && (12..20).contains(dst));
        }
        for (src, dst) in &links.edges[32..] {
            assert!((12..20).contains(src) && (20..44).contains(dst));
        }
    }

    #[test]
    fn test_chaining_never_reuses_ids() {
        for params in [
            TopologyParams::SpineLeaf {
                spine: 2,
                leaf: 3,
                hosts_per_leaf: 3,
            },
            TopologyParams::FatTree {
                k: 4,
                hosts_per_edge: 3,
            },
            TopologyParams::Bcube { n: 4 },
        ] {
            let (anchor, steps) = level_plan(&params);
            let mut current = anchor;
            let mut allocated = anchor.count;
            for step in &steps {
                let next = NodeRange::new(current.end(), step.lower_count);
                // Each level starts exactly where the allocation left off
                assert_eq!(next.start, allocated);
                allocated += step.lower_count;
                current = next;
            }
            // Chained ranges tile 0..nodes exactly once
            assert_eq!(current.end(), params.totals().nodes);
        }
    }

    #[test]
    fn test_construct_rejects_invalid_parameters() {
        let mut links = RecordingLinks::default();
        let mut flows = RecordingFlows::default();
        let result = TopologyBuilder::new(
            TopologyParams::FatTree {
                k: 3,
                hosts_per_edge: 1,
            },
            LinkProfile::default(),
            FlowSpec::default(),
            &mut links,
            &mut flows,
        )
        .construct();

        assert!(matches!(
            result,
            Err(TopologyError::InvalidParameters { .. })
        ));
        // Nothing may be emitted before validation passes
        assert!(links.totals.is_none());
        assert!(links.edges.is_empty());
        assert!(flows.announced.is_none());
    }

    #[test]
    fn test_emitter_errors_propagate() {
        struct FailingLinks;

        impl LinkEmitter for FailingLinks {
            fn declare_nodes(&mut self, _totals: &NodeTotals) -> Result<(), EmitterError> {
                Err(EmitterError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "sink closed",
                )))
            }

            fn declare_switches(&mut self, _ids: &[NodeId]) -> Result<(), EmitterError> {
                Ok(())
            }

            fn link(
                &mut self,
                _src: NodeId,
                _dst: NodeId,
                _attrs: &LinkAttributes,
            ) -> Result<(), EmitterError> {
                Ok(())
            }

            fn finish(&mut self) -> Result<(), EmitterError> {
                Ok(())
            }
        }

        let mut links = FailingLinks;
        let mut flows = RecordingFlows::default();
        let result = TopologyBuilder::new(
            TopologyParams::Bcube { n: 4 },
            LinkProfile::default(),
            FlowSpec::default(),
            &mut links,
            &mut flows,
        )
        .construct();

        assert!(matches!(result, Err(TopologyError::Emitter(_))));
    }
}
