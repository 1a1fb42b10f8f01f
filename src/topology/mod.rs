//! Topology link-generation engine.
//!
//! This module contains the core of the generator: the data model for node
//! ranges and topology parameters, the level-to-level connection patterns,
//! and the builder that chains pattern applications into a full topology.

pub mod builder;
pub mod connector;
pub mod types;

// Re-export key types for easier access
pub use builder::{ConstructReport, TopologyBuilder};
pub use connector::ConnectionPattern;
pub use types::{NodeId, NodeRange, NodeTotals, TopologyError, TopologyParams};
