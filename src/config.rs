//! YAML generation profiles.
//!
//! A profile captures everything the CLI flags express - topology kind and
//! size parameters, link attributes per link class, flow attributes, strategy
//! variants, and output paths - so a run can be described in one file:
//!
//! ```yaml
//! topology:
//!   kind: fat_tree
//!   k: 4
//!   hosts_per_edge: 3
//! links:
//!   switch_to_switch:
//!     bandwidth: 100Gbps
//!     delay: 0.001ms
//!     error_rate: "0"
//! flows:
//!   payload: 1024
//! random_payload: true
//! seed: 42
//! output:
//!   topology_file: topology.txt
//!   flow_file: flow.txt
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::topology::types::{FlowSpec, LinkProfile, TopologyParams};

/// One complete generation profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Topology kind and size parameters
    pub topology: TopologyParams,
    /// Link attributes per link class
    #[serde(default)]
    pub links: LinkProfile,
    /// Flow attributes
    #[serde(default)]
    pub flows: FlowSpec,
    /// Emit every other link with degraded attributes
    #[serde(default)]
    pub degraded_links: bool,
    /// Draw flow payloads uniformly from 0..=payload
    #[serde(default)]
    pub random_payload: bool,
    /// Seed for the random-payload strategy
    #[serde(default)]
    pub seed: Option<u64>,
    /// Output file locations
    #[serde(default)]
    pub output: OutputPaths,
}

/// Output file locations; unset paths fall back to timestamped defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputPaths {
    #[serde(default)]
    pub topology_file: Option<PathBuf>,
    #[serde(default)]
    pub flow_file: Option<PathBuf>,
    #[serde(default)]
    pub manifest_file: Option<PathBuf>,
}

/// Load and validate a generation profile from a YAML file
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<Profile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read profile '{}'", path.display()))?;
    let profile: Profile = serde_yaml::from_str(&contents)
        .wrap_err_with(|| format!("Failed to parse profile '{}'", path.display()))?;
    profile
        .topology
        .validate()
        .wrap_err_with(|| format!("Profile '{}' rejected", path.display()))?;
    Ok(profile)
}
