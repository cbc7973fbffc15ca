//! Engine configuration, loadable from TOML. Every field has a default.

use codex::ASSOCIATION_FIELD;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What the name index does when two entities share a case-insensitive name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The first entity in snapshot order keeps the name.
    #[default]
    FirstWins,
    /// The last entity in snapshot order keeps the name.
    LastWins,
    /// Building the index fails with `GraphError::DuplicateName`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NameIndexConfig {
    pub collision_policy: CollisionPolicy,
}

/// Parameters of the cluster layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance of every cluster center from the origin.
    pub cluster_radius: f64,

    /// Entities per spiral ring.
    pub ring_size: usize,

    /// Radial distance between spiral rings.
    pub ring_spacing: f64,

    /// Extra angular offset per ring, in radians.
    pub ring_twist: f64,

    pub jitter_amplitude: f64,
    pub jitter_frequency_x: f64,
    pub jitter_frequency_y: f64,

    /// Number of relaxation passes.
    pub relaxation_iterations: u32,

    /// Fraction of the way toward a neighbour midpoint moved per pass.
    pub pull_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cluster_radius: 400.0,
            ring_size: 6,
            ring_spacing: 120.0,
            ring_twist: 0.3,
            jitter_amplitude: 20.0,
            jitter_frequency_x: 1.5,
            jitter_frequency_y: 2.3,
            relaxation_iterations: 3,
            pull_factor: 0.05,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Attribute holding the comma-separated association names.
    pub association_field: String,
    pub names: NameIndexConfig,
    pub layout: LayoutConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            association_field: ASSOCIATION_FIELD.to_string(),
            names: NameIndexConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
