//! Network configuration
//!
//! Replaces ambient global settings: every [`Network`](crate::Network) owns
//! its own copy, so independent networks never observe each other's tuning.

use crate::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Signal propagation speed in vacuum (m/s)
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Cap on the combined omni/omni range, as a multiple of the weaker side
pub const DEFAULT_OMNI_CLAMP: f64 = 100.0;

/// Cap on any combined range involving a dish, as a multiple of the weaker side
pub const DEFAULT_DISH_CLAMP: f64 = 10.0;

/// Which range model decides connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RangeModelKind {
    /// Flat range comparison per side
    #[default]
    Standard,
    /// Geometric combination of both sides' ranges
    Additive,
}

/// Tuning for range models and the pathfinder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub range_model: RangeModelKind,
    /// Fraction of a node's other omni ranges added to its best omni range
    pub multiple_antenna_multiplier: f64,
    pub omni_clamp: f64,
    pub dish_clamp: f64,
    /// Metres per second
    pub propagation_speed: f64,
    /// Abort a route search after this many node expansions
    pub max_expansions: Option<usize>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            range_model: RangeModelKind::Standard,
            multiple_antenna_multiplier: 0.0,
            omni_clamp: DEFAULT_OMNI_CLAMP,
            dish_clamp: DEFAULT_DISH_CLAMP,
            propagation_speed: SPEED_OF_LIGHT_M_S,
            max_expansions: None,
        }
    }
}

impl NetworkSettings {
    pub fn additive() -> Self {
        Self {
            range_model: RangeModelKind::Additive,
            ..Self::default()
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiple_antenna_multiplier = multiplier;
        self
    }

    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading network settings from {:?}", path);

        let reader = BufReader::new(File::open(path)?);
        let settings: Self = serde_json::from_reader(reader)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.propagation_speed.is_finite() && self.propagation_speed > 0.0) {
            return Err(RelayError::InvalidSnapshot(format!(
                "propagation_speed must be positive, got {}",
                self.propagation_speed
            )));
        }
        if !(self.multiple_antenna_multiplier >= 0.0) {
            return Err(RelayError::InvalidSnapshot(format!(
                "multiple_antenna_multiplier must be >= 0, got {}",
                self.multiple_antenna_multiplier
            )));
        }
        if !(self.omni_clamp > 0.0 && self.dish_clamp > 0.0) {
            return Err(RelayError::InvalidSnapshot(
                "range clamps must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
