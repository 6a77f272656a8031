use crate::error::{ConfigError, Result};

/// Default grid pitch in continuous units.
pub const DEFAULT_CELL_SIZE: f64 = 10.0;
pub const DEFAULT_TURN_PENALTY_BASE: f64 = 2.0;
/// Heap pops allowed to A* and uniform-cost search before giving up.
pub const DEFAULT_MAX_EXPANSIONS: usize = 10_000;
/// Outer threshold passes allowed to IDA* before giving up.
pub const DEFAULT_MAX_PASSES: usize = 10_000;

/// Router settings. A router validates these once on construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingConfig {
    #[cfg_attr(feature = "serde", serde(default = "defaults::cell_size"))]
    pub cell_size: f64,

    /// Base of the exponential bend penalty, must exceed 1
    #[cfg_attr(feature = "serde", serde(default = "defaults::turn_penalty_base"))]
    pub turn_penalty_base: f64,

    #[cfg_attr(feature = "serde", serde(default = "defaults::max_expansions"))]
    pub max_expansions: usize,

    #[cfg_attr(feature = "serde", serde(default = "defaults::max_passes"))]
    pub max_passes: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            turn_penalty_base: DEFAULT_TURN_PENALTY_BASE,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl RoutingConfig {
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }
    pub fn with_turn_penalty_base(mut self, base: f64) -> Self {
        self.turn_penalty_base = base;
        self
    }
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        if !(self.turn_penalty_base.is_finite() && self.turn_penalty_base > 1.0) {
            return Err(ConfigError::TurnPenaltyBase(self.turn_penalty_base));
        }
        if self.max_expansions == 0 {
            return Err(ConfigError::ZeroLimit("max_expansions"));
        }
        if self.max_passes == 0 {
            return Err(ConfigError::ZeroLimit("max_passes"));
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod defaults {
    pub fn cell_size() -> f64 {
        super::DEFAULT_CELL_SIZE
    }
    pub fn turn_penalty_base() -> f64 {
        super::DEFAULT_TURN_PENALTY_BASE
    }
    pub fn max_expansions() -> usize {
        super::DEFAULT_MAX_EXPANSIONS
    }
    pub fn max_passes() -> usize {
        super::DEFAULT_MAX_PASSES
    }
}
