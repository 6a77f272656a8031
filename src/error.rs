//! Configuration errors. Failing to find a route is not an error; see [crate::RouteStatus].
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("cell size must be positive and finite, got {0}")]
    CellSize(f64),

    #[error("turn penalty base must be finite and greater than 1, got {0}")]
    TurnPenaltyBase(f64),

    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),

    #[error("unknown routing algorithm '{0}'")]
    UnknownAlgorithm(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
