//! Configuration errors.

/// Errors raised while building or loading a [`super::PlanConfiguration`].
///
/// The calculation functions themselves never fail; everything here is
/// rejected before the first year is computed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("bracket table has no tiers")]
    EmptyBracketTable,

    #[error("tier {index} has a non-positive or non-finite upper bound: {bound}")]
    InvalidBound { index: usize, bound: f64 },

    #[error("tier {index} upper bound {bound} does not exceed previous bound {previous}")]
    NonAscendingBound {
        index: usize,
        bound: f64,
        previous: f64,
    },

    #[error("last tier must be unbounded")]
    MissingUnboundedTier,

    #[error("tier {index} is unbounded but is not the last tier")]
    UnboundedTierNotLast { index: usize },

    #[error("{field} must be a rate between 0 and 1, got {value}")]
    InvalidRate { field: String, value: f64 },

    #[error("{field} must be a finite amount >= 0, got {value}")]
    InvalidAmount { field: String, value: f64 },

    #[error("failed to read plan configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse plan configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
