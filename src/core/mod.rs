mod brackets;
mod config;
mod engine;
mod error;
mod projection;
pub mod reference;
mod types;

pub use brackets::{BracketTable, RateBracket, progressive_tax};
pub use config::{PlanConfiguration, TaxSchedule};
pub use engine::{
    PayrollTax, clamp_deferral, compute_year, employer_match, payroll_tax, rate_summary,
};
pub use error::ConfigError;
pub use projection::run_projection;
pub use types::{
    FilingStatus, PayFrequency, PerStatus, ProjectionInputs, ProjectionResult, ProjectionRow,
    RateSummary, YearInputs, YearResult,
};
