//! Run facade: JSON run configuration, engine limits and strategy dispatch.

pub mod config;
pub mod error;
pub mod limits;
pub mod run;

pub use config::{parse_config, parse_config_with, RunConfig, SeedSource, StrategyConfig};
pub use error::RunError;
pub use limits::{EngineLimits, LimitViolation};
pub use run::{run, RunReport, StrategyOutcome};
