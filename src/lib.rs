pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{FileConfig, Settings};
pub use crate::core::{batch::BatchRunner, client::VerificationClient, facade::IsInCountry};
pub use domain::model::{
    Coordinates, ErrorCategory, Failure, LocationQuery, Verification, VerificationOutcome,
};
pub use domain::ports::{CountryProvider, LocationError, LocationSource};
pub use utils::error::{Error, Result};
