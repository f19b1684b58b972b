pub mod batch;
pub mod client;
pub mod envelope;
pub mod facade;

pub use crate::domain::model::{LocationQuery, Verification, VerificationOutcome};
pub use crate::domain::ports::{CountryProvider, LocationSource};
pub use crate::utils::error::Result;
