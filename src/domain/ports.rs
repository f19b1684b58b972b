use crate::domain::model::Coordinates;
use async_trait::async_trait;
use thiserror::Error;

/// Why a location source could not produce coordinates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission not granted")]
    PermissionDenied,

    #[error("Unable to get current location")]
    Unavailable,

    #[error("Location error: {0}")]
    Provider(String),
}

/// Supplies the current device coordinates.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_location(&self) -> Result<Coordinates, LocationError>;
}

/// Supplies a default ISO 3166-1 alpha-2 country code for the device, if one can be determined.
pub trait CountryProvider: Send + Sync {
    fn country_code(&self) -> Option<String>;
}
