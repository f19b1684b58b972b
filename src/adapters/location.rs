use crate::domain::model::Coordinates;
use crate::domain::ports::{LocationError, LocationSource};
use async_trait::async_trait;

/// Location source for hosts without positioning hardware: coordinates come from
/// flags or the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    coordinates: Option<Coordinates>,
}

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinates: Some(Coordinates::new(latitude, longitude)),
        }
    }

    /// A source that never has a fix.
    pub fn unavailable() -> Self {
        Self { coordinates: None }
    }

    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            _ => Self::unavailable(),
        }
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        self.coordinates.ok_or(LocationError::Unavailable)
    }
}
