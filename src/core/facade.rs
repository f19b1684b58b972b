use crate::core::client::VerificationClient;
use crate::domain::model::{Coordinates, LocationQuery, VerificationOutcome};
use crate::domain::ports::{CountryProvider, LocationError, LocationSource};
use crate::utils::error::{Error, Result};

/// Convenience entry points that combine device location, device country and the client.
///
/// Owned by the host application; build one per configured server.
pub struct IsInCountry<L: LocationSource, C: CountryProvider> {
    client: VerificationClient,
    location: L,
    country: C,
}

impl<L: LocationSource, C: CountryProvider> IsInCountry<L, C> {
    pub fn new(client: VerificationClient, location: L, country: C) -> Self {
        Self {
            client,
            location,
            country,
        }
    }

    pub fn client(&self) -> &VerificationClient {
        &self.client
    }

    /// Checks explicit coordinates against `country_code`.
    pub async fn check_coordinate(
        &self,
        latitude: f64,
        longitude: f64,
        country_code: &str,
    ) -> VerificationOutcome {
        match LocationQuery::new(latitude, longitude, country_code) {
            Ok(query) => self.client.check(&query).await,
            Err(e) => short_circuit(e),
        }
    }

    /// Checks the current device location against `country_code`.
    pub async fn check_current_location(&self, country_code: &str) -> VerificationOutcome {
        match self.current_location().await {
            Ok(here) => {
                self.check_coordinate(here.latitude, here.longitude, country_code)
                    .await
            }
            Err(e) => short_circuit(e.into()),
        }
    }

    /// Checks the current device location against the country the device believes it is in.
    pub async fn check_current_location_in_device_country(&self) -> VerificationOutcome {
        match self.device_country_code() {
            Ok(code) => self.check_current_location(&code).await,
            Err(e) => short_circuit(e),
        }
    }

    pub async fn current_location(&self) -> std::result::Result<Coordinates, LocationError> {
        self.location.current_location().await
    }

    pub fn device_country_code(&self) -> Result<String> {
        self.country
            .country_code()
            .ok_or(Error::CountryUnavailable)
    }
}

fn short_circuit(err: Error) -> VerificationOutcome {
    tracing::warn!("Check not sent: {}", err);
    VerificationOutcome::failed(err.to_string(), err.category())
}
