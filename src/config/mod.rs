#[cfg(feature = "cli")]
pub mod cli;
pub mod file;

use crate::adapters::{CountryChain, FixedLocation};
use crate::core::client::{VerificationClient, DEFAULT_TIMEOUT};
use crate::utils::error::Result;
use std::time::Duration;

pub use file::FileConfig;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

/// Effective settings after merging the config file with command line overrides.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub file: FileConfig,
}

impl Settings {
    pub fn new(file: FileConfig) -> Self {
        Self { file }
    }

    /// A non-empty override replaces the file's server URL.
    pub fn with_server_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.file.server.url = Some(url);
        }
        self
    }

    pub fn with_device_location(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        if latitude.is_some() || longitude.is_some() {
            self.file.device.latitude = latitude;
            self.file.device.longitude = longitude;
        }
        self
    }

    pub fn server_url(&self) -> Option<&str> {
        self.file.server.url.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.file
            .server
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Client with the configured timeout, pointed at the server URL when one is known.
    pub fn build_client(&self) -> Result<VerificationClient> {
        let mut client = VerificationClient::with_timeout(self.timeout())?;
        if let Some(url) = self.server_url() {
            client.configure(url);
        }
        Ok(client)
    }

    pub fn location_source(&self) -> FixedLocation {
        FixedLocation::from_parts(self.file.device.latitude, self.file.device.longitude)
    }

    pub fn country_provider(&self) -> CountryChain {
        CountryChain::device_default(
            self.file.device.sim_country.clone(),
            self.file.device.network_country.clone(),
        )
    }
}
