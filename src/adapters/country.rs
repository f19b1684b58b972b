//! Country inference adapters.
//!
//! A device's country is taken from the SIM first, then the mobile network, then the
//! system locale. [`CountryChain::device_default`] builds that chain from whatever the
//! host knows; on machines without telephony the first two links are usually empty.

use crate::domain::ports::CountryProvider;

const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// A country code known up front, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticCountry(Option<String>);

impl StaticCountry {
    pub fn new(code: Option<String>) -> Self {
        Self(code)
    }
}

impl CountryProvider for StaticCountry {
    fn country_code(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Region of the POSIX locale taken from the environment.
#[derive(Debug, Clone, Default)]
pub struct LocaleCountry;

impl CountryProvider for LocaleCountry {
    fn country_code(&self) -> Option<String> {
        LOCALE_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .and_then(|locale| region_from_locale(&locale))
    }
}

/// `fr_FR.UTF-8` -> `FR`, `en_GB@euro` -> `GB`. `C` and `POSIX` have no region.
pub fn region_from_locale(locale: &str) -> Option<String> {
    let without_modifier = locale.split('@').next()?;
    let without_codeset = without_modifier.split('.').next()?;
    let (_, region) = without_codeset.split_once(['_', '-'])?;
    normalize(region)
}

fn normalize(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

/// Tries providers in order and returns the first usable two-letter code.
#[derive(Default)]
pub struct CountryChain {
    providers: Vec<Box<dyn CountryProvider>>,
}

impl CountryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl CountryProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// SIM country, then network country, then the system locale.
    pub fn device_default(sim_country: Option<String>, network_country: Option<String>) -> Self {
        Self::new()
            .with(StaticCountry::new(sim_country))
            .with(StaticCountry::new(network_country))
            .with(LocaleCountry)
    }
}

impl CountryProvider for CountryChain {
    fn country_code(&self) -> Option<String> {
        self.providers
            .iter()
            .filter_map(|provider| provider.country_code())
            .find_map(|code| normalize(&code))
    }
}
