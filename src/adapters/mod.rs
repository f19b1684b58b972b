// Adapters layer: concrete location and country sources for hosts without platform services.

pub mod country;
pub mod location;

pub use country::{CountryChain, LocaleCountry, StaticCountry};
pub use location::FixedLocation;
