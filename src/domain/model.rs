use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::error::{Error, Result};

/// A single (latitude, longitude, country code) triple submitted for verification.
///
/// Serializes to the wire body expected by `POST /api/v1/check`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationQuery {
    latitude: f64,
    longitude: f64,
    country_code: String,
}

impl LocationQuery {
    /// Builds a query, rejecting out-of-range coordinates and malformed codes.
    ///
    /// The country code is upper-cased, so `"fr"` and `"FR"` produce the same query.
    pub fn new(latitude: f64, longitude: f64, country_code: &str) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidQuery {
                field: "latitude".to_string(),
                value: latitude.to_string(),
                reason: "must be between -90 and 90 degrees".to_string(),
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidQuery {
                field: "longitude".to_string(),
                value: longitude.to_string(),
                reason: "must be between -180 and 180 degrees".to_string(),
            });
        }

        let code = country_code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidQuery {
                field: "country_code".to_string(),
                value: country_code.to_string(),
                reason: "must be a two-letter ISO 3166-1 alpha-2 code".to_string(),
            });
        }

        Ok(Self {
            latitude,
            longitude,
            country_code: code.to_ascii_uppercase(),
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }
}

/// A pair of coordinates in degrees, as reported by a location source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Coarse classification of a failed check, for programmatic branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Setup or caller mistake: no server URL, invalid query, missing location or country.
    ConfigurationError,
    /// Transport failure before any response was received.
    NetworkError,
    /// Non-2xx status, or the service answered `success: false`.
    ServerError,
    /// The response body did not match the envelope contract.
    ParseError,
}

impl ErrorCategory {
    /// Only transport failures are worth retrying; the client itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "configuration_error",
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
            Self::ParseError => "parse_error",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful verdict returned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub is_inside: bool,
    pub country_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Server-defined timestamp, usually RFC 3339.
    pub checked_at: String,
}

impl Verification {
    /// Parses `checked_at` as RFC 3339. `None` when the server uses another format.
    pub fn checked_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.checked_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Multi-line human readable description of the verdict context.
    pub fn summary(&self) -> String {
        format!(
            "Country: {}\nCoordinates: {}, {}\nChecked at: {}",
            self.country_name, self.latitude, self.longitude, self.checked_at
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub reason: String,
    pub category: ErrorCategory,
}

/// The single result produced for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Verified(Verification),
    Failed(Failure),
}

impl VerificationOutcome {
    pub fn failed(reason: impl Into<String>, category: ErrorCategory) -> Self {
        Self::Failed(Failure {
            reason: reason.into(),
            category,
        })
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }

    /// The inside/outside verdict, if the check succeeded.
    pub fn is_inside(&self) -> Option<bool> {
        match self {
            Self::Verified(v) => Some(v.is_inside),
            Self::Failed(_) => None,
        }
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Verified(_) => None,
            Self::Failed(f) => Some(f.category),
        }
    }

    pub fn into_result(self) -> std::result::Result<Verification, Failure> {
        match self {
            Self::Verified(v) => Ok(v),
            Self::Failed(f) => Err(f),
        }
    }
}

impl From<Result<Verification>> for VerificationOutcome {
    fn from(result: Result<Verification>) -> Self {
        match result {
            Ok(verification) => Self::Verified(verification),
            Err(e) => Self::failed(e.to_string(), e.category()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_serializes_with_wire_field_names() {
        let query = LocationQuery::new(48.8566, 2.3522, "FR").unwrap();
        let json = serde_json::to_value(&query).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"latitude": 48.8566, "longitude": 2.3522, "country_code": "FR"})
        );
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_query_uppercases_country_code() {
        let query = LocationQuery::new(0.0, 0.0, " gb ").unwrap();
        assert_eq!(query.country_code(), "GB");
    }

    #[test]
    fn test_query_rejects_invalid_values() {
        assert!(LocationQuery::new(90.1, 0.0, "FR").is_err());
        assert!(LocationQuery::new(-90.5, 0.0, "FR").is_err());
        assert!(LocationQuery::new(0.0, 180.5, "FR").is_err());
        assert!(LocationQuery::new(f64::NAN, 0.0, "FR").is_err());
        assert!(LocationQuery::new(0.0, 0.0, "FRA").is_err());
        assert!(LocationQuery::new(0.0, 0.0, "F1").is_err());
        assert!(LocationQuery::new(0.0, 0.0, "").is_err());

        let err = LocationQuery::new(0.0, 0.0, "FRA").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ConfigurationError);
    }

    #[test]
    fn test_query_accepts_boundaries() {
        assert!(LocationQuery::new(90.0, 180.0, "US").is_ok());
        assert!(LocationQuery::new(-90.0, -180.0, "US").is_ok());
    }

    #[test]
    fn test_checked_at_parsing() {
        let mut verification = Verification {
            is_inside: true,
            country_name: "France".to_string(),
            latitude: 48.85,
            longitude: 2.35,
            checked_at: "2024-01-01T00:00:00Z".to_string(),
        };

        let ts = verification.checked_at_utc().unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        verification.checked_at = "yesterday".to_string();
        assert!(verification.checked_at_utc().is_none());
    }

    #[test]
    fn test_summary_format() {
        let verification = Verification {
            is_inside: false,
            country_name: "France".to_string(),
            latitude: 48.85,
            longitude: 2.35,
            checked_at: "2024-01-01T00:00:00Z".to_string(),
        };

        assert_eq!(
            verification.summary(),
            "Country: France\nCoordinates: 48.85, 2.35\nChecked at: 2024-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let failed = VerificationOutcome::failed("boom", ErrorCategory::NetworkError);
        assert!(!failed.is_verified());
        assert_eq!(failed.is_inside(), None);
        assert_eq!(failed.category(), Some(ErrorCategory::NetworkError));
        assert!(failed.category().unwrap().is_retryable());
        assert!(!ErrorCategory::ParseError.is_retryable());

        let err = failed.into_result().unwrap_err();
        assert_eq!(err.reason, "boom");
    }

    #[test]
    fn test_outcome_from_error_keeps_message() {
        let outcome = VerificationOutcome::from(Err::<Verification, _>(Error::ServerUrlNotSet));
        assert_eq!(
            outcome,
            VerificationOutcome::failed("Server URL not set", ErrorCategory::ConfigurationError)
        );
    }
}
