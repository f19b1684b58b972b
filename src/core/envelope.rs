//! Wire format of the verification service's response.

use crate::domain::model::Verification;
use crate::utils::error::{Error, Result};
use serde::Deserialize;

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerEnvelope {
    #[serde(default)]
    pub success: bool,
    pub data: Option<ServerData>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerData {
    pub is_inside_country: bool,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country_code: Option<String>,
    pub country_name: String,
    pub checked_at: String,
}

impl ServerEnvelope {
    /// Parses a 2xx response body. Any mismatch with the envelope shape is a `Parse` error.
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| Error::Parse {
            message: e.to_string(),
        })
    }

    /// Turns the envelope into a verdict, or the server's own rejection.
    pub fn into_verification(self) -> Result<Verification> {
        if !self.success {
            return Err(Error::Rejected {
                message: self.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            });
        }

        let data = self.data.ok_or_else(|| Error::Parse {
            message: "missing field `data` in successful response".to_string(),
        })?;

        Ok(Verification {
            is_inside: data.is_inside_country,
            country_name: data.country_name,
            latitude: data.latitude,
            longitude: data.longitude,
            checked_at: data.checked_at,
        })
    }
}

/// Body text to report for a non-2xx response.
pub(crate) fn error_body_or_unknown(body: Option<String>) -> String {
    match body {
        Some(text) if !text.trim().is_empty() => text,
        _ => UNKNOWN_ERROR.to_string(),
    }
}
