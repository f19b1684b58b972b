use crate::domain::model::ErrorCategory;
use std::error::Error as StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Server URL not set")]
    ServerUrlNotSet,

    #[error("Invalid server URL {url}: {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("Invalid query: {field} = {value} ({reason})")]
    InvalidQuery {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to get location: {0}")]
    LocationUnavailable(#[from] crate::domain::ports::LocationError),

    #[error("Unable to determine device country")]
    CountryUnavailable,

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Server error ({status}): {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Server error: {message}")]
    Rejected { message: String },

    #[error("Response parsing error: {message}")]
    Parse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl Error {
    /// Builds a network error from a transport failure, keeping the whole source chain.
    pub fn network(err: &reqwest::Error) -> Self {
        Self::Network {
            message: describe_chain(err),
        }
    }

    /// Builds a parse error for a response whose body could not be read in full.
    pub fn unreadable_body(err: &reqwest::Error) -> Self {
        Self::Parse {
            message: describe_chain(err),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network { .. } => ErrorCategory::NetworkError,
            Self::HttpStatus { .. } | Self::Rejected { .. } => ErrorCategory::ServerError,
            Self::Parse { .. } => ErrorCategory::ParseError,
            Self::ServerUrlNotSet
            | Self::InvalidServerUrl { .. }
            | Self::InvalidQuery { .. }
            | Self::LocationUnavailable(_)
            | Self::CountryUnavailable
            | Self::IoError(_)
            | Self::CsvError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::ConfigurationError,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ServerUrlNotSet => "Pass --server or set server.url in the config file",
            Self::InvalidServerUrl { .. } => "Use an absolute http:// or https:// server URL",
            Self::InvalidQuery { .. } => {
                "Latitude must be in [-90, 90], longitude in [-180, 180], country a two-letter code"
            }
            Self::LocationUnavailable(_) => "Provide --lat/--lon or a [device] location in the config file",
            Self::CountryUnavailable => "Provide --country or set device.sim_country in the config file",
            Self::Network { .. } => "Check connectivity to the verification server and retry",
            Self::HttpStatus { .. } | Self::Rejected { .. } => {
                "The server rejected the request; inspect the message before retrying"
            }
            Self::Parse { .. } => "Client and server disagree on the response format; check server version",
            Self::IoError(_) | Self::CsvError(_) => "Check the input and output file paths",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file and try again"
            }
        }
    }
}

fn describe_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

pub type Result<T> = std::result::Result<T, Error>;
