use crate::utils::error::{Error, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Stand-ins for the platform services a phone would provide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub sim_country: Option<String>,
    pub network_country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(Error::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| Error::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ISINCOUNTRY_SERVER_URL})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| Error::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(url) = &self.server.url {
            validation::validate_url("server.url", url)?;
        }

        if let Some(timeout) = self.server.timeout_seconds {
            validation::validate_range("server.timeout_seconds", timeout, 1, 600)?;
        }

        match (self.device.latitude, self.device.longitude) {
            (Some(lat), Some(lon)) => {
                validation::validate_range("device.latitude", lat, -90.0, 90.0)?;
                validation::validate_range("device.longitude", lon, -180.0, 180.0)?;
            }
            (None, None) => {}
            (Some(_), None) => {
                validation::validate_required_field("device.longitude", &self.device.longitude)?;
            }
            (None, Some(_)) => {
                validation::validate_required_field("device.latitude", &self.device.latitude)?;
            }
        }

        if let Some(code) = &self.device.sim_country {
            validation::validate_country_code("device.sim_country", code)?;
        }
        if let Some(code) = &self.device.network_country {
            validation::validate_country_code("device.network_country", code)?;
        }

        Ok(())
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
