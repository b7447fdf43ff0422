use crate::domain::model::{ClientSettings, ServiceConfiguration};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, RouterError};
use crate::utils::validation::{build_header_map, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

const MAX_TIMEOUT_SECONDS: u64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub client: Option<ClientConfig>,
    pub services: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    pub default_headers: Option<HashMap<String, String>>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RouterError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SERVICE_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RouterError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        ServiceConfiguration::new(self.services.clone())?;

        if let Some(client) = &self.client {
            if let Some(timeout) = client.timeout_seconds {
                validate_range("client.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
            }
            if let Some(headers) = &client.default_headers {
                build_header_map("client.default_headers", headers)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn service_configuration(&self) -> Result<ServiceConfiguration> {
        ServiceConfiguration::new(self.services.clone())
    }

    fn client_settings(&self) -> Result<ClientSettings> {
        let client = self.client.clone().unwrap_or_default();
        if let Some(timeout) = client.timeout_seconds {
            validate_range("client.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        Ok(ClientSettings {
            timeout: client.timeout_seconds.map(Duration::from_secs),
            user_agent: client.user_agent,
            default_headers: client.default_headers.unwrap_or_default(),
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
