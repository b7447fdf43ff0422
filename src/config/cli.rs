use crate::config::toml_config::TomlConfig;
use crate::domain::model::{ClientSettings, RequestOptions, ServiceConfiguration};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, RouterError};
use crate::utils::validation::{validate_range, validate_required_field, Validate};
use clap::Parser;
use reqwest::Method;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "svc-router")]
#[command(about = "Call a named HTTP service through its configured base URL")]
pub struct CliConfig {
    #[arg(long, help = "TOML file with [services] and optional [client] tables")]
    pub config: Option<PathBuf>,

    #[arg(long = "service", value_name = "NAME=URL", help = "Add or override a service")]
    pub services: Vec<String>,

    #[arg(long, default_value = "GET")]
    pub method: String,

    #[arg(long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    #[arg(long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    #[arg(long, help = "Request body; sent as JSON when it parses as JSON")]
    pub data: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Request timeout")]
    pub timeout: Option<u64>,

    #[arg(long, help = "List configured services and exit")]
    pub list: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    pub service: Option<String>,

    #[arg(default_value = "/")]
    pub path: String,
}

impl CliConfig {
    fn file_config(&self) -> Result<Option<TomlConfig>> {
        self.config.as_ref().map(TomlConfig::from_file).transpose()
    }

    /// Services given with `--service NAME=URL`.
    pub fn inline_services(&self) -> Result<ServiceConfiguration> {
        let entries = self
            .services
            .iter()
            .map(|entry| split_pair("service", entry, '='))
            .collect::<Result<Vec<_>>>()?;
        ServiceConfiguration::new(entries)
    }

    pub fn http_method(&self) -> Result<Method> {
        Method::from_bytes(self.method.to_uppercase().as_bytes()).map_err(|_| {
            RouterError::InvalidConfigValueError {
                field: "method".to_string(),
                value: self.method.clone(),
                reason: "Not a valid HTTP method".to_string(),
            }
        })
    }

    pub fn request_options(&self) -> Result<RequestOptions> {
        let mut options = RequestOptions::new().method(self.http_method()?);

        for header in &self.headers {
            let (name, value) = split_pair("header", header, ':')?;
            options = options.header(name, value);
        }
        for pair in &self.query {
            let (key, value) = split_pair("query", pair, '=')?;
            options = options.query(key, value);
        }
        if let Some(data) = &self.data {
            options = match serde_json::from_str(data) {
                Ok(json) => options.json(json),
                Err(_) => options.text(data.clone()),
            };
        }

        Ok(options)
    }
}

fn split_pair(field: &str, raw: &str, separator: char) -> Result<(String, String)> {
    match raw.split_once(separator) {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(RouterError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: format!("Expected KEY{}VALUE", separator),
        }),
    }
}

impl ConfigProvider for CliConfig {
    fn service_configuration(&self) -> Result<ServiceConfiguration> {
        let base = match self.file_config()? {
            Some(file) => file.service_configuration()?,
            None => ServiceConfiguration::default(),
        };
        Ok(base.with_overrides(self.inline_services()?))
    }

    fn client_settings(&self) -> Result<ClientSettings> {
        let mut settings = match self.file_config()? {
            Some(file) => file.client_settings()?,
            None => ClientSettings::default(),
        };
        if let Some(timeout) = self.timeout {
            settings.timeout = Some(Duration::from_secs(timeout));
        }
        Ok(settings)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(file) = self.file_config()? {
            file.validate()?;
        }
        self.inline_services()?;
        self.request_options()?;

        if let Some(timeout) = self.timeout {
            validate_range("timeout", timeout, 1, 3600)?;
        }
        if !self.list {
            validate_required_field("service", &self.service)?;
        }

        Ok(())
    }
}
