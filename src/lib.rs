pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use crate::core::{handle::ServiceHandle, router::ServiceRouter};
pub use domain::model::{ClientSettings, RequestBody, RequestOptions, ServiceConfiguration};
pub use domain::ports::{ConfigProvider, ServiceClient};
pub use utils::error::{Result, RouterError};
