use crate::domain::model::{ClientSettings, RequestOptions, ServiceConfiguration};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of the service map and client settings a router is built from.
pub trait ConfigProvider: Send + Sync {
    fn service_configuration(&self) -> Result<ServiceConfiguration>;
    fn client_settings(&self) -> Result<ClientSettings>;
}

/// A callable bound to one service.
///
/// Consumers that receive a client by injection depend on this trait rather
/// than on [`ServiceHandle`](crate::ServiceHandle), so they can be exercised
/// against a stub.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    fn name(&self) -> &str;
    async fn invoke(&self, path: &str, options: RequestOptions) -> Result<serde_json::Value>;
}
