use crate::core::handle::ServiceHandle;
use crate::domain::model::{ClientSettings, RequestOptions, ServiceConfiguration};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, RouterError};
use crate::utils::validation::build_header_map;
use reqwest::Client;
use std::sync::Arc;

/// Resolves service names to bound [`ServiceHandle`]s.
///
/// Build one at startup and pass clones to whatever needs to talk to the
/// configured services. Clones share the configuration and connection pool.
#[derive(Debug, Clone)]
pub struct ServiceRouter {
    config: Arc<ServiceConfiguration>,
    client: Client,
}

impl ServiceRouter {
    pub fn new(config: ServiceConfiguration) -> Result<Self> {
        Self::with_settings(config, &ClientSettings::default())
    }

    pub fn with_settings(config: ServiceConfiguration, settings: &ClientSettings) -> Result<Self> {
        let client = build_client(settings)?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: ServiceConfiguration, client: Client) -> Self {
        tracing::debug!("Service router configured with {} service(s)", config.len());
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let config = provider.service_configuration()?;
        let settings = provider.client_settings()?;
        Self::with_settings(config, &settings)
    }

    /// Returns the handle for `name`, or [`RouterError::UnknownService`] when
    /// the name is not configured.
    pub fn resolve(&self, name: &str) -> Result<ServiceHandle> {
        let base_url = self
            .config
            .base_url(name)
            .ok_or_else(|| RouterError::UnknownService {
                service: name.to_string(),
            })?;
        Ok(ServiceHandle::new(name, base_url, self.client.clone()))
    }

    /// Resolves `name` and invokes `path` on it.
    pub async fn call(
        &self,
        name: &str,
        path: &str,
        options: RequestOptions,
    ) -> Result<serde_json::Value> {
        self.resolve(name)?.invoke(path, options).await
    }

    pub fn contains(&self, name: &str) -> bool {
        self.config.contains(name)
    }

    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.config.names()
    }

    pub fn configuration(&self) -> &ServiceConfiguration {
        &self.config
    }
}

fn build_client(settings: &ClientSettings) -> Result<Client> {
    let mut builder = Client::builder();

    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(user_agent) = &settings.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    if !settings.default_headers.is_empty() {
        builder = builder.default_headers(build_header_map(
            "client.default_headers",
            &settings.default_headers,
        )?);
    }

    builder.build().map_err(|e| RouterError::ConfigError {
        message: format!("Failed to build HTTP client: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ServiceClient;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn sample_router() -> ServiceRouter {
        let config = ServiceConfiguration::new([
            ("service1", "http://localhost:5001"),
            ("service2", "http://localhost:5002"),
        ])
        .unwrap();
        ServiceRouter::new(config).unwrap()
    }

    #[test]
    fn test_every_configured_service_resolves() {
        let router = sample_router();
        let names: Vec<String> = router.service_names().map(str::to_string).collect();

        for name in &names {
            let handle = router.resolve(name).unwrap();
            assert_eq!(handle.name(), name);
            assert_eq!(Some(handle.base_url()), router.configuration().base_url(name));
        }
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_unknown_service_fails_with_its_name() {
        let router = sample_router();

        for name in ["service3", "", "Service1", "service1 "] {
            let err = router.resolve(name).unwrap_err();
            assert!(
                matches!(err, RouterError::UnknownService { ref service } if service == name),
                "unexpected error for {:?}: {}",
                name,
                err
            );
        }
    }

    #[test]
    fn test_resolved_handle_targets_base_url() {
        let router = sample_router();
        let handle = router.resolve("service1").unwrap();
        assert_eq!(handle.url_for("/users"), "http://localhost:5001/users");
    }

    #[test]
    fn test_call_on_unknown_service_never_sends() {
        let router = sample_router();
        let err = tokio_test::block_on(router.call("missing", "/users", RequestOptions::default()))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_default_header_is_config_error() {
        let mut default_headers = HashMap::new();
        default_headers.insert("Accept".to_string(), "bad\nvalue".to_string());
        let settings = ClientSettings {
            default_headers,
            ..ClientSettings::default()
        };

        let err =
            ServiceRouter::with_settings(ServiceConfiguration::default(), &settings).unwrap_err();
        assert!(matches!(err, RouterError::InvalidConfigValueError { .. }));
    }

    struct StaticProvider;

    impl ConfigProvider for StaticProvider {
        fn service_configuration(&self) -> Result<ServiceConfiguration> {
            ServiceConfiguration::new([("inventory", "https://inventory.internal")])
        }

        fn client_settings(&self) -> Result<ClientSettings> {
            Ok(ClientSettings {
                user_agent: Some("svc-router-test".to_string()),
                ..ClientSettings::default()
            })
        }
    }

    #[test]
    fn test_from_provider() {
        let router = ServiceRouter::from_provider(&StaticProvider).unwrap();
        assert!(router.contains("inventory"));
        assert!(!router.contains("service1"));
    }

    // A consumer written against the injected trait object.
    struct Dashboard {
        users: Arc<dyn ServiceClient>,
    }

    impl Dashboard {
        async fn user_count(&self) -> Result<usize> {
            let users = self.users.invoke("/users", RequestOptions::default()).await?;
            Ok(users.as_array().map(Vec::len).unwrap_or(0))
        }
    }

    struct StubClient;

    #[async_trait]
    impl ServiceClient for StubClient {
        fn name(&self) -> &str {
            "stub"
        }

        async fn invoke(&self, path: &str, _options: RequestOptions) -> Result<serde_json::Value> {
            assert_eq!(path, "/users");
            Ok(serde_json::json!([{"id": 1}, {"id": 2}]))
        }
    }

    #[test]
    fn test_consumer_accepts_injected_client() {
        let dashboard = Dashboard {
            users: Arc::new(StubClient),
        };
        assert_eq!(tokio_test::block_on(dashboard.user_count()).unwrap(), 2);

        let handle = sample_router().resolve("service1").unwrap();
        let injected: Arc<dyn ServiceClient> = Arc::new(handle);
        assert_eq!(injected.name(), "service1");
    }
}
