use crate::domain::model::{RequestBody, RequestOptions};
use crate::domain::ports::ServiceClient;
use crate::utils::error::{Result, RouterError};
use crate::utils::validation::build_header_map;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

/// Request function bound to one service's base URL.
///
/// Handles are cheap to clone and share the router's connection pool.
#[derive(Debug, Clone)]
pub struct ServiceHandle {
    name: Arc<str>,
    base_url: Arc<str>,
    client: Client,
}

impl ServiceHandle {
    pub(crate) fn new(name: &str, base_url: &str, client: Client) -> Self {
        Self {
            name: Arc::from(name),
            base_url: Arc::from(base_url),
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request target for `path`. The path is appended verbatim.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issues one request and decodes the JSON response body.
    ///
    /// Non-2xx answers fail with [`RouterError::HttpStatus`], network failures
    /// with [`RouterError::Transport`]. An empty success body yields `Null`.
    pub async fn invoke(&self, path: &str, options: RequestOptions) -> Result<serde_json::Value> {
        let url = self.url_for(path);
        let target = Url::parse(&url).map_err(|e| RouterError::InvalidConfigValueError {
            field: "path".to_string(),
            value: url.clone(),
            reason: format!("Invalid request URL: {}", e),
        })?;
        let headers = build_header_map("headers", &options.headers)?;

        let mut request = self
            .client
            .request(options.method.clone(), target)
            .headers(headers);

        if !options.query.is_empty() {
            request = request.query(&options.query);
        }

        request = match options.body {
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Text(text)) => request.body(text),
            None => request,
        };

        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("{}: {} {}", self.name, options.method, url);

        let response = request
            .send()
            .await
            .map_err(|source| self.transport_error(&url, source))?;
        let status = response.status();

        tracing::debug!("{}: response status {}", self.name, status);

        if !status.is_success() {
            return Err(RouterError::HttpStatus {
                service: self.name.to_string(),
                url,
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| self.transport_error(&url, source))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_slice(&body).map_err(|source| self.decode_error(&url, source))
    }

    /// Like [`invoke`](Self::invoke), then deserializes the body into `T`.
    pub async fn invoke_as<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let value = self.invoke(path, options).await?;
        serde_json::from_value(value).map_err(|source| self.decode_error(&self.url_for(path), source))
    }

    fn transport_error(&self, url: &str, source: reqwest::Error) -> RouterError {
        RouterError::Transport {
            service: self.name.to_string(),
            url: url.to_string(),
            source,
        }
    }

    fn decode_error(&self, url: &str, source: serde_json::Error) -> RouterError {
        RouterError::Decode {
            service: self.name.to_string(),
            url: url.to_string(),
            source,
        }
    }
}

#[async_trait]
impl ServiceClient for ServiceHandle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, path: &str, options: RequestOptions) -> Result<serde_json::Value> {
        ServiceHandle::invoke(self, path, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::Method;
    use serde::Deserialize;

    fn handle_for(server: &MockServer) -> ServiceHandle {
        ServiceHandle::new("users", &server.base_url(), Client::new())
    }

    #[test]
    fn test_url_for_appends_path_verbatim() {
        let handle = ServiceHandle::new("service1", "http://localhost:5001", Client::new());
        assert_eq!(handle.url_for("/users"), "http://localhost:5001/users");
        assert_eq!(handle.url_for("users"), "http://localhost:5001users");
        assert_eq!(handle.url_for(""), "http://localhost:5001");
    }

    #[tokio::test]
    async fn test_invoke_forwards_method_headers_query_and_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/users")
                .query_param("notify", "true")
                .header("x-request-id", "req-42")
                .json_body(serde_json::json!({"name": "Ada"}));
            then.status(201)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"id": 7, "name": "Ada"}));
        });

        let options = RequestOptions::new()
            .method(Method::POST)
            .header("x-request-id", "req-42")
            .query("notify", "true")
            .json(serde_json::json!({"name": "Ada"}));

        let result = handle_for(&server).invoke("/users", options).await.unwrap();

        api_mock.assert();
        assert_eq!(result["id"], 7);
    }

    #[tokio::test]
    async fn test_invoke_sends_text_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(PUT).path("/notes/1").body("plain text");
            then.status(200).json_body(serde_json::json!({"ok": true}));
        });

        let options = RequestOptions::new().method(Method::PUT).text("plain text");
        let result = handle_for(&server).invoke("/notes/1", options).await.unwrap();

        api_mock.assert();
        assert_eq!(result, serde_json::json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_empty_success_body_is_null() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/users/7");
            then.status(204);
        });

        let options = RequestOptions::new().method(Method::DELETE);
        let result = handle_for(&server).invoke("/users/7", options).await.unwrap();

        assert_eq!(result, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200).body("<html>hello</html>");
        });

        let err = handle_for(&server)
            .invoke("/page", RequestOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RouterError::Decode { ref service, .. } if service == "users"));
    }

    #[tokio::test]
    async fn test_invoke_as_deserializes_typed_body() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct User {
            id: u32,
            name: String,
        }

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users/1");
            then.status(200).json_body(serde_json::json!({"id": 1, "name": "Ada"}));
        });

        let handle = handle_for(&server);
        let user: User = handle
            .invoke_as("/users/1", RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(
            user,
            User {
                id: 1,
                name: "Ada".to_string()
            }
        );

        let mismatch = handle
            .invoke_as::<Vec<User>>("/users/1", RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(mismatch, RouterError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_invalid_header_is_rejected_before_sending() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.any_request();
            then.status(200);
        });

        let options = RequestOptions::new().header("Bad Header", "x");
        let err = handle_for(&server).invoke("/", options).await.unwrap_err();

        assert!(err.is_configuration());
        api_mock.assert_hits(0);
    }
}
