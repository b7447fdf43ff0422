use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_url};
use reqwest::Method;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Validated mapping of service name to base URL.
///
/// Built once at startup and never mutated afterwards; the router shares it
/// read-only with every handle it hands out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceConfiguration {
    services: BTreeMap<String, String>,
}

impl ServiceConfiguration {
    pub fn new<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut services = BTreeMap::new();
        for (name, base_url) in entries {
            let (name, base_url) = (name.into(), base_url.into());
            validate_entry(&name, &base_url)?;
            services.insert(name, base_url);
        }
        Ok(Self { services })
    }

    /// Layers `overrides` on top of this configuration; entries with the same
    /// name are replaced.
    pub fn with_overrides(mut self, overrides: ServiceConfiguration) -> Self {
        self.services.extend(overrides.services);
        self
    }

    pub fn base_url(&self, name: &str) -> Option<&str> {
        self.services.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.services
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

fn validate_entry(name: &str, base_url: &str) -> Result<()> {
    validate_non_empty_string("services", name)?;
    validate_url(&format!("services.{}", name), base_url)
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Text(String),
}

/// Per-call options for [`ServiceHandle::invoke`](crate::ServiceHandle::invoke).
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HashMap::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Settings applied to the HTTP client shared by all handles of a router.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub default_headers: HashMap<String, String>,
}
