//! 客户端配置：基础地址、超时、重试、请求头与拦截器。
//!
//! Client configuration.
//!
//! A [`ClientConfig`] is plain data plus an ordered list of extra
//! interceptors. It is built once (fluent builder, YAML file, environment
//! overrides) and handed to [`Dispatcher::configure`](crate::Dispatcher::configure),
//! which owns it read-only from then on.

use crate::error_code::DEFAULT_SESSION_EXPIRED_CODE;
use crate::interceptors::Interceptor;
use crate::transport::request::parse_header;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Prefix for environment overrides (`ENVELOPE_HTTP_RETRY=3`, ...).
pub const ENV_PREFIX: &str = "ENVELOPE_HTTP_";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Seconds; `0` keeps the transport default.
    #[serde(alias = "connectTimeout", alias = "connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Whole-request deadline in seconds; `0` keeps the transport default.
    #[serde(alias = "responseTimeout", alias = "response_timeout")]
    pub response_timeout_secs: u64,
    /// Re-issues after a network-level failure.
    pub retry: u32,
    /// First retry backoff in milliseconds; doubles per attempt.
    pub retry_delay_ms: u64,
    /// Injected on every request.
    pub headers: BTreeMap<String, String>,
    /// Added to every request's query, form or JSON body.
    #[serde(alias = "commonParams")]
    pub common_params: BTreeMap<String, String>,
    /// Run before the built-in interceptors, in list order.
    #[serde(skip)]
    pub extra_interceptors: Vec<Arc<dyn Interceptor>>,
    /// `0` means unlimited.
    #[serde(alias = "maxConnections", alias = "max_connections")]
    pub max_connections_per_host: usize,
    #[serde(alias = "isUseLogger")]
    pub use_logger: bool,
    pub session_expired_code: String,
    /// Opaque application context handed to the session notifier.
    pub context: Option<serde_json::Value>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            connect_timeout_secs: 0,
            response_timeout_secs: 0,
            retry: 0,
            retry_delay_ms: 0,
            headers: BTreeMap::new(),
            common_params: BTreeMap::new(),
            extra_interceptors: Vec::new(),
            max_connections_per_host: 0,
            use_logger: false,
            session_expired_code: DEFAULT_SESSION_EXPIRED_CODE.to_string(),
            context: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interceptors: Vec<&str> = self.extra_interceptors.iter().map(|i| i.name()).collect();
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("response_timeout_secs", &self.response_timeout_secs)
            .field("retry", &self.retry)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("common_params", &self.common_params)
            .field("extra_interceptors", &interceptors)
            .field("max_connections_per_host", &self.max_connections_per_host)
            .field("use_logger", &self.use_logger)
            .field("session_expired_code", &self.session_expired_code)
            .field("context", &self.context)
            .finish()
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ClientConfig = serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                "failed to parse client configuration",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config_yaml"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    /// Overlay `ENVELOPE_HTTP_*` environment variables.
    ///
    /// Unparseable values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    pub(crate) fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BASE_URL").filter(|s| !s.trim().is_empty()) {
            self.base_url = v;
        }
        if let Some(v) = lookup("CONNECT_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.connect_timeout_secs = v;
        }
        if let Some(v) = lookup("RESPONSE_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            self.response_timeout_secs = v;
        }
        if let Some(v) = lookup("RETRY").and_then(|s| s.parse::<u32>().ok()) {
            self.retry = v;
        }
        if let Some(v) = lookup("MAX_CONNECTIONS").and_then(|s| s.parse::<usize>().ok()) {
            self.max_connections_per_host = v;
        }
        if let Some(v) = lookup("USE_LOGGER") {
            self.use_logger = matches!(v.trim(), "1" | "true" | "TRUE" | "yes");
        }
        self
    }

    /// Check the configuration and return the normalized base URL.
    pub fn validate(&self) -> Result<Url> {
        for (k, v) in &self.headers {
            parse_header(k, v)?;
        }
        if self.session_expired_code.is_empty() {
            return Err(Error::configuration_with_context(
                "session expired code must not be empty",
                ErrorContext::new()
                    .with_field_path("config.session_expired_code")
                    .with_source("config_validator"),
            ));
        }
        parse_base_url(&self.base_url)
    }
}

/// Parse a base URL, requiring http(s) and a host, and force a trailing `/`
/// so relative request paths join under it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let ctx = || {
        ErrorContext::new()
            .with_field_path("config.base_url")
            .with_source("config_validator")
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::configuration_with_context("base URL is required", ctx()));
    }

    let mut url = Url::parse(raw).map_err(|e| {
        Error::configuration_with_context(
            format!("base URL '{}' is malformed", raw),
            ctx().with_details(e.to_string()),
        )
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::configuration_with_context(
            format!("base URL '{}' must be an http(s) URL with a host", raw),
            ctx(),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Fluent builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn connect_timeout(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    pub fn response_timeout(mut self, secs: u64) -> Self {
        self.config.response_timeout_secs = secs;
        self
    }

    pub fn retry(mut self, count: u32) -> Self {
        self.config.retry = count;
        self
    }

    pub fn retry_delay_ms(mut self, ms: u64) -> Self {
        self.config.retry_delay_ms = ms;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.config
            .headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn common_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.common_params.insert(name.into(), value.into());
        self
    }

    pub fn interceptor<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.config.extra_interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn interceptor_arc(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.config.extra_interceptors.push(interceptor);
        self
    }

    pub fn max_connections(mut self, n: usize) -> Self {
        self.config.max_connections_per_host = n;
        self
    }

    pub fn use_logger(mut self, enable: bool) -> Self {
        self.config.use_logger = enable;
        self
    }

    pub fn session_expired_code(mut self, code: impl Into<String>) -> Self {
        self.config.session_expired_code = code.into();
        self
    }

    pub fn context(mut self, context: serde_json::Value) -> Self {
        self.config.context = Some(context);
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
