use std::time::Duration;

use config::ConfigError;
use http::header::{AUTHORIZATION, CONNECTION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Proxy, Url, redirect};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use snafu::ResultExt;
use tracing::{Level, event, instrument};

use crate::error::RequestSnafu;
use crate::{ClientSettings, Method, Reply, RequestBuilder, RequestOptions, Result};

/// Default total timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Default cap on idle pooled connections per host.
pub const DEFAULT_MAX_CONNECTIONS: usize = 30;

/// Asynchronous JSON HTTP client over a shared connection pool.
///
/// The pool is created once at build time and shared across calls and
/// clones; it is released when the last clone is dropped. Each call snapshots
/// the configured timeout and default headers at call start, so
/// [`HttpClient::set_timeout`] never affects requests already in flight.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: ClientWithMiddleware,
    default_headers: HeaderMap,
    timeout: Duration,
}

#[derive(Debug)]
pub struct HttpClientBuilder {
    client: reqwest::ClientBuilder,
    headers: HeaderMap,
    timeout: Duration,
    max_connections: usize,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Replaces the stored timeout for all subsequent requests on this
    /// handle. In-flight requests keep the value captured at dispatch, and
    /// clones keep their own copy.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get(&self, url: Url) -> RequestBuilder {
        self.sender(Method::Get, url)
    }

    pub fn post(&self, url: Url) -> RequestBuilder {
        self.sender(Method::Post, url)
    }

    pub fn put(&self, url: Url) -> RequestBuilder {
        self.sender(Method::Put, url)
    }

    pub fn patch(&self, url: Url) -> RequestBuilder {
        self.sender(Method::Patch, url)
    }

    pub fn delete(&self, url: Url) -> RequestBuilder {
        self.sender(Method::Delete, url)
    }

    fn sender(&self, method: Method, url: Url) -> RequestBuilder {
        let inner = self.inner.request(method.into(), url.clone());
        RequestBuilder::new(inner, method, url)
            .headers(self.default_headers.clone())
            .timeout(self.timeout)
    }

    /// Dispatches exactly one request for the given verb string.
    ///
    /// `method` must be one of GET/POST/PUT/PATCH/DELETE in any casing; other
    /// values fail with [`Error::UnsupportedMethod`](crate::Error) before any
    /// network I/O. The URL is validated up front. GET/POST/PUT/PATCH decode
    /// the body as JSON; DELETE returns the raw status code without touching
    /// the body.
    #[instrument(skip(self, options))]
    pub async fn request(&self, method: &str, url: &str, options: RequestOptions) -> Result<Reply> {
        let method = Method::parse(method)?;
        let url = Url::parse(url).context(RequestSnafu { url })?;

        event!(Level::DEBUG, %method, %url, "dispatching request");

        let RequestOptions {
            query,
            form,
            json,
            headers,
        } = options;

        let mut request = self.sender(method, url).headers(headers);
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(form) = &form {
            request = request.form(form);
        }
        if let Some(json) = &json {
            request = request.json(json);
        }

        let response = request.send().await?;

        match method {
            Method::Delete => Ok(Reply::Status(response.status())),
            _ => Ok(Reply::Json(response.json().await?)),
        }
    }
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config-supplied strings are validated here so a malformed header or
    /// token fails like any other configuration error instead of panicking.
    pub fn from_settings(settings: ClientSettings) -> std::result::Result<Self, ConfigError> {
        let mut builder = Self::new()
            .timeout(settings.timeout)
            .max_connections(settings.max_connections);

        if let Some(token) = &settings.bearer_token {
            HeaderValue::try_from(format!("Bearer {token}"))
                .map_err(|e| ConfigError::Message(format!("invalid bearer token: {e}")))?;
            builder = builder.bearer_token(token);
        }
        for (key, value) in &settings.headers {
            let key = HeaderName::try_from(key.as_str())
                .map_err(|e| ConfigError::Message(format!("invalid header name '{key}': {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| ConfigError::Message(format!("invalid header value for '{key}': {e}")))?;
            builder = builder.default_header(key, value);
        }

        Ok(builder)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn gzip(mut self, enable: bool) -> Self {
        self.client = self.client.gzip(enable);
        self
    }

    pub fn bearer_token(mut self, token: impl AsRef<str>) -> Self {
        let mut value = HeaderValue::try_from(format!("Bearer {}", token.as_ref())).unwrap();
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        self
    }

    pub fn default_header(mut self, key: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn redirects(mut self, enable: bool) -> Self {
        let policy = if enable {
            redirect::Policy::default()
        } else {
            redirect::Policy::none()
        };
        self.client = self.client.redirect(policy);
        self
    }

    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.client = self.client.proxy(proxy);
        self
    }

    #[cfg(feature = "rustls-tls")]
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.client = self.client.danger_accept_invalid_certs(accept);
        self
    }

    #[cfg(feature = "rustls-tls")]
    pub fn identity(mut self, identity: reqwest::Identity) -> Self {
        self.client = self.client.identity(identity);
        self
    }

    pub fn build(self) -> HttpClient {
        let inner = self
            .client
            .pool_max_idle_per_host(self.max_connections)
            .build()
            .unwrap();

        HttpClient {
            inner: ClientBuilder::new(inner)
                .with(TracingMiddleware::default())
                .build(),
            default_headers: self.headers,
            timeout: self.timeout,
        }
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        Self {
            client: reqwest::ClientBuilder::new(),
            headers,
            timeout: DEFAULT_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
