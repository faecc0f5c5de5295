use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Url};
use serde::Serialize;
use snafu::IntoError;

use crate::error::{Error, TimeoutSnafu, TransportSnafu};
use crate::{Method, Response, Result};

/// One prepared request against one URL.
#[derive(Debug)]
pub struct RequestBuilder {
    inner: reqwest_middleware::RequestBuilder,
    method: Method,
    url: Url,
}

impl RequestBuilder {
    pub(crate) fn new(inner: reqwest_middleware::RequestBuilder, method: Method, url: Url) -> Self {
        Self { inner, method, url }
    }

    pub fn body(self, body: impl Into<Body>) -> Self {
        self.map(|b| b.body(body))
    }

    pub fn json(self, json: &impl Serialize) -> Self {
        self.map(|b| b.json(json))
    }

    pub fn form(self, form: &impl Serialize) -> Self {
        self.map(|b| b.form(form))
    }

    pub fn query(self, query: &impl Serialize) -> Self {
        self.map(|b| b.query(query))
    }

    pub fn header<K, V>(self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.map(|b| b.header(key, value))
    }

    pub fn headers(self, headers: HeaderMap) -> Self {
        self.map(|b| b.headers(headers))
    }

    /// Total deadline for this request, from connect until the body is read.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.map(|b| b.timeout(timeout))
    }

    /// Sends the request, classifying transport-level failures into
    /// [`Error::Timeout`] or [`Error::Transport`]. Non-2xx statuses are not
    /// treated as errors; callers inspect the status themselves.
    pub async fn send(self) -> Result<Response> {
        let Self { inner, method, url } = self;
        match inner.send().await {
            Ok(response) => Ok(Response::new(response, method)),
            Err(error) => Err(classify_transport(method, &url, error)),
        }
    }

    fn map(
        self,
        f: impl FnOnce(reqwest_middleware::RequestBuilder) -> reqwest_middleware::RequestBuilder,
    ) -> Self {
        Self {
            inner: f(self.inner),
            method: self.method,
            url: self.url,
        }
    }
}

pub(crate) fn classify_transport(
    method: Method,
    url: &Url,
    error: reqwest_middleware::Error,
) -> Error {
    match error {
        reqwest_middleware::Error::Reqwest(error) if error.is_timeout() => TimeoutSnafu {
            method,
            url: url.as_str(),
        }
        .into_error(error),
        error => TransportSnafu {
            method,
            url: url.as_str(),
        }
        .into_error(error),
    }
}

/// Per-call options for [`HttpClient::request`](crate::HttpClient::request).
///
/// `query` appends query-string pairs, `form` sends a form-encoded body,
/// `json` a JSON-encoded one, and `headers` are merged over the client's
/// defaults (per-call values win on matching names).
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub(crate) query: Vec<(String, String)>,
    pub(crate) form: Option<Vec<(String, String)>>,
    pub(crate) json: Option<serde_json::Value>,
    pub(crate) headers: HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn header(mut self, key: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(key, value);
        self
    }
}
