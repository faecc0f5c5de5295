use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::error::DecodeSnafu;
use crate::request::classify_transport;
use crate::{Method, Result};

/// The verb-dependent result of [`HttpClient::request`](crate::HttpClient::request):
/// a decoded JSON body for GET/POST/PUT/PATCH, the raw status code for DELETE.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Json(serde_json::Value),
    Status(StatusCode),
}

impl Reply {
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Reply::Json(value) => Some(value),
            Reply::Status(_) => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Reply::Json(_) => None,
            Reply::Status(status) => Some(*status),
        }
    }
}

#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
    method: Method,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response, method: Method) -> Self {
        Self { inner, method }
    }

    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub fn url(&self) -> &Url {
        self.inner.url()
    }

    pub async fn text(self) -> Result<String> {
        let method = self.method;
        let url = self.inner.url().clone();
        self.inner
            .text()
            .await
            .map_err(|error| classify_transport(method, &url, error.into()))
    }

    pub async fn bytes(self) -> Result<Bytes> {
        let method = self.method;
        let url = self.inner.url().clone();
        self.inner
            .bytes()
            .await
            .map_err(|error| classify_transport(method, &url, error.into()))
    }

    pub fn bytes_stream(self) -> impl Stream<Item = Result<Bytes>> {
        let method = self.method;
        let url = self.inner.url().clone();
        self.inner
            .bytes_stream()
            .map_err(move |error| classify_transport(method, &url, error.into()))
    }

    /// Reads the full body and decodes it as JSON. Decode failures (non-JSON
    /// or empty body) carry the raw status and body for diagnostics.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let status = self.inner.status();
        let url = self.inner.url().clone();
        let body = self.text().await?;
        serde_json::from_str(&body).with_context(|_| DecodeSnafu {
            url: url.as_str(),
            status,
            body: body.clone(),
        })
    }
}
