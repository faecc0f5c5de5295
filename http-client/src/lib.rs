//! Asynchronous JSON HTTP client with string-keyed verb dispatch.
//!
//! [`HttpClient`] owns a single pooled connection session shared across calls
//! and clones, attaches default headers (always `Connection: keep-alive`,
//! plus a bearer token when one is configured) and a total timeout, and
//! dispatches exactly one of GET/POST/PUT/PATCH/DELETE per
//! [`HttpClient::request`] call. GET/POST/PUT/PATCH decode the response body
//! as JSON; DELETE returns the raw status code.

mod client;
mod error;
mod method;
mod request;
mod response;
mod settings;

pub use reqwest::{
    Proxy, StatusCode, Url,
    header::{HeaderMap, HeaderName, HeaderValue},
};

pub use client::{DEFAULT_MAX_CONNECTIONS, DEFAULT_TIMEOUT, HttpClient, HttpClientBuilder};
pub use error::{Error, Result};
pub use method::Method;
pub use request::{RequestBuilder, RequestOptions};
pub use response::{Reply, Response};
pub use settings::ClientSettings;
