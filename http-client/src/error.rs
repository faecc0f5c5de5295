use reqwest::StatusCode;
use snafu::{Location, Snafu};

use crate::Method;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by [`HttpClient`](crate::HttpClient).
///
/// None of these are retried internally. Every variant carries the verb, URL
/// and underlying cause needed to log or retry externally.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Unsupported HTTP method '{method}'"))]
    UnsupportedMethod {
        #[snafu(implicit)]
        location: Location,
        method: String,
    },
    #[snafu(display("Failed to construct request for '{url}'"))]
    Request {
        #[snafu(implicit)]
        location: Location,
        url: String,
        source: url::ParseError,
    },
    #[snafu(display("Transport failure for {method} '{url}'"))]
    Transport {
        #[snafu(implicit)]
        location: Location,
        method: Method,
        url: String,
        source: reqwest_middleware::Error,
    },
    #[snafu(display("{method} '{url}' exceeded the configured timeout"))]
    Timeout {
        #[snafu(implicit)]
        location: Location,
        method: Method,
        url: String,
        source: reqwest::Error,
    },
    #[snafu(display("Invalid JSON from '{url}', status: '{status}', body: '{body}'"))]
    Decode {
        #[snafu(implicit)]
        location: Location,
        url: String,
        status: StatusCode,
        body: String,
        source: serde_json::Error,
    },
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
