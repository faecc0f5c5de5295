use std::str::FromStr;

use snafu::OptionExt;
use strum::{AsRefStr, Display, EnumString};

use crate::Result;
use crate::error::UnsupportedMethodSnafu;

/// The five HTTP verbs the client dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Parses a verb string case-insensitively. Anything outside the five
    /// supported verbs fails without any request being constructed.
    pub fn parse(method: &str) -> Result<Self> {
        Self::from_str(method)
            .ok()
            .context(UnsupportedMethodSnafu { method })
    }
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}
