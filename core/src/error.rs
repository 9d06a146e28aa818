//! Error types for the simple HTTP client.
//!
//! # Design
//! Problems found while configuring a builder (empty URL, invalid method,
//! a payload that cannot be serialized) are collected as `ConfigError`
//! values and only reported when the request is executed, joined into one
//! `ClientError::Configuration`. Transport, decode and print failures happen
//! during execution and are returned one at a time.

use std::fmt;
use std::io;
use std::sync::Arc;

use thiserror::Error;

/// A problem recorded while configuring a builder.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("url must not empty")]
    EmptyUrl,

    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    /// The request payload could not be serialized to JSON.
    #[error("{0}")]
    Serialize(Arc<serde_json::Error>),
}

/// Every configuration error recorded by a builder, in the order recorded.
#[derive(Debug, Clone, Default)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl ConfigErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigError> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, err: ConfigError) {
        self.0.push(err);
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

/// The round trip itself failed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS, timeout or request-construction failure from ureq.
    #[error(transparent)]
    Http(#[from] ureq::Error),

    /// Reading the response body failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors returned by `SimpleHttpClient` terminal calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// One or more configuration errors were recorded; no request was sent.
    #[error("{0}")]
    Configuration(ConfigErrors),

    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    /// The response body is not JSON of the destination's shape.
    #[error("decoding response failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The decoded destination could not be printed.
    #[error("printing response failed: {0}")]
    Print(#[source] serde_json::Error),
}
