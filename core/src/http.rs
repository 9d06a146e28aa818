//! HTTP request and response types passed across the transport seam.
//!
//! # Design
//! `HttpRequest` is plain data: the builder assembles one without touching
//! the network, and a `Transport` turns it into a single round trip. The
//! response keeps its body as a stream so the executor owns the read and the
//! release of that stream.
//!
//! All request fields use owned types (`String`, `Vec`) so a built request
//! can outlive the builder that produced it.

use std::fmt;
use std::io::{self, Cursor, Read};
use std::str::FromStr;

use ureq::http;

/// HTTP method for a request.
///
/// Common verbs get their own variant. Any other valid method token, in any
/// case, is carried unchanged as `Extension`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Extension(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Extension(token) => token,
        }
    }
}

/// Error returned when a string is not a valid method token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid method {0:?}")]
pub struct InvalidMethod(pub String);

impl FromStr for HttpMethod {
    type Err = InvalidMethod;

    /// Tokens are case-sensitive: `"get"` is an extension method, not `Get`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => match http::Method::from_bytes(other.as_bytes()) {
                Ok(_) => Ok(HttpMethod::Extension(other.to_string())),
                Err(_) => Err(InvalidMethod(other.to_string())),
            },
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for HttpMethod {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// An HTTP request described as plain data.
///
/// Produced by `SimpleHttpClient::build_request`. Headers are sorted by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// A response body stream that must be released once read.
///
/// `close` is the release point. The executor calls it exactly once after
/// reading, whether or not the read succeeded, and ignores its result.
pub trait ResponseBody: Read {
    fn close(&mut self) -> io::Result<()>;
}

/// In-memory body whose release never fails.
#[derive(Debug, Clone)]
pub struct BufferedBody(Cursor<Vec<u8>>);

impl BufferedBody {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Cursor::new(bytes.into()))
    }
}

impl Read for BufferedBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl ResponseBody for BufferedBody {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An HTTP response as returned by a `Transport`.
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Box<dyn ResponseBody>,
}

impl HttpResponse {
    /// Build a response around an in-memory body.
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Box::new(BufferedBody::new(body)),
        }
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
