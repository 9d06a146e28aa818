//! Fluent request builder that performs one JSON round trip.
//!
//! # Design
//! `SimpleHttpClient` accumulates method, URL, body, headers and timeout
//! through chained setters. Setters never fail: a bad URL, an invalid method
//! or a payload that will not serialize is recorded and reported by the
//! terminal call as one combined `ClientError::Configuration`, before any
//! network I/O happens.
//!
//! Execution is split the same way a host-does-IO client would split it:
//! `build_request` produces an `HttpRequest` as data, the `Transport` performs
//! the round trip, and `parse_response` reads, releases and decodes the body.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{ClientError, ConfigError, ConfigErrors, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

/// Timeout applied to every new builder.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// `Content-Type` header value applied to every new builder.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Builder and executor for a single JSON HTTP call.
///
/// Method, URL and body are write-once: once a value is stored, later calls
/// to `set_method`, `set_url` or `set_body` are ignored. Headers and timeout
/// are overwritten on every call.
///
/// ```no_run
/// use simple_http_client::{HttpMethod, SimpleHttpClient};
///
/// #[derive(serde::Serialize)]
/// struct NewUser { name: String }
///
/// let mut created = serde_json::Value::Null;
/// SimpleHttpClient::with_body(HttpMethod::Post, "https://api.example/users", &NewUser { name: "Mirza".into() })
///     .set_header("Authorization", "Bearer token")
///     .execute(&mut created)?;
/// # Ok::<(), simple_http_client::ClientError>(())
/// ```
#[derive(Debug)]
pub struct SimpleHttpClient<T = UreqTransport> {
    method: Option<HttpMethod>,
    url: Option<String>,
    body: Option<String>,
    headers: BTreeMap<String, String>,
    timeout: Duration,
    errors: ConfigErrors,
    transport: T,
}

impl SimpleHttpClient<UreqTransport> {
    /// Start a request with the default `Content-Type` header and timeout.
    ///
    /// An empty `method` leaves the method unset (sent as GET). An empty
    /// `url` is recorded as a configuration error and not stored.
    pub fn new(method: impl AsRef<str>, url: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());

        let mut client = Self {
            method: None,
            url: None,
            body: None,
            headers,
            timeout: DEFAULT_TIMEOUT,
            errors: ConfigErrors::default(),
            transport: UreqTransport,
        };
        client.assign_method(method.as_ref());
        client.assign_url(url.into());
        client
    }

    /// Like `new`, with `payload` serialized to JSON as the request body.
    pub fn with_body<P: Serialize + ?Sized>(
        method: impl AsRef<str>,
        url: impl Into<String>,
        payload: &P,
    ) -> Self {
        Self::new(method, url).set_body(payload)
    }
}

impl<T> SimpleHttpClient<T> {
    /// Replace the transport that performs the round trip.
    pub fn with_transport<U: Transport>(self, transport: U) -> SimpleHttpClient<U> {
        SimpleHttpClient {
            method: self.method,
            url: self.url,
            body: self.body,
            headers: self.headers,
            timeout: self.timeout,
            errors: self.errors,
            transport,
        }
    }

    /// Set the method if none is stored yet.
    pub fn set_method(mut self, method: impl AsRef<str>) -> Self {
        if self.method.is_none() {
            self.assign_method(method.as_ref());
        }
        self
    }

    /// Set the URL if none is stored yet. An empty URL is recorded as an error.
    pub fn set_url(mut self, url: impl Into<String>) -> Self {
        if self.url.is_none() {
            self.assign_url(url.into());
        }
        self
    }

    /// Serialize `payload` as the body unless a body is already present.
    pub fn set_body<P: Serialize + ?Sized>(mut self, payload: &P) -> Self {
        if self.body.is_some() {
            return self;
        }
        match serde_json::to_string(payload) {
            Ok(body) => self.body = Some(body),
            Err(err) => self.errors.push(ConfigError::Serialize(Arc::new(err))),
        }
        self
    }

    /// Set a header, replacing any value stored under the same key.
    pub fn set_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the deadline for the whole call. `Duration::ZERO` means no deadline.
    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn method(&self) -> Option<&HttpMethod> {
        self.method.as_ref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The serialized JSON body, if any.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Configuration errors recorded so far. They are never cleared.
    pub fn pending_errors(&self) -> &ConfigErrors {
        &self.errors
    }

    /// Assemble the request without sending it.
    ///
    /// Fails with `ClientError::Configuration` if any configuration error has
    /// been recorded.
    pub fn build_request(&self) -> Result<HttpRequest, ClientError> {
        if !self.errors.is_empty() {
            tracing::debug!(errors = %self.errors, "not sending request, configuration errors pending");
            return Err(ClientError::Configuration(self.errors.clone()));
        }
        let Some(url) = self.url.clone() else {
            return Err(ClientError::Configuration(ConfigErrors(vec![ConfigError::EmptyUrl])));
        };

        Ok(HttpRequest {
            method: self.method.clone().unwrap_or(HttpMethod::Get),
            url,
            headers: self
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            body: self.body.clone(),
        })
    }

    /// Read the whole body, release it, and decode it as JSON.
    ///
    /// The body is closed whether or not the read succeeded. A failed close
    /// is logged and otherwise ignored.
    pub fn parse_response<D: DeserializeOwned>(&self, mut response: HttpResponse) -> Result<D, ClientError> {
        let mut bytes = Vec::new();
        let read = response.body.read_to_end(&mut bytes);
        if let Err(err) = response.body.close() {
            tracing::debug!(error = %err, "ignoring response body close failure");
        }
        read.map_err(TransportError::from)?;

        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }

    fn assign_method(&mut self, method: &str) {
        if method.is_empty() {
            return;
        }
        match method.parse::<HttpMethod>() {
            Ok(m) => self.method = Some(m),
            Err(_) => self.errors.push(ConfigError::InvalidMethod(method.to_string())),
        }
    }

    fn assign_url(&mut self, url: String) {
        if url.is_empty() {
            self.errors.push(ConfigError::EmptyUrl);
            return;
        }
        self.url = Some(url);
    }
}

impl<T: Transport> SimpleHttpClient<T> {
    /// Send the request and decode the JSON response into a new value.
    pub fn call<D: DeserializeOwned>(&self) -> Result<D, ClientError> {
        let request = self.build_request()?;
        tracing::debug!(method = %request.method, url = %request.url, timeout = ?self.timeout, "sending request");

        let response = self.transport.send(&request, self.timeout)?;
        tracing::debug!(status = response.status, url = %request.url, "received response");

        self.parse_response(response)
    }

    /// Send the request and decode the JSON response into `destination`.
    ///
    /// `destination` is only written when every step succeeds.
    pub fn execute<D: DeserializeOwned>(&self, destination: &mut D) -> Result<(), ClientError> {
        *destination = self.call()?;
        Ok(())
    }

    /// `execute`, then print the decoded value as indented JSON to stdout.
    pub fn execute_and_print<D>(&self, destination: &mut D) -> Result<(), ClientError>
    where
        D: DeserializeOwned + Serialize,
    {
        self.execute_and_print_to(destination, io::stdout().lock())
    }

    /// `execute`, then write the decoded value as indented JSON to `writer`.
    ///
    /// A print failure is returned even though the request succeeded; the
    /// destination keeps the decoded value.
    pub fn execute_and_print_to<D, W>(&self, destination: &mut D, mut writer: W) -> Result<(), ClientError>
    where
        D: DeserializeOwned + Serialize,
        W: Write,
    {
        self.execute(destination)?;
        let pretty = to_pretty_json(destination).map_err(ClientError::Print)?;
        writer
            .write_all(&pretty)
            .and_then(|()| writer.flush())
            .map_err(|err| ClientError::Print(serde_json::Error::io(err)))
    }
}

/// JSON indented one space per level, newline terminated.
fn to_pretty_json<V: Serialize + ?Sized>(value: &V) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    {
        let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b" "));
        value.serialize(&mut ser)?;
    }
    out.push(b'\n');
    Ok(out)
}
