//! The network seam: one `HttpRequest` in, one `HttpResponse` out.
//!
//! # Design
//! `UreqTransport` builds a fresh agent for every call, so nothing is pooled
//! or shared between requests. Status codes are not treated as errors; a
//! 4xx/5xx body is handed back like any other and decoded by the caller.

use std::io::{self, Read};
use std::time::Duration;

use ureq::http;
use ureq::http::header::{HeaderName, HeaderValue};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, ResponseBody};

/// Performs exactly one HTTP round trip per call.
pub trait Transport {
    fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<HttpResponse, TransportError> {
        (**self).send(request, timeout)
    }
}

/// Blocking transport backed by `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let agent = ureq::Agent::config_builder()
            .timeout_global(deadline(timeout))
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .build()
            .new_agent();

        let response = match request.body.as_deref() {
            Some(body) => agent.run(to_http(request, body).map_err(ureq::Error::Http)?)?,
            None => agent.run(to_http(request, ()).map_err(ureq::Error::Http)?)?,
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let reader: Box<dyn Read> = Box::new(response.into_body().into_reader());

        Ok(HttpResponse {
            status,
            headers,
            body: Box::new(UreqBody(Some(reader))),
        })
    }
}

/// A zero timeout means the call has no deadline.
fn deadline(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

/// Convert to an `http::Request`. Header names are case-insensitive on the
/// wire, so keys differing only in case collapse to one header and the last
/// one in `request.headers` wins.
fn to_http<B>(request: &HttpRequest, body: B) -> Result<http::Request<B>, http::Error> {
    let mut out = http::Request::builder()
        .method(request.method.as_str())
        .uri(request.url.as_str())
        .body(body)?;
    let headers = out.headers_mut();
    for (key, value) in &request.headers {
        headers.insert(
            HeaderName::from_bytes(key.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }
    Ok(out)
}

/// Streaming ureq body. Closing drops the reader and with it the connection.
struct UreqBody(Option<Box<dyn Read>>);

impl Read for UreqBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }
}

impl ResponseBody for UreqBody {
    fn close(&mut self) -> io::Result<()> {
        self.0.take();
        Ok(())
    }
}
