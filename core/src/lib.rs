//! Minimal fluent JSON HTTP client.
//!
//! # Overview
//! Configure a request with chained setters, then make one blocking call
//! that serializes the body to JSON, performs a single HTTP round trip and
//! decodes the JSON response into a caller-provided destination.
//!
//! # Design
//! - `SimpleHttpClient` records configuration errors instead of returning
//!   them, and reports them all at once from the terminal call.
//! - Requests are assembled as plain `HttpRequest` data, then handed to a
//!   `Transport`. `UreqTransport` is the default; tests inject their own.
//! - No retries, pooling, redirects policy or streaming bodies.

pub mod client;
pub mod error;
pub mod http;
pub mod transport;

pub use client::{SimpleHttpClient, DEFAULT_CONTENT_TYPE, DEFAULT_TIMEOUT};
pub use error::{ClientError, ConfigError, ConfigErrors, TransportError};
pub use http::{BufferedBody, HttpMethod, HttpRequest, HttpResponse, ResponseBody, InvalidMethod};
pub use transport::{Transport, UreqTransport};
