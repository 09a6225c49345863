//! Executing `HttpRequest`s.
//!
//! `Transport` is the seam between the deterministic client and the network.
//! `UreqTransport` is the blocking implementation used by the CLI and the
//! integration tests; view tests plug in a scripted transport instead.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Largest response body read into memory. The list endpoint returns the
/// whole collection, so this sits well above ureq's 10 MB default.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Performs one HTTP round-trip.
///
/// Non-2xx statuses are data, not errors: implementations return them as an
/// `HttpResponse` and only fail when no response was obtained at all.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport over `ureq`. No retries and no timeout beyond ureq's
/// defaults.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        // hand 4xx/5xx back as responses so the client can read the error body
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let body = request.body.as_deref().unwrap_or_default().as_bytes();
        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), &request.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), &request.headers).call(),
            HttpMethod::Post => with_headers(self.agent.post(url), &request.headers).send(body),
            HttpMethod::Patch => with_headers(self.agent.patch(url), &request.headers).send(body),
        };
        let mut response = result.map_err(|e| {
            ApiError::new(format!("{} {} failed: {e}", request.method.as_str(), request.url))
        })?;

        let status = response.status().as_u16();
        let read = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string();
        let body = match read {
            Ok(body) => body,
            Err(e) if (200..300).contains(&status) => {
                return Err(ApiError::new(format!(
                    "{} {} failed: {e}",
                    request.method.as_str(),
                    request.url
                )));
            }
            // an unreadable error body is treated like an absent one
            Err(_) => String::new(),
        };

        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
