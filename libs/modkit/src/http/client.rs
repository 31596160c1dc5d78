//! Outgoing HTTP client that wraps every call in an `outgoing_http` span and
//! stamps a W3C `traceparent` header on the request.

use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::{Instrument, Level};

pub const TRACEPARENT: &str = "traceparent";

#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    /// Execute a built request inside an `outgoing_http` span.
    pub async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO,
            "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
        );

        inject_traceparent(req.headers_mut());

        let response = self.inner.execute(req).instrument(span.clone()).await?;

        span.record("http.status_code", response.status().as_u16());
        if response.status().is_client_error() || response.status().is_server_error() {
            tracing::debug!(parent: &span, status = %response.status(), "outgoing request failed");
        }
        Ok(response)
    }

    /// Start a request; finish it with `.build()` and pass it to [`Self::execute`].
    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }
}

fn inject_traceparent(headers: &mut HeaderMap) {
    if headers.contains_key(TRACEPARENT) {
        return;
    }
    let trace_id = format!("{:032x}", rand::random::<u128>());
    let span_id = format!("{:016x}", rand::random::<u64>());
    let value = format!("00-{trace_id}-{span_id}-01");
    if let Ok(v) = HeaderValue::from_str(&value) {
        headers.insert(HeaderName::from_static(TRACEPARENT), v);
    }
}
