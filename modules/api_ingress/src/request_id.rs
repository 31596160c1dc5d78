use std::time::Duration;

use axum::http::{HeaderName, Request, Response};
use axum::{body::Body, middleware::Next};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::request_id::{MakeRequestId, RequestId};
use tower_http::trace::TraceLayer;
use tracing::{field::Empty, Span};

/// Request id as seen by handlers (`Extension<XRequestId>`).
#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

pub fn header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

fn header_value<B>(req: &Request<B>) -> Option<&str> {
    req.headers().get(header()).and_then(|v| v.to_str().ok())
}

/// Generates ids for requests that arrive without one.
#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        Some(RequestId::new(id.parse().ok()?))
    }
}

/// Store the request id in the request extensions and on the current span.
pub async fn push_req_id_to_extensions(mut req: Request<Body>, next: Next) -> Response<Body> {
    let rid = header_value(&req).unwrap_or("n/a").to_owned();
    Span::current().record("request_id", tracing::field::display(&rid));
    req.extensions_mut().insert(XRequestId(rid));
    next.run(req).await
}

type MakeSpan = fn(&Request<Body>) -> Span;
type OnResponse = fn(&Response<Body>, Duration, &Span);

fn make_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        uri = %req.uri().path(),
        version = ?req.version(),
        request_id = %header_value(req).unwrap_or("n/a"),
        status = Empty,
        latency_ms = Empty
    )
}

fn on_response(resp: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status", resp.status().as_u16());
    span.record("latency_ms", latency.as_millis() as u64);
    tracing::debug!(parent: span, status = resp.status().as_u16(), "request finished");
}

/// `http_request` span per request carrying method, path, request id, status and latency.
pub fn create_trace_layer(
) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpan, tower_http::trace::DefaultOnRequest, OnResponse> {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeSpan)
        .on_response(on_response as OnResponse)
}
