//! Request tracking middleware.
//!
//! Every request gets a [`RequestId`]: the incoming `X-Request-ID` header when
//! present and non-empty, otherwise a fresh UUID v7. The ID lives in the
//! request extensions (handlers extract it as `RequestId`), on the `request`
//! span, and in the `x-request-id` response header.
//!
//! HTTP metrics recorded per request:
//! - `http_requests_total{method,path,status}` with the status class as `status`
//! - `http_request_duration_seconds{method,path}`

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::FromRequestParts;
use axum::http::{
    request::Parts, HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode,
};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Header carrying the correlation ID.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Create a new request ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the request ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Handlers receive the ID assigned by [`RequestTrackingLayer`]; without the layer it
/// falls back to the header or a fresh UUID.
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(|| extract_or_generate_request_id(&parts.headers)))
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
///
/// Looks for the `X-Request-ID` header (case-insensitive). If not present,
/// empty, or invalid UTF-8, generates a new UUID v7 (time-sortable).
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Strip the query string so metric labels stay low-cardinality.
pub fn normalize_path(path: &str) -> &str {
    path.split_once('?').map_or(path, |(route, _)| route)
}

fn status_class(status: StatusCode) -> &'static str {
    if status.is_success() {
        "2xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else {
        "other"
    }
}

/// Labels and timing captured when a request enters the stack.
#[derive(Debug)]
struct RequestContext {
    started: Instant,
    method: String,
    path: String,
    request_id: RequestId,
    span: Span,
}

impl RequestContext {
    fn finish(&self, status: Option<StatusCode>) {
        let elapsed = self.started.elapsed().as_secs_f64();
        let class = match status {
            Some(status) => {
                tracing::info!(
                    status = status.as_u16(),
                    latency_ms = elapsed * 1000.0,
                    "request completed"
                );
                status_class(status)
            }
            None => {
                tracing::error!(latency_ms = elapsed * 1000.0, "request failed");
                "5xx"
            }
        };

        metrics::counter!(
            "http_requests_total",
            "method" => self.method.clone(),
            "path" => self.path.clone(),
            "status" => class
        )
        .increment(1);
        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => self.method.clone(),
            "path" => self.path.clone()
        )
        .record(elapsed);
    }
}

/// Tower layer that assigns request IDs, opens a `request` span per call,
/// echoes `x-request-id` and records HTTP metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTrackingLayer;

impl<S> Layer<S> for RequestTrackingLayer {
    type Service = RequestTracking<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestTracking { inner }
    }
}

/// Service produced by [`RequestTrackingLayer`].
#[derive(Debug, Clone)]
pub struct RequestTracking<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestTracking<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: http_body::Body + Send + 'static,
    ResBody: http_body::Body + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = TrackedResponse<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let started = Instant::now();
        let request_id = extract_or_generate_request_id(req.headers());
        req.extensions_mut().insert(request_id.clone());

        let method = req.method().to_string();
        let path = normalize_path(req.uri().path()).to_string();
        let span = info_span!("request", request_id = %request_id, method = %method, path = %path);

        let inner = span.in_scope(|| {
            tracing::debug!("handling request");
            self.inner.call(req)
        });

        TrackedResponse {
            inner,
            context: RequestContext {
                started,
                method,
                path,
                request_id,
                span,
            },
        }
    }
}

pin_project! {
    /// Response future of [`RequestTracking`].
    pub struct TrackedResponse<F> {
        #[pin]
        inner: F,
        context: RequestContext,
    }
}

impl<F, ResBody, E> Future for TrackedResponse<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
    ResBody: http_body::Body,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let context = &*this.context;
        let _entered = context.span.enter();

        let mut result = match this.inner.poll(cx) {
            Poll::Ready(result) => result,
            Poll::Pending => return Poll::Pending,
        };

        let status = match &mut result {
            Ok(response) => {
                if let Ok(value) = HeaderValue::from_str(context.request_id.as_str()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                Some(response.status())
            }
            Err(_) => None,
        };
        context.finish(status);

        Poll::Ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generate() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();

        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 36);
    }

    #[test]
    fn test_extract_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("test-123"));

        let id = extract_or_generate_request_id(&headers);
        assert_eq!(id.as_str(), "test-123");
    }

    #[test]
    fn test_extract_request_id_generates_when_empty() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static(""));

        let id = extract_or_generate_request_id(&headers);
        assert_eq!(id.as_str().len(), 36);
    }

    #[tokio::test]
    async fn test_request_id_extractor_prefers_extension() {
        let request = Request::builder()
            .header("x-request-id", "from-header")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(RequestId::new("from-layer"));

        let id = RequestId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(id.as_str(), "from-layer");
    }

    #[tokio::test]
    async fn test_request_id_extractor_falls_back_to_header() {
        let request = Request::builder()
            .header("x-request-id", "from-header")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let id = RequestId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(id.as_str(), "from-header");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/api/v1/predict"), "/api/v1/predict");
        assert_eq!(normalize_path("/api/v1/predict?debug=1"), "/api/v1/predict");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(StatusCode::OK), "2xx");
        assert_eq!(status_class(StatusCode::MOVED_PERMANENTLY), "3xx");
        assert_eq!(status_class(StatusCode::BAD_REQUEST), "4xx");
        assert_eq!(status_class(StatusCode::SERVICE_UNAVAILABLE), "5xx");
        assert_eq!(status_class(StatusCode::CONTINUE), "other");
    }
}
