use axum::extract::MatchedPath;
use axum::http::Request;
use tower_http::trace::MakeSpan;
use tracing::Span;

use super::request_id::get_request_id;

/// Span factory for `TraceLayer` that tags every HTTP span with the request ID.
///
/// Must sit inside `request_id_middleware` so the ID is already in the
/// request extensions when the span is created.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let target = request.uri().path();
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(|mp| mp.as_str())
            .unwrap_or(target);
        let request_id = get_request_id(request).unwrap_or_else(|| "-".to_string());

        tracing::info_span!(
            "http_request",
            http.method = %request.method(),
            http.route = %route,
            http.target = %target,
            request_id = %request_id,
        )
    }
}
