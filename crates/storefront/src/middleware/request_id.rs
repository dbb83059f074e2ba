//! Request ID middleware for request tracing and correlation.
//!
//! An `x-request-id` supplied by the client or a proxy is kept when it is a
//! short printable token; otherwise a UUID v4 is generated. The ID ends up in
//! the tracing span, the Sentry scope and the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound request ID that is propagated as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Use `inbound` if it is a non-empty printable ASCII token of bounded length.
fn accept_request_id(inbound: Option<&HeaderValue>) -> Option<String> {
    let value = inbound?.to_str().ok()?;
    let acceptable = !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| value.to_owned())
}

/// Middleware that ensures every request and response carries a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = accept_request_id(request.headers().get(REQUEST_ID_HEADER))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_printable_token() {
        let value = HeaderValue::from_static("abc-123_XYZ");
        assert_eq!(
            accept_request_id(Some(&value)).as_deref(),
            Some("abc-123_XYZ")
        );
    }

    #[test]
    fn test_rejects_missing_empty_spaced_and_oversized() {
        assert_eq!(accept_request_id(None), None);
        assert_eq!(accept_request_id(Some(&HeaderValue::from_static(""))), None);
        assert_eq!(
            accept_request_id(Some(&HeaderValue::from_static("has space"))),
            None
        );

        let long = HeaderValue::from_str(&"a".repeat(MAX_REQUEST_ID_LEN + 1)).unwrap();
        assert_eq!(accept_request_id(Some(&long)), None);
    }
}
