//! axum adapter for [`NameService`].
//!
//! Every path and method lands on one handler; routing decisions belong to
//! the service.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method},
    response::{IntoResponse, Response},
    Router,
};
use namereg_store::DocumentStore;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::service::{NameRequest, NameResponse, NameService, CORS_HEADERS, TOKEN_HEADER};

/// Build the router serving the name-update endpoint.
///
/// The CORS headers are set as layers so that responses produced by axum
/// itself, such as extractor rejections, carry them too.
pub fn router<S: DocumentStore + 'static>(service: NameService<S>) -> Router {
    let router = Router::new()
        .fallback(handle::<S>)
        .layer(TraceLayer::new_for_http());

    CORS_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        })
        .with_state(Arc::new(service))
}

async fn handle<S: DocumentStore + 'static>(
    State(service): State<Arc<NameService<S>>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Invalid UTF-8 is replaced, not dropped: a mangled token still fails
    // verification and a mangled body is still content.
    let token = headers
        .get(TOKEN_HEADER)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
    let body = String::from_utf8_lossy(&body).into_owned();

    service
        .handle(&NameRequest {
            method,
            token,
            body,
        })
        .await
        .into_response()
}

impl IntoResponse for NameResponse {
    fn into_response(self) -> Response {
        if self.body.is_empty() {
            self.status.into_response()
        } else {
            (self.status, self.body).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::updater::NameRegistryUpdater;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use namereg_core::TokenVerifier;
    use namereg_store::MemoryStore;
    use tower::ServiceExt;

    fn app() -> Router {
        let store = Arc::new(MemoryStore::with_document("names.json", "{}"));
        router(NameService::new(
            TokenVerifier::embedded().unwrap(),
            NameRegistryUpdater::new(store, "names.json"),
        ))
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type, token");
        assert_eq!(headers["access-control-max-age"], "31536000");
    }

    #[tokio::test]
    async fn test_preflight_on_any_path() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/some/where")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_cors(&response);
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_not_allowed() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_cors(&response);
        assert_eq!(body_string(response).await, "Method not allowed.");
    }

    #[tokio::test]
    async fn test_post_without_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from("Alice"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_cors(&response);
        assert_eq!(body_string(response).await, "Missing header.");
    }

    #[tokio::test]
    async fn test_post_with_bad_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("token", "not-a-jwt")
                    .body(Body::from("Alice"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(response).await, "Invalid token.");
    }

    #[tokio::test]
    async fn test_non_utf8_body_is_decoded_lossily() {
        // Replacement characters make this a non-empty name, so the request
        // gets past the content check and fails on the token instead.
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("token", "a.b.c")
                    .body(Body::from(vec![0xff, 0xfe, 0xfd]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(response).await, "Invalid token.");
    }

    #[tokio::test]
    async fn test_oversized_body_rejection_carries_cors() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("token", "a.b.c")
                    .body(Body::from(vec![b'A'; 3 * 1024 * 1024]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_cors(&response);
    }

    #[tokio::test]
    async fn test_cors_headers_not_duplicated() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        for (name, _) in CORS_HEADERS {
            assert_eq!(response.headers().get_all(name).iter().count(), 1);
        }
    }
}
