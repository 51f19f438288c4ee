//! The single name-update endpoint, independent of any HTTP framework.
//!
//! [`NameService::handle`] turns a [`NameRequest`] into a [`NameResponse`].
//! Every path, including every failure, yields a normal response with the
//! CORS headers attached; nothing propagates to the transport as an error.

use axum::http::{Method, StatusCode};
use namereg_core::TokenVerifier;
use namereg_store::DocumentStore;

use crate::updater::{ConflictReason, NameRegistryUpdater, Outcome};

/// Request header carrying the identity token.
pub const TOKEN_HEADER: &str = "token";

/// Headers attached to every response.
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type, token"),
    // One year.
    ("access-control-max-age", "31536000"),
];

pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed.";
pub const MSG_MISSING_CONTENT: &str = "Missing content.";
pub const MSG_MISSING_HEADER: &str = "Missing header.";
pub const MSG_INVALID_TOKEN: &str = "Invalid token.";
pub const MSG_NAME_TAKEN: &str = "Name taken.";
pub const MSG_CONCURRENT_UPDATE: &str = "Concurrent update. Please retry.";
pub const MSG_FILE_NOT_FOUND: &str = "File not found.";
pub const MSG_UPDATE_FAILED: &str = "Update failed.";

/// The parts of an incoming request the endpoint looks at.
#[derive(Debug, Clone)]
pub struct NameRequest {
    pub method: Method,
    /// Value of the `token` header, if present.
    pub token: Option<String>,
    /// Raw body text, untrimmed.
    pub body: String,
}

impl NameRequest {
    /// A `POST` with the given token and body.
    pub fn post(token: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            token: token.map(str::to_string),
            body: body.into(),
        }
    }
}

/// Status and body of a response. CORS headers are implied; see [`NameResponse::headers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameResponse {
    pub status: StatusCode,
    pub body: String,
}

impl NameResponse {
    fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self::text(StatusCode::NO_CONTENT, "")
    }

    /// Headers every response carries.
    pub fn headers(&self) -> &'static [(&'static str, &'static str)] {
        &CORS_HEADERS
    }
}

impl From<Outcome> for NameResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Applied(applied) => Self::text(StatusCode::OK, applied.confirmation()),
            Outcome::Conflict(ConflictReason::NameTaken) => {
                Self::text(StatusCode::CONFLICT, MSG_NAME_TAKEN)
            }
            Outcome::Conflict(ConflictReason::ConcurrentUpdate) => {
                Self::text(StatusCode::CONFLICT, MSG_CONCURRENT_UPDATE)
            }
            Outcome::StoreUnavailable(err) if err.is_read_side() => {
                Self::text(StatusCode::INTERNAL_SERVER_ERROR, MSG_FILE_NOT_FOUND)
            }
            Outcome::StoreUnavailable(_) => {
                Self::text(StatusCode::INTERNAL_SERVER_ERROR, MSG_UPDATE_FAILED)
            }
        }
    }
}

/// Token verification plus registry update behind one entry point.
pub struct NameService<S: DocumentStore> {
    verifier: TokenVerifier,
    updater: NameRegistryUpdater<S>,
}

impl<S: DocumentStore> NameService<S> {
    /// Create a new service.
    pub fn new(verifier: TokenVerifier, updater: NameRegistryUpdater<S>) -> Self {
        Self { verifier, updater }
    }

    /// Get the updater reference.
    pub fn updater(&self) -> &NameRegistryUpdater<S> {
        &self.updater
    }

    /// Handle one request.
    pub async fn handle(&self, request: &NameRequest) -> NameResponse {
        if request.method == Method::OPTIONS {
            return NameResponse::preflight();
        }
        if request.method != Method::POST {
            return NameResponse::text(StatusCode::METHOD_NOT_ALLOWED, MSG_METHOD_NOT_ALLOWED);
        }

        let desired_name = request.body.trim();
        if desired_name.is_empty() {
            return NameResponse::text(StatusCode::BAD_REQUEST, MSG_MISSING_CONTENT);
        }

        let token = match request.token.as_deref() {
            Some(token) => token,
            None => return NameResponse::text(StatusCode::UNAUTHORIZED, MSG_MISSING_HEADER),
        };

        let identity = match self.verifier.verify(token) {
            Ok(identity) => identity,
            Err(err) => {
                tracing::debug!(reason = %err, "rejected identity token");
                return NameResponse::text(StatusCode::UNAUTHORIZED, MSG_INVALID_TOKEN);
            }
        };

        self.updater.apply(&identity, desired_name).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::updater::{Applied, AppliedChange};
    use namereg_core::{CoreError, ETag, NameRegistry};
    use namereg_store::{MemoryStore, StoreError};
    use std::sync::Arc;

    fn service() -> NameService<MemoryStore> {
        let store = Arc::new(MemoryStore::with_document("names.json", r#"{"abc123":"Alice"}"#));
        NameService::new(
            TokenVerifier::embedded().unwrap(),
            NameRegistryUpdater::new(store, "names.json"),
        )
    }

    #[tokio::test]
    async fn test_preflight() {
        let request = NameRequest {
            method: Method::OPTIONS,
            token: None,
            body: String::new(),
        };
        let response = service().handle(&request).await;

        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
            let request = NameRequest {
                method,
                token: Some("a.b.c".into()),
                body: "Alice".into(),
            };
            let response = service().handle(&request).await;
            assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(response.body, MSG_METHOD_NOT_ALLOWED);
        }
    }

    #[tokio::test]
    async fn test_blank_body_is_missing_content() {
        for body in ["", "   ", "\n\t "] {
            let response = service().handle(&NameRequest::post(Some("a.b.c"), body)).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert_eq!(response.body, MSG_MISSING_CONTENT);
        }
    }

    #[tokio::test]
    async fn test_missing_token() {
        let response = service().handle(&NameRequest::post(None, "Bob")).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body, MSG_MISSING_HEADER);
    }

    #[tokio::test]
    async fn test_invalid_tokens_look_alike() {
        let service = service();
        for token in ["", "garbage", "a.b.c", "e30.e30.AAAA"] {
            let response = service.handle(&NameRequest::post(Some(token), "Bob")).await;
            assert_eq!(response.status, StatusCode::UNAUTHORIZED);
            assert_eq!(response.body, MSG_INVALID_TOKEN);
        }
    }

    #[test]
    fn test_outcome_projection() {
        let applied = |change| {
            Outcome::Applied(Applied {
                change,
                registry: NameRegistry::new(),
                etag: ETag::of(b"{}"),
            })
        };

        let cases = [
            (applied(AppliedChange::Removed), StatusCode::OK, "Entry removed."),
            (
                applied(AppliedChange::Renamed("Bob".into())),
                StatusCode::OK,
                "Renamed to Bob.",
            ),
            (
                Outcome::Conflict(ConflictReason::NameTaken),
                StatusCode::CONFLICT,
                MSG_NAME_TAKEN,
            ),
            (
                Outcome::Conflict(ConflictReason::ConcurrentUpdate),
                StatusCode::CONFLICT,
                MSG_CONCURRENT_UPDATE,
            ),
            (
                Outcome::StoreUnavailable(ServiceError::DocumentMissing("names.json".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
                MSG_FILE_NOT_FOUND,
            ),
            (
                Outcome::StoreUnavailable(ServiceError::MalformedDocument(
                    CoreError::MalformedDocument("expected map".into()),
                )),
                StatusCode::INTERNAL_SERVER_ERROR,
                MSG_FILE_NOT_FOUND,
            ),
            (
                Outcome::StoreUnavailable(ServiceError::Write(StoreError::Poisoned("x".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
                MSG_UPDATE_FAILED,
            ),
        ];

        for (outcome, status, body) in cases {
            let response = NameResponse::from(outcome);
            assert_eq!(response.status, status);
            assert_eq!(response.body, body);
        }
    }

    #[test]
    fn test_cors_headers() {
        let headers = NameResponse::preflight().headers();
        assert!(headers.contains(&("access-control-allow-origin", "*")));
        assert!(headers.contains(&("access-control-allow-methods", "POST, OPTIONS")));
        assert!(headers.contains(&("access-control-allow-headers", "Content-Type, token")));
        assert!(headers.contains(&("access-control-max-age", "31536000")));
    }
}
