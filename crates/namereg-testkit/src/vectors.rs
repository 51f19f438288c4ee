//! Update vectors: a starting document, one request, and the expected result.
//!
//! Every backend and every transport must produce exactly these responses
//! and resulting documents. The documents are compared byte for byte, so
//! they also pin down the serialized form (sorted keys, no whitespace).

/// A single update vector.
#[derive(Debug, Clone)]
pub struct UpdateVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Registry document before the request.
    pub document: &'static str,
    /// Identity hash carried by the request's token.
    pub identity: &'static str,
    /// Raw request body.
    pub body: &'static str,
    /// Expected status code.
    pub status: u16,
    /// Expected response body.
    pub response: &'static str,
    /// Expected document afterwards. `None` means unchanged.
    pub document_after: Option<&'static str>,
}

/// Get all update vectors.
pub fn all_vectors() -> Vec<UpdateVector> {
    vec![
        UpdateVector {
            name: "first claim in an empty registry",
            document: "{}",
            identity: "abc123",
            body: "Alice",
            status: 200,
            response: "Renamed to Alice.",
            document_after: Some(r#"{"abc123":"Alice"}"#),
        },
        UpdateVector {
            name: "name held by someone else",
            document: r#"{"abc123":"Alice"}"#,
            identity: "def456",
            body: "Alice",
            status: 409,
            response: "Name taken.",
            document_after: None,
        },
        UpdateVector {
            name: "name held by the caller",
            document: r#"{"abc123":"Alice"}"#,
            identity: "abc123",
            body: "Alice",
            status: 409,
            response: "Name taken.",
            document_after: None,
        },
        UpdateVector {
            name: "quoted empty string removes",
            document: r#"{"abc123":"Alice"}"#,
            identity: "abc123",
            body: "\"\"",
            status: 200,
            response: "Entry removed.",
            document_after: Some("{}"),
        },
        UpdateVector {
            name: "null removes and leaves others",
            document: r#"{"abc123":"Alice","def456":"Bob"}"#,
            identity: "def456",
            body: "null",
            status: 200,
            response: "Entry removed.",
            document_after: Some(r#"{"abc123":"Alice"}"#),
        },
        UpdateVector {
            name: "removing an absent entry still succeeds",
            document: r#"{"abc123":"Alice"}"#,
            identity: "def456",
            body: "undefined",
            status: 200,
            response: "Entry removed.",
            document_after: Some(r#"{"abc123":"Alice"}"#),
        },
        UpdateVector {
            name: "rename replaces the previous name",
            document: r#"{"abc123":"Alice"}"#,
            identity: "abc123",
            body: "  Alicia\n",
            status: 200,
            response: "Renamed to Alicia.",
            document_after: Some(r#"{"abc123":"Alicia"}"#),
        },
        UpdateVector {
            name: "names are case-sensitive",
            document: r#"{"abc123":"Alice"}"#,
            identity: "def456",
            body: "alice",
            status: 200,
            response: "Renamed to alice.",
            document_after: Some(r#"{"abc123":"Alice","def456":"alice"}"#),
        },
        UpdateVector {
            name: "whitespace-only body",
            document: r#"{"abc123":"Alice"}"#,
            identity: "abc123",
            body: " \t\n",
            status: 400,
            response: "Missing content.",
            document_after: None,
        },
        UpdateVector {
            name: "document is not a string map",
            document: r#"{"abc123":42}"#,
            identity: "abc123",
            body: "Alice",
            status: 500,
            response: "File not found.",
            document_after: None,
        },
    ]
}
