//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::{EncodePublicKey, LineEnding};
use serde_json::{json, Value};

use namereg::{router, NameRegistryUpdater, NameRequest, NameResponse, NameService};
use namereg_core::{Es256PublicKey, TokenVerifier};
use namereg_store::{DocumentStore, MemoryStore};

/// Key the fixtures store the registry under.
pub const DOCUMENT_KEY: &str = "names.json";

/// Issues ES256 identity tokens, standing in for the external identity service.
pub struct TokenSigner {
    key: SigningKey,
}

impl TokenSigner {
    /// A signer with a fresh random key.
    pub fn new() -> Self {
        Self {
            key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// A signer with a deterministic key.
    ///
    /// Panics if `seed` is not a valid P-256 scalar (zero, or not below the
    /// group order).
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            key: SigningKey::from_slice(&seed).expect("seed is a valid P-256 scalar"),
        }
    }

    /// Verifier that accepts this signer's tokens.
    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier::new(Es256PublicKey::new(*self.key.verifying_key()))
    }

    /// The public key as a PEM SubjectPublicKeyInfo.
    pub fn public_key_pem(&self) -> String {
        self.key
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .expect("P-256 public key encodes as PEM")
    }

    /// A well-formed token carrying `hash`.
    pub fn token_for(&self, hash: &str) -> String {
        self.token_with(
            &json!({ "alg": "ES256", "typ": "JWT" }),
            &json!({ "hash": hash }),
        )
    }

    /// A token over arbitrary header and payload JSON, signed correctly.
    pub fn token_with(&self, header: &Value, payload: &Value) -> String {
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(payload.to_string())
        );
        let signature: Signature = self.key.sign(signing_input.as_bytes());
        format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature.to_bytes()))
    }
}

impl Default for TokenSigner {
    fn default() -> Self {
        Self::new()
    }
}

/// A memory store holding a registry document, plus a signer the service trusts.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
    pub signer: TokenSigner,
}

impl TestFixture {
    /// Fixture with an empty `{}` registry.
    pub fn new() -> Self {
        Self::with_document("{}")
    }

    /// Fixture whose registry document starts as `document`.
    pub fn with_document(document: &str) -> Self {
        Self {
            store: Arc::new(MemoryStore::with_document(DOCUMENT_KEY, document.to_string())),
            signer: TokenSigner::new(),
        }
    }

    /// Fixture with no registry document at all.
    pub fn without_document() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            signer: TokenSigner::new(),
        }
    }

    /// Updater over the fixture's store.
    pub fn updater(&self) -> NameRegistryUpdater<MemoryStore> {
        NameRegistryUpdater::new(Arc::clone(&self.store), DOCUMENT_KEY)
    }

    /// Service trusting the fixture's signer.
    pub fn service(&self) -> NameService<MemoryStore> {
        NameService::new(self.signer.verifier(), self.updater())
    }

    /// HTTP router over [`TestFixture::service`].
    pub fn router(&self) -> Router {
        router(self.service())
    }

    /// `POST` `body` as identity `hash`.
    pub async fn post_as(&self, hash: &str, body: &str) -> NameResponse {
        let token = self.signer.token_for(hash);
        self.service()
            .handle(&NameRequest::post(Some(&token), body))
            .await
    }

    /// Current registry document text, if any.
    pub async fn document(&self) -> Option<String> {
        self.store
            .read(DOCUMENT_KEY)
            .await
            .expect("memory store read")
            .map(|doc| String::from_utf8_lossy(&doc.body).into_owned())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
