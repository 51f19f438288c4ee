//! Proptest generators for property-based testing.

use proptest::prelude::*;

use namereg_core::{IdentityHash, DELETION_SENTINELS};

/// Generate a random hex identity hash.
pub fn identity_hash() -> impl Strategy<Value = IdentityHash> {
    "[0-9a-f]{8,40}".prop_map(IdentityHash::new)
}

/// Generate a display name: non-empty after trimming, never a deletion sentinel.
pub fn display_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_][A-Za-z0-9 _.-]{0,22}[A-Za-z0-9_]|[A-Za-z0-9_]"
        .prop_filter("deletion sentinel", |name| !DELETION_SENTINELS.contains(&name.as_str()))
}

/// Generate one of the removal bodies.
pub fn deletion_sentinel() -> impl Strategy<Value = &'static str> {
    // The empty sentinel never reaches the updater through the service; it is
    // rejected earlier as missing content.
    prop::sample::select(DELETION_SENTINELS[1..].to_vec())
}

/// One request against the registry: who asks, and the trimmed body.
#[derive(Debug, Clone)]
pub struct NameOp {
    pub identity: IdentityHash,
    pub body: String,
}

/// Generate an op drawn from small pools so identities and names collide often.
pub fn contended_op() -> impl Strategy<Value = NameOp> {
    let identity = prop::sample::select(vec!["aaa111", "bbb222", "ccc333", "ddd444"]);
    let body = prop_oneof![
        3 => prop::sample::select(vec!["Alice", "Bob", "Carol"]).prop_map(str::to_string),
        1 => deletion_sentinel().prop_map(str::to_string),
    ];
    (identity, body).prop_map(|(identity, body)| NameOp {
        identity: IdentityHash::new(identity),
        body,
    })
}

/// Generate a sequence of contended ops.
pub fn op_sequence(max_len: usize) -> impl Strategy<Value = Vec<NameOp>> {
    prop::collection::vec(contended_op(), 1..=max_len)
}

/// Generate a token-shaped string: three dot-separated base64url-ish segments.
pub fn token_shaped() -> impl Strategy<Value = String> {
    (
        "[A-Za-z0-9_-]{0,40}",
        "[A-Za-z0-9_-]{0,40}",
        "[A-Za-z0-9_-]{0,90}",
    )
        .prop_map(|(h, p, s)| format!("{}.{}.{}", h, p, s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use namereg_core::NameChange;

    proptest! {
        #[test]
        fn display_names_are_renames(name in display_name()) {
            prop_assert_eq!(name.trim(), name.as_str());
            prop_assert_eq!(NameChange::parse(&name), NameChange::Rename(name.clone()));
        }

        #[test]
        fn sentinels_are_removals(body in deletion_sentinel()) {
            prop_assert!(NameChange::parse(body).is_removal());
        }

        #[test]
        fn identity_hashes_are_hex(id in identity_hash()) {
            prop_assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
