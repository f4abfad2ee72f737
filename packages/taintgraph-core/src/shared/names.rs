//! Canonical naming for taint graph nodes.

/// Builds the `<canonical-function-name>#<position-index>` key used for taint
/// graph node identity.
pub fn canonical_position_key(canonical: &str, index: i64) -> String {
    format!("{canonical}#{index}")
}
