use crate::ports::catalog_store::CatalogSnapshot;

/// Serialize a catalog snapshot as pretty-printed JSON.
///
/// Map entries keep catalog insertion order and dates are written as `YYYY-MM-DD`.
pub fn encode_snapshot(snapshot: &CatalogSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

/// Parse a catalog snapshot from JSON text.
pub fn decode_snapshot(json: &str) -> serde_json::Result<CatalogSnapshot> {
    serde_json::from_str(json)
}
