//! Shared HTTP utilities for the address book workspace.
//!
//! Framework-agnostic JSON body builders so every surface reports errors and
//! acknowledgements with the same shape.

// ============================================================================
// JSON Response Helpers
// ============================================================================

/// Fixed detail for lookups of an id that does not exist.
pub const ADDRESS_NOT_FOUND: &str = "Address not found";

/// Acknowledgement returned after a successful delete.
pub const ADDRESS_DELETED: &str = "Address deleted";

/// Detail for any storage failure; the cause goes to the log, not the client.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Create an error JSON body with a custom detail.
///
/// Returns: `{"detail": "<detail>"}`
pub fn json_detail(detail: &str) -> serde_json::Value {
    serde_json::json!({ "detail": detail })
}

/// Create an acknowledgement JSON body.
///
/// Returns: `{"message": "<message>"}`
pub fn json_message(message: &str) -> serde_json::Value {
    serde_json::json!({ "message": message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_detail() {
        let err = json_detail("missing field `name`");
        assert_eq!(err, serde_json::json!({"detail": "missing field `name`"}));

        assert_eq!(
            json_detail(ADDRESS_NOT_FOUND),
            serde_json::json!({"detail": "Address not found"})
        );
        assert_eq!(
            json_detail(INTERNAL_SERVER_ERROR),
            serde_json::json!({"detail": "Internal server error"})
        );
    }

    #[test]
    fn test_json_message() {
        assert_eq!(
            json_message(ADDRESS_DELETED),
            serde_json::json!({"message": "Address deleted"})
        );
    }
}
