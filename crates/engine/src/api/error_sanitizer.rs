//! Error sanitization for client-facing messages.
//!
//! Internal failures (storage, catalog) are logged in full and replaced with a
//! generic message so paths and backend details never reach clients.

/// Log the full error server-side and return a generic message for the client.
pub fn sanitize_error<E: std::fmt::Display>(error: &E, operation: &str) -> String {
    tracing::error!(
        error = %error,
        operation = operation,
        "Internal error occurred"
    );

    format!("Failed to {} - please try again", operation.replace('_', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_error_details() {
        let message = sanitize_error(&"io error: /var/lib/charforge/catalog.json locked", "finalize_draft");
        assert_eq!(message, "Failed to finalize draft - please try again");
    }
}
