//! JSON output renderer.
//!
//! Outputs `{"users": [...], "count": n}` format.

use crate::models::UserRecord;
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, users: &[UserRecord]) -> String {
        let output = serde_json::json!({
            "users": users,
            "count": users.len(),
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
