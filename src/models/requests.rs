//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for pattern invalidation (POST /admin/cache/invalidate)
///
/// # Fields
/// - `pattern`: Regular expression tested against every cached key
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidatePatternRequest {
    #[serde(default)]
    pub pattern: String,
}

impl InvalidatePatternRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    /// Pattern syntax is checked later, when it is compiled.
    pub fn validate(&self) -> Option<String> {
        if self.pattern.is_empty() {
            return Some("Pattern is required".to_string());
        }
        None
    }
}
