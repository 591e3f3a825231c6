/// Serde utility functions for common patterns
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a string field that other writers may have stored as some
/// other JSON value.
///
/// - Field is `null` → `String::new()`
/// - Field is a string → unchanged
/// - Anything else → its compact JSON text (`17` → `"17"`)
///
/// Usage:
/// ```ignore
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Example {
///     #[serde(default, deserialize_with = "crate::serde_utils::lenient_string")]
///     description: String,
/// }
/// ```
pub fn lenient_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
