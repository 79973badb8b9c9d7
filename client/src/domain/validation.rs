use tracing::warn;

use crate::error::ValidationError;

/// Trimmed name, or `EmptyName` when nothing but whitespace was entered
pub fn required_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        warn!("Rejected empty name");
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}
