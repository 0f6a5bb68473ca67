use crate::error::AppError;

/// Returns true if `err` came from a unique violation on `constraint`.
pub fn is_unique_violation_on(err: &AppError, constraint: &str) -> bool {
    match err {
        AppError::Conflict { details, .. } => {
            details.get("constraint").and_then(|c| c.as_str()) == Some(constraint)
        }
        _ => false,
    }
}
