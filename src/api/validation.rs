use axum::{Json, extract::rejection::JsonRejection};

use super::ApiError;
use crate::models::Role;

/// Unwraps a JSON body, turning extractor rejections into a 400.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::validation(format!("Invalid JSON body: {}", e.body_text())))
}

/// Fails with the names of every field that is empty after trimming.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::missing_fields(&missing))
    }
}

pub fn validate_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::missing_fields(&["name"]));
    }

    if trimmed.chars().count() > 100 {
        return Err(ApiError::validation("Name must be 100 characters or less"));
    }

    Ok(trimmed)
}

pub fn validate_role(role: &str) -> Result<Role, ApiError> {
    if role.trim().is_empty() {
        return Err(ApiError::missing_fields(&["role"]));
    }
    role.trim().parse().map_err(ApiError::validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields() {
        assert!(require_fields(&[("email", "a@b"), ("name", "A")]).is_ok());

        match require_fields(&[("email", ""), ("password", "x"), ("name", "   ")]) {
            Err(ApiError::MissingFields(fields)) => assert_eq!(fields, "email, name"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Alice ").unwrap(), "Alice");
        assert!(matches!(validate_name(" "), Err(ApiError::MissingFields(_))));
        assert!(validate_name(&"x".repeat(101)).is_err());
        assert!(validate_name(&"ع".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_role() {
        assert_eq!(validate_role("admin").unwrap(), Role::Admin);
        assert_eq!(validate_role(" user ").unwrap(), Role::User);
        assert!(matches!(
            validate_role("owner"),
            Err(ApiError::ValidationError(_))
        ));
        assert!(matches!(validate_role(""), Err(ApiError::MissingFields(_))));
    }
}
