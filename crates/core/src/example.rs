//! The Example resource: storage-agnostic transfer object and field rules.

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Entity name used in error messages.
pub const ENTITY_NAME: &str = "Example";

/// Minimum length of an example name, in characters.
pub const NAME_MIN_LEN: u64 = 1;

/// Maximum length of an example name, in characters.
pub const NAME_MAX_LEN: u64 = 255;

/// An example as seen by callers of the service layer.
///
/// Structurally identical to the storage record but independent of it: the
/// service never hands storage types to its callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleDto {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// Validate that `name` is between [`NAME_MIN_LEN`] and [`NAME_MAX_LEN`]
/// characters long.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let len = name.chars().count() as u64;
    if len < NAME_MIN_LEN {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if len > NAME_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {NAME_MAX_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_names_within_bounds() {
        assert!(validate_name("a").is_ok());
        assert!(validate_name("Widget").is_ok());
        assert!(validate_name(&"x".repeat(255)).is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        let err = validate_name("").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn rejects_overlong_name() {
        let err = validate_name(&"x".repeat(256)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: name must be at most 255 characters, got 256"
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 255 three-byte characters is still within the limit.
        assert!(validate_name(&"字".repeat(255)).is_ok());
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: ENTITY_NAME,
            id: 42,
        };
        assert_eq!(err.to_string(), "Example with id 42 not found");
    }
}
