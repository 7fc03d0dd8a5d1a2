//! Attribute definitions for entity columns
//!
//! This module contains the `Attribute` struct: a single column/field
//! descriptor with its type, length bound, and constraint flags.

use forge_core::{ColumnType, ForgeError, ForgeResult, Validatable};
use serde::{Deserialize, Serialize};

// ============================================================================
// Attribute
// ============================================================================

/// A single column/field descriptor within an [`crate::Entity`].
///
/// Constraint flags are independent of one another; no exclusivity is
/// enforced, though primary keys are conventionally also auto-increment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name (snake_case, unique within its owning entity)
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Optional length/magnitude bound; `0` means "use the default bound"
    #[serde(default)]
    pub length: u32,

    /// Whether this is the primary key
    #[serde(default)]
    pub is_primary: bool,

    /// Whether the database assigns the value automatically
    #[serde(default)]
    pub is_auto_increment: bool,

    /// Whether the attribute is required (NOT NULL)
    #[serde(default = "default_true")]
    pub is_required: bool,

    /// Whether the attribute must be unique
    #[serde(default)]
    pub is_unique: bool,

    /// Whether to create an index on this attribute
    #[serde(default)]
    pub is_indexed: bool,

    /// Whether this attribute references another entity's primary key
    #[serde(default)]
    pub is_foreign: bool,

    /// Name of the referenced entity; meaningful only when `is_foreign` is true
    #[serde(default)]
    pub foreign_key_class: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Attribute {
    /// Create a new attribute with the given name and column type.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            length: 0,
            is_primary: false,
            is_auto_increment: false,
            is_required: true,
            is_unique: false,
            is_indexed: false,
            is_foreign: false,
            foreign_key_class: None,
        }
    }

    /// Create an auto-increment integer primary key attribute.
    pub fn primary_key() -> Self {
        let mut attr = Self::new("id", ColumnType::Integer);
        attr.is_primary = true;
        attr.is_auto_increment = true;
        attr.is_indexed = true;
        attr
    }

    /// Create a foreign key attribute referencing another entity.
    pub fn foreign_key(name: impl Into<String>, target_entity: impl Into<String>) -> Self {
        let mut attr = Self::new(name, ColumnType::Integer);
        attr.is_foreign = true;
        attr.is_indexed = true;
        attr.foreign_key_class = Some(target_entity.into());
        attr
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the length bound.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// Mark the attribute as optional (nullable).
    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    /// Mark the attribute as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Mark the attribute as unique (unique attributes are always indexed).
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self.is_indexed = true;
        self
    }

    /// Mark the attribute as indexed.
    pub fn indexed(mut self) -> Self {
        self.is_indexed = true;
        self
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Whether this attribute holds password material. Password attributes
    /// are transformed before storage, so generated tests skip equality
    /// assertions for them and schemas alias them to a plain `password` field.
    pub fn is_password(&self) -> bool {
        self.name == "password" || self.name == "hashed_password"
    }

    /// The schema-facing field name (aliases `hashed_password` to `password`).
    pub fn schema_name(&self) -> &str {
        if self.name == "hashed_password" {
            "password"
        } else {
            &self.name
        }
    }
}

impl Validatable for Attribute {
    fn validate(&self) -> ForgeResult<()> {
        if self.name.is_empty() {
            return Err(ForgeError::validation("Attribute name cannot be empty"));
        }

        if !is_valid_identifier(&self.name) {
            return Err(ForgeError::validation(format!(
                "Attribute name '{}' is not a valid identifier",
                self.name
            )));
        }

        if self.is_foreign {
            match &self.foreign_key_class {
                Some(target) if !target.is_empty() => {}
                _ => {
                    return Err(ForgeError::validation(format!(
                        "Foreign key attribute '{}' must name a referenced entity",
                        self.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for Attribute {
    fn default() -> Self {
        Self::new("attribute", ColumnType::String)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Check if a string is a valid identifier (letter/underscore first, then
/// alphanumerics or underscores).
pub(crate) fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();

    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attribute_new() {
        let attr = Attribute::new("email", ColumnType::String);
        assert_eq!(attr.name, "email");
        assert_eq!(attr.column_type, ColumnType::String);
        assert!(attr.is_required);
        assert!(!attr.is_unique);
        assert!(!attr.is_foreign);
    }

    #[test]
    fn test_attribute_builder() {
        let attr = Attribute::new("email", ColumnType::String)
            .with_length(100)
            .unique();

        assert_eq!(attr.length, 100);
        assert!(attr.is_unique);
        assert!(attr.is_indexed); // unique implies indexed
    }

    #[test]
    fn test_primary_key_attribute() {
        let attr = Attribute::primary_key();
        assert_eq!(attr.name, "id");
        assert!(attr.is_primary);
        assert!(attr.is_auto_increment);
    }

    #[test]
    fn test_foreign_key_attribute() {
        let attr = Attribute::foreign_key("role_id", "Role");
        assert!(attr.is_foreign);
        assert!(attr.is_indexed);
        assert_eq!(attr.foreign_key_class.as_deref(), Some("Role"));
    }

    #[test]
    fn test_password_aliasing() {
        let hashed = Attribute::new("hashed_password", ColumnType::String);
        assert!(hashed.is_password());
        assert_eq!(hashed.schema_name(), "password");

        let plain = Attribute::new("first_name", ColumnType::String);
        assert!(!plain.is_password());
        assert_eq!(plain.schema_name(), "first_name");
    }

    #[test]
    fn test_attribute_validation() {
        assert!(Attribute::new("email", ColumnType::String).validate().is_ok());
        assert!(Attribute::new("", ColumnType::String).validate().is_err());
        assert!(
            Attribute::new("with-dash", ColumnType::String)
                .validate()
                .is_err()
        );

        // Foreign key without a target is invalid
        let mut fk = Attribute::new("role_id", ColumnType::Integer);
        fk.is_foreign = true;
        assert!(fk.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let attr: Attribute =
            serde_json::from_str(r#"{"name": "age", "type": "Integer"}"#).unwrap();
        assert_eq!(attr.name, "age");
        assert_eq!(attr.column_type, ColumnType::Integer);
        assert_eq!(attr.length, 0);
        assert!(attr.is_required);
        assert!(!attr.is_foreign);
    }

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("user_id"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("User123"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("123start"));
        assert!(!is_valid_identifier("with-dash"));
    }
}
