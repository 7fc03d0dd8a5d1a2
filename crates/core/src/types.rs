//! Core types used throughout FastForge
//!
//! This module contains the attribute type system shared by the IR and the
//! code generators: the closed set of column types an attribute may declare,
//! plus the mapping from column types to the Pydantic type names emitted in
//! generated schemas.

use serde::{Deserialize, Serialize};

// ============================================================================
// ColumnType
// ============================================================================

/// The type of a single entity attribute (maps to a database column type).
///
/// Parsing is case-insensitive and permissive: an unrecognized type string is
/// preserved as [`ColumnType::Unknown`] rather than rejected, and downstream
/// generators fall back to an empty synthetic value / `Any` schema type for
/// it. This mirrors the deliberate silent fallback of the value generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    /// Short text with an optional length bound (SQLAlchemy `String`)
    String,
    /// Long text (SQLAlchemy `Text`)
    Text,
    /// Integer
    Integer,
    /// Floating point
    Float,
    /// Boolean
    Boolean,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time
    DateTime,
    /// Structured JSON object
    Json,
    /// Unique identifier (UUID v4)
    Uuid,
    /// Any type string the parser did not recognize (permissive fallback)
    Unknown(String),
}

impl ColumnType {
    /// Parse a column type from its project-file spelling (case-insensitive).
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "STRING" => ColumnType::String,
            "TEXT" => ColumnType::Text,
            "INTEGER" => ColumnType::Integer,
            "FLOAT" => ColumnType::Float,
            "BOOLEAN" => ColumnType::Boolean,
            "DATE" => ColumnType::Date,
            "TIME" => ColumnType::Time,
            "DATETIME" => ColumnType::DateTime,
            "JSON" => ColumnType::Json,
            "UUID" => ColumnType::Uuid,
            _ => ColumnType::Unknown(s.to_string()),
        }
    }

    /// Canonical spelling used in project files and generated SQLAlchemy code.
    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::String => "String",
            ColumnType::Text => "Text",
            ColumnType::Integer => "Integer",
            ColumnType::Float => "Float",
            ColumnType::Boolean => "Boolean",
            ColumnType::Date => "Date",
            ColumnType::Time => "Time",
            ColumnType::DateTime => "DateTime",
            ColumnType::Json => "JSON",
            ColumnType::Uuid => "UUID",
            ColumnType::Unknown(s) => s,
        }
    }

    /// The Pydantic type name emitted in generated schema classes.
    pub fn pydantic_type(&self) -> &'static str {
        match self {
            ColumnType::String | ColumnType::Text => "str",
            ColumnType::Integer => "int",
            ColumnType::Float => "float",
            ColumnType::Boolean => "bool",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Uuid => "UUID",
            ColumnType::Json => "dict",
            ColumnType::Time | ColumnType::Unknown(_) => "Any",
        }
    }

    /// Whether values of this type are textual (subject to a length bound).
    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnType::String | ColumnType::Text)
    }

    /// Whether this is a recognized member of the closed type set.
    pub fn is_known(&self) -> bool {
        !matches!(self, ColumnType::Unknown(_))
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::String
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        ColumnType::parse(&s)
    }
}

impl From<ColumnType> for String {
    fn from(ty: ColumnType) -> Self {
        ty.as_str().to_string()
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(ColumnType::parse("STRING"), ColumnType::String);
        assert_eq!(ColumnType::parse("string"), ColumnType::String);
        assert_eq!(ColumnType::parse("DateTime"), ColumnType::DateTime);
        assert_eq!(ColumnType::parse("uuid"), ColumnType::Uuid);
        assert_eq!(ColumnType::parse("json"), ColumnType::Json);
    }

    #[test]
    fn test_parse_unknown_preserved() {
        let ty = ColumnType::parse("Geometry");
        assert_eq!(ty, ColumnType::Unknown("Geometry".to_string()));
        assert_eq!(ty.as_str(), "Geometry");
        assert!(!ty.is_known());
    }

    #[test]
    fn test_pydantic_type_mapping() {
        assert_eq!(ColumnType::String.pydantic_type(), "str");
        assert_eq!(ColumnType::Text.pydantic_type(), "str");
        assert_eq!(ColumnType::Integer.pydantic_type(), "int");
        assert_eq!(ColumnType::Boolean.pydantic_type(), "bool");
        assert_eq!(ColumnType::Float.pydantic_type(), "float");
        assert_eq!(ColumnType::DateTime.pydantic_type(), "datetime");
        assert_eq!(ColumnType::Date.pydantic_type(), "date");
        assert_eq!(ColumnType::Uuid.pydantic_type(), "UUID");
        assert_eq!(ColumnType::Json.pydantic_type(), "dict");
        assert_eq!(
            ColumnType::Unknown("Geometry".to_string()).pydantic_type(),
            "Any"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let ty: ColumnType = serde_json::from_str("\"Integer\"").unwrap();
        assert_eq!(ty, ColumnType::Integer);

        let json = serde_json::to_string(&ColumnType::Json).unwrap();
        assert_eq!(json, "\"JSON\"");

        let unknown: ColumnType = serde_json::from_str("\"Geometry\"").unwrap();
        assert_eq!(unknown, ColumnType::Unknown("Geometry".to_string()));
    }

    #[test]
    fn test_is_textual() {
        assert!(ColumnType::String.is_textual());
        assert!(ColumnType::Text.is_textual());
        assert!(!ColumnType::Integer.is_textual());
    }
}
