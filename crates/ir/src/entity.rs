//! Entity definitions for data models
//!
//! This module contains the `Entity` struct: a named, ordered collection of
//! attributes describing one data record type (maps to a database table).

use crate::attribute::{Attribute, is_valid_identifier};
use forge_core::{ForgeError, ForgeResult, Validatable};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entity
// ============================================================================

/// Represents a data entity (maps to a database table).
///
/// Attribute order is preserved: it determines the field order in generated
/// schemas and payloads, though it does not affect correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity name (PascalCase, e.g. "User", "BlogPost"); unique per project
    pub name: String,

    /// Ordered attributes (columns) of this entity
    pub attributes: Vec<Attribute>,
}

impl Entity {
    /// Create a new entity with the given name and no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Add an attribute using the builder pattern.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add an attribute.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Get an attribute by name.
    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check if the entity has an attribute with the given name.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Get the primary key attribute, if declared.
    pub fn primary_key(&self) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_primary)
    }

    /// Get all required attributes.
    pub fn required_attributes(&self) -> Vec<&Attribute> {
        self.attributes.iter().filter(|a| a.is_required).collect()
    }

    /// Get all foreign key attributes.
    pub fn foreign_attributes(&self) -> Vec<&Attribute> {
        self.attributes.iter().filter(|a| a.is_foreign).collect()
    }

    /// Whether this entity references any other entity.
    pub fn has_foreign_keys(&self) -> bool {
        self.attributes.iter().any(|a| a.is_foreign)
    }

    /// Get the number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

impl Validatable for Entity {
    fn validate(&self) -> ForgeResult<()> {
        if self.name.is_empty() {
            return Err(ForgeError::entity_validation(
                &self.name,
                "Entity name cannot be empty",
            ));
        }

        if !is_valid_identifier(&self.name) {
            return Err(ForgeError::entity_validation(
                &self.name,
                format!("Entity name '{}' is not a valid identifier", self.name),
            ));
        }

        if self.attributes.is_empty() {
            return Err(ForgeError::entity_validation(
                &self.name,
                "Entity must have at least one attribute",
            ));
        }

        // Validate all attributes
        for attribute in &self.attributes {
            attribute.validate().map_err(|e| {
                ForgeError::attribute_validation(&self.name, &attribute.name, e.to_string())
            })?;
        }

        // Check for duplicate attribute names
        let mut seen = std::collections::HashSet::new();
        for attribute in &self.attributes {
            if !seen.insert(&attribute.name) {
                return Err(ForgeError::DuplicateAttribute {
                    entity: self.name.clone(),
                    attribute: attribute.name.clone(),
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
