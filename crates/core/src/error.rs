//! Error types for FastForge
//!
//! This module provides unified error handling across the entire engine,
//! including validation errors, reference errors, merge errors, and IO errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for FastForge
#[derive(Debug, Error)]
pub enum ForgeError {
    // ========================================================================
    // Validation Errors (schema errors — fatal for the whole run)
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity validation failed
    #[error("Entity validation failed for '{entity}': {message}")]
    EntityValidation { entity: String, message: String },

    /// Attribute validation failed
    #[error("Attribute validation failed for '{entity}.{attribute}': {message}")]
    AttributeValidation {
        entity: String,
        attribute: String,
        message: String,
    },

    // ========================================================================
    // Reference Errors (fatal per entity)
    // ========================================================================
    /// Entity not found in the project graph
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// A foreign-key attribute points at an entity that does not exist
    #[error(
        "Unresolved foreign key: '{entity}.{attribute}' references unknown entity '{target}'"
    )]
    UnresolvedForeignKey {
        entity: String,
        attribute: String,
        target: String,
    },

    /// The foreign-key reference graph contains a cycle
    #[error("Cyclic foreign-key reference detected: {cycle}")]
    CyclicReference { cycle: String },

    // ========================================================================
    // Duplicate Errors
    // ========================================================================
    /// Duplicate entity name
    #[error("Duplicate entity name: '{0}' already exists")]
    DuplicateEntity(String),

    /// Duplicate attribute name
    #[error("Duplicate attribute name: '{attribute}' already exists in entity '{entity}'")]
    DuplicateAttribute { entity: String, attribute: String },

    // ========================================================================
    // Code Generation Errors
    // ========================================================================
    /// Code generation failed
    #[error("Code generation failed: {0}")]
    CodeGeneration(String),

    /// Strict merge refused to discard existing customizations
    #[error("Merge ambiguity in '{path}': found {regions} marker regions, expected 2")]
    MergeAmbiguity { path: PathBuf, regions: usize },

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Invalid project file format
    #[error("Invalid project file format: {0}")]
    InvalidProjectFormat(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl ForgeError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        ForgeError::Validation(msg.into())
    }

    /// Create an entity validation error
    pub fn entity_validation(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        ForgeError::EntityValidation {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    /// Create an attribute validation error
    pub fn attribute_validation(
        entity: impl Into<String>,
        attribute: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        ForgeError::AttributeValidation {
            entity: entity.into(),
            attribute: attribute.into(),
            message: msg.into(),
        }
    }

    /// Create an unresolved foreign key error
    pub fn unresolved_fk(
        entity: impl Into<String>,
        attribute: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        ForgeError::UnresolvedForeignKey {
            entity: entity.into(),
            attribute: attribute.into(),
            target: target.into(),
        }
    }

    /// Create a cyclic reference error from the entities on the recursion stack
    pub fn cyclic_reference(stack: &[String]) -> Self {
        ForgeError::CyclicReference {
            cycle: stack.join(" -> "),
        }
    }

    /// Create a code generation error
    pub fn codegen(msg: impl Into<String>) -> Self {
        ForgeError::CodeGeneration(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        ForgeError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        ForgeError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ForgeError::Validation(_)
                | ForgeError::EntityValidation { .. }
                | ForgeError::AttributeValidation { .. }
        )
    }

    /// Check if this error is a reference error
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            ForgeError::EntityNotFound(_)
                | ForgeError::UnresolvedForeignKey { .. }
                | ForgeError::CyclicReference { .. }
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ForgeError::Io(_) | ForgeError::FileWrite { .. } | ForgeError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using ForgeError
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> ForgeResult<T>;
}

impl<T, E: Into<ForgeError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> ForgeResult<T> {
        self.map_err(|e| {
            let err: ForgeError = e.into();
            ForgeError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
