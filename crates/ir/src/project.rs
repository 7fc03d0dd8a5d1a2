//! Project definitions for FastForge
//!
//! This module contains the root project structures: [`ProjectGraph`], the
//! name-keyed entity lookup built once per generation run, plus
//! [`GenerationOptions`] and the on-disk [`ProjectFile`] format.

use crate::Entity;
use forge_core::{ForgeError, ForgeResult, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// GenerationOptions
// ============================================================================

/// Project-level options supplied alongside the entity definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Whether generated tests should include authentication setup
    /// (user creation + bearer token on every request).
    #[serde(default)]
    pub use_authentication: bool,

    /// Key/value pairs emitted into the generated `.env` file.
    /// Keys are uppercased on emission; a sorted map keeps output stable.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl GenerationOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable authentication setup in generated tests.
    pub fn with_authentication(mut self) -> Self {
        self.use_authentication = true;
        self
    }

    /// Add an environment variable for the `.env` emitter.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// ProjectGraph
// ============================================================================

/// The entity graph for one generation run.
///
/// Built once from a supplied list of entities, immutable for the duration of
/// the run, and discarded afterwards. Entity insertion order is preserved for
/// output ordering; lookup is by entity name.
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    /// Project name
    pub name: String,

    /// Project-level options
    pub options: GenerationOptions,

    /// Entities in insertion order
    entities: Vec<Entity>,

    /// Lookup: entity name → index into `entities`
    index: HashMap<String, usize>,
}

impl ProjectGraph {
    /// Build a graph from a list of entity definitions.
    ///
    /// Fails with [`ForgeError::DuplicateEntity`] if two entities share a
    /// name, or with a validation error if any entity fails basic schema
    /// constraints (empty name, invalid attribute, duplicate attribute).
    pub fn build(
        name: impl Into<String>,
        options: GenerationOptions,
        entities: Vec<Entity>,
    ) -> ForgeResult<Self> {
        let mut index = HashMap::with_capacity(entities.len());

        for (i, entity) in entities.iter().enumerate() {
            entity.validate()?;
            if index.insert(entity.name.clone(), i).is_some() {
                return Err(ForgeError::DuplicateEntity(entity.name.clone()));
            }
        }

        Ok(Self {
            name: name.into(),
            options,
            entities,
            index,
        })
    }

    // ========================================================================
    // Entity lookup
    // ========================================================================

    /// Get an entity by name.
    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.index.get(name).map(|&i| &self.entities[i])
    }

    /// Get an entity by name, or a reference error naming the missing entity.
    pub fn require_entity(&self, name: &str) -> ForgeResult<&Entity> {
        self.get_entity(name)
            .ok_or_else(|| ForgeError::EntityNotFound(name.to_string()))
    }

    /// Iterate entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Get the number of entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Check if the graph has no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Validatable for ProjectGraph {
    /// Validate cross-entity invariants: every foreign-key attribute must
    /// reference an entity that exists in this graph. Fails closed with the
    /// offending entity and the missing reference.
    fn validate(&self) -> ForgeResult<()> {
        for entity in &self.entities {
            for attr in entity.foreign_attributes() {
                let target = attr.foreign_key_class.as_deref().unwrap_or_default();
                if self.get_entity(target).is_none() {
                    return Err(ForgeError::unresolved_fk(&entity.name, &attr.name, target));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// ProjectFile — on-disk input format
// ============================================================================

/// The JSON project file consumed by the CLI.
///
/// ```json
/// {
///     "name": "blog",
///     "options": { "use_authentication": true },
///     "entities": [
///         { "name": "Role", "attributes": [ ... ] }
///     ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Project name
    pub name: String,

    /// Project-level options
    #[serde(default)]
    pub options: GenerationOptions,

    /// Entity definitions, in generation order
    pub entities: Vec<Entity>,
}

impl ProjectFile {
    /// Parse a project file from JSON text.
    pub fn from_json(json: &str) -> ForgeResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ForgeError::InvalidProjectFormat(e.to_string()))
    }

    /// Build the validated entity graph for this project.
    pub fn into_graph(self) -> ForgeResult<ProjectGraph> {
        ProjectGraph::build(self.name, self.options, self.entities)
    }
}

// ============================================================================
// Tests
// ============================================================================
