//! Foreign-key dependency resolution
//!
//! For a target entity, computes the ordered chain of creation steps needed
//! to satisfy its foreign-key constraints: every referenced parent (and
//! grandparent, transitively) is created before the entity that references
//! it, and an entity shared by several references is created exactly once.
//!
//! The walk is a post-order depth-first traversal over foreign-key
//! attributes with a created-set threaded through the whole recursion, plus
//! a recursion-stack check that rejects cyclic reference graphs instead of
//! recursing forever.

use crate::naming::camel_to_snake;
use crate::values::ValueGenerator;
use forge_core::{ForgeError, ForgeResult};
use forge_ir::{Entity, ProjectGraph};
use serde_json::{Map, Value};
use std::collections::HashSet;

// ============================================================================
// SetupStep
// ============================================================================

/// Binding of a foreign-key attribute to the identifier of a previously
/// created parent record.
#[derive(Debug, Clone, PartialEq)]
pub struct FkBinding {
    /// The foreign-key attribute on the entity being created
    pub attribute: String,

    /// Variable name of the created parent record (snake_case entity name)
    pub parent_var: String,
}

/// One creation action in a dependency chain.
#[derive(Debug, Clone)]
pub struct SetupStep {
    /// Entity to create
    pub entity: String,

    /// Variable name for the created record (snake_case entity name)
    pub var_name: String,

    /// Create payload: one synthetic value per required non-auto-increment
    /// attribute. Foreign-key entries hold placeholders that emission
    /// replaces using `fk_bindings`.
    pub payload: Map<String, Value>,

    /// Foreign-key attributes bound to parent identifiers
    pub fk_bindings: Vec<FkBinding>,
}

impl SetupStep {
    /// Whether this step depends on any previously created record.
    pub fn has_parents(&self) -> bool {
        !self.fk_bindings.is_empty()
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the dependency chain for `entity`.
///
/// Returns creation steps ordered parents-first, ending with the target
/// entity itself. For any step in the chain, every entity referenced by its
/// foreign-key attributes appears strictly earlier.
///
/// # Errors
///
/// - [`ForgeError::UnresolvedForeignKey`] if a foreign-key attribute names
///   an entity missing from the graph.
/// - [`ForgeError::CyclicReference`] if the reference graph contains a cycle.
pub fn resolve(
    entity: &Entity,
    graph: &ProjectGraph,
    values: &mut ValueGenerator,
) -> ForgeResult<Vec<SetupStep>> {
    let mut steps = Vec::new();
    let mut created = HashSet::new();
    let mut stack = Vec::new();

    visit(entity, graph, values, &mut created, &mut stack, &mut steps)?;

    tracing::debug!(
        entity = %entity.name,
        chain_len = steps.len(),
        "resolved dependency chain",
    );

    Ok(steps)
}

/// Check that `entity`'s transitive reference closure resolves: every
/// foreign-key attribute names an entity present in the graph, and the
/// reference graph below the entity is acyclic.
///
/// Same walk as [`resolve`] without drawing any synthetic values, so the
/// orchestrator can reject an entity before emitting any of its files.
pub fn check_references(entity: &Entity, graph: &ProjectGraph) -> ForgeResult<()> {
    fn walk(
        entity: &Entity,
        graph: &ProjectGraph,
        visited: &mut HashSet<String>,
        stack: &mut Vec<String>,
    ) -> ForgeResult<()> {
        if stack.iter().any(|name| name == &entity.name) {
            let mut cycle = stack.clone();
            cycle.push(entity.name.clone());
            return Err(ForgeError::cyclic_reference(&cycle));
        }
        stack.push(entity.name.clone());

        for attr in entity.foreign_attributes() {
            let target = attr.foreign_key_class.as_deref().unwrap_or_default();
            let parent = graph
                .get_entity(target)
                .ok_or_else(|| ForgeError::unresolved_fk(&entity.name, &attr.name, target))?;

            if !visited.contains(&parent.name) {
                walk(parent, graph, visited, stack)?;
            }
        }

        stack.pop();
        visited.insert(entity.name.clone());
        Ok(())
    }

    walk(entity, graph, &mut HashSet::new(), &mut Vec::new())
}

fn visit(
    entity: &Entity,
    graph: &ProjectGraph,
    values: &mut ValueGenerator,
    created: &mut HashSet<String>,
    stack: &mut Vec<String>,
    steps: &mut Vec<SetupStep>,
) -> ForgeResult<()> {
    if stack.iter().any(|name| name == &entity.name) {
        let mut cycle = stack.clone();
        cycle.push(entity.name.clone());
        return Err(ForgeError::cyclic_reference(&cycle));
    }
    stack.push(entity.name.clone());

    // Ancestors before descendants: recurse into each referenced entity
    // first, skipping any parent another branch already created.
    let mut fk_bindings = Vec::new();
    for attr in entity.foreign_attributes() {
        let target = attr.foreign_key_class.as_deref().unwrap_or_default();
        let parent = graph
            .get_entity(target)
            .ok_or_else(|| ForgeError::unresolved_fk(&entity.name, &attr.name, target))?;

        if !created.contains(&parent.name) {
            visit(parent, graph, values, created, stack, steps)?;
        }

        fk_bindings.push(FkBinding {
            attribute: attr.name.clone(),
            parent_var: camel_to_snake(&parent.name),
        });
    }

    stack.pop();

    steps.push(SetupStep {
        entity: entity.name.clone(),
        var_name: camel_to_snake(&entity.name),
        payload: values.required_payload(&entity.attributes),
        fk_bindings,
    });
    created.insert(entity.name.clone());

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
