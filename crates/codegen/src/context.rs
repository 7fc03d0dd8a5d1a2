//! # Generation Context
//!
//! The `GenerationContext` holds everything the Python emitters need to
//! produce output files. It is built once per run from a [`ProjectGraph`] and
//! provides:
//!
//! - Project metadata (name, authentication flag, env variables)
//! - Entities in declaration order
//! - Derived names per entity (module file name, class name)
//! - The shared synthetic value generator, seeded when the config asks for
//!   reproducible output

use forge_ir::{Entity, GenerationOptions, ProjectGraph};

use crate::GeneratorConfig;
use crate::naming::camel_to_snake;
use crate::values::ValueGenerator;

// ============================================================================
// GenerationContext
// ============================================================================

/// Context carrying all information needed for code generation.
///
/// Built once from a `ProjectGraph` and shared (by reference) with every
/// individual emitter module. The value generator is the one mutable piece:
/// all synthetic values of a run are drawn from a single RNG stream so a
/// seeded run is reproducible end to end.
#[derive(Debug)]
pub struct GenerationContext {
    /// The validated entity graph
    graph: ProjectGraph,

    /// Generator configuration (output dir, flags, seed)
    pub config: GeneratorConfig,

    /// Synthetic value source for fixtures and payloads
    pub values: ValueGenerator,
}

impl GenerationContext {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Build a `GenerationContext` from an entity graph and generator config.
    pub fn from_graph(graph: &ProjectGraph, config: GeneratorConfig) -> Self {
        let values = match config.seed {
            Some(seed) => ValueGenerator::with_seed(seed),
            None => ValueGenerator::new(),
        };

        Self {
            graph: graph.clone(),
            config,
            values,
        }
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    /// The entity graph.
    pub fn graph(&self) -> &ProjectGraph {
        &self.graph
    }

    /// Project name.
    pub fn project_name(&self) -> &str {
        &self.graph.name
    }

    /// Project-level options.
    pub fn options(&self) -> &GenerationOptions {
        &self.graph.options
    }

    /// Whether generated tests carry authentication setup.
    pub fn use_authentication(&self) -> bool {
        self.graph.options.use_authentication
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.graph.entities()
    }

    // ====================================================================
    // Derived names
    // ====================================================================

    /// Module file stem for an entity: `"BlogPost"` → `"blog_post"`.
    pub fn module_name(entity: &Entity) -> String {
        camel_to_snake(&entity.name)
    }
}

// ============================================================================
// Tests
// ============================================================================
