//! # Code Generator Orchestrator
//!
//! The `Generator` is the top-level entry point for code generation. It takes
//! a [`ProjectGraph`] and a [`GeneratorConfig`], builds a
//! [`GenerationContext`], and delegates to the Python emitters to produce a
//! complete [`GeneratedProject`].
//!
//! ## Pipeline
//!
//! ```text
//! ProjectGraph + GeneratorConfig
//!         │
//!         ▼
//!   GenerationContext::from_graph()
//!         │
//!         ├──► per entity: schema, CRUD, router, test suites
//!         ├──► apis.py, package __init__ files, .env
//!         │
//!         ▼
//!   GeneratedProject { files, warnings }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forge_codegen::{Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig::default().with_seed(42);
//! let result = Generator::new(config).generate(&graph)?;
//!
//! println!("Generated {} files", result.file_count());
//! result.write_to_disk("/path/to/output", MergeMode::Preserve)?;
//! ```

use forge_core::{ForgeResult, Validatable};
use forge_ir::{Entity, ProjectGraph};
use serde::Serialize;

use crate::context::GenerationContext;
use crate::python::init_files::PackageKind;
use crate::python::{crud, env, init_files, routes, schemas, tests_gen};
use crate::resolver;
use crate::{GeneratedFile, GeneratedProject, GeneratorConfig};

// ============================================================================
// Generator
// ============================================================================

/// Top-level code generator that orchestrates the full generation pipeline.
///
/// The `Generator` is stateless aside from its configuration. Call
/// [`generate`](Generator::generate) with an entity graph to produce a
/// [`GeneratedProject`] containing every file that should be written to disk.
#[derive(Debug, Clone)]
pub struct Generator {
    /// Configuration controlling output behaviour (output dir, flags, seed).
    config: GeneratorConfig,
}

impl Generator {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Create a new generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(GeneratorConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: GeneratorConfig) {
        self.config = config;
    }

    // ====================================================================
    // Generation
    // ====================================================================

    /// Run the full code-generation pipeline on an entity graph.
    ///
    /// # Steps
    ///
    /// 1. **Check references per entity**. An entity whose foreign keys do
    ///    not resolve (missing target or reference cycle) is dropped whole:
    ///    none of its files are emitted, a warning is recorded, and it is
    ///    left out of the aggregator files. Other entities are unaffected.
    /// 2. **Generate per-entity files**: Pydantic schema module, CRUD
    ///    module, endpoint router, and — unless disabled — the two pytest
    ///    suites.
    /// 3. **Generate project files**: the `apis.py` router aggregator, the
    ///    package `__init__` files, and the `.env` file.
    ///
    /// # Errors
    ///
    /// Entity-level schema errors surface when the graph is built and cannot
    /// reach this point; reference problems only record warnings.
    pub fn generate(&self, graph: &ProjectGraph) -> ForgeResult<GeneratedProject> {
        let mut ctx = GenerationContext::from_graph(graph, self.config.clone());
        let mut output = GeneratedProject::new(graph.name.clone());

        if let Err(e) = graph.validate() {
            tracing::warn!("project validation warning: {e}");
            output.add_warning(e.to_string());
        }

        // ── per-entity files ─────────────────────────────────────────────
        let mut emitted: Vec<&Entity> = Vec::new();
        for entity in graph.entities() {
            if let Err(e) = resolver::check_references(entity, graph) {
                tracing::warn!(entity = %entity.name, "dropping entity: {e}");
                output.add_warning(format!("dropped entity '{}': {e}", entity.name));
                continue;
            }

            let module = GenerationContext::module_name(entity);
            tracing::info!(entity = %entity.name, "generating entity files");

            output.add_file(GeneratedFile::protected(
                format!("app/schemas/{module}.py"),
                schemas::emit_schema(entity),
            ));

            output.add_file(GeneratedFile::protected(
                format!("app/crud/crud_{module}.py"),
                crud::emit_crud(entity),
            ));

            output.add_file(GeneratedFile::protected(
                format!("app/api/api_v1/endpoints/{module}s.py"),
                routes::emit_router(entity, ctx.use_authentication()),
            ));

            if self.config.generate_tests {
                output.add_file(GeneratedFile::protected(
                    format!("tests/test_crud_{module}.py"),
                    tests_gen::emit_crud_tests(entity, &mut ctx.values),
                ));

                let use_auth = graph.options.use_authentication;
                let body = tests_gen::emit_api_tests(entity, graph, &mut ctx.values, use_auth)?;
                output.add_file(GeneratedFile::protected(
                    format!("tests/test_{module}_api.py"),
                    body,
                ));
            }

            emitted.push(entity);
        }

        // ── project files ────────────────────────────────────────────────
        output.add_file(GeneratedFile::python(
            "app/api/api_v1/apis.py",
            routes::emit_api_router(emitted.iter().copied()),
        ));

        output.add_file(GeneratedFile::python(
            "app/schemas/__init__.py",
            init_files::emit_init(emitted.iter().copied(), PackageKind::Schemas),
        ));
        output.add_file(GeneratedFile::python(
            "app/models/__init__.py",
            init_files::emit_init(emitted.iter().copied(), PackageKind::Models),
        ));
        output.add_file(GeneratedFile::python(
            "app/crud/__init__.py",
            init_files::emit_init(emitted.iter().copied(), PackageKind::Crud),
        ));

        if self.config.generate_env && !graph.options.env.is_empty() {
            output.add_file(GeneratedFile::env(".env", env::emit_env(&graph.options.env)));
        }

        tracing::info!(
            files = output.file_count(),
            warnings = output.warnings.len(),
            "generation complete",
        );

        Ok(output)
    }
}

/// Generate with default configuration.
pub fn generate(graph: &ProjectGraph) -> ForgeResult<GeneratedProject> {
    Generator::with_defaults().generate(graph)
}

// ============================================================================
// GenerationSummary
// ============================================================================

/// Compact description of a generation run, for CLI output.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    /// Project name
    pub project_name: String,

    /// Total number of generated files
    pub total_files: usize,

    /// Number of generated Python files
    pub python_files: usize,

    /// Number of generated test files
    pub test_files: usize,

    /// Warnings recorded during generation
    pub warnings: Vec<String>,
}

/// Summarize a generated project.
pub fn summarize(output: &GeneratedProject) -> GenerationSummary {
    GenerationSummary {
        project_name: output.name.clone(),
        total_files: output.file_count(),
        python_files: output.files_by_type(crate::FileType::Python).len(),
        test_files: output
            .files
            .iter()
            .filter(|f| f.path.starts_with("tests"))
            .count(),
        warnings: output.warnings.clone(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::ColumnType;
    use forge_ir::{Attribute, Entity, GenerationOptions};

    fn sample_graph() -> ProjectGraph {
        let role = Entity::new("Role").with_attribute(Attribute::new("name", ColumnType::String));
        let user = Entity::new("User")
            .with_attribute(Attribute::new("last_name", ColumnType::String))
            .with_attribute(Attribute::foreign_key("role_id", "Role"));
        ProjectGraph::build(
            "blog",
            GenerationOptions::new().with_env("mysql_database", "blog"),
            vec![role, user],
        )
        .unwrap()
    }

    fn paths(output: &GeneratedProject) -> Vec<String> {
        output
            .files
            .iter()
            .map(|f| f.path.display().to_string())
            .collect()
    }

    fn body_of<'a>(output: &'a GeneratedProject, path: &str) -> &'a str {
        &output
            .files
            .iter()
            .find(|f| f.path.display().to_string() == path)
            .unwrap_or_else(|| panic!("missing {path}"))
            .body
    }

    #[test]
    fn test_full_pipeline_file_set() {
        let output = generate(&sample_graph()).unwrap();
        let paths = paths(&output);

        for expected in [
            "app/schemas/role.py",
            "app/schemas/user.py",
            "app/crud/crud_role.py",
            "app/crud/crud_user.py",
            "app/api/api_v1/endpoints/roles.py",
            "app/api/api_v1/endpoints/users.py",
            "app/api/api_v1/apis.py",
            "app/schemas/__init__.py",
            "app/models/__init__.py",
            "app/crud/__init__.py",
            "tests/test_crud_role.py",
            "tests/test_crud_user.py",
            "tests/test_role_api.py",
            "tests/test_user_api.py",
            ".env",
        ] {
            assert!(paths.contains(&expected.to_string()), "missing {expected}");
        }
        assert!(!output.has_warnings());
    }

    #[test]
    fn test_without_tests_flag() {
        let generator = Generator::new(GeneratorConfig::new().without_tests());
        let output = generator.generate(&sample_graph()).unwrap();

        assert!(!paths(&output).iter().any(|p| p.starts_with("tests")));
    }

    #[test]
    fn test_failed_entity_emits_no_files() {
        // Order references a Customer that is not in the graph: none of
        // Order's files may be written, and the aggregators must leave it
        // out. Role is unaffected.
        let role = Entity::new("Role").with_attribute(Attribute::new("name", ColumnType::String));
        let order = Entity::new("Order")
            .with_attribute(Attribute::new("total", ColumnType::Float))
            .with_attribute(Attribute::foreign_key("customer_id", "Customer"));
        let graph =
            ProjectGraph::build("shop", GenerationOptions::new(), vec![role, order]).unwrap();

        let output = generate(&graph).unwrap();
        let paths = paths(&output);

        assert!(output.has_warnings());
        assert!(output.warnings.iter().any(|w| w.contains("Order")));

        let order_files: Vec<&String> =
            paths.iter().filter(|p| p.contains("order")).collect();
        assert!(
            order_files.is_empty(),
            "files emitted for failed entity: {order_files:?}"
        );

        // Aggregators only reference surviving entities
        let apis = body_of(&output, "app/api/api_v1/apis.py");
        assert!(apis.contains("roles"));
        assert!(!apis.contains("orders"));
        let schemas_init = body_of(&output, "app/schemas/__init__.py");
        assert!(!schemas_init.contains("order"));

        // Role is unaffected
        assert!(paths.contains(&"app/schemas/role.py".to_string()));
        assert!(paths.contains(&"tests/test_role_api.py".to_string()));
    }

    #[test]
    fn test_cyclic_entities_are_dropped() {
        let a = Entity::new("A")
            .with_attribute(Attribute::new("name", ColumnType::String))
            .with_attribute(Attribute::foreign_key("b_id", "B"));
        let b = Entity::new("B")
            .with_attribute(Attribute::new("name", ColumnType::String))
            .with_attribute(Attribute::foreign_key("a_id", "A"));
        let lone = Entity::new("Lone").with_attribute(Attribute::new("name", ColumnType::String));
        let graph =
            ProjectGraph::build("shop", GenerationOptions::new(), vec![a, b, lone]).unwrap();

        let output = generate(&graph).unwrap();
        let paths = paths(&output);

        assert_eq!(output.warnings.len(), 2);
        assert!(!paths.contains(&"app/schemas/a.py".to_string()));
        assert!(!paths.contains(&"app/schemas/b.py".to_string()));
        assert!(paths.contains(&"app/schemas/lone.py".to_string()));
    }

    #[test]
    fn test_entity_modules_are_protected() {
        let output = generate(&sample_graph()).unwrap();

        for file in &output.files {
            let path = file.path.display().to_string();
            let expect_protected = (path.starts_with("app/schemas/")
                && !path.ends_with("__init__.py"))
                || path.starts_with("app/crud/crud_")
                || path.starts_with("app/api/api_v1/endpoints/")
                || path.starts_with("tests/");
            assert_eq!(
                file.protected, expect_protected,
                "wrong protection for {path}"
            );
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let graph = sample_graph();
        let config = GeneratorConfig::new().with_seed(42);

        let a = Generator::new(config.clone()).generate(&graph).unwrap();
        let b = Generator::new(config).generate(&graph).unwrap();

        assert_eq!(a.file_count(), b.file_count());
        for (fa, fb) in a.files.iter().zip(&b.files) {
            assert_eq!(fa.path, fb.path);
            assert_eq!(fa.body, fb.body, "mismatch in {}", fa.path.display());
        }
    }

    #[test]
    fn test_env_file_toggle() {
        let generator = Generator::new(GeneratorConfig::new().without_env());
        let output = generator.generate(&sample_graph()).unwrap();
        assert!(!paths(&output).contains(&".env".to_string()));
    }

    #[test]
    fn test_summary() {
        let output = generate(&sample_graph()).unwrap();
        let summary = summarize(&output);

        assert_eq!(summary.project_name, "blog");
        assert_eq!(summary.total_files, output.file_count());
        assert_eq!(summary.test_files, 4);
        assert!(summary.python_files >= 10);
    }
}
