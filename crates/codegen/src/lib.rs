//! # FastForge Codegen
//!
//! Code generation engine for FastForge.
//!
//! This crate turns a validated entity graph into the source files of a
//! FastAPI backend: Pydantic schemas, CRUD classes, API routers, pytest
//! suites, package `__init__` files, and a `.env` file.
//!
//! ## Features
//!
//! - **Schema Generation**: Pydantic model hierarchy per entity
//! - **CRUD Generation**: repository classes over a generic CRUD base
//! - **Router Generation**: FastAPI endpoint modules with CRUD routes
//! - **Test Generation**: pytest fixtures and suites with synthetic payloads
//! - **Content-Preserving Writes**: marker-delimited custom regions survive
//!   regeneration

// ============================================================================
// Modules
// ============================================================================

pub mod context;
pub mod generator;
pub mod merge;
pub mod naming;
pub mod python;
pub mod resolver;
pub mod values;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::GenerationContext;
pub use generator::{GenerationSummary, Generator, generate, summarize};
pub use merge::{MergeMode, merge_with_existing};
pub use resolver::{FkBinding, SetupStep, check_references, resolve};
pub use values::{ValueGenerator, update_payload};

use forge_core::{ForgeError, ForgeResult};
use std::path::{Path, PathBuf};

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for the code generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Output directory for generated code
    pub output_dir: PathBuf,

    /// Whether to generate pytest suites
    pub generate_tests: bool,

    /// Whether to generate the `.env` file
    pub generate_env: bool,

    /// How to treat existing files whose marker regions cannot be paired
    pub merge_mode: MergeMode,

    /// RNG seed for synthetic values; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./generated"),
            generate_tests: true,
            generate_env: true,
            merge_mode: MergeMode::Preserve,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Disable test generation
    pub fn without_tests(mut self) -> Self {
        self.generate_tests = false;
        self
    }

    /// Disable `.env` generation
    pub fn without_env(mut self) -> Self {
        self.generate_env = false;
        self
    }

    /// Fail regeneration on unpaired marker regions instead of discarding
    /// custom content
    pub fn strict_merge(mut self) -> Self {
        self.merge_mode = MergeMode::Strict;
        self
    }

    /// Seed the synthetic value generator for reproducible output
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

// ============================================================================
// GeneratedFile
// ============================================================================

/// Represents a single generated file
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Relative path from output directory
    pub path: PathBuf,

    /// Generated content; for protected files this is the replaceable middle
    /// section, without markers
    pub body: String,

    /// File type for categorization
    pub file_type: FileType,

    /// Whether the file carries marker regions merged on regeneration
    pub protected: bool,
}

impl GeneratedFile {
    /// Create a generated file written verbatim on every run.
    pub fn plain(path: impl Into<PathBuf>, body: impl Into<String>, file_type: FileType) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
            file_type,
            protected: false,
        }
    }

    /// Create a Python file whose marker regions survive regeneration.
    pub fn protected(path: impl Into<PathBuf>, body: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: body.into(),
            file_type: FileType::Python,
            protected: true,
        }
    }

    /// Create a plain Python source file
    pub fn python(path: impl Into<PathBuf>, body: impl Into<String>) -> Self {
        Self::plain(path, body, FileType::Python)
    }

    /// Create a `.env` file
    pub fn env(path: impl Into<PathBuf>, body: impl Into<String>) -> Self {
        Self::plain(path, body, FileType::Env)
    }

    /// Get the file extension
    pub fn extension(&self) -> &str {
        self.file_type.extension()
    }
}

/// Type of generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Python,
    Env,
    Other,
}

impl FileType {
    /// Get the file extension for this type
    pub fn extension(&self) -> &str {
        match self {
            FileType::Python => "py",
            FileType::Env => "env",
            FileType::Other => "txt",
        }
    }
}

// ============================================================================
// GeneratedProject
// ============================================================================

/// Collection of all generated files for a project
#[derive(Debug, Clone, Default)]
pub struct GeneratedProject {
    /// Project name
    pub name: String,

    /// All generated files
    pub files: Vec<GeneratedFile>,

    /// Warnings generated during code generation
    pub warnings: Vec<String>,
}

impl GeneratedProject {
    /// Create a new generated project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a file to the project
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Get the number of files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get files by type
    pub fn files_by_type(&self, file_type: FileType) -> Vec<&GeneratedFile> {
        self.files
            .iter()
            .filter(|f| f.file_type == file_type)
            .collect()
    }

    /// Write all files to disk, merging protected files with any existing
    /// version found at the target path.
    pub fn write_to_disk(&self, base_dir: impl AsRef<Path>, mode: MergeMode) -> ForgeResult<()> {
        let base_dir = base_dir.as_ref();

        for file in &self.files {
            let full_path = base_dir.join(&file.path);

            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ForgeError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }

            let content = if file.protected {
                let existing = std::fs::read_to_string(&full_path).ok();
                let path_label = file.path.display().to_string();
                merge::merge_with_existing(existing.as_deref(), &file.body, &path_label, mode)?
            } else {
                file.body.clone()
            };

            std::fs::write(&full_path, &content).map_err(|e| ForgeError::FileWrite {
                path: full_path.clone(),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
