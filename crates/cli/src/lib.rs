//! # FastForge CLI
//!
//! Command-line interface for FastForge.
//!
//! This crate provides CLI tools for generating, validating, and inspecting
//! projects from the command line.
//!
//! ## Commands
//!
//! - `generate` - Generate a FastAPI backend from a project file
//! - `validate` - Validate a project file
//! - `info` - Display information about a project
//!

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use forge_codegen::{Generator, GeneratorConfig, summarize};
use forge_core::Validatable;
use forge_ir::{ProjectFile, ProjectGraph};

// Re-export dependencies for use in main.rs
pub use forge_codegen;
pub use forge_core;
pub use forge_ir;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Argument definitions
// ============================================================================

/// Entity-driven scaffolding engine for FastAPI projects.
#[derive(Debug, Parser)]
#[command(name = "fastforge", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a FastAPI backend from a project file
    Generate {
        /// Path to the project JSON file
        project: PathBuf,

        /// Output directory for the generated backend
        #[arg(long, default_value = "./generated")]
        out: PathBuf,

        /// Seed for synthetic test data, for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Fail instead of discarding custom content when marker regions
        /// cannot be paired
        #[arg(long)]
        strict_merge: bool,

        /// Skip pytest suite generation
        #[arg(long)]
        no_tests: bool,

        /// Skip .env generation
        #[arg(long)]
        no_env: bool,
    },

    /// Validate a project file without generating anything
    Validate {
        /// Path to the project JSON file
        project: PathBuf,
    },

    /// Display information about a project file
    Info {
        /// Path to the project JSON file
        project: PathBuf,
    },
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse arguments from the environment and run the selected command.
pub fn run() -> Result<()> {
    Cli::parse().execute()
}

impl Cli {
    /// Run the selected command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Command::Generate {
                project,
                out,
                seed,
                strict_merge,
                no_tests,
                no_env,
            } => cmd_generate(&project, &out, seed, strict_merge, no_tests, no_env),
            Command::Validate { project } => cmd_validate(&project),
            Command::Info { project } => cmd_info(&project),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_generate(
    project: &Path,
    out: &Path,
    seed: Option<u64>,
    strict_merge: bool,
    no_tests: bool,
    no_env: bool,
) -> Result<()> {
    let graph = load_graph(project)?;

    let mut config = GeneratorConfig::new().with_output_dir(out);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if strict_merge {
        config = config.strict_merge();
    }
    if no_tests {
        config = config.without_tests();
    }
    if no_env {
        config = config.without_env();
    }
    let merge_mode = config.merge_mode;

    let output = Generator::new(config).generate(&graph)?;
    output
        .write_to_disk(out, merge_mode)
        .with_context(|| format!("failed to write generated files to '{}'", out.display()))?;

    let summary = summarize(&output);
    println!(
        "{} Generated {} files for '{}' in {}",
        "✔".green().bold(),
        summary.total_files,
        summary.project_name.bold(),
        out.display()
    );
    for warning in &summary.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }

    Ok(())
}

fn cmd_validate(project: &Path) -> Result<()> {
    let graph = load_graph(project)?;

    match graph.validate() {
        Ok(()) => {
            println!(
                "{} '{}' is valid ({} entities)",
                "✔".green().bold(),
                graph.name.bold(),
                graph.entity_count()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {e}", "✘".red().bold());
            bail!("project '{}' failed validation", graph.name)
        }
    }
}

fn cmd_info(project: &Path) -> Result<()> {
    let graph = load_graph(project)?;

    println!("{}: {}", "Project".bold(), graph.name);
    println!(
        "{}: {}",
        "Authentication".bold(),
        if graph.options.use_authentication {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("{}: {}", "Entities".bold(), graph.entity_count());

    for entity in graph.entities() {
        let foreign = entity.foreign_attributes();
        let refs = if foreign.is_empty() {
            String::new()
        } else {
            let targets: Vec<&str> = foreign
                .iter()
                .filter_map(|a| a.foreign_key_class.as_deref())
                .collect();
            format!(" -> {}", targets.join(", "))
        };
        println!(
            "  {} ({} attributes){}",
            entity.name.cyan(),
            entity.attribute_count(),
            refs
        );
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn load_graph(path: &Path) -> Result<ProjectGraph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read project file '{}'", path.display()))?;
    let file = ProjectFile::from_json(&text)?;
    Ok(file.into_graph()?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT_JSON: &str = r#"{
        "name": "blog",
        "options": { "env": { "mysql_database": "blog" } },
        "entities": [
            {
                "name": "Role",
                "attributes": [
                    {"name": "name", "type": "String", "length": 100}
                ]
            },
            {
                "name": "User",
                "attributes": [
                    {"name": "last_name", "type": "String"},
                    {
                        "name": "role_id",
                        "type": "Integer",
                        "is_foreign": true,
                        "foreign_key_class": "Role"
                    }
                ]
            }
        ]
    }"#;

    fn write_project(dir: &Path) -> PathBuf {
        let path = dir.join("project.json");
        std::fs::write(&path, PROJECT_JSON).unwrap();
        path
    }

    #[test]
    fn test_parse_generate_args() {
        let cli = Cli::try_parse_from([
            "fastforge",
            "generate",
            "project.json",
            "--out",
            "/tmp/api",
            "--seed",
            "7",
            "--strict-merge",
        ])
        .unwrap();

        match cli.command {
            Command::Generate {
                project,
                out,
                seed,
                strict_merge,
                no_tests,
                no_env,
            } => {
                assert_eq!(project, PathBuf::from("project.json"));
                assert_eq!(out, PathBuf::from("/tmp/api"));
                assert_eq!(seed, Some(7));
                assert!(strict_merge);
                assert!(!no_tests);
                assert!(!no_env);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_generate_command_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let project = write_project(dir.path());
        let out = dir.path().join("api");

        cmd_generate(&project, &out, Some(1), false, false, false).unwrap();

        assert!(out.join("app/schemas/user.py").exists());
        assert!(out.join("app/crud/crud_role.py").exists());
        assert!(out.join("tests/test_user_api.py").exists());
        assert!(out.join(".env").exists());

        // Entity-owned modules carry marker regions on disk
        let schema = std::fs::read_to_string(out.join("app/schemas/user.py")).unwrap();
        assert!(schema.starts_with("# begin #"));
        let crud = std::fs::read_to_string(out.join("app/crud/crud_role.py")).unwrap();
        assert!(crud.starts_with("# begin #"));
    }

    #[test]
    fn test_validate_command() {
        let dir = tempfile::tempdir().unwrap();
        let project = write_project(dir.path());

        assert!(cmd_validate(&project).is_ok());
    }

    #[test]
    fn test_validate_rejects_unresolved_reference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(
            &path,
            r#"{
                "name": "broken",
                "entities": [
                    {
                        "name": "Order",
                        "attributes": [
                            {
                                "name": "customer_id",
                                "type": "Integer",
                                "is_foreign": true,
                                "foreign_key_class": "Customer"
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert!(cmd_validate(&path).is_err());
    }

    #[test]
    fn test_missing_project_file() {
        let err = load_graph(Path::new("/nonexistent/project.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_info_command() {
        let dir = tempfile::tempdir().unwrap();
        let project = write_project(dir.path());
        assert!(cmd_info(&project).is_ok());
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
