//! # Forge IR
//!
//! Intermediate representation for FastForge.
//!
//! This crate holds the in-memory model that drives every generator:
//!
//! - [`Attribute`] — a single typed column/field descriptor with constraint flags
//! - [`Entity`] — a named, ordered collection of attributes
//! - [`ProjectGraph`] — the name-keyed entity lookup built once per generation
//!   run, plus project-level [`GenerationOptions`]
//!
//! The graph is supplied wholesale at the start of a run (typically from a
//! project JSON file), validated up front, and discarded when the run ends.

pub mod attribute;
pub mod entity;
pub mod project;

pub use attribute::Attribute;
pub use entity::Entity;
pub use project::{GenerationOptions, ProjectFile, ProjectGraph};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
