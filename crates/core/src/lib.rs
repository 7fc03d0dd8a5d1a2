//! # Forge Core
//!
//! Core types, traits, and error handling for FastForge.
//!
//! This crate provides the foundational building blocks used throughout
//! the FastForge ecosystem, including:
//!
//! - **Types**: the `ColumnType` attribute type set
//! - **Traits**: common behaviors like `Validatable`
//! - **Errors**: unified error handling with `ForgeError` and `ForgeResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ForgeError, ForgeResult, ResultExt};
pub use traits::Validatable;
pub use types::ColumnType;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
