//! Package `__init__.py` emission
//!
//! Re-export aggregators for the `schemas`, `models`, and `crud` packages,
//! derived from the entity list rather than a directory scan so output is
//! stable across runs.

use forge_ir::Entity;

use crate::naming::camel_to_snake;

/// Which package an `__init__.py` belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    Schemas,
    Models,
    Crud,
}

/// Emit an `__init__.py` body re-exporting every entity's classes.
pub fn emit_init<'a>(entities: impl Iterator<Item = &'a Entity>, kind: PackageKind) -> String {
    let mut lines = Vec::new();

    for entity in entities {
        let module = camel_to_snake(&entity.name);
        let class_name = &entity.name;
        match kind {
            PackageKind::Schemas => lines.push(format!(
                "from .{module} import ( \n  {class_name},  \n  {class_name}Create,  \n  {class_name}Update,  \n  Response{class_name}\n)"
            )),
            PackageKind::Models => {
                lines.push(format!("from .{module} import {class_name}"))
            }
            PackageKind::Crud => {
                lines.push(format!("from .crud_{module} import {module}"))
            }
        }
    }

    lines.join("\n") + "\n"
}

// ============================================================================
// Tests
// ============================================================================
