//! Pydantic schema emission
//!
//! One schema module per entity with the full class hierarchy:
//!
//! - `<Name>Base` — every column optional, for partial payloads
//! - `<Name>Create` — required columns mandatory
//! - `<Name>Update` — alias of the base class
//! - `<Name>InDBBase` — adds `id` and foreign-key columns, ORM mode
//! - `<Name>` — adds nested relationship fields for each foreign key
//! - `<Name>InDB` — alias of the in-DB base
//! - `Response<Name>` — list envelope with `count` and `data`
//!
//! Password columns are aliased: a `hashed_password` column surfaces as an
//! optional `password` field so the hash never appears in the API schema.

use forge_ir::Entity;

use crate::naming::camel_to_snake;

/// Emit the schema module body for one entity.
pub fn emit_schema(entity: &Entity) -> String {
    let class_name = &entity.name;
    let base = format!("{class_name}Base");
    let in_db_base = format!("{class_name}InDBBase");

    let mut sections = vec![emit_imports(entity)];
    sections.push(emit_base(entity, &base));
    sections.push(emit_create(entity, &base, class_name));
    sections.push(emit_update(&base, class_name));
    sections.push(emit_in_db_base(entity, &base, &in_db_base));
    sections.push(emit_model(entity, &in_db_base, class_name));
    sections.push(emit_in_db(&in_db_base, class_name));
    sections.push(emit_response(class_name));

    sections.join("\n")
}

fn emit_imports(entity: &Entity) -> String {
    let mut lines = vec![
        "from datetime import datetime".to_string(),
        "from typing import List, Optional".to_string(),
        "from pydantic import BaseModel".to_string(),
    ];

    for attr in entity.foreign_attributes() {
        if let Some(target) = &attr.foreign_key_class {
            lines.push(format!(
                "from .{} import {target}",
                camel_to_snake(target)
            ));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

fn emit_base(entity: &Entity, base: &str) -> String {
    let mut lines = vec![format!("\nclass {base}(BaseModel):")];

    for attr in &entity.attributes {
        if attr.name == "id" {
            continue;
        }
        let optional = attr.is_password() || !attr.is_required;
        let default = if optional { " = None" } else { "" };
        lines.push(format!(
            "    {}: Optional[{}]{default}",
            attr.schema_name(),
            attr.column_type.pydantic_type()
        ));
    }

    lines.push(String::new());
    lines.join("\n")
}

fn emit_create(entity: &Entity, base: &str, class_name: &str) -> String {
    let mut lines = vec![format!("\nclass {class_name}Create({base}):")];

    for attr in &entity.attributes {
        if attr.is_required && !attr.is_primary {
            lines.push(format!(
                "    {}: {}",
                attr.schema_name(),
                attr.column_type.pydantic_type()
            ));
        }
    }
    if lines.len() == 1 {
        lines.push("    pass".to_string());
    }

    lines.push(String::new());
    lines.join("\n")
}

fn emit_update(base: &str, class_name: &str) -> String {
    format!("\nclass {class_name}Update({base}):\n    pass\n")
}

fn emit_in_db_base(entity: &Entity, base: &str, in_db_base: &str) -> String {
    let mut lines = vec![format!("\nclass {in_db_base}({base}):")];
    lines.push("    id: Optional[int]".to_string());

    for attr in entity.foreign_attributes() {
        lines.push(format!(
            "    {}: Optional[{}]",
            attr.name,
            attr.column_type.pydantic_type()
        ));
    }

    lines.push(String::new());
    lines.push("    class Config:".to_string());
    lines.push("        orm_mode = True".to_string());
    lines.push(String::new());
    lines.join("\n")
}

fn emit_model(entity: &Entity, in_db_base: &str, class_name: &str) -> String {
    let mut lines = vec![format!("\nclass {class_name}({in_db_base}):")];

    let foreign = entity.foreign_attributes();
    if foreign.is_empty() {
        lines.push("    pass".to_string());
    } else {
        for attr in foreign {
            if let Some(target) = &attr.foreign_key_class {
                lines.push(format!(
                    "    {}: Optional[{target}] = None",
                    camel_to_snake(target)
                ));
            }
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

fn emit_in_db(in_db_base: &str, class_name: &str) -> String {
    format!("\nclass {class_name}InDB({in_db_base}):\n    pass\n")
}

fn emit_response(class_name: &str) -> String {
    format!(
        "\nclass Response{class_name}(BaseModel):\n    count: int\n    data: Optional[List[{class_name}]]\n"
    )
}

// ============================================================================
// Tests
// ============================================================================
