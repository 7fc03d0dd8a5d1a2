//! CRUD repository emission
//!
//! One `crud_<name>.py` module per entity: a `CRUD<Name>` class over the
//! template's generic `CRUDBase`, plus a module-level singleton bound to the
//! model. The `user` entity is special-cased with password hashing on create
//! and update, email lookup, and the active/superuser predicates the auth
//! layer depends on.

use forge_ir::Entity;

use crate::naming::camel_to_snake;

/// Emit the CRUD module body for one entity.
pub fn emit_crud(entity: &Entity) -> String {
    let model_name = &entity.name;
    let table_name = camel_to_snake(model_name);
    let crud_class = format!("CRUD{model_name}");

    let mut lines = vec![
        "from typing import Optional".to_string(),
        "from sqlalchemy.orm import Session".to_string(),
        String::new(),
        "from app.crud.base import CRUDBase".to_string(),
        format!("from app.models.{table_name} import {model_name}"),
        format!("from app.schemas.{table_name} import {model_name}Create, {model_name}Update"),
        String::new(),
    ];

    if table_name == "user" {
        lines.push(
            "from app.core.security import get_password_hash, verify_password".to_string(),
        );
        lines.push("from typing import Any, Dict, Union, List \n".to_string());
    }

    lines.push(format!(
        "\nclass {crud_class}(CRUDBase[{model_name}, {model_name}Create, {model_name}Update]):"
    ));

    if table_name == "user" {
        lines.extend(user_methods(model_name, &table_name));
    } else {
        lines.extend([
            format!("    def get_by_id(self, db: Session, *, id: int) -> Optional[{model_name}]:"),
            format!("        return db.query({model_name}).filter({model_name}.id == id).first()"),
            String::new(),
            String::new(),
        ]);
    }

    lines.push(format!("{table_name} = {crud_class}({model_name})"));
    lines.push(String::new());

    lines.join("\n")
}

fn user_methods(model_name: &str, table_name: &str) -> Vec<String> {
    vec![
        format!("    def get_by_email(self, db: Session, *, email: str) -> Optional[{model_name}]:"),
        format!("        return db.query({model_name}).filter({model_name}.email == email).first()"),
        String::new(),
        format!("    def create(self, db: Session, *, obj_in: {model_name}Create) -> {model_name}:"),
        format!("        db_obj = {model_name}("),
        "               email=obj_in.email,".to_string(),
        "               hashed_password=get_password_hash(obj_in.password),".to_string(),
        "               first_name=obj_in.first_name,".to_string(),
        "               last_name=obj_in.last_name,".to_string(),
        "               is_admin=obj_in.is_admin,".to_string(),
        "               role_id=obj_in.role_id,".to_string(),
        "               is_superuser=obj_in.is_superuser,".to_string(),
        "               )".to_string(),
        "        db.add(db_obj)".to_string(),
        "        db.commit()".to_string(),
        "        db.refresh(db_obj)".to_string(),
        "        return db_obj".to_string(),
        String::new(),
        "    def update(".to_string(),
        format!(
            "           self, db: Session, *, db_obj: {model_name}, obj_in: Union[{model_name}Update, Dict[str, Any]]"
        ),
        format!("    ) -> {model_name}:"),
        "        if isinstance(obj_in, dict):".to_string(),
        "            update_data = obj_in".to_string(),
        "        else:".to_string(),
        "            update_data = obj_in.dict(exclude_unset=True)".to_string(),
        "        if 'password' in update_data:".to_string(),
        "            hashed_password = get_password_hash(update_data['password'])".to_string(),
        "            del update_data['password']".to_string(),
        "            update_data['hashed_password'] = hashed_password".to_string(),
        "        return super().update(db, db_obj=db_obj, obj_in=update_data)".to_string(),
        String::new(),
        format!("    def is_superuser(self, {table_name}_: {model_name}) -> bool:"),
        format!("        return {table_name}_.is_superuser"),
        String::new(),
        format!("    def is_active(self, {table_name}_: {model_name}) -> bool:"),
        format!("        return {table_name}_.is_active"),
        String::new(),
        String::new(),
    ]
}

// ============================================================================
// Tests
// ============================================================================
