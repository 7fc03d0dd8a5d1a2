//! FastAPI router emission
//!
//! One endpoint module per entity with the five CRUD routes, and the
//! `apis.py` aggregator that mounts every router under its own prefix.
//!
//! Routes take the record id as a path parameter, and delete answers with a
//! confirmation message so the generated API tests can assert on it. The
//! `current_user` dependency is only injected when the project enables
//! authentication.

use forge_ir::Entity;

use crate::naming::camel_to_snake;

/// Emit the endpoint module body for one entity.
pub fn emit_router(entity: &Entity, use_authentication: bool) -> String {
    let schema_name = &entity.name;
    let var = camel_to_snake(schema_name);
    let response_model = format!("Response{schema_name}");

    let auth_dep = if use_authentication {
        Some("        current_user: models.User = Depends(deps.get_current_active_user),")
    } else {
        None
    };

    let mut lines = vec![
        "from typing import Any".to_string(),
        "from fastapi import APIRouter, Depends, HTTPException".to_string(),
        "from fastapi.encoders import jsonable_encoder".to_string(),
        "from sqlalchemy.orm import Session".to_string(),
        String::new(),
        "from app import crud, models, schemas".to_string(),
        "from app.api import deps".to_string(),
        String::new(),
        "router = APIRouter()".to_string(),
        String::new(),
        String::new(),
    ];

    // list
    lines.push(format!(
        "@router.get('/', response_model=schemas.{response_model})"
    ));
    lines.push(format!("def read_{var}s("));
    lines.push("        db: Session = Depends(deps.get_db),".to_string());
    lines.extend(auth_dep.map(str::to_string));
    lines.push(") -> Any:".to_string());
    lines.push("    \"\"\"".to_string());
    lines.push(format!("    Retrieve {var}s."));
    lines.push("    \"\"\"".to_string());
    lines.push(format!("    {var}s = crud.{var}.get_multi(db=db)"));
    lines.push(format!("    count = crud.{var}.get_count(db=db)"));
    lines.push(format!(
        "    response = schemas.{response_model}(**{{'count': count, 'data': jsonable_encoder({var}s)}})"
    ));
    lines.push("    return response".to_string());
    lines.push(String::new());
    lines.push(String::new());

    // create
    lines.push(format!(
        "@router.post('/', response_model=schemas.{schema_name})"
    ));
    lines.push(format!("def create_{var}("));
    lines.push("        *,".to_string());
    lines.push("        db: Session = Depends(deps.get_db),".to_string());
    lines.push(format!("        {var}_in: schemas.{schema_name}Create,"));
    lines.extend(auth_dep.map(str::to_string));
    lines.push(") -> Any:".to_string());
    lines.push("    \"\"\"".to_string());
    lines.push(format!("    Create new {var}."));
    lines.push("    \"\"\"".to_string());
    lines.push(format!(
        "    {var} = crud.{var}.create(db=db, obj_in={var}_in)"
    ));
    lines.push(format!("    return {var}"));
    lines.push(String::new());
    lines.push(String::new());

    // update
    lines.push(format!(
        "@router.put('/{{{var}_id}}', response_model=schemas.{schema_name})"
    ));
    lines.push(format!("def update_{var}("));
    lines.push("        *,".to_string());
    lines.push("        db: Session = Depends(deps.get_db),".to_string());
    lines.push(format!("        {var}_id: int,"));
    lines.push(format!("        {var}_in: schemas.{schema_name}Update,"));
    lines.extend(auth_dep.map(str::to_string));
    lines.push(") -> Any:".to_string());
    lines.push("    \"\"\"".to_string());
    lines.push(format!("    Update a {var}."));
    lines.push("    \"\"\"".to_string());
    lines.push(format!("    {var} = crud.{var}.get(db=db, id={var}_id)"));
    lines.push(format!("    if not {var}:"));
    lines.push(format!(
        "        raise HTTPException(status_code=404, detail='{schema_name} not found')"
    ));
    lines.push(format!(
        "    {var} = crud.{var}.update(db=db, db_obj={var}, obj_in={var}_in)"
    ));
    lines.push(format!("    return {var}"));
    lines.push(String::new());
    lines.push(String::new());

    // get by id
    lines.push(format!(
        "@router.get('/{{{var}_id}}', response_model=schemas.{schema_name})"
    ));
    lines.push(format!("def read_{var}("));
    lines.push("        *,".to_string());
    lines.push("        db: Session = Depends(deps.get_db),".to_string());
    lines.push(format!("        {var}_id: int,"));
    lines.extend(auth_dep.map(str::to_string));
    lines.push(") -> Any:".to_string());
    lines.push("    \"\"\"".to_string());
    lines.push(format!("    Get {var} by ID."));
    lines.push("    \"\"\"".to_string());
    lines.push(format!("    {var} = crud.{var}.get(db=db, id={var}_id)"));
    lines.push(format!("    if not {var}:"));
    lines.push(format!(
        "        raise HTTPException(status_code=404, detail='{schema_name} not found')"
    ));
    lines.push(format!("    return {var}"));
    lines.push(String::new());
    lines.push(String::new());

    // delete
    lines.push(format!("@router.delete('/{{{var}_id}}')"));
    lines.push(format!("def delete_{var}("));
    lines.push("        *,".to_string());
    lines.push("        db: Session = Depends(deps.get_db),".to_string());
    lines.push(format!("        {var}_id: int,"));
    lines.extend(auth_dep.map(str::to_string));
    lines.push(") -> Any:".to_string());
    lines.push("    \"\"\"".to_string());
    lines.push(format!("    Delete a {var}."));
    lines.push("    \"\"\"".to_string());
    lines.push(format!("    {var} = crud.{var}.get(db=db, id={var}_id)"));
    lines.push(format!("    if not {var}:"));
    lines.push(format!(
        "        raise HTTPException(status_code=404, detail='{schema_name} not found')"
    ));
    lines.push(format!("    crud.{var}.remove(db=db, id={var}_id)"));
    lines.push(format!(
        "    return {{'msg': '{schema_name} deleted successfully'}}"
    ));
    lines.push(String::new());

    lines.join("\n")
}

/// Emit the `apis.py` aggregator mounting every entity router.
pub fn emit_api_router<'a>(entities: impl Iterator<Item = &'a Entity>) -> String {
    let stems: Vec<String> = entities
        .map(|e| format!("{}s", camel_to_snake(&e.name)))
        .collect();

    let mut lines = vec!["from fastapi import APIRouter".to_string(), String::new()];
    for stem in &stems {
        lines.push(format!("from app.api.api_v1.endpoints import {stem}"));
    }
    lines.push(String::new());
    lines.push("api_router = APIRouter()".to_string());
    for stem in &stems {
        lines.push(format!(
            "api_router.include_router({stem}.router, prefix=\"/{stem}\", tags=[\"{stem}\"])"
        ));
    }
    lines.push(String::new());

    lines.join("\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::ColumnType;
    use forge_ir::Attribute;

    fn role() -> Entity {
        Entity::new("Role").with_attribute(Attribute::new("name", ColumnType::String))
    }

    #[test]
    fn test_router_routes() {
        let body = emit_router(&role(), false);

        assert!(body.contains("@router.get('/', response_model=schemas.ResponseRole)"));
        assert!(body.contains("@router.post('/', response_model=schemas.Role)"));
        assert!(body.contains("@router.put('/{role_id}', response_model=schemas.Role)"));
        assert!(body.contains("@router.get('/{role_id}', response_model=schemas.Role)"));
        assert!(body.contains("@router.delete('/{role_id}')"));
    }

    #[test]
    fn test_list_route_envelope() {
        let body = emit_router(&role(), false);
        assert!(body.contains(
            "schemas.ResponseRole(**{'count': count, 'data': jsonable_encoder(roles)})"
        ));
        assert!(body.contains("crud.role.get_count(db=db)"));
    }

    #[test]
    fn test_delete_route_confirmation_and_404() {
        let body = emit_router(&role(), false);
        assert!(body.contains("return {'msg': 'Role deleted successfully'}"));
        assert!(body.contains("raise HTTPException(status_code=404, detail='Role not found')"));
    }

    #[test]
    fn test_auth_dependency_toggle() {
        let without = emit_router(&role(), false);
        assert!(!without.contains("get_current_active_user"));

        let with = emit_router(&role(), true);
        assert!(
            with.contains("current_user: models.User = Depends(deps.get_current_active_user),")
        );
    }

    #[test]
    fn test_multi_word_entity_names() {
        let post =
            Entity::new("BlogPost").with_attribute(Attribute::new("title", ColumnType::String));
        let body = emit_router(&post, false);

        assert!(body.contains("def read_blog_posts("));
        assert!(body.contains("crud.blog_post.get_multi(db=db)"));
        assert!(body.contains("@router.put('/{blog_post_id}'"));
    }

    #[test]
    fn test_api_router_aggregator() {
        let entities = vec![role(), Entity::new("User")];
        let body = emit_api_router(entities.iter());

        assert!(body.contains("from app.api.api_v1.endpoints import roles"));
        assert!(body.contains("from app.api.api_v1.endpoints import users"));
        assert!(body.contains(
            "api_router.include_router(roles.router, prefix=\"/roles\", tags=[\"roles\"])"
        ));
    }
}
