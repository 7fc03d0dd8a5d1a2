//! Pytest suite emission
//!
//! Two files per entity: a CRUD unit-test module exercising the repository
//! layer directly, and an API test module driving the same operations over
//! HTTP. Both carry synthetic payloads drawn from the run's value generator.
//!
//! API tests are foreign-key aware: every referenced parent is POSTed first
//! (in dependency order, shared ancestors once) and its returned id is
//! injected into the child payload. When authentication is enabled, every
//! test creates an admin user and sends a bearer token with each request.
//!
//! Assertion contracts:
//! - create: the new id is set and every submitted field (password excluded)
//!   round-trips
//! - update: the id is stable and every updated field differs from the
//!   created value
//! - delete: confirmation message, then a 404 on re-fetch

use forge_core::{ForgeError, ForgeResult};
use forge_ir::{Attribute, Entity, ProjectGraph};
use serde_json::{Map, Value};

use crate::naming::camel_to_snake;
use crate::python::py_dict;
use crate::resolver::{SetupStep, resolve};
use crate::values::{ValueGenerator, update_payload};

const OPERATIONS: [&str; 5] = ["create", "update", "get", "get_by_id", "delete"];

/// Create payload keyed by schema field names (password columns aliased).
fn schema_payload(entity: &Entity, values: &mut ValueGenerator) -> Map<String, Value> {
    let mut payload = Map::new();
    for attr in &entity.attributes {
        if attr.is_required && !attr.is_auto_increment {
            payload.insert(
                attr.schema_name().to_string(),
                values.generate(&attr.column_type, attr.length),
            );
        }
    }
    payload
}

/// Payload fields asserted on after a create (everything except passwords).
fn asserted_fields(entity: &Entity) -> Vec<&Attribute> {
    entity
        .attributes
        .iter()
        .filter(|a| a.is_required && !a.is_auto_increment && !a.is_password())
        .collect()
}

// ============================================================================
// CRUD unit tests
// ============================================================================

/// Emit the CRUD unit-test module body for one entity.
pub fn emit_crud_tests(entity: &Entity, values: &mut ValueGenerator) -> String {
    let var = camel_to_snake(&entity.name);
    let class_name = &entity.name;

    let mut lines = vec![
        "from app import crud, schemas".to_string(),
        "from fastapi.encoders import jsonable_encoder".to_string(),
    ];

    for op in OPERATIONS {
        lines.push(format!("\n\ndef test_{op}_{var}(db):"));

        let payload_map = schema_payload(entity, values);
        let payload = py_dict(&payload_map);
        let create_lines = [
            format!("    {var}_data = schemas.{class_name}Create(**{payload})"),
            format!("    {var} = crud.{var}.create(db=db, obj_in={var}_data)"),
            format!("    assert {var}.id is not None"),
        ];

        match op {
            "create" => {
                lines.extend(create_lines);
                lines.push(format!("    data_json = jsonable_encoder({var}_data)"));
                lines.push(format!("    test_json = jsonable_encoder({var})"));
                for attr in asserted_fields(entity) {
                    lines.push(format!(
                        "    assert test_json['{0}'] == data_json['{0}']",
                        attr.name
                    ));
                }
            }
            "update" => {
                lines.push("    # Create a record first".to_string());
                lines.extend(create_lines);
                lines.push(String::new());
                lines.push("    # Update the record".to_string());
                // Transform of the same create payload, so every field is
                // guaranteed to change
                let update = py_dict(&update_payload(&payload_map));
                lines.push(format!(
                    "    update_data = schemas.{class_name}Update(**{update})"
                ));
                lines.push(format!(
                    "    updated_{var} = crud.{var}.update(db=db, db_obj={var}, obj_in=update_data)"
                ));
                lines.push(format!("    updated_json = jsonable_encoder(updated_{var})"));
                lines.push(format!("    data_json = jsonable_encoder({var}_data)"));
                lines.push(format!("    assert updated_{var}.id == {var}.id"));
                for attr in asserted_fields(entity) {
                    lines.push(format!(
                        "    assert updated_json['{0}'] != data_json['{0}']",
                        attr.name
                    ));
                }
            }
            "get" => {
                lines.push("    # Create a record first".to_string());
                lines.extend(create_lines);
                lines.push(String::new());
                lines.push("    # Retrieve all records".to_string());
                lines.push(format!("    records = crud.{var}.get_multi(db=db)"));
                lines.push("    assert len(records) > 0".to_string());
                lines.push(format!(
                    "    assert any(record.id == {var}.id for record in records)"
                ));
            }
            "get_by_id" => {
                lines.push("    # Create a record first".to_string());
                lines.extend(create_lines);
                lines.push(String::new());
                lines.push("    # Retrieve the record by ID".to_string());
                lines.push(format!(
                    "    retrieved_{var} = crud.{var}.get(db=db, id={var}.id)"
                ));
                lines.push(format!("    assert retrieved_{var} is not None"));
                lines.push(format!("    assert retrieved_{var}.id == {var}.id"));
            }
            "delete" => {
                lines.push("    # Create a record first".to_string());
                lines.extend(create_lines);
                lines.push(String::new());
                lines.push("    # Delete the record".to_string());
                lines.push(format!(
                    "    deleted_{var} = crud.{var}.remove(db=db, id={var}.id)"
                ));
                lines.push(format!("    assert deleted_{var} is not None"));
                lines.push(format!("    assert deleted_{var}.id == {var}.id"));
                lines.push(String::new());
                lines.push("    # Ensure the record is no longer retrievable".to_string());
                lines.push(format!(
                    "    retrieved_{var} = crud.{var}.get(db=db, id={var}.id)"
                ));
                lines.push(format!("    assert retrieved_{var} is None"));
            }
            _ => unreachable!(),
        }
    }

    lines.join("\n")
}

// ============================================================================
// API tests
// ============================================================================

/// Emit the API test module body for one entity.
///
/// Fails when the entity's foreign-key chain cannot be resolved (missing
/// target or cyclic references).
pub fn emit_api_tests(
    entity: &Entity,
    graph: &ProjectGraph,
    values: &mut ValueGenerator,
    use_authentication: bool,
) -> ForgeResult<String> {
    let var = camel_to_snake(&entity.name);
    let class_name = &entity.name;
    let base_ep = format!("/api/v1/{var}s");
    let hdrs = headers_kwarg(use_authentication);

    let mut lines = vec![
        "from fastapi import status".to_string(),
        "from app import crud, schemas".to_string(),
        "import datetime".to_string(),
    ];
    if use_authentication {
        lines.push("from app.core import security".to_string());
    }

    for op in OPERATIONS {
        let chain = resolve(entity, graph, values)?;
        let Some((target, parents)) = chain.split_last() else {
            return Err(ForgeError::internal(format!(
                "empty dependency chain for entity '{}'",
                entity.name
            )));
        };

        lines.push(format!("\n\ndef test_{op}_{var}_api(client, db):"));
        lines.push(format!("    \"\"\"{} {class_name} via API.\"\"\"", capitalize(op)));
        lines.extend(auth_setup(use_authentication));

        for step in parents {
            lines.extend(parent_creation(step, use_authentication));
        }

        lines.push(format!("    payload = {}", py_dict(&target.payload)));
        for binding in &target.fk_bindings {
            lines.push(format!(
                "    payload['{}'] = {}['id']",
                binding.attribute, binding.parent_var
            ));
        }
        lines.push(String::new());

        match op {
            "create" => {
                lines.push(format!(
                    "    resp = client.post('{base_ep}/', json=payload{hdrs})"
                ));
                lines.push("    assert resp.status_code == status.HTTP_200_OK, resp.text".to_string());
                lines.push("    created = resp.json()".to_string());
                lines.push("    assert created['id'] is not None".to_string());
                for attr in asserted_fields(entity) {
                    lines.push(format!(
                        "    assert created['{0}'] == payload['{0}']",
                        attr.name
                    ));
                }
            }
            "update" => {
                let fk_fields: Vec<String> = entity
                    .foreign_attributes()
                    .iter()
                    .map(|a| format!("'{}'", a.name))
                    .collect();
                lines.push(format!(
                    "    resp_c = client.post('{base_ep}/', json=payload{hdrs})"
                ));
                lines.push("    assert resp_c.status_code == status.HTTP_200_OK".to_string());
                lines.push("    created = resp_c.json()".to_string());
                lines.push(format!("    fk_fields = [{}]", fk_fields.join(", ")));
                lines.push("    update_data = {".to_string());
                lines.push("        k: (not v) if isinstance(v, bool) else".to_string());
                lines.push("           (v + 1) if isinstance(v, (int, float)) else".to_string());
                lines.push("           f'updated_{v}'".to_string());
                lines.push("        for k, v in payload.items()".to_string());
                lines.push("        if k not in ('id',) and k not in fk_fields".to_string());
                lines.push("    }".to_string());
                lines.push(format!("    schemas.{class_name}Update(**update_data)"));
                lines.push(format!(
                    "    resp_u = client.put(f'{base_ep}/{{created[\"id\"]}}', json=update_data{hdrs})"
                ));
                lines.push("    assert resp_u.status_code == status.HTTP_200_OK".to_string());
                lines.push("    updated = resp_u.json()".to_string());
                lines.push("    assert updated['id'] == created['id']".to_string());
                for attr in asserted_fields(entity) {
                    if !attr.is_foreign {
                        lines.push(format!(
                            "    assert updated['{0}'] != created['{0}']",
                            attr.name
                        ));
                    }
                }
            }
            "get" => {
                lines.push(format!(
                    "    client.post('{base_ep}/', json=payload{hdrs})"
                ));
                lines.push(format!("    resp_g = client.get('{base_ep}/'{hdrs})"));
                lines.push("    assert resp_g.status_code == status.HTTP_200_OK".to_string());
                lines.push("    body = resp_g.json()".to_string());
                lines.push("    assert body['count'] > 0".to_string());
                lines.push("    assert any(item.get('id') for item in body['data'])".to_string());
            }
            "get_by_id" => {
                lines.push(format!(
                    "    resp_c = client.post('{base_ep}/', json=payload{hdrs})"
                ));
                lines.push("    created = resp_c.json()".to_string());
                lines.push(format!(
                    "    resp_g = client.get(f'{base_ep}/{{created[\"id\"]}}'{hdrs})"
                ));
                lines.push("    assert resp_g.status_code == status.HTTP_200_OK".to_string());
                lines.push("    retrieved = resp_g.json()".to_string());
                lines.push("    assert retrieved['id'] == created['id']".to_string());
            }
            "delete" => {
                lines.push(format!(
                    "    resp_c = client.post('{base_ep}/', json=payload{hdrs})"
                ));
                lines.push("    created = resp_c.json()".to_string());
                lines.push(format!(
                    "    resp_d = client.delete(f'{base_ep}/{{created[\"id\"]}}'{hdrs})"
                ));
                lines.push("    assert resp_d.status_code == status.HTTP_200_OK".to_string());
                lines.push("    deleted = resp_d.json()".to_string());
                lines.push(format!(
                    "    assert deleted['msg'] == '{class_name} deleted successfully'"
                ));
                lines.push(format!(
                    "    resp_chk = client.get(f'{base_ep}/{{created[\"id\"]}}'{hdrs})"
                ));
                lines.push(
                    "    assert resp_chk.status_code == status.HTTP_404_NOT_FOUND".to_string(),
                );
            }
            _ => unreachable!(),
        }
    }

    Ok(lines.join("\n"))
}

fn headers_kwarg(use_authentication: bool) -> &'static str {
    if use_authentication {
        ", headers={\"Authorization\": f\"Bearer {token}\"}"
    } else {
        ""
    }
}

fn auth_setup(use_authentication: bool) -> Vec<String> {
    if !use_authentication {
        return Vec::new();
    }
    vec![
        "    # Auth setup".to_string(),
        "    user_data = {".to_string(),
        "        'email': 'admin@example.com',".to_string(),
        "        'password': 'securepassword',".to_string(),
        "        'is_active': True,".to_string(),
        "        'is_superuser': False,".to_string(),
        "    }".to_string(),
        "    user = crud.user.create(db, obj_in=schemas.UserCreate(**user_data))".to_string(),
        "    db.commit()".to_string(),
        "    token = security.create_access_token(sub={'id': str(user.id), 'email': user.email})"
            .to_string(),
        String::new(),
    ]
}

fn parent_creation(step: &SetupStep, use_authentication: bool) -> Vec<String> {
    let var = &step.var_name;
    let endpoint = format!("/api/v1/{var}s");
    let hdrs = headers_kwarg(use_authentication);

    let mut lines = vec![
        format!("    # Create parent {}", step.entity),
        format!("    {var}_payload = {}", py_dict(&step.payload)),
    ];
    for binding in &step.fk_bindings {
        lines.push(format!(
            "    {var}_payload['{}'] = {}['id']",
            binding.attribute, binding.parent_var
        ));
    }
    lines.push(format!(
        "    resp_{var} = client.post('{endpoint}/', json={var}_payload{hdrs})"
    ));
    lines.push(format!(
        "    assert resp_{var}.status_code == status.HTTP_200_OK"
    ));
    lines.push(format!("    {var} = resp_{var}.json()"));
    lines.push(String::new());
    lines
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::ColumnType;
    use forge_ir::GenerationOptions;

    fn sample_graph() -> ProjectGraph {
        let role = Entity::new("Role").with_attribute(Attribute::new("name", ColumnType::String));
        let user = Entity::new("User")
            .with_attribute(Attribute::new("first_name", ColumnType::String).optional())
            .with_attribute(Attribute::new("last_name", ColumnType::String))
            .with_attribute(Attribute::new("age", ColumnType::Integer))
            .with_attribute(Attribute::foreign_key("role_id", "Role"));
        ProjectGraph::build("blog", GenerationOptions::new(), vec![role, user]).unwrap()
    }

    #[test]
    fn test_crud_tests_cover_all_operations() {
        let graph = sample_graph();
        let mut values = ValueGenerator::with_seed(3);
        let body = emit_crud_tests(graph.get_entity("User").unwrap(), &mut values);

        for op in OPERATIONS {
            assert!(body.contains(&format!("def test_{op}_user(db):")), "missing {op}");
        }
    }

    #[test]
    fn test_crud_create_asserts_field_round_trip() {
        let graph = sample_graph();
        let mut values = ValueGenerator::with_seed(3);
        let body = emit_crud_tests(graph.get_entity("User").unwrap(), &mut values);

        assert!(body.contains("assert user.id is not None"));
        assert!(body.contains("assert test_json['last_name'] == data_json['last_name']"));
        assert!(body.contains("assert test_json['age'] == data_json['age']"));
        // Optional fields are not in the payload, so not asserted on
        assert!(!body.contains("test_json['first_name']"));
    }

    #[test]
    fn test_crud_update_asserts_fields_differ() {
        let graph = sample_graph();
        let mut values = ValueGenerator::with_seed(3);
        let body = emit_crud_tests(graph.get_entity("User").unwrap(), &mut values);

        assert!(body.contains("assert updated_user.id == user.id"));
        assert!(body.contains("assert updated_json['last_name'] != data_json['last_name']"));
    }

    #[test]
    fn test_crud_delete_checks_gone() {
        let graph = sample_graph();
        let mut values = ValueGenerator::with_seed(3);
        let body = emit_crud_tests(graph.get_entity("Role").unwrap(), &mut values);

        assert!(body.contains("deleted_role = crud.role.remove(db=db, id=role.id)"));
        assert!(body.contains("assert retrieved_role is None"));
    }

    #[test]
    fn test_api_tests_create_parent_first() {
        let graph = sample_graph();
        let mut values = ValueGenerator::with_seed(3);
        let body = emit_api_tests(
            graph.get_entity("User").unwrap(),
            &graph,
            &mut values,
            false,
        )
        .unwrap();

        assert!(body.contains("# Create parent Role"));
        assert!(body.contains("resp_role = client.post('/api/v1/roles/', json=role_payload)"));
        assert!(body.contains("payload['role_id'] = role['id']"));

        // Parent is created before the target payload is posted
        let parent_pos = body.find("# Create parent Role").unwrap();
        let payload_pos = body.find("payload = {").unwrap();
        assert!(parent_pos < payload_pos);
    }

    #[test]
    fn test_api_tests_without_auth_have_no_headers() {
        let graph = sample_graph();
        let mut values = ValueGenerator::with_seed(3);
        let body = emit_api_tests(
            graph.get_entity("Role").unwrap(),
            &graph,
            &mut values,
            false,
        )
        .unwrap();

        assert!(!body.contains("Bearer"));
        assert!(!body.contains("security"));
        assert!(body.contains("resp = client.post('/api/v1/roles/', json=payload)"));
    }

    #[test]
    fn test_api_tests_with_auth() {
        let graph = sample_graph();
        let mut values = ValueGenerator::with_seed(3);
        let body = emit_api_tests(
            graph.get_entity("Role").unwrap(),
            &graph,
            &mut values,
            true,
        )
        .unwrap();

        assert!(body.contains("from app.core import security"));
        assert!(body.contains("token = security.create_access_token"));
        assert!(body.contains("headers={\"Authorization\": f\"Bearer {token}\"}"));
    }

    #[test]
    fn test_api_update_skips_foreign_keys() {
        let graph = sample_graph();
        let mut values = ValueGenerator::with_seed(3);
        let body = emit_api_tests(
            graph.get_entity("User").unwrap(),
            &graph,
            &mut values,
            false,
        )
        .unwrap();

        assert!(body.contains("fk_fields = ['role_id']"));
        assert!(body.contains("assert updated['last_name'] != created['last_name']"));
        assert!(!body.contains("assert updated['role_id'] != created['role_id']"));
    }

    #[test]
    fn test_api_delete_contract() {
        let graph = sample_graph();
        let mut values = ValueGenerator::with_seed(3);
        let body = emit_api_tests(
            graph.get_entity("Role").unwrap(),
            &graph,
            &mut values,
            false,
        )
        .unwrap();

        assert!(body.contains("assert deleted['msg'] == 'Role deleted successfully'"));
        assert!(body.contains("assert resp_chk.status_code == status.HTTP_404_NOT_FOUND"));
    }

    #[test]
    fn test_api_tests_fail_on_unresolved_foreign_key() {
        let orphan = Entity::new("Order")
            .with_attribute(Attribute::new("total", ColumnType::Float))
            .with_attribute(Attribute::foreign_key("customer_id", "Customer"));
        let graph =
            ProjectGraph::build("shop", GenerationOptions::new(), vec![orphan]).unwrap();

        let mut values = ValueGenerator::with_seed(3);
        let result = emit_api_tests(
            graph.get_entity("Order").unwrap(),
            &graph,
            &mut values,
            false,
        );
        assert!(result.is_err());
    }
}
