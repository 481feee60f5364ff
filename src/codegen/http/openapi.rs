use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use serde_json::{json, Map, Value};

use crate::codegen::error::Error;
use crate::codegen::file::{File, Section};
use crate::codegen::naming::{to_camel_case, to_snake_case};
use crate::design::{AttributeRef, DataType, Primitive, RootExpr};

/// The API specification document artifact.
///
/// A pure, mechanical mapping of the finalized tree into an OpenAPI-style
/// JSON document, emitted as a single section at a fixed top-level path.
/// The document is serialized at construction: a serialization failure of
/// an internally-consistent document is a generator bug, reported as the
/// fatal internal error kind rather than a usage diagnostic.
pub struct OpenApiFile {
    json: String,
}

impl OpenApiFile {
    pub fn new(root: &RootExpr) -> Result<Self, Error> {
        let doc = build_document(root);
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|err| Error::Internal(format!("openapi document failed to serialize: {}", err)))?;
        Ok(OpenApiFile { json })
    }
}

impl File for OpenApiFile {
    fn output_path(&self) -> PathBuf {
        PathBuf::from("openapi.json")
    }

    fn sections(&self, _gen_pkg: &str) -> Vec<Section> {
        vec![Section::new("openapi", json!({ "json": self.json }))]
    }
}

/// Map the finalized tree to the in-memory document.
///
/// Paths are collected into a sorted map and every collection is walked in
/// declaration order, so the document is byte-stable across runs.
pub fn build_document(root: &RootExpr) -> Value {
    let mut paths: BTreeMap<String, Value> = BTreeMap::new();
    for service in &root.services {
        let svc = service.borrow();
        for method in &svc.methods {
            let m = method.borrow();
            let mut operation = Map::new();
            operation.insert(
                "operationId".to_string(),
                json!(format!("{}.{}", svc.name, m.name)),
            );
            if let Some(desc) = &m.description {
                operation.insert("description".to_string(), json!(desc));
            }
            if let Some(p) = &m.payload {
                operation.insert(
                    "requestBody".to_string(),
                    json!({
                        "required": true,
                        "content": { "application/json": { "schema": schema_for(p, root) } },
                    }),
                );
            }
            let mut responses: BTreeMap<String, Value> = BTreeMap::new();
            match &m.result {
                Some(r) => {
                    responses.insert(
                        "200".to_string(),
                        json!({
                            "description": format!("{} result", m.name),
                            "content": { "application/json": { "schema": schema_for(r, root) } },
                        }),
                    );
                }
                None => {
                    responses.insert(
                        "204".to_string(),
                        json!({ "description": "no content" }),
                    );
                }
            }
            // error statuses match the generated client decoders
            for (i, err) in m.errors.iter().enumerate() {
                responses.insert(
                    (400 + i).to_string(),
                    json!({
                        "description": err.name,
                        "content": { "application/json": { "schema": schema_for(&err.attribute, root) } },
                    }),
                );
            }
            operation.insert("responses".to_string(), json!(responses));

            let path = format!("/{}/{}", to_snake_case(&svc.name), to_snake_case(&m.name));
            paths.insert(path, json!({ "post": Value::Object(operation) }));
        }
    }

    let mut schemas: BTreeMap<String, Value> = BTreeMap::new();
    for ut in &root.types {
        let ut = ut.borrow();
        schemas.insert(
            to_camel_case(&ut.name),
            attribute_schema(&ut.attribute, root),
        );
    }

    json!({
        "openapi": "3.0.3",
        "info": { "title": root.name, "version": "1.0" },
        "paths": paths,
        "components": { "schemas": schemas },
    })
}

/// Schema for an attribute at a use site. Named types defined by the design
/// become `$ref`s; duplicated instances (local refinements of a named type)
/// are inlined so their use-site required marks survive.
fn schema_for(att: &AttributeRef, root: &RootExpr) -> Value {
    let borrowed = att.borrow();
    if let DataType::User(ut) = &borrowed.ty {
        let is_defined = root.types.iter().any(|t| Rc::ptr_eq(t, ut));
        if is_defined {
            return json!({
                "$ref": format!("#/components/schemas/{}", to_camel_case(&ut.borrow().name))
            });
        }
        return attribute_schema(&ut.borrow().attribute, root);
    }
    drop(borrowed);
    attribute_schema(att, root)
}

fn attribute_schema(att: &AttributeRef, root: &RootExpr) -> Value {
    let att = att.borrow();
    let mut schema = Map::new();
    match &att.ty {
        DataType::Primitive(p) => {
            let (ty, format) = match p {
                Primitive::Boolean => ("boolean", None),
                Primitive::Int32 => ("integer", Some("int32")),
                Primitive::Int64 => ("integer", Some("int64")),
                Primitive::Float32 => ("number", Some("float")),
                Primitive::Float64 => ("number", Some("double")),
                Primitive::Bytes => ("string", Some("byte")),
                Primitive::String => ("string", None),
                Primitive::Any => ("", None),
            };
            if !ty.is_empty() {
                schema.insert("type".to_string(), json!(ty));
            }
            if let Some(f) = format {
                schema.insert("format".to_string(), json!(f));
            }
        }
        DataType::Object(obj) => {
            schema.insert("type".to_string(), json!("object"));
            let mut properties = Map::new();
            let mut required = Vec::new();
            for field in obj.iter() {
                properties.insert(field.name.clone(), schema_for(&field.attribute, root));
                if field.attribute.borrow().required {
                    required.push(json!(field.name));
                }
            }
            schema.insert("properties".to_string(), Value::Object(properties));
            if !required.is_empty() {
                schema.insert("required".to_string(), Value::Array(required));
            }
        }
        DataType::Array(elem) => {
            schema.insert("type".to_string(), json!("array"));
            schema.insert("items".to_string(), schema_for(elem, root));
        }
        DataType::Map(elem) => {
            schema.insert("type".to_string(), json!("object"));
            schema.insert("additionalProperties".to_string(), schema_for(elem, root));
        }
        DataType::User(ut) => {
            let is_defined = root.types.iter().any(|t| Rc::ptr_eq(t, ut));
            if is_defined {
                schema.insert(
                    "$ref".to_string(),
                    json!(format!(
                        "#/components/schemas/{}",
                        to_camel_case(&ut.borrow().name)
                    )),
                );
            } else {
                // a local duplicate of a named type: inline it so the
                // use-site required marks survive
                return attribute_schema(&ut.borrow().attribute, root);
            }
        }
        DataType::Ref(name) => {
            // unresolved references are finalization diagnostics; a clean
            // run never reaches here, but the mapping stays total
            schema.insert(
                "$ref".to_string(),
                json!(format!("#/components/schemas/{}", to_camel_case(name))),
            );
        }
    }
    if let Some(desc) = &att.description {
        schema.insert("description".to_string(), json!(desc));
    }
    if let Some(v) = &att.validation {
        if let Some(p) = &v.pattern {
            schema.insert("pattern".to_string(), json!(p));
        }
        if let Some(min) = v.minimum {
            schema.insert("minimum".to_string(), json!(min));
        }
        if let Some(max) = v.maximum {
            schema.insert("maximum".to_string(), json!(max));
        }
        if let Some(n) = v.min_length {
            schema.insert("minLength".to_string(), json!(n));
        }
        if let Some(n) = v.max_length {
            schema.insert("maxLength".to_string(), json!(n));
        }
    }
    Value::Object(schema)
}
