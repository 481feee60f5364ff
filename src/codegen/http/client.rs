use std::path::PathBuf;

use serde_json::{json, Value};

use crate::codegen::file::{header_section, File, ImportSpec, Section, SourceFile};
use crate::codegen::naming::{sanitize_ident, to_camel_case, to_snake_case};
use crate::design::{AttributeRef, DataType, MethodExpr, Primitive, RootExpr, ServiceExpr};

/// The client HTTP transport files: per service, a `client.rs` with the
/// client struct, constructor and one endpoint function per method, and an
/// `encode_decode.rs` with the request encoders and response decoders.
///
/// All client files come first, then all encode/decode files, services in
/// declaration order.
pub fn client_files(root: &RootExpr) -> Vec<Box<dyn File>> {
    let mut files: Vec<Box<dyn File>> = Vec::with_capacity(2 * root.services.len());
    for service in &root.services {
        files.push(client(&service.borrow()));
    }
    for service in &root.services {
        files.push(client_encode_decode(&service.borrow()));
    }
    files
}

/// Output path for a transport artifact: `<service>/<transport>/<role>/<artifact>`.
/// Pure function of service name and artifact kind, stable across runs.
pub fn transport_path(service: &str, transport: &str, role: &str, artifact: &str) -> PathBuf {
    PathBuf::from(to_snake_case(service))
        .join(transport)
        .join(role)
        .join(artifact)
}

fn client(svc: &ServiceExpr) -> Box<dyn File> {
    let name = svc.name.clone();
    let path = transport_path(&name, "http", "client", "client.rs");
    let data = service_view(svc);
    let endpoints: Vec<Value> = svc
        .methods
        .iter()
        .map(|m| endpoint_view(svc, &m.borrow()))
        .collect();
    Box::new(SourceFile::new(path, move |gen_pkg| {
        let mut s = vec![
            header_section(
                &format!("{} client HTTP transport", name),
                &header_imports(gen_pkg, &name),
            ),
            Section::new("client_struct", data.clone()),
            Section::new("client_init", data.clone()),
        ];
        for e in &endpoints {
            s.push(Section::new("client_endpoint", e.clone()));
        }
        s
    }))
}

fn client_encode_decode(svc: &ServiceExpr) -> Box<dyn File> {
    let name = svc.name.clone();
    let path = transport_path(&name, "http", "client", "encode_decode.rs");
    let endpoints: Vec<Value> = svc
        .methods
        .iter()
        .map(|m| endpoint_view(svc, &m.borrow()))
        .collect();
    Box::new(SourceFile::new(path, move |gen_pkg| {
        let mut s = vec![header_section(
            &format!("{} HTTP client encoders and decoders", name),
            &header_imports(gen_pkg, &name),
        )];
        for e in &endpoints {
            s.push(Section::new("request_encoder", e.clone()));
            // a decoder is only emitted when there is something to decode
            if e["method"]["has_decoder"].as_bool().unwrap_or(false) {
                s.push(Section::new("response_decoder", e.clone()));
            }
        }
        s
    }))
}

fn header_imports(gen_pkg: &str, service: &str) -> Vec<ImportSpec> {
    vec![
        ImportSpec::new(format!("{}::transport::*", gen_pkg)),
        ImportSpec::new(format!("{}::{}::*", gen_pkg, to_snake_case(service))),
    ]
}

fn service_view(svc: &ServiceExpr) -> Value {
    json!({
        "name": svc.name,
        "client_struct": format!("{}Client", to_camel_case(&svc.name)),
    })
}

fn endpoint_view(svc: &ServiceExpr, m: &MethodExpr) -> Value {
    let errors: Vec<Value> = m
        .errors
        .iter()
        .enumerate()
        .map(|(i, e)| json!({"name": e.name, "status": 400 + i as u64}))
        .collect();
    json!({
        "service_name": svc.name,
        "client_struct": format!("{}Client", to_camel_case(&svc.name)),
        "path": format!("/{}/{}", to_snake_case(&svc.name), to_snake_case(&m.name)),
        "method": {
            "name": m.name,
            "fn_name": sanitize_ident(&to_snake_case(&m.name)),
            "has_payload": m.payload.is_some(),
            "payload_type": m.payload.as_ref().map(rust_type).unwrap_or_default(),
            "has_result": m.result.is_some(),
            "result_type": m.result.as_ref().map(rust_type).unwrap_or_default(),
            // a decoder exists whenever there is a result to parse or a
            // declared error status to map
            "has_decoder": m.result.is_some() || !m.errors.is_empty(),
            "errors": errors,
        },
    })
}

/// The Rust type spelled into generated signatures for an attribute.
///
/// Named types keep their identity as generated struct names; anonymous
/// objects fall back to a free-form value.
pub fn rust_type(att: &AttributeRef) -> String {
    data_type_rust(&att.borrow().ty)
}

fn data_type_rust(ty: &DataType) -> String {
    match ty {
        DataType::Primitive(p) => match p {
            Primitive::Boolean => "bool".to_string(),
            Primitive::Int32 => "i32".to_string(),
            Primitive::Int64 => "i64".to_string(),
            Primitive::Float32 => "f32".to_string(),
            Primitive::Float64 => "f64".to_string(),
            Primitive::Bytes => "Vec<u8>".to_string(),
            Primitive::String => "String".to_string(),
            Primitive::Any => "serde_json::Value".to_string(),
        },
        DataType::Object(_) => "serde_json::Value".to_string(),
        DataType::Array(elem) => format!("Vec<{}>", rust_type(elem)),
        DataType::Map(elem) => format!("std::collections::HashMap<String, {}>", rust_type(elem)),
        DataType::User(ut) => to_camel_case(&ut.borrow().name),
        DataType::Ref(name) => to_camel_case(name),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::design::{primitive_attr, AttributeExpr, Object, UserTypeExpr};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_transport_path_layout() {
        assert_eq!(
            transport_path("BottleService", "http", "client", "client.rs"),
            PathBuf::from("bottle_service/http/client/client.rs")
        );
    }

    #[test]
    fn test_rust_type_named_and_nested() {
        let mut obj = Object::new();
        obj.insert("left", primitive_attr(Primitive::Int32));
        let ut = Rc::new(RefCell::new(UserTypeExpr::new(
            "operands",
            AttributeExpr::new(DataType::Object(obj)),
        )));
        let att = Rc::new(RefCell::new(AttributeExpr::new(DataType::User(ut))));
        assert_eq!(rust_type(&att), "Operands");

        let arr = Rc::new(RefCell::new(AttributeExpr::new(DataType::Array(
            primitive_attr(Primitive::String),
        ))));
        assert_eq!(rust_type(&arr), "Vec<String>");
    }

    #[test]
    fn test_client_files_two_per_service_in_order() {
        let mut root = RootExpr::new("t");
        for name in ["alpha", "beta"] {
            root.services
                .push(Rc::new(RefCell::new(ServiceExpr::new(name))));
        }
        let files = client_files(&root);
        let paths: Vec<_> = files.iter().map(|f| f.output_path()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("alpha/http/client/client.rs"),
                PathBuf::from("beta/http/client/client.rs"),
                PathBuf::from("alpha/http/client/encode_decode.rs"),
                PathBuf::from("beta/http/client/encode_decode.rs"),
            ]
        );
    }
}
