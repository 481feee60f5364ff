#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use apiforge::codegen::http::{build_document, client_files, OpenApiFile};
use apiforge::codegen::{Error, File, Generator, Section};
use apiforge::demo::calc_design;
use apiforge::design::{Primitive, RootExpr};
use apiforge::dsl::{
    attribute_with, inline, max_length, maximum, method, minimum, payload, pattern, result, Design,
};

fn finalized_demo() -> RootExpr {
    calc_design().finalize().unwrap()
}

fn all_files(root: &RootExpr) -> Vec<Box<dyn File>> {
    let mut files = client_files(root);
    files.push(Box::new(OpenApiFile::new(root).unwrap()) as Box<dyn File>);
    files
}

#[test]
fn test_rendering_is_deterministic() {
    let root_a = finalized_demo();
    let root_b = finalized_demo();
    let gen = Generator::new(std::env::temp_dir()).unwrap();

    for (fa, fb) in all_files(&root_a).iter().zip(all_files(&root_b).iter()) {
        assert_eq!(fa.output_path(), fb.output_path());
        let a = gen.render_file(fa.as_ref(), "my_app").unwrap();
        let b = gen.render_file(fb.as_ref(), "my_app").unwrap();
        assert_eq!(a, b, "output differs for {:?}", fa.output_path());
        // rendering the same file twice is also identical
        let again = gen.render_file(fa.as_ref(), "my_app").unwrap();
        assert_eq!(a, again);
    }
}

#[test]
fn test_gen_param_changes_generated_references() {
    let root = finalized_demo();
    let gen = Generator::new(std::env::temp_dir()).unwrap();
    let files = client_files(&root);
    let a = gen.render_file(files[0].as_ref(), "app_one").unwrap();
    let b = gen.render_file(files[0].as_ref(), "app_two").unwrap();
    assert_ne!(a, b);
    assert!(String::from_utf8(a).unwrap().contains("app_one::transport"));
}

#[test]
fn test_two_services_get_distinct_paths() {
    let mut design = Design::new("multi");
    for name in ["billing", "shipping"] {
        design.service(name, move |e| {
            method(e, "ping", |e| {
                payload(e, Primitive::String);
                result(e, Primitive::String);
            });
        });
    }
    let root = design.finalize().unwrap();
    let files = client_files(&root);
    let mut paths: Vec<PathBuf> = files.iter().map(|f| f.output_path()).collect();
    let before = paths.len();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), before, "output paths must not collide");
    assert!(paths.contains(&PathBuf::from("billing/http/client/client.rs")));
    assert!(paths.contains(&PathBuf::from("shipping/http/client/client.rs")));
}

#[test]
fn test_write_all_produces_files_on_disk() {
    let root = finalized_demo();
    let dir = tempfile::tempdir().unwrap();
    let gen = Generator::new(dir.path()).unwrap();
    let files = all_files(&root);
    let report = gen.write_all(&files, "my_app").unwrap();
    assert!(report.ok());
    assert_eq!(report.written.len(), files.len());
    assert!(dir.path().join("calculator/http/client/client.rs").exists());
    assert!(dir
        .path()
        .join("calculator/http/client/encode_decode.rs")
        .exists());
    assert!(dir.path().join("openapi.json").exists());

    let client = std::fs::read_to_string(dir.path().join("calculator/http/client/client.rs"))
        .unwrap();
    assert!(client.contains("pub struct CalculatorClient"));
    assert!(client.contains("pub fn add(&self, payload: &Operands)"));
    assert!(client.starts_with("// Code generated by apiforge, DO NOT EDIT."));

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("openapi.json")).unwrap())
            .unwrap();
    assert_eq!(doc["openapi"], "3.0.3");
}

struct BrokenSections;

impl File for BrokenSections {
    fn output_path(&self) -> PathBuf {
        PathBuf::from("broken/artifact.rs")
    }
    fn sections(&self, _gen_pkg: &str) -> Vec<Section> {
        vec![Section::new("no_such_template", serde_json::json!({}))]
    }
}

struct FailingFinalize;

impl File for FailingFinalize {
    fn output_path(&self) -> PathBuf {
        PathBuf::from("flaky/artifact.rs")
    }
    fn sections(&self, _gen_pkg: &str) -> Vec<Section> {
        vec![Section::new("openapi", serde_json::json!({"json": "{}"}))]
    }
    fn finalize(&self, _written: &Path, _gen_pkg: &str) -> anyhow::Result<()> {
        anyhow::bail!("post-processing refused")
    }
}

#[test]
fn test_failing_file_does_not_abort_siblings() {
    let root = finalized_demo();
    let dir = tempfile::tempdir().unwrap();
    let gen = Generator::new(dir.path()).unwrap();

    let mut files = all_files(&root);
    let healthy = files.len();
    files.insert(0, Box::new(BrokenSections));
    files.push(Box::new(FailingFinalize));

    let report = gen.write_all(&files, "my_app").unwrap();
    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.written.len(), healthy);
    assert!(dir.path().join("openapi.json").exists());
    assert!(report
        .failed
        .iter()
        .any(|(path, reason)| path == &PathBuf::from("flaky/artifact.rs")
            && reason.contains("post-processing refused")));
}

struct CorruptDocument;

impl File for CorruptDocument {
    fn output_path(&self) -> PathBuf {
        PathBuf::from("corrupt/openapi.json")
    }
    fn sections(&self, _gen_pkg: &str) -> Vec<Section> {
        vec![Section::new("openapi", serde_json::json!({"json": "{}"}))]
    }
    fn finalize(&self, _written: &Path, _gen_pkg: &str) -> anyhow::Result<()> {
        Err(Error::Internal("document lost internal consistency".to_string()).into())
    }
}

#[test]
fn test_internal_error_aborts_the_batch() {
    let root = finalized_demo();
    let dir = tempfile::tempdir().unwrap();
    let gen = Generator::new(dir.path()).unwrap();

    let mut files: Vec<Box<dyn File>> = vec![Box::new(CorruptDocument)];
    files.extend(all_files(&root));

    let err = gen.write_all(&files, "my_app").unwrap_err();
    assert!(matches!(err, Error::Internal(_)));
    // nothing after the fatal file was generated
    assert!(!dir.path().join("calculator/http/client/client.rs").exists());
    assert!(!dir.path().join("openapi.json").exists());
}

#[test]
fn test_io_failure_stays_file_local() {
    struct Blocked;

    impl File for Blocked {
        fn output_path(&self) -> PathBuf {
            PathBuf::from("blocked/artifact.rs")
        }
        fn sections(&self, _gen_pkg: &str) -> Vec<Section> {
            vec![Section::new("openapi", serde_json::json!({"json": "{}"}))]
        }
    }

    let root = finalized_demo();
    let dir = tempfile::tempdir().unwrap();
    // occupy the parent path with a plain file so directory creation fails
    std::fs::write(dir.path().join("blocked"), b"").unwrap();
    let gen = Generator::new(dir.path()).unwrap();

    let mut files: Vec<Box<dyn File>> = vec![Box::new(Blocked)];
    files.extend(all_files(&root));
    let report = gen.write_all(&files, "my_app").unwrap();
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].1.contains("io failure"));
    // siblings still generated
    assert!(dir.path().join("openapi.json").exists());
}

#[test]
fn test_openapi_emits_validation_constraints() {
    let mut design = Design::new("constrained");
    design.service("svc", |e| {
        method(e, "submit", |e| {
            payload(
                e,
                inline(|e| {
                    attribute_with(e, "code", Primitive::String, |e| {
                        pattern(e, "^[A-Z]+$");
                        max_length(e, 8);
                    });
                    attribute_with(e, "age", Primitive::Int32, |e| {
                        minimum(e, 0.0);
                        maximum(e, 150.0);
                    });
                }),
            );
        });
    });
    let root = design.finalize().unwrap();
    let doc = build_document(&root);
    let props = &doc["paths"]["/svc/submit"]["post"]["requestBody"]["content"]
        ["application/json"]["schema"]["properties"];
    assert_eq!(props["code"]["pattern"], "^[A-Z]+$");
    assert_eq!(props["code"]["maxLength"], 8);
    assert_eq!(props["age"]["minimum"], 0.0);
    assert_eq!(props["age"]["maximum"], 150.0);
}

#[test]
fn test_openapi_document_shape() {
    let root = finalized_demo();
    let doc = build_document(&root);

    // shared named type becomes a component reference
    assert_eq!(
        doc["paths"]["/calculator/add"]["post"]["requestBody"]["content"]["application/json"]
            ["schema"]["$ref"],
        "#/components/schemas/Operands"
    );
    // the component schema itself carries no use-site marks
    let component = &doc["components"]["schemas"]["Operands"];
    assert_eq!(component["type"], "object");
    assert!(component.get("required").is_none());

    // the refined duplicate is inlined with its required marks
    let divide_schema = &doc["paths"]["/calculator/divide"]["post"]["requestBody"]["content"]
        ["application/json"]["schema"];
    assert!(divide_schema.get("$ref").is_none());
    assert_eq!(
        divide_schema["required"],
        serde_json::json!(["left", "right"])
    );

    // declared error statuses line up with the generated client decoders
    assert_eq!(
        doc["paths"]["/calculator/divide"]["post"]["responses"]["400"]["description"],
        "div_by_zero"
    );
    // methods without payloads/results still map totally
    assert_eq!(
        doc["paths"]["/calculator/explain"]["post"]["responses"]["200"]["description"],
        "explain result"
    );
}

#[test]
fn test_openapi_document_is_idempotent_over_finalized_tree() {
    let root = finalized_demo();
    let a = serde_json::to_vec(&build_document(&root)).unwrap();
    let b = serde_json::to_vec(&build_document(&root)).unwrap();
    assert_eq!(a, b);
}
