use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Value};

/// An immutable pairing of a template identifier and the data it binds.
///
/// Sections render strictly in the order they appear in a file's list;
/// later sections may reference declarations emitted by earlier ones, so
/// the ordering is a design contract, not an accident.
#[derive(Debug, Clone)]
pub struct Section {
    pub template: String,
    pub data: Value,
}

impl Section {
    pub fn new(template: &str, data: Value) -> Self {
        Section {
            template: template.to_string(),
            data,
        }
    }
}

/// One output artifact.
///
/// `sections` takes the generation-time parameter (`gen_pkg`, the consumer's
/// import root) because generated references legitimately differ with it;
/// section lists are recomputed per call, never cached across differing
/// parameters. `finalize` runs after the rendered stream has been written
/// and may post-process the artifact; a failure is an error for this file
/// only and must not block sibling files.
pub trait File {
    /// Output path relative to the generation root. A pure function of the
    /// service name and artifact kind, stable across runs.
    fn output_path(&self) -> PathBuf;

    /// The ordered section list for the given generation parameter.
    fn sections(&self, gen_pkg: &str) -> Vec<Section>;

    /// Post-write hook (formatting, dead-import pruning). Default: no-op.
    fn finalize(&self, _written: &Path, _gen_pkg: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Generic [`File`] built from an output path and a sections closure.
pub struct SourceFile {
    path: PathBuf,
    sections: Box<dyn Fn(&str) -> Vec<Section>>,
}

impl SourceFile {
    pub fn new(path: PathBuf, sections: impl Fn(&str) -> Vec<Section> + 'static) -> Self {
        SourceFile {
            path,
            sections: Box::new(sections),
        }
    }
}

impl File for SourceFile {
    fn output_path(&self) -> PathBuf {
        self.path.clone()
    }

    fn sections(&self, gen_pkg: &str) -> Vec<Section> {
        (self.sections)(gen_pkg)
    }
}

/// One `use` line in a generated file header.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSpec {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ImportSpec {
    pub fn new(path: impl Into<String>) -> Self {
        ImportSpec {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        ImportSpec {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }
}

/// The conventional first section of a generated source file: a banner
/// comment with the title followed by the import list.
pub fn header_section(title: &str, imports: &[ImportSpec]) -> Section {
    Section::new(
        "header",
        json!({
            "title": title,
            "imports": imports,
        }),
    )
}
