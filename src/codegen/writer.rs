use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use minijinja::Environment;
use tracing::debug;

use super::error::Error;
use super::file::File;
use super::templates::environment;

/// Outcome of one generation batch.
#[derive(Debug, Default)]
pub struct GenReport {
    pub written: Vec<PathBuf>,
    /// Files whose render, write or finalize step failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl GenReport {
    pub fn ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The generation driver.
///
/// For each file: compute the output path, request sections for the given
/// generation parameter, render them in list order into a single byte
/// stream, write it, then run the file's finalize hook. Output is
/// deterministic: same finalized tree and same `gen_pkg` produce
/// byte-identical artifacts.
pub struct Generator {
    env: Environment<'static>,
    out_dir: PathBuf,
}

impl Generator {
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self, Error> {
        Ok(Generator {
            env: environment()?,
            out_dir: out_dir.into(),
        })
    }

    /// Render a file's sections, in order, into one byte stream.
    pub fn render_file(&self, file: &dyn File, gen_pkg: &str) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        for section in file.sections(gen_pkg) {
            let tmpl = self
                .env
                .get_template(&section.template)
                .map_err(|_| Error::UnknownTemplate(section.template.clone()))?;
            let rendered = tmpl.render(minijinja::Value::from_serialize(&section.data))?;
            buf.extend_from_slice(rendered.as_bytes());
        }
        Ok(buf)
    }

    /// Render and write one file, then run its finalize hook.
    pub fn write_file(&self, file: &dyn File, gen_pkg: &str) -> anyhow::Result<PathBuf> {
        let rel = file.output_path();
        let path = self.out_dir.join(&rel);
        debug!(path = %path.display(), "rendering file");
        let bytes = self.render_file(file, gen_pkg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, bytes).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        file.finalize(&path, gen_pkg)
            .with_context(|| format!("finalize failed for {}", path.display()))?;
        Ok(path)
    }

    /// Generate the whole batch.
    ///
    /// A failing file is recorded in the report and does not abort its
    /// siblings; only the fatal internal error kind aborts the run, since
    /// continuing past a generator bug would produce undefined output.
    pub fn write_all(&self, files: &[Box<dyn File>], gen_pkg: &str) -> Result<GenReport, Error> {
        let mut report = GenReport::default();
        for file in files {
            let rel = file.output_path();
            match self.write_file(file.as_ref(), gen_pkg) {
                Ok(path) => {
                    println!("✅ Generated {}", path.display());
                    report.written.push(path);
                }
                Err(err) => match err.downcast::<Error>() {
                    Ok(err) if err.is_fatal() => return Err(err),
                    Ok(err) => {
                        println!("⚠️  Failed {}: {err}", rel.display());
                        report.failed.push((rel, err.to_string()));
                    }
                    Err(err) => {
                        println!("⚠️  Failed {}: {err:#}", rel.display());
                        report.failed.push((rel, format!("{err:#}")));
                    }
                },
            }
        }
        Ok(report)
    }
}
