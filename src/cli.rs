use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};

use crate::codegen::http::{client_files, OpenApiFile};
use crate::codegen::{File, Generator};
use crate::demo::calc_design;

#[derive(Parser)]
#[command(name = "apiforge-gen")]
#[command(about = "apiforge CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate transport sources and the OpenAPI document from the bundled
    /// demo design
    Generate {
        /// Output directory for generated artifacts
        #[arg(short, long, default_value = "generated")]
        output: PathBuf,

        /// Import root spliced into generated references
        #[arg(short, long, default_value = "apiforge_demo")]
        pkg: String,

        /// Overwrite a non-empty output directory
        #[arg(short, long)]
        force: bool,
    },
    /// Evaluate the demo design and report collected diagnostics
    Check,
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate { output, pkg, force } => generate(&output, &pkg, force),
        Commands::Check => check(),
    }
}

fn generate(output: &PathBuf, pkg: &str, force: bool) -> anyhow::Result<()> {
    if !force
        && output
            .read_dir()
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    {
        bail!(
            "output directory {:?} is not empty, pass --force to overwrite",
            output
        );
    }

    let design = calc_design();
    let root = match design.finalize() {
        Ok(root) => root,
        Err(batch) => {
            for d in &batch {
                println!("❌ {d}");
            }
            bail!("design has {} error(s)", batch.len());
        }
    };

    let mut files = client_files(&root);
    files.push(Box::new(OpenApiFile::new(&root)?) as Box<dyn File>);

    let generator = Generator::new(output)?;
    let report = generator.write_all(&files, pkg)?;
    if !report.ok() {
        bail!("{} file(s) failed to generate", report.failed.len());
    }
    println!("✅ Generated {} files → {:?}", report.written.len(), output);
    Ok(())
}

fn check() -> anyhow::Result<()> {
    let design = calc_design();
    match design.finalize() {
        Ok(root) => {
            println!(
                "✅ Design \"{}\" is clean: {} service(s), {} type(s)",
                root.name,
                root.services.len(),
                root.types.len()
            );
            Ok(())
        }
        Err(batch) => {
            for d in &batch {
                println!("❌ {d}");
            }
            bail!("design has {} error(s)", batch.len());
        }
    }
}
