//! Command-line surface for adoc-corpus.
//!
//! - `batch`: resolve a topic map for one distro and convert every document it lists.
//! - `convert`: convert a single file.
//! - `structure`: print the block structure of a single file.
//!
//! [`run`] holds the command logic so integration tests can drive it without
//! spawning the binary; `main` only installs logging and maps the outcome to an
//! exit code.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::batch::run_batch;
use crate::config::{
    BatchConfig, ConverterOptions, DEFAULT_OUTPUT_EXTENSION, DEFAULT_SCRIPTS_DIR,
    DEFAULT_SOURCE_EXTENSION, DEFAULT_TARGET_FORMAT, STRUCTURE_DUMPER_SCRIPT,
};
use crate::convert::{absolute, AsciidocConverter, ConversionJob};
use crate::renderer::{SystemRenderer, ASCIIDOCTOR, RUBY};
use crate::structure::StructureDumper;
use crate::topic_map::TopicMap;

/// Exit code for a batch in which at least one document was skipped.
pub const EXIT_PARTIAL_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[clap(
    name = "adoc-corpus",
    version,
    about = "Convert AsciiDoc documentation trees described by a topic map into flat text files"
)]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[clap(long, global = true, default_value = "info")]
    pub log_level: String,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every document of a topic map that applies to a distro
    Batch(BatchArgs),
    /// Convert a single AsciiDoc file
    Convert(ConvertArgs),
    /// Print the structure of a single AsciiDoc file
    Structure(StructureArgs),
}

/// Options shared by every command that runs asciidoctor.
#[derive(Args, Debug, Clone)]
pub struct ConverterArgs {
    /// YAML file with attributes passed to asciidoctor
    #[clap(short = 'a', long = "attributes")]
    pub attributes: Option<PathBuf>,

    /// Ruby extension used to produce the target format
    #[clap(short = 'c', long)]
    pub converter_file: Option<PathBuf>,

    /// Asciidoctor backend to convert to
    #[clap(short = 'b', long, default_value = DEFAULT_TARGET_FORMAT)]
    pub target_format: String,

    /// Asciidoctor executable, a name on PATH or a path
    #[clap(long, env = "ADOC_CORPUS_ASCIIDOCTOR", default_value = ASCIIDOCTOR)]
    pub asciidoctor: PathBuf,

    /// Directory holding the default extension scripts
    #[clap(long, env = "ADOC_CORPUS_SCRIPTS_DIR", default_value = DEFAULT_SCRIPTS_DIR)]
    pub scripts_dir: PathBuf,
}

impl ConverterArgs {
    pub fn options(&self) -> Result<ConverterOptions> {
        let options = ConverterOptions::new(
            self.target_format.clone(),
            self.converter_file.clone(),
            &self.scripts_dir,
            self.attributes.clone(),
        )?;
        options.trace_loaded();
        Ok(options)
    }

    fn converter(&self) -> Result<AsciidocConverter<SystemRenderer>> {
        let options = self.options()?;
        let renderer = SystemRenderer::new(&self.asciidoctor);
        AsciidocConverter::new(renderer, &options).context("converter pre-flight checks failed")
    }
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// The input directory containing AsciiDoc documentation
    #[clap(short = 'i', long)]
    pub input_dir: PathBuf,

    /// The output directory for converted files
    #[clap(short = 'o', long)]
    pub output_dir: PathBuf,

    /// Distro the docs are built for, e.g. openshift-enterprise
    #[clap(short = 'd', long)]
    pub distro: String,

    /// The topic map file
    #[clap(short = 't', long)]
    pub topic_map: PathBuf,

    /// Extension of source files
    #[clap(long, default_value = DEFAULT_SOURCE_EXTENSION)]
    pub source_extension: String,

    /// Extension given to converted files
    #[clap(long, default_value = DEFAULT_OUTPUT_EXTENSION)]
    pub output_extension: String,

    #[clap(flatten)]
    pub converter: ConverterArgs,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// A file in AsciiDoc format that should be converted
    #[clap(short = 'i', long)]
    pub input_file: PathBuf,

    /// Where the converted file should be stored
    #[clap(short = 'o', long)]
    pub output_file: PathBuf,

    #[clap(flatten)]
    pub converter: ConverterArgs,
}

#[derive(Args, Debug)]
pub struct StructureArgs {
    /// A file in AsciiDoc format
    #[clap(short = 'i', long)]
    pub input_file: PathBuf,

    /// Ruby executable, a name on PATH or a path
    #[clap(long, env = "ADOC_CORPUS_RUBY", default_value = RUBY)]
    pub ruby: PathBuf,

    /// Structure dumper script; defaults to the one in the scripts directory
    #[clap(long)]
    pub dumper_script: Option<PathBuf>,

    /// Directory holding the default scripts
    #[clap(long, env = "ADOC_CORPUS_SCRIPTS_DIR", default_value = DEFAULT_SCRIPTS_DIR)]
    pub scripts_dir: PathBuf,
}

/// How a command that did not hit a fatal error ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Complete,
    /// Every document was attempted and `failed` of them were skipped.
    Partial { failed: usize },
}

impl RunOutcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunOutcome::Complete => ExitCode::SUCCESS,
            RunOutcome::Partial { .. } => ExitCode::from(EXIT_PARTIAL_FAILURE),
        }
    }
}

pub async fn run(cli: Cli) -> Result<RunOutcome> {
    match cli.command {
        Commands::Batch(args) => batch(args).await,
        Commands::Convert(args) => convert(args).await,
        Commands::Structure(args) => structure(args).await,
    }
}

async fn batch(args: BatchArgs) -> Result<RunOutcome> {
    tracing::info!(command = "batch", distro = %args.distro, "Starting batch conversion");
    let converter = args.converter.converter()?;

    let topic_map = TopicMap::load(&args.topic_map)?;
    let paths = topic_map.resolve(&args.distro);

    let output_dir = absolute(&args.output_dir)?;
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let config = BatchConfig {
        input_dir: absolute(&args.input_dir)?,
        output_dir,
        source_extension: args.source_extension,
        output_extension: args.output_extension,
    };

    let report = run_batch(&converter, &config, &paths).await?;

    println!(
        "Converted {} of {} documents.",
        report.converted.len(),
        report.total()
    );
    for failed in &report.failed {
        println!("Skipped {}: {}", failed.path, failed.error);
    }

    if report.is_complete() {
        Ok(RunOutcome::Complete)
    } else {
        Ok(RunOutcome::Partial {
            failed: report.failed.len(),
        })
    }
}

async fn convert(args: ConvertArgs) -> Result<RunOutcome> {
    tracing::info!(command = "convert", input = %args.input_file.display(), "Starting conversion");
    let converter = args.converter.converter()?;
    let job = ConversionJob::new(args.input_file, args.output_file);
    converter.convert(&job).await?;
    println!("Converted {}", job.destination.display());
    Ok(RunOutcome::Complete)
}

async fn structure(args: StructureArgs) -> Result<RunOutcome> {
    tracing::info!(command = "structure", input = %args.input_file.display(), "Dumping structure");
    let script = args
        .dumper_script
        .unwrap_or_else(|| args.scripts_dir.join(STRUCTURE_DUMPER_SCRIPT));
    let dumper = StructureDumper::new(SystemRenderer::new(&args.ruby), &script)
        .context("structure dumper pre-flight checks failed")?;
    let structure = dumper.dump(&args.input_file).await?;
    print!("{structure}");
    Ok(RunOutcome::Complete)
}
