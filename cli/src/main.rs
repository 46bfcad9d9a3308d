//! Corona CLI: generate sample BACnet metrics and validate RDF documents

mod demo;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use corona::{validate_files, CoreShapeValidator, CoronaConfig, ExportFormat, Exporter, Inference};
use demo::DemoKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "corona", version, about = "Corona BACnet metric tool")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Ttl,
    Nt,
    Haystack,
    Prometheus,
    Json,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Ttl => ExportFormat::Turtle,
            OutputFormat::Nt => ExportFormat::NTriples,
            OutputFormat::Haystack => ExportFormat::Haystack,
            OutputFormat::Prometheus => ExportFormat::Prometheus,
            OutputFormat::Json => ExportFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate sample metrics and serialize them
    Generate {
        /// Type of sample metric(s) to generate
        #[arg(long = "type", value_enum, default_value = "all")]
        kind: DemoKind,

        /// Output format
        #[arg(long, value_enum, default_value = "ttl")]
        format: OutputFormat,

        /// Write the output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Metric name prefix for the exposition format
        #[arg(long)]
        prefix: Option<String>,

        /// YAML configuration file
        #[arg(long, env = "CORONA_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Validate a Turtle document against the shapes
    Validate {
        /// Document to validate (`.nt` is read as N-Triples, anything else as Turtle)
        #[arg(long)]
        file: PathBuf,

        /// Shapes document
        #[arg(long, default_value = "data/corona-shapes.ttl")]
        shapes: PathBuf,

        /// Ontology merged into the data before inference
        #[arg(long)]
        ontology: Option<PathBuf>,

        /// Skip RDFS inference
        #[arg(long)]
        no_inference: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let result = match cli.command {
        Commands::Generate {
            kind,
            format,
            output,
            prefix,
            config,
        } => run_generate(kind, format.into(), output.as_deref(), prefix, config.as_deref()),
        Commands::Validate {
            file,
            shapes,
            ontology,
            no_inference,
        } => run_validate(&file, &shapes, ontology.as_deref(), no_inference),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(path: Option<&Path>, prefix: Option<String>) -> anyhow::Result<CoronaConfig> {
    let config = match path {
        Some(path) => CoronaConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CoronaConfig::default(),
    };
    Ok(match prefix {
        Some(prefix) => config.with_exposition_prefix(prefix),
        None => config,
    })
}

fn run_generate(
    kind: DemoKind,
    format: ExportFormat,
    output: Option<&Path>,
    prefix: Option<String>,
    config: Option<&Path>,
) -> anyhow::Result<bool> {
    let config = load_config(config, prefix)?;
    let exporter = Exporter::new(&config)?;
    let records = demo::records(kind, Utc::now())?;

    let rendered = exporter.export(&records, format)?;
    if !rendered.diagnostics.is_empty() {
        warn!("{} values were degraded or skipped", rendered.diagnostics.len());
    }

    match output {
        Some(path) => {
            std::fs::write(path, &rendered.text).with_context(|| format!("writing {}", path.display()))?;
            println!("Output written to {}", path.display());
        }
        None => println!("{}", rendered.text),
    }
    Ok(true)
}

fn run_validate(file: &Path, shapes: &Path, ontology: Option<&Path>, no_inference: bool) -> anyhow::Result<bool> {
    let inference = if no_inference { Inference::None } else { Inference::Rdfs };
    let validator = CoreShapeValidator::new(inference);
    let report = validate_files(file, shapes, ontology, &validator)
        .with_context(|| format!("validating {}", file.display()))?;

    if report.conforms {
        info!("{} conforms", file.display());
        println!("Validation successful! The data conforms to the shapes.");
    } else {
        println!("Validation failed. See details below:");
        print!("{}", report);
    }
    Ok(report.conforms)
}
