//! PDF tools command line
//!
//! Runs any of the tools locally on files from disk.

mod config;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use config::Config;
use pdftools_core::{
    profile, FeatureId, InputFile, LopdfEngine, ProcessResult, ProcessSettings, Session, FEATURES,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pdftools")]
#[command(version, about = "Merge, split, compress and convert PDF files locally")]
struct Cli {
    /// TOML config file with [upload] and [output] tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available tools
    Features {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a tool on one or more files
    Run(RunArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    /// Tool id, e.g. merge or delete-pages
    feature: String,

    /// Input files, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Pages to extract when splitting ("1-3, 5"); all pages if omitted
    #[arg(long)]
    pages: Option<String>,

    /// Pages to delete ("2, 4, 7-9")
    #[arg(long)]
    delete: Option<String>,

    /// Compression level: low, medium or high
    #[arg(long)]
    level: Option<String>,

    /// Form data as a JSON object
    #[arg(long)]
    form_data: Option<String>,

    /// Where the form block goes: top, center or bottom
    #[arg(long)]
    form_position: Option<String>,

    /// Output file; defaults to the suggested name in the output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the result as JSON instead of a summary line
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries results, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref()).await?;

    match cli.command {
        Command::Features { json } => print_features(json),
        Command::Run(args) => {
            let json = args.json;
            let feature = args.feature.clone();
            match run(args, &config).await {
                Ok((path, result)) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    } else {
                        println!("{}", path.display());
                    }
                    Ok(())
                }
                Err(e) => {
                    if json {
                        if let Ok(id) = feature.parse::<FeatureId>() {
                            let result = ProcessResult::failed(id, format!("{:#}", e));
                            println!("{}", serde_json::to_string_pretty(&result)?);
                        }
                    }
                    Err(e)
                }
            }
        }
    }
}

fn print_features(json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&FEATURES)?);
        return Ok(());
    }

    for feature in FEATURES.iter() {
        let accepted = profile(feature.id.as_str()).accepted_extensions.join(" ");
        println!(
            "{:<14} {:<16} {} ({})",
            feature.id.as_str(),
            feature.title,
            feature.description,
            accepted
        );
    }
    Ok(())
}

/// Run one tool and write its artifact; returns where it was written
async fn run(args: RunArgs, config: &Config) -> anyhow::Result<(PathBuf, ProcessResult)> {
    let mut session = Session::new(LopdfEngine, config.upload);
    let selected = session.select_feature(&args.feature);
    let Some(feature) = selected.feature else {
        bail!("Unknown feature '{}'. Run `pdftools features` for the list", args.feature);
    };

    let mut inputs = Vec::with_capacity(args.files.len());
    for path in &args.files {
        inputs.push(read_input(path).await?);
    }

    let rejections = session.add_files(inputs);
    for rejection in &rejections {
        warn!("{}", rejection);
    }
    if !rejections.is_empty() && session.files().is_empty() {
        bail!("None of the input files can be used for {}", feature);
    }

    session.set_settings(settings_from_args(&args)?);

    let artifact = session.run()?;
    let destination = match &args.output {
        Some(path) => path.clone(),
        None => config
            .output
            .directory
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
            .join(&artifact.file_name),
    };

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&destination, &artifact.bytes)
        .await
        .with_context(|| format!("Failed to write {}", destination.display()))?;
    info!(path = %destination.display(), bytes = artifact.bytes.len(), "artifact written");

    let metrics = session
        .metrics()
        .copied()
        .context("Run finished without metrics")?;
    let artifact = session.artifact().context("Run finished without an artifact")?;
    Ok((
        destination,
        ProcessResult::succeeded(feature, artifact, metrics),
    ))
}

async fn read_input(path: &Path) -> anyhow::Result<InputFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(InputFile::new(name, bytes))
}

fn settings_from_args(args: &RunArgs) -> anyhow::Result<ProcessSettings> {
    let mut settings = ProcessSettings {
        page_range: args.pages.clone(),
        pages_to_delete: args.delete.clone(),
        compression_level: args.level.clone(),
        form_position: args.form_position.clone(),
        ..Default::default()
    };

    if let Some(text) = &args.form_data {
        // the session keeps stale data on bad JSON; on the command line that is an error
        let value: serde_json::Value =
            serde_json::from_str(text).context("--form-data is not valid JSON")?;
        anyhow::ensure!(value.is_object(), "--form-data must be a JSON object");
        settings.set_form_data_text(text.as_str());
    }

    Ok(settings)
}
