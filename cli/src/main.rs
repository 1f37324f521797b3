use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tantrums_core::{Analyzer, LintConfig};

mod report;
#[cfg(test)]
mod main_test;

use report::FileReport;

const LOG_ENV: &str = "TANTRUMS_LOG";
const DEFAULT_CONFIG_FILE: &str = "tantrums-lint.toml";

#[derive(Debug, Parser)]
#[command(name = "tantrums-lint", author, version, about = "Linter for the Tantrums language", long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,

    /// Log analysis progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Lint one or more source files.
    Check {
        #[arg(value_name = "FILE", required = true, value_parser = parse_sanitized_path)]
        files: Vec<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Report only error diagnostics
        #[arg(long)]
        errors_only: bool,
        /// Lint config (TOML); defaults to ./tantrums-lint.toml when present
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// List every rule with its default severity.
    Rules,
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(raw);
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        anyhow::bail!("Parent directory components ('..') are not allowed in file paths.");
    }
    Ok(p.to_path_buf())
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<LintConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                return Ok(LintConfig::default());
            }
            default
        }
    };
    let src = std::fs::read_to_string(&path).with_context(|| format!("Failed to read config '{}'", path.display()))?;
    info!(config = %path.display(), "loaded lint config");
    LintConfig::from_toml_str(&src).with_context(|| format!("Invalid config '{}'", path.display()))
}

fn check_files(files: &[PathBuf], config: LintConfig, errors_only: bool) -> anyhow::Result<Vec<FileReport>> {
    let analyzer = Analyzer::with_config(config);
    files
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file '{}'", path.display()))?;
            let analysis = analyzer.analyze(&text);
            debug!(file = %path.display(), count = analysis.diagnostics.len(), "checked");
            Ok(FileReport::new(path.display().to_string(), analysis, errors_only))
        })
        .collect()
}

fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    match args.command {
        Commands::Rules => {
            print!("{}", report::render_rules());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            files,
            format,
            errors_only,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let reports = check_files(&files, config, errors_only)?;
            match format {
                OutputFormat::Text => print!("{}", report::render_text(&reports)),
                OutputFormat::Json => println!("{}", report::render_json(&reports)?),
            }
            let failed = reports.iter().any(|r| r.error_count() > 0);
            Ok(if failed { ExitCode::from(1) } else { ExitCode::SUCCESS })
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
