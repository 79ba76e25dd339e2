use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{self, CommandReport};
use crate::config::{self, BriefConfig};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Parser)]
#[command(
    name = "brief",
    version,
    about = "Summarize Markdown trees with a local Ollama model"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan a directory tree and write a summary next to every Markdown document.
    Run(RunArgs),
    /// List the models installed on the Ollama host.
    Models(ModelsArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Root directory to scan; falls back to processing.root_path from the config file.
    root: Option<PathBuf>,
    /// Ollama host URL.
    #[arg(long)]
    host: Option<String>,
    /// Model name; bypasses preferred-model resolution entirely.
    #[arg(long)]
    model: Option<String>,
    /// Chunk size in code points.
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Chunk overlap in code points.
    #[arg(long)]
    chunk_overlap: Option<usize>,
    /// Overwrite existing *_summary.md files.
    #[arg(long)]
    force: bool,
    /// Plan only: no generation calls, no writes.
    #[arg(long)]
    dry_run: bool,
    /// Max files to process (0 = unlimited).
    #[arg(long)]
    max_files: Option<usize>,
    /// Verbose output.
    #[arg(long)]
    verbose: bool,
    /// Suppress progress output (errors are still reported).
    #[arg(long)]
    quiet: bool,
    /// Regular expression for paths to skip (repeatable).
    #[arg(long = "exclude", value_name = "PATTERN")]
    excludes: Vec<String>,
    /// HTTP request timeout in seconds.
    #[arg(long)]
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Args)]
struct ModelsArgs {
    /// Ollama host URL.
    #[arg(long)]
    host: Option<String>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let report = match cli.command {
        Command::Run(args) => commands::run::run(&merge_run_options(args)?)?,
        Command::Models(args) => {
            let mut cfg = config::load_config()?;
            if let Some(host) = args.host {
                cfg.ollama.host = host;
            }
            commands::models::run(&cfg)?
        }
    };
    finish(report)
}

fn merge_run_options(args: RunArgs) -> Result<commands::run::RunOptions> {
    let mut cfg = config::load_config()?;
    apply_run_flags(&mut cfg, &args);
    let root = resolve_root(&cfg, args.root)?;
    Ok(commands::run::RunOptions {
        config: cfg,
        root,
        explicit_model: args.model,
        dry_run: args.dry_run,
    })
}

/// CLI flags sit on top of the layered config; boolean flags can only switch
/// their setting on, never back off.
fn apply_run_flags(cfg: &mut BriefConfig, args: &RunArgs) {
    if let Some(host) = &args.host {
        cfg.ollama.host = host.clone();
    }
    if let Some(size) = args.chunk_size {
        cfg.processing.chunk_size = size;
    }
    if let Some(overlap) = args.chunk_overlap {
        cfg.processing.chunk_overlap = overlap;
    }
    if let Some(timeout) = args.request_timeout_secs {
        cfg.processing.request_timeout_secs = timeout;
    }
    if let Some(max) = args.max_files {
        cfg.processing.max_files = max;
    }
    if args.force {
        cfg.output.force = true;
    }
    if args.verbose {
        cfg.output.verbose = true;
    }
    if args.quiet {
        cfg.output.quiet = true;
    }
    if !args.excludes.is_empty() {
        cfg.filters.exclude_patterns = args.excludes.clone();
    }
    if cfg.processing.request_timeout_secs == 0 {
        cfg.processing.request_timeout_secs = DEFAULT_REQUEST_TIMEOUT_SECS;
    }
}

fn resolve_root(cfg: &BriefConfig, cli_root: Option<PathBuf>) -> Result<PathBuf> {
    let root = match cli_root {
        Some(root) => root,
        None => match &cfg.processing.root_path {
            Some(raw) => config::expand_home(raw),
            None => anyhow::bail!(
                "root path must be specified as an argument or via processing.root_path in the config file"
            ),
        },
    };
    let metadata = std::fs::metadata(&root)
        .with_context(|| format!("invalid root path {}", root.display()))?;
    if !metadata.is_dir() {
        anyhow::bail!("root path {} is not a directory", root.display());
    }
    Ok(root)
}

fn finish(report: CommandReport) -> Result<()> {
    for detail in &report.details {
        println!("{detail}");
    }
    for issue in &report.issues {
        eprintln!("error: {issue}");
    }
    if report.ok {
        Ok(())
    } else {
        anyhow::bail!("{} finished with errors", report.command)
    }
}
