use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::commands::CommandReport;
use crate::config::BriefConfig;
use crate::error::DocumentError;
use crate::lock;
use crate::ollama::client::OllamaClient;
use crate::scan;
use crate::summarize::cleaner::ResponseCleaner;
use crate::summarize::model_select::{BaseNameScorer, SelectionNote, select_model};
use crate::summarize::pipeline::{Progress, SummarizeOptions, summarize_document};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: BriefConfig,
    pub root: PathBuf,
    pub explicit_model: Option<String>,
    pub dry_run: bool,
}

/// Progress lines go to stdout unless `--quiet`; errors always go to stderr.
struct Status {
    quiet: bool,
}

impl Status {
    fn line(&self, text: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", text.as_ref());
        }
    }
}

/// Everything needed to take one document from raw text to its written
/// summary file.
struct DocumentProcessor<'a> {
    client: &'a OllamaClient,
    model: &'a str,
    options: SummarizeOptions,
    cleaner: &'a ResponseCleaner,
    status: &'a Status,
}

impl DocumentProcessor<'_> {
    fn process(
        &self,
        path: &Path,
        summary_file: &Path,
        display: &str,
    ) -> Result<(), DocumentError> {
        let raw = fs::read_to_string(path).map_err(DocumentError::Read)?;
        let summary = summarize_document(
            self.client,
            self.model,
            &raw,
            &self.options,
            self.cleaner,
            |progress| match progress {
                Progress::Chunk { index, total } => {
                    self.status.line(format!("CHNK {display} ({index}/{total})"));
                }
                Progress::Merge { chunks } => {
                    self.status.line(format!("MERGE {display} ({chunks} chunks)"));
                }
            },
        )?;
        fs::write(summary_file, format!("{summary}\n")).map_err(DocumentError::Write)?;
        Ok(())
    }
}

pub fn run(opts: &RunOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("run");
    let cfg = &opts.config;
    let status = Status { quiet: cfg.output.quiet };

    let excludes = scan::compile_excludes(&cfg.filters.exclude_patterns)?;
    let cleaner = ResponseCleaner::new(&cfg.filters.strip_patterns)?;
    let client = OllamaClient::new(
        &cfg.ollama.host,
        Duration::from_secs(cfg.processing.request_timeout_secs),
    )?;

    let held_lock = lock::acquire()?;
    if cfg.output.verbose {
        report.detail(format!("lock={}", held_lock.path().display()));
    }

    let catalog = match client.list_models() {
        Ok(models) => Some(models),
        Err(err) => {
            warn!("unable to query models from {}: {err}", client.host());
            None
        }
    };
    let selection = select_model(
        opts.explicit_model.as_deref(),
        &cfg.ollama.preferred_models,
        catalog.as_deref(),
        &BaseNameScorer,
    )
    .context("model selection failed")?;
    match &selection.note {
        Some(note @ SelectionNote::ClosestMatch { .. }) => info!("{note}"),
        Some(note @ SelectionNote::NoPreferredInstalled { .. }) => warn!("{note}"),
        None => {}
    }
    let model = selection.model;
    if cfg.output.verbose {
        report.detail(format!("model={model}"));
    }

    let outcome = scan::build_plan(&opts.root, &excludes);
    for err in &outcome.errors {
        eprintln!("ERR  {err}");
        report.issue(err.clone());
    }
    for skipped in &outcome.skipped {
        if skipped.directory && !cfg.output.verbose {
            continue;
        }
        status.line(format!(
            "SKIP {} ({})",
            scan::display_path(&skipped.path, &opts.root),
            skipped.reason
        ));
    }

    let processor = DocumentProcessor {
        client: &client,
        model: &model,
        options: SummarizeOptions {
            chunk_size: cfg.processing.chunk_size,
            chunk_overlap: cfg.processing.chunk_overlap,
        },
        cleaner: &cleaner,
        status: &status,
    };
    let max_files = cfg.processing.max_files;
    let mut processed = 0usize;
    let mut failed = 0usize;

    for path in &outcome.plan {
        if max_files > 0 && processed >= max_files {
            break;
        }
        let display = scan::display_path(path, &opts.root);
        let summary_file = scan::summary_path(path);
        let summary_display = scan::display_path(&summary_file, &opts.root);

        if !cfg.output.force && summary_file.exists() {
            status.line(format!("SKIP {display} (summary exists)"));
            continue;
        }

        if opts.dry_run {
            status.line(format!(
                "DRY  {display} (would create {summary_display}, model={model}, chunk={}/{})",
                processor.options.chunk_size, processor.options.chunk_overlap
            ));
            processed += 1;
            continue;
        }

        match processor.process(path, &summary_file, &display) {
            Ok(()) => status.line(format!("OK   {display} -> {summary_display}")),
            Err(err) => {
                eprintln!("ERR  {display} ({:#})", anyhow::Error::from(err));
                failed += 1;
            }
        }
        processed += 1;
    }

    if !cfg.output.quiet {
        report.detail(format!("processed={processed}"));
    }
    if failed > 0 {
        report.issue(format!("{failed} document(s) failed"));
    }
    Ok(report)
}
