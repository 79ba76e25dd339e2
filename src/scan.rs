use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SUMMARY_SUFFIX: &str = "_summary";

pub fn compile_excludes(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|raw| Regex::new(raw).with_context(|| format!("invalid exclude pattern {raw:?}")))
        .collect()
}

/// A pattern excludes a path when it matches either the absolute path or the
/// root-relative one, so operators can write patterns in whichever form they
/// think in.
pub fn matches_exclude(path: &Path, root: &Path, patterns: &[Regex]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let mut candidates = vec![path.to_string_lossy().to_string()];
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => {
            candidates.push(rel.to_string_lossy().to_string());
        }
        _ => {}
    }
    candidates
        .iter()
        .any(|candidate| patterns.iter().any(|re| re.is_match(candidate)))
}

pub fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("md")
}

/// True for files this tool itself produces; they are never re-summarized.
/// A bare `_summary.md` does not count, only `<stem>_summary.md`.
pub fn is_summary_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix("_summary.md"))
        .is_some_and(|stem| !stem.is_empty())
}

/// Derive the sibling output path: `report.md` -> `report_summary.md`.
/// Extensionless inputs just gain the suffix.
pub fn summary_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => path.with_file_name(format!("{stem}{SUMMARY_SUFFIX}.{ext}")),
        None => path.with_file_name(format!("{stem}{SUMMARY_SUFFIX}")),
    }
}

pub fn display_path(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
        _ => path.display().to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: &'static str,
    pub directory: bool,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub plan: Vec<PathBuf>,
    pub skipped: Vec<SkippedPath>,
    pub errors: Vec<String>,
}

/// Walk `root` in sorted order and collect every Markdown document that is
/// neither excluded nor a summary file. Excluded directories are not
/// descended into. Walk errors are collected, not fatal.
pub fn build_plan(root: &Path, excludes: &[Regex]) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    let mut walker = WalkDir::new(root).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                outcome.errors.push(format!("walk error: {err}"));
                continue;
            }
        };
        let path = entry.path();

        if matches_exclude(path, root, excludes) {
            if entry.file_type().is_dir() {
                outcome.skipped.push(SkippedPath {
                    path: path.to_path_buf(),
                    reason: "directory excluded",
                    directory: true,
                });
                walker.skip_current_dir();
            } else {
                outcome.skipped.push(SkippedPath {
                    path: path.to_path_buf(),
                    reason: "excluded by pattern",
                    directory: false,
                });
            }
            continue;
        }

        if entry.file_type().is_dir() || !is_markdown(path) || is_summary_file(path) {
            continue;
        }
        outcome.plan.push(path.to_path_buf());
    }

    outcome
}
