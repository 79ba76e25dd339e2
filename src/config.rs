use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    pub host: String,
    pub preferred_models: Vec<String>,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            preferred_models: vec![
                "qwen3:14b".to_string(),
                "deepseek-r1:14b".to_string(),
                "llama3".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    pub root_path: Option<String>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub request_timeout_secs: u64,
    pub max_files: usize,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            root_path: None,
            chunk_size: 4000,
            chunk_overlap: 400,
            request_timeout_secs: 600,
            max_files: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputSettings {
    pub force: bool,
    pub verbose: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterSettings {
    pub exclude_patterns: Vec<String>,
    pub strip_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BriefConfig {
    pub ollama: OllamaSettings,
    pub processing: ProcessingSettings,
    pub output: OutputSettings,
    pub filters: FilterSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialBriefConfig {
    ollama: Option<OllamaSettings>,
    processing: Option<ProcessingSettings>,
    output: Option<OutputSettings>,
    filters: Option<FilterSettings>,
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env::var(var) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_opt_string(var: &str, fallback: Option<String>) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => fallback,
    }
}

fn env_or_csv(var: &str, fallback: &[String]) -> Vec<String> {
    match env::var(var) {
        Ok(v) => {
            let out = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>();
            if out.is_empty() { fallback.to_vec() } else { out }
        }
        Err(_) => fallback.to_vec(),
    }
}

fn validate(cfg: &BriefConfig) -> Result<()> {
    if cfg.ollama.host.trim().is_empty() {
        return Err(anyhow!("invalid ollama host: cannot be empty"));
    }
    if cfg.processing.request_timeout_secs == 0 {
        return Err(anyhow!("invalid request timeout: must be >= 1 second"));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("BRIEF_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".config").join("brief.toml"))
}

fn apply_partial(base: &mut BriefConfig, parsed: PartialBriefConfig) {
    if let Some(ollama) = parsed.ollama {
        base.ollama = ollama;
    }
    if let Some(processing) = parsed.processing {
        base.processing = processing;
    }
    if let Some(output) = parsed.output {
        base.output = output;
    }
    if let Some(filters) = parsed.filters {
        base.filters = filters;
    }
}

fn merge_file_config(base: &mut BriefConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialBriefConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    apply_partial(base, parsed);
    Ok(())
}

/// Expand a leading `~/` against the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Layered load: struct defaults, then the optional TOML file, then `BRIEF_*`
/// environment variables. CLI flags are applied on top by the caller.
pub fn load_config() -> Result<BriefConfig> {
    let mut cfg = BriefConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.ollama.host = env_or_string("BRIEF_HOST", &cfg.ollama.host);
    cfg.ollama.preferred_models =
        env_or_csv("BRIEF_PREFERRED_MODELS", &cfg.ollama.preferred_models);
    cfg.processing.root_path =
        env_or_opt_string("BRIEF_ROOT_PATH", cfg.processing.root_path.take());
    cfg.processing.chunk_size = env_or_usize("BRIEF_CHUNK_SIZE", cfg.processing.chunk_size);
    cfg.processing.chunk_overlap =
        env_or_usize("BRIEF_CHUNK_OVERLAP", cfg.processing.chunk_overlap);
    cfg.processing.request_timeout_secs = env_or_u64(
        "BRIEF_REQUEST_TIMEOUT_SECS",
        cfg.processing.request_timeout_secs,
    );
    cfg.processing.max_files = env_or_usize("BRIEF_MAX_FILES", cfg.processing.max_files);
    cfg.output.force = env_or_bool("BRIEF_FORCE", cfg.output.force);
    cfg.output.verbose = env_or_bool("BRIEF_VERBOSE", cfg.output.verbose);
    cfg.output.quiet = env_or_bool("BRIEF_QUIET", cfg.output.quiet);
    cfg.filters.exclude_patterns =
        env_or_csv("BRIEF_EXCLUDE_PATTERNS", &cfg.filters.exclude_patterns);
    cfg.filters.strip_patterns = env_or_csv("BRIEF_STRIP_PATTERNS", &cfg.filters.strip_patterns);

    validate(&cfg)?;
    Ok(cfg)
}
