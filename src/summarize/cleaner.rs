use anyhow::{Context, Result};
use regex::Regex;

/// Reasoning block emitted by thinking-mode models; stripped by default.
pub const THINK_BLOCK_PATTERN: &str = r"(?is)<think>.*?</think>\s*";

/// Post-processing applied to every oracle response before the text is used
/// further. Additional strip patterns come from configuration.
#[derive(Debug, Clone)]
pub struct ResponseCleaner {
    patterns: Vec<Regex>,
}

impl ResponseCleaner {
    pub fn new(extra_patterns: &[String]) -> Result<Self> {
        let mut patterns = vec![
            Regex::new(THINK_BLOCK_PATTERN).context("default strip pattern is invalid")?,
        ];
        for raw in extra_patterns {
            let compiled =
                Regex::new(raw).with_context(|| format!("invalid strip pattern {raw:?}"))?;
            patterns.push(compiled);
        }
        Ok(Self { patterns })
    }

    pub fn clean(&self, text: &str) -> String {
        let mut out = text.to_string();
        for pattern in &self.patterns {
            out = pattern.replace_all(&out, "").into_owned();
        }
        out.trim().to_string()
    }
}
