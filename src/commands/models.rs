use anyhow::Result;
use std::time::Duration;

use crate::commands::CommandReport;
use crate::config::BriefConfig;
use crate::ollama::client::OllamaClient;

pub fn run(cfg: &BriefConfig) -> Result<CommandReport> {
    let mut report = CommandReport::new("models");
    let client = OllamaClient::new(
        &cfg.ollama.host,
        Duration::from_secs(cfg.processing.request_timeout_secs),
    )?;
    report.detail(format!("host={}", client.host()));

    match client.list_models() {
        Ok(models) if models.is_empty() => {
            report.detail("no models installed");
        }
        Ok(models) => {
            for name in models {
                if cfg.ollama.preferred_models.iter().any(|p| p == &name) {
                    report.detail(format!("{name} (preferred)"));
                } else {
                    report.detail(name);
                }
            }
        }
        Err(err) => {
            report.issue(format!(
                "unable to query models from {}: {err}",
                client.host()
            ));
        }
    }
    Ok(report)
}
