use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const MAX_ERROR_BODY_CHARS: usize = 4096;

/// Failure modes of a single oracle call. The client never retries; callers
/// decide what a failed call means for the document being processed.
#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("request to {url} failed: {source}")]
    Connectivity {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected reply from {url}: {detail}")]
    Protocol { url: String, detail: String },
    #[error("ollama returned empty response")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Blocking client for the Ollama HTTP API. One instance per run; the request
/// timeout covers the whole generation call, not just connection setup.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(host: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: host.trim_end_matches('/').to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.base_url
    }

    /// Query the identifiers of every model installed on the host.
    pub fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|source| OllamaError::Connectivity { url: url.clone(), source })?;
        let payload: TagsResponse = decode(&url, response)?;
        Ok(payload.models.into_iter().map(|entry| entry.name).collect())
    }

    /// Single-shot, non-streaming text generation.
    pub fn generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
        });
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .map_err(|source| OllamaError::Connectivity { url: url.clone(), source })?;
        let payload: GenerateResponse = decode(&url, response)?;
        if payload.response.trim().is_empty() {
            return Err(OllamaError::EmptyResponse);
        }
        Ok(payload.response)
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    url: &str,
    response: reqwest::blocking::Response,
) -> Result<T, OllamaError> {
    let status = response.status();
    if status.as_u16() >= 400 {
        let body = response.text().unwrap_or_default();
        let trimmed: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
        return Err(OllamaError::Protocol {
            url: url.to_string(),
            detail: format!("status {status}: {trimmed}"),
        });
    }
    response.json().map_err(|err| OllamaError::Protocol {
        url: url.to_string(),
        detail: format!("invalid JSON payload: {err}"),
    })
}
