use crate::error::DocumentError;
use crate::ollama::client::OllamaClient;
use crate::summarize::chunk::{Chunk, chunk_text};
use crate::summarize::cleaner::ResponseCleaner;
use crate::summarize::prompt::{LengthCategory, chunk_prompt, merge_prompt};

#[derive(Debug, Clone)]
pub struct SummarizeOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

/// Milestones surfaced to the caller so it can print status lines. The
/// pipeline itself does no I/O besides the oracle calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Chunk { index: usize, total: usize },
    Merge { chunks: usize },
}

/// Map-reduce summarization of one document: summarize every chunk in order,
/// then merge the partial summaries into the final text.
///
/// Chunk calls are issued strictly sequentially and never retried; the first
/// failure aborts the document. Oracle responses pass through `cleaner`
/// before they are used further.
pub fn summarize_document(
    client: &OllamaClient,
    model: &str,
    raw_text: &str,
    options: &SummarizeOptions,
    cleaner: &ResponseCleaner,
    mut progress: impl FnMut(Progress),
) -> Result<String, DocumentError> {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return Err(DocumentError::Empty);
    }

    let mut chunks = chunk_text(trimmed, options.chunk_size, options.chunk_overlap);
    if chunks.is_empty() {
        chunks = vec![Chunk {
            start: 0,
            end: trimmed.chars().count(),
            text: trimmed.to_string(),
        }];
    }

    let total = chunks.len();
    let mut chunk_summaries = Vec::with_capacity(total);
    for (idx, chunk) in chunks.iter().enumerate() {
        progress(Progress::Chunk { index: idx + 1, total });
        let prompt = chunk_prompt(&chunk.text);
        let response = client
            .generate(model, &prompt)
            .map_err(|source| DocumentError::Chunk { index: idx + 1, source })?;
        chunk_summaries.push(cleaner.clean(&response));
    }

    let category = LengthCategory::from_char_count(trimmed.chars().count());
    progress(Progress::Merge { chunks: chunk_summaries.len() });
    let prompt = merge_prompt(&chunk_summaries, category);
    let merged = client.generate(model, &prompt).map_err(DocumentError::Merge)?;
    Ok(cleaner.clean(&merged))
}

#[cfg(test)]
mod tests {
    use super::{Progress, SummarizeOptions, summarize_document};
    use crate::error::DocumentError;
    use crate::ollama::client::OllamaClient;
    use crate::summarize::cleaner::ResponseCleaner;
    use std::time::Duration;

    fn client_for(server: &mockito::ServerGuard) -> OllamaClient {
        OllamaClient::new(&server.url(), Duration::from_secs(5)).expect("client")
    }

    fn cleaner() -> ResponseCleaner {
        ResponseCleaner::new(&[]).expect("cleaner")
    }

    fn options() -> SummarizeOptions {
        SummarizeOptions { chunk_size: 100, chunk_overlap: 10 }
    }

    #[test]
    fn whitespace_only_document_fails_without_oracle_calls() {
        let mut server = mockito::Server::new();
        let generate = server.mock("POST", "/api/generate").expect(0).create();

        let got = summarize_document(
            &client_for(&server),
            "llama3",
            "  \n\t  ",
            &options(),
            &cleaner(),
            |_| {},
        );

        assert!(matches!(got, Err(DocumentError::Empty)));
        generate.assert();
    }

    #[test]
    fn summarizes_chunks_in_order_then_merges() {
        let mut server = mockito::Server::new();
        let generate = server
            .mock("POST", "/api/generate")
            .with_header("content-type", "application/json")
            .with_body(r#"{"response":"<think>scratch</think>partial summary"}"#)
            .expect(3)
            .create();

        let text = "a".repeat(150); // two chunks at size 100 / overlap 10
        let mut events = Vec::new();
        let summary = summarize_document(
            &client_for(&server),
            "llama3",
            &text,
            &options(),
            &cleaner(),
            |p| events.push(p),
        )
        .expect("summary");

        assert_eq!(summary, "partial summary");
        assert_eq!(
            events,
            vec![
                Progress::Chunk { index: 1, total: 2 },
                Progress::Chunk { index: 2, total: 2 },
                Progress::Merge { chunks: 2 },
            ]
        );
        generate.assert();
    }

    #[test]
    fn chunk_failure_reports_the_one_based_index() {
        let mut server = mockito::Server::new();
        let _generate = server
            .mock("POST", "/api/generate")
            .with_status(500)
            .with_body("boom")
            .create();

        let got = summarize_document(
            &client_for(&server),
            "llama3",
            "a short document",
            &options(),
            &cleaner(),
            |_| {},
        );

        match got {
            Err(DocumentError::Chunk { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected chunk error, got {other:?}"),
        }
    }

    #[test]
    fn merge_failure_is_a_distinct_error_kind() {
        let mut server = mockito::Server::new();
        // Registered first, so it only answers when the later mock does not
        // match; mockito checks mocks newest-first.
        let _chunks = server
            .mock("POST", "/api/generate")
            .with_header("content-type", "application/json")
            .with_body(r#"{"response":"chunk summary"}"#)
            .create();
        let _merge = server
            .mock("POST", "/api/generate")
            .match_body(mockito::Matcher::Regex("partial summaries".to_string()))
            .with_status(500)
            .with_body("merge boom")
            .create();

        let got = summarize_document(
            &client_for(&server),
            "llama3",
            "a short document",
            &options(),
            &cleaner(),
            |_| {},
        );

        assert!(matches!(got, Err(DocumentError::Merge(_))));
    }
}
