/// Documents shorter than this many code points are classified `Short`.
pub const SHORT_MAX_CHARS: usize = 8_000;
/// Documents shorter than this many code points (but at least
/// [`SHORT_MAX_CHARS`]) are classified `Medium`.
pub const MEDIUM_MAX_CHARS: usize = 25_000;

/// Coarse document size class. The merge prompt asks for a flatter or more
/// deeply structured summary depending on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCategory {
    Short,
    Medium,
    Long,
}

impl LengthCategory {
    pub fn from_char_count(count: usize) -> Self {
        if count < SHORT_MAX_CHARS {
            LengthCategory::Short
        } else if count < MEDIUM_MAX_CHARS {
            LengthCategory::Medium
        } else {
            LengthCategory::Long
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthCategory::Short => "SHORT",
            LengthCategory::Medium => "MEDIUM",
            LengthCategory::Long => "LONG",
        }
    }
}

/// Render the per-chunk summarization instruction. Pure string assembly, no
/// I/O; the excerpt is embedded verbatim between `---` fences.
pub fn chunk_prompt(chunk: &str) -> String {
    let mut b = String::new();
    b.push_str(
        "You are an assistant that creates concise summaries in the original language of the text.\n\n",
    );
    b.push_str("Task:\n");
    b.push_str("- Read the following markdown excerpt.\n");
    b.push_str("- Write a short summary of this excerpt.\n");
    b.push_str("- Use the SAME LANGUAGE as the text.\n");
    b.push_str("- Keep names, dates and key facts accurate.\n");
    b.push_str("- Do NOT add your own interpretations or new ideas.\n");
    b.push_str("- Do NOT write an overall document summary, only summarize THIS excerpt.\n");
    b.push_str("- Do NOT include any sections labelled 'Thinking' or hidden reasoning notes.\n\n");
    b.push_str("Output format:\n");
    b.push_str("- 1 short paragraph in plain text (no headings).\n");
    b.push_str("- Maximum ~120 words.\n\n");
    b.push_str("Excerpt:\n---\n");
    b.push_str(chunk);
    b.push_str("\n---\n");
    b
}

/// Render the merge instruction that combines the ordered chunk summaries into
/// the final document summary. The expected structure of the detailed section
/// depends on the document's length category.
pub fn merge_prompt(chunk_summaries: &[String], category: LengthCategory) -> String {
    let mut b = String::new();
    b.push_str(
        "You are an assistant that creates structured summaries in the original language of the source text.\n\n",
    );
    b.push_str("Task:\n");
    b.push_str(
        "- You receive several partial summaries of different excerpts of ONE long markdown document.\n",
    );
    b.push_str("- Combine them into ONE cohesive summary.\n");
    b.push_str("- Remove repetition and contradictions.\n");
    b.push_str("- Maintain the SAME LANGUAGE as the original text.\n");
    b.push_str("- Keep important names, dates and numbers.\n");
    b.push_str("- Be neutral and factual.\n");
    b.push_str(
        "- Do NOT include any \"Thinking\" sections or hidden reasoning notes in the response.\n\n",
    );
    b.push_str("Output format (proper Markdown with headings):\n\n");
    b.push_str("1. Start with a level-2 heading: ## Overview\n");
    b.push_str("2. Below it, write two short sentences:\n");
    b.push_str("   - Line 1: one short sentence describing the main topic.\n");
    b.push_str("   - Line 2: one short sentence describing the main outcome or conclusion.\n\n");
    b.push_str("3. Then add a blank line.\n\n");
    b.push_str("4. Then add another level-2 heading: ## Detailed Summary\n");
    b.push_str("5. Below it, write the detailed summary:\n");
    match category {
        LengthCategory::Short => {
            b.push_str("   - Write 2-4 short paragraphs OR 3-6 bullet points.\n");
        }
        LengthCategory::Medium => {
            b.push_str("   - Write 3-6 paragraphs and optionally 3-8 bullet points.\n");
        }
        LengthCategory::Long => {
            b.push_str(
                "   - Use clear markdown headings (### level-3) and bullet lists for structure.\n",
            );
        }
    }
    b.push_str("   - Always stay focused on the key points, decisions, arguments, and results.\n\n");
    b.push_str(
        "IMPORTANT: Use proper markdown headings (## and ###) throughout. The output must be valid markdown.\n\n",
    );
    b.push_str(&format!(
        "Original document length category: {}.\n\n",
        category.as_str()
    ));
    b.push_str("Input:\nThe following are partial summaries of the document, in order:\n\n---\n");
    for (i, summary) in chunk_summaries.iter().enumerate() {
        b.push_str(&format!("Chunk {}:\n{}\n\n", i + 1, summary));
    }
    b.push_str("---\n\nNow produce ONLY the markdown summary as specified above.\n");
    b.push_str("Do not add any intro text or explanations around it.\n");
    b
}
