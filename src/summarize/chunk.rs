/// Fallback window size when the configured chunk size is zero.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// A contiguous slice of a document, addressed by code-point offsets into the
/// parent text. Consecutive chunks of the same document overlap by a bounded
/// number of code points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Split `text` into overlapping windows of at most `size` code points.
///
/// `size == 0` falls back to [`DEFAULT_CHUNK_SIZE`]; an `overlap >= size` is
/// reduced to `size / 4` so every step still moves forward. Offsets are
/// code-point counts, never byte positions.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<Chunk> {
    let runes: Vec<char> = text.chars().collect();
    let size = if size == 0 { DEFAULT_CHUNK_SIZE } else { size };
    let overlap = if overlap >= size { size / 4 } else { overlap };

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < runes.len() {
        let end = (start + size).min(runes.len());
        chunks.push(Chunk {
            start,
            end,
            text: runes[start..end].iter().collect(),
        });
        if end == runes.len() {
            break;
        }
        start = end - overlap;
    }
    chunks
}
