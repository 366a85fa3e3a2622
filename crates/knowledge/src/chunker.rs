//! Handbook chunking with `text-splitter`.

use crate::types::HandbookChunk;
use advisor_core::{AppError, AppResult};
use text_splitter::{ChunkConfig, TextSplitter};

/// Split text into overlapping chunks of at most `chunk_size` characters.
///
/// The splitter prefers paragraph, sentence and word boundaries before
/// cutting inside a word. Whitespace-only pieces are dropped and positions
/// stay contiguous.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> AppResult<Vec<HandbookChunk>> {
    let config = ChunkConfig::new(chunk_size)
        .with_overlap(overlap)
        .map_err(|e| AppError::Config(format!("Invalid chunking settings: {}", e)))?;

    let splitter = TextSplitter::new(config);

    let chunks: Vec<HandbookChunk> = splitter
        .chunks(text)
        .filter(|piece| !piece.trim().is_empty())
        .enumerate()
        .map(|(position, piece)| HandbookChunk::new(position as u32, piece))
        .collect();

    tracing::debug!(
        "Chunked {} characters into {} chunks (size: {}, overlap: {})",
        text.chars().count(),
        chunks.len(),
        chunk_size,
        overlap
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_text_basic() {
        let text = "Students must complete 360 credits. ".repeat(100);
        let chunks = chunk_text(&text, 200, 50).unwrap();

        assert!(chunks.len() > 1);
        assert_eq!(chunks[0].id, "handbook_0");
        assert_eq!(chunks[1].position, 1);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 200));
    }

    #[test]
    fn test_chunk_text_short_input_is_one_chunk() {
        let chunks = chunk_text("Welcome to the programme.", 1500, 300).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Welcome to the programme.");
    }

    #[test]
    fn test_chunk_text_empty() {
        assert!(chunk_text("", 100, 10).unwrap().is_empty());
        assert!(chunk_text("   \n\n  ", 100, 10).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_text_overlap_repeats_content() {
        let text = (0..200)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = chunk_text(&text, 100, 40).unwrap();

        assert!(chunks.len() >= 2);
        let last_word_of_first = chunks[0].text.split_whitespace().last().unwrap();
        assert!(chunks[1].text.contains(last_word_of_first));
    }

    #[test]
    fn test_overlap_not_smaller_than_size_rejected() {
        assert!(chunk_text("text", 100, 100).is_err());
    }
}
