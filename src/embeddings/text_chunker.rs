// Fixed-size text chunker

use crate::types::{AppError, AppResult};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 0;

/// Splits text into windows of `chunk_size` characters. Consecutive windows
/// share `chunk_overlap` characters; with no overlap the chunks concatenate
/// back to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        if chunk_size == 0 {
            return Err(AppError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split on character boundaries. Empty text has no chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        // Byte offset of every character, plus the end of the text
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_count = boundaries.len() - 1;
        let stride = self.chunk_size - self.chunk_overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < char_count {
            let end = (start + self.chunk_size).min(char_count);
            chunks.push(text[boundaries[start]..boundaries[end]].to_string());
            if end == char_count {
                break;
            }
            start += stride;
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_1500_chars_into_two_chunks() {
        let chunker = TextChunker::default();
        let chunks = chunker.split_text(&"a".repeat(1500));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 1000);
        assert_eq!(chunks[1].len(), 500);
    }

    #[test]
    fn test_chunks_concatenate_back_to_input() {
        let chunker = TextChunker::new(7, 0).unwrap();
        let text = "The quick brown fox jumps over the lazy dog, 😀 twice: ünïcödé!";
        let chunks = chunker.split_text(text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 7));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let chunker = TextChunker::default();
        let chunks = chunker.split_text(&"b".repeat(2000));
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 1000));
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(TextChunker::default().split_text("").is_empty());
    }

    #[test]
    fn test_overlap_windows() {
        let chunker = TextChunker::new(4, 2).unwrap();
        assert_eq!(chunker.split_text("abcdefgh"), vec!["abcd", "cdef", "efgh"]);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(TextChunker::new(0, 0).is_err());
        assert!(TextChunker::new(10, 10).is_err());
    }
}
