// In-memory vector index with brute-force cosine similarity search

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub document_id: String,
    pub text: String,
    pub score: f64,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    id: String,
    text: String,
    vector: Vec<f32>,
}

/// Embedded chunks in insertion order
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index from chunks and their embeddings, paired by position
    pub fn build(chunks: Vec<String>, vectors: Vec<Vec<f32>>) -> Self {
        let mut index = Self::default();
        index.add(chunks, vectors);
        index
    }

    /// Append chunks; returns how many were added
    pub fn add(&mut self, chunks: Vec<String>, vectors: Vec<Vec<f32>>) -> usize {
        let before = self.entries.len();
        self.entries.extend(chunks.into_iter().zip(vectors).map(|(text, vector)| IndexEntry {
            id: Uuid::new_v4().to_string(),
            text,
            vector,
        }));
        self.entries.len() - before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` most similar entries, best first. Equal scores keep insertion order.
    pub fn nearest(&self, query: &[f32], k: usize) -> Vec<SearchResult> {
        let mut scored: Vec<(usize, f64)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (pos, cosine_similarity(query, &entry.vector) as f64))
            .collect();

        // Stable sort, so ties stay in insertion order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored
            .into_iter()
            .take(k)
            .map(|(pos, score)| {
                let entry = &self.entries[pos];
                SearchResult {
                    document_id: entry.id.clone(),
                    text: entry.text.clone(),
                    score,
                }
            })
            .collect()
    }

    /// Every indexed chunk, in insertion order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.text.as_str())
    }
}

/// Cosine similarity; zero-length or mismatched vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
