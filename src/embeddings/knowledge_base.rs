//! Knowledge Base
//!
//! A process-scoped semantic memory. Text is split into fixed-size chunks,
//! embedded, and indexed; queries return the most similar chunk.
//!
//! The base starts `Empty` and moves to `Populated` on the first enrichment
//! that yields at least one chunk. After that the index is only ever
//! appended to. Enrichments are serialized by an internal lock, so chunks
//! from one call are never interleaved with another's.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{EmbeddingProvider, TextChunker, VectorIndex};
use crate::types::{AppError, AppResult};

pub enum KnowledgeState {
    Empty,
    Populated(VectorIndex),
}

pub struct KnowledgeBase {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    state: Mutex<KnowledgeState>,
}

impl KnowledgeBase {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, chunker: TextChunker) -> Self {
        Self {
            chunker,
            embedder,
            state: Mutex::new(KnowledgeState::Empty),
        }
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Chunk, embed and index `text`. Returns the number of chunks added.
    ///
    /// Identical text submitted twice is indexed twice. Empty text adds
    /// nothing and leaves an empty base uninitialized.
    pub async fn enrich(&self, text: &str) -> AppResult<usize> {
        let chunks = self.chunker.split_text(text);
        if chunks.is_empty() {
            debug!("Nothing to index");
            return Ok(0);
        }

        let mut state = self.state.lock().await;

        let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let vectors = self.embedder.embed_batch(&refs).await?;
        if vectors.len() != chunks.len() {
            return Err(AppError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                vectors.len()
            )));
        }

        if let KnowledgeState::Populated(index) = &mut *state {
            let added = index.add(chunks, vectors);
            info!(chunks = added, total = index.len(), "Knowledge base enriched");
            return Ok(added);
        }

        let index = VectorIndex::build(chunks, vectors);
        let added = index.len();
        *state = KnowledgeState::Populated(index);
        info!(chunks = added, model = %self.embedder.model_name(), "Knowledge base created");

        Ok(added)
    }

    /// Text of the single chunk most similar to `query`
    pub async fn query(&self, query: &str) -> AppResult<String> {
        let state = self.state.lock().await;
        let index = match &*state {
            KnowledgeState::Empty => return Err(AppError::NotInitialized),
            KnowledgeState::Populated(index) => index,
        };

        let query_vector = self.embedder.embed(query).await?;
        let best = index
            .nearest(&query_vector, 1)
            .into_iter()
            .next()
            .ok_or(AppError::NotInitialized)?;

        debug!(document_id = %best.document_id, score = best.score, "Nearest chunk found");
        Ok(best.text)
    }

    pub async fn is_initialized(&self) -> bool {
        matches!(*self.state.lock().await, KnowledgeState::Populated(_))
    }

    pub async fn chunk_count(&self) -> usize {
        match &*self.state.lock().await {
            KnowledgeState::Empty => 0,
            KnowledgeState::Populated(index) => index.len(),
        }
    }

    /// Every indexed chunk in insertion order
    pub async fn chunks(&self) -> Vec<String> {
        match &*self.state.lock().await {
            KnowledgeState::Empty => Vec::new(),
            KnowledgeState::Populated(index) => index.texts().map(str::to_string).collect(),
        }
    }
}
