//! Embeddings and vector search
//!
//! - `EmbeddingProvider`: text to vector, backed by an embedding service
//! - `TextChunker`: fixed-size character windows, the unit of indexing
//! - `VectorIndex`: in-memory nearest-neighbour search by cosine similarity
//! - `KnowledgeBase`: chunk, embed and index text; query by similarity

pub mod knowledge_base;
pub mod openai;
pub mod text_chunker;
pub mod vector_search;

pub use knowledge_base::{KnowledgeBase, KnowledgeState};
pub use openai::OpenAIEmbedding;
pub use text_chunker::TextChunker;
pub use vector_search::{cosine_similarity, SearchResult, VectorIndex};

use async_trait::async_trait;

use crate::types::AppResult;

/// Trait for text embedding providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;

    /// Embed several texts in one request; output order matches input order
    async fn embed_batch(&self, texts: &[&str]) -> AppResult<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}
