//! Local hashing embedder

use async_trait::async_trait;

use staj_core::{Embedder, Result};

/// Deterministic feature-hashing embedder that needs no model download.
///
/// Tokens are lowercased alphanumeric words. Each word adds a position
/// weighted feature (and a secondary one for words longer than three
/// characters), each adjacent word pair adds a bigram feature, and the vector
/// is L2-normalised. Feature indices come from md5, so vectors written to disk
/// stay valid across builds.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub const DEFAULT_DIMENSION: usize = 384;

    pub fn new() -> Self {
        Self::with_dimension(Self::DEFAULT_DIMENSION)
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn feature_hash(token: &str) -> u64 {
        let digest = md5::compute(token.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest.0[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Embed one text
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        let words: Vec<&str> = normalized.split_whitespace().collect();
        let dim = self.dimension as u64;

        let mut embedding = vec![0.0f32; self.dimension];

        for (i, word) in words.iter().enumerate() {
            let hash = Self::feature_hash(word);
            let weight = 1.0 / (1.0 + i as f32 * 0.1);

            embedding[(hash % dim) as usize] += weight;

            if word.chars().count() > 3 {
                embedding[((hash >> 16) % dim) as usize] += weight * 0.5;
            }
        }

        for window in words.windows(2) {
            let hash = Self::feature_hash(&format!("{} {}", window[0], window[1]));
            embedding[(hash % dim) as usize] += 0.3;
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        embedding
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn id(&self) -> String {
        format!("hash-{}", self.dimension)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }
}

/// Cosine similarity; mismatched or zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
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
