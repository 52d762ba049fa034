//! Similarity primitives behind narrow capability traits
//!
//! The scorers only see [`Embedder`], [`FuzzyMatcher`] and [`Ranker`], so any
//! provider (a Model2Vec model, a remote service, a deterministic test stub)
//! can be swapped in without touching scoring logic.

use crate::error::{RelevanceError, Result};
use std::collections::HashMap;

/// Produces a fixed-length dense embedding for arbitrary text.
///
/// Implementations are shared read-only across concurrent evaluations.
pub trait Embedder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}

/// Approximate string similarity in `[0, 100]`, symmetric, 100 for equal inputs.
pub trait FuzzyMatcher: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f32;
}

/// Non-negative bag-of-words relevance of `query` against a single `document`.
pub trait Ranker: Send + Sync {
    fn score(&self, query: &[String], document: &[String]) -> Result<f32>;
}

/// Case-insensitive partial alignment: the shorter string is slid across the
/// longer one and the best normalized Levenshtein similarity wins.
#[derive(Debug, Clone, Default)]
pub struct PartialRatioMatcher;

impl FuzzyMatcher for PartialRatioMatcher {
    fn score(&self, a: &str, b: &str) -> f32 {
        let a = a.to_lowercase();
        let b = b.to_lowercase();
        if a == b {
            return 100.0;
        }

        let a_chars: Vec<char> = a.chars().collect();
        let b_chars: Vec<char> = b.chars().collect();
        if a_chars.is_empty() || b_chars.is_empty() {
            return 0.0;
        }

        let (short, long) = if a_chars.len() <= b_chars.len() {
            (&a_chars, &b_chars)
        } else {
            (&b_chars, &a_chars)
        };
        let short: String = short.iter().collect();
        let window = short.chars().count();

        let mut best = 0.0_f64;
        for start in 0..=(long.len() - window) {
            let candidate: String = long[start..start + window].iter().collect();
            let similarity = strsim::normalized_levenshtein(&short, &candidate);
            if similarity > best {
                best = similarity;
                if best >= 1.0 {
                    break;
                }
            }
        }

        (best * 100.0) as f32
    }
}

/// Okapi BM25 over a one-document corpus.
///
/// Uses the non-negative idf `ln(1 + (N - n + 0.5) / (n + 0.5))` so a lone
/// document still produces positive scores. Repeated query tokens count once
/// per occurrence.
#[derive(Debug, Clone)]
pub struct Bm25Ranker {
    k1: f32,
    b: f32,
}

impl Bm25Ranker {
    pub fn new(k1: f32, b: f32) -> Self {
        Self { k1, b }
    }
}

impl Default for Bm25Ranker {
    fn default() -> Self {
        Self::new(1.5, 0.75)
    }
}

impl Ranker for Bm25Ranker {
    fn score(&self, query: &[String], document: &[String]) -> Result<f32> {
        if !self.k1.is_finite() || self.k1 < 0.0 || !(0.0..=1.0).contains(&self.b) {
            return Err(RelevanceError::Ranking(format!(
                "invalid BM25 parameters k1={} b={}",
                self.k1, self.b
            )));
        }
        if document.is_empty() || query.is_empty() {
            return Ok(0.0);
        }

        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        for token in document {
            *term_freq.entry(token.as_str()).or_insert(0) += 1;
        }

        let corpus_size = 1.0_f32;
        let doc_len = document.len() as f32;
        let avg_doc_len = doc_len;
        let length_norm = 1.0 - self.b + self.b * doc_len / avg_doc_len;

        let mut score = 0.0;
        for token in query {
            let Some(&freq) = term_freq.get(token.as_str()) else {
                continue;
            };
            let freq = freq as f32;
            let doc_freq = 1.0_f32;
            let idf = (1.0 + (corpus_size - doc_freq + 0.5) / (doc_freq + 0.5)).ln();
            score += idf * freq * (self.k1 + 1.0) / (freq + self.k1 * length_norm);
        }

        Ok(score)
    }
}

/// Calculate cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RelevanceError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    if a.iter().chain(b.iter()).any(|x| !x.is_finite()) {
        return Err(RelevanceError::Embedding(
            "Embedding contains non-finite values".to_string(),
        ));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Embedding cosine of two texts scaled to percent. Can be negative.
pub fn semantic_similarity(embedder: &dyn Embedder, text1: &str, text2: &str) -> Result<f32> {
    let embedding1 = embedder.encode(text1)?;
    let embedding2 = embedder.encode(text2)?;
    Ok(cosine_similarity(&embedding1, &embedding2)? * 100.0)
}

/// TF-IDF cosine between exactly two documents, the documents being the corpus.
///
/// The vocabulary keeps the `max_features` most frequent terms across both
/// documents (ties broken alphabetically); idf is smoothed
/// `ln((1 + n) / (1 + df)) + 1` with `n = 2`.
#[derive(Debug, Clone)]
pub struct TfIdfSimilarity {
    max_features: usize,
}

impl TfIdfSimilarity {
    pub fn new(max_features: usize) -> Self {
        Self { max_features }
    }

    /// Cosine in `[0, 1]`; 0 whenever the vocabulary or a vector is empty.
    pub fn similarity(&self, terms1: &[String], terms2: &[String]) -> f32 {
        let mut tf1: HashMap<&str, f32> = HashMap::new();
        let mut tf2: HashMap<&str, f32> = HashMap::new();
        for term in terms1 {
            *tf1.entry(term.as_str()).or_insert(0.0) += 1.0;
        }
        for term in terms2 {
            *tf2.entry(term.as_str()).or_insert(0.0) += 1.0;
        }

        let mut corpus_freq: HashMap<&str, f32> = tf1.clone();
        for (term, count) in &tf2 {
            *corpus_freq.entry(*term).or_insert(0.0) += *count;
        }

        let mut vocabulary: Vec<(&str, f32)> = corpus_freq.into_iter().collect();
        vocabulary.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        vocabulary.truncate(self.max_features);

        if vocabulary.is_empty() {
            return 0.0;
        }

        let n_docs = 2.0_f32;
        let (mut dot, mut norm1, mut norm2) = (0.0_f32, 0.0_f32, 0.0_f32);
        for (term, _) in &vocabulary {
            let c1 = tf1.get(term).copied().unwrap_or(0.0);
            let c2 = tf2.get(term).copied().unwrap_or(0.0);
            let doc_freq = (c1 > 0.0) as u8 as f32 + (c2 > 0.0) as u8 as f32;
            let idf = ((1.0 + n_docs) / (1.0 + doc_freq)).ln() + 1.0;

            let w1 = c1 * idf;
            let w2 = c2 * idf;
            dot += w1 * w2;
            norm1 += w1 * w1;
            norm2 += w2 * w2;
        }

        if norm1 == 0.0 || norm2 == 0.0 {
            return 0.0;
        }
        (dot / (norm1.sqrt() * norm2.sqrt())).clamp(0.0, 1.0)
    }
}

impl Default for TfIdfSimilarity {
    fn default() -> Self {
        Self::new(500)
    }
}
