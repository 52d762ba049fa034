//! Embedding providers: Model2Vec static models and a hashing fallback

use crate::config::Config;
use crate::error::{RelevanceError, Result};
use crate::processing::similarity::Embedder;
use model2vec_rs::model::StaticModel;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;
use unicode_segmentation::UnicodeSegmentation;

/// Sentence embeddings from a Model2Vec static model.
///
/// Loading is the expensive part; after that `encode` only reads the model,
/// so one instance is shared by every evaluation in the process.
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
    dimension: usize,
}

impl Model2VecEmbedder {
    pub fn new(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();

        log::info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| RelevanceError::from(e.context(format!("Failed to load model {}", model_name))))?;

        let dimension = model.encode_single("dimension probe").len();
        if dimension == 0 {
            return Err(RelevanceError::ModelLoading(format!(
                "Model {} produced empty embeddings",
                model_name
            )));
        }

        log::info!(
            "Model loaded successfully in {:.2?} ({} dimensions)",
            start_time.elapsed(),
            dimension
        );

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            dimension,
        })
    }

    /// Load the configured default model, or `model` when given
    pub fn from_config(config: &Config, model: Option<&str>) -> Result<Self> {
        let model_name = model
            .map(|m| config.resolve_model_id(m))
            .unwrap_or_else(|| config.models.default_embedding_model.clone());
        let model_path = Self::get_model_path(config, &model_name);
        Self::new(&model_path, &model_name)
    }

    /// A model already present under the models dir wins over a hub download
    fn get_model_path(config: &Config, model_name: &str) -> PathBuf {
        let local_path = config.models_dir().join(model_name);
        if local_path.exists() {
            local_path
        } else {
            PathBuf::from(model_name)
        }
    }
}

impl Embedder for Model2VecEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = catch_encode_panic(|| self.model.encode_single(text))?;
        if embedding.len() != self.dimension {
            return Err(RelevanceError::Embedding(format!(
                "Expected {} dimensions, model returned {}",
                self.dimension,
                embedding.len()
            )));
        }
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Model2Vec panics when its tokenizer rejects input; surface that as an error
fn catch_encode_panic<F>(encode: F) -> Result<Vec<f32>>
where
    F: FnOnce() -> Vec<f32>,
{
    panic::catch_unwind(AssertUnwindSafe(encode)).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        RelevanceError::Embedding(format!("Encoding panicked: {}", reason))
    })
}

/// Deterministic bag-of-words embedder using signed feature hashing.
///
/// Needs no model files. Texts sharing vocabulary get a positive cosine, so
/// it serves as the offline fallback and as the test embedder.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMENSION: usize = 256;

    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    // FNV-1a, stable across platforms and releases
    fn hash(token: &str) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in token.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        hash
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

impl Embedder for HashingEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0_f32; self.dimension];

        for word in text.unicode_words() {
            let hash = Self::hash(&word.to_lowercase());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|x| *x /= norm);
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "feature-hashing"
    }
}
