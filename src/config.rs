//! Configuration management for the relevance engine

use crate::error::{RelevanceError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
    pub available_models: Vec<AvailableModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableModel {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: usize,
    pub description: String,
}

/// Weights and thresholds of the hybrid score.
///
/// The 40/60 hard/soft blend and the 30/10/20/20/10/10 hard-match points are
/// policy, not derived values. They live here so scoring code never carries
/// literals and alternative policies can be tested side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Share of the hard-match score in the final score
    pub hard_weight: f32,
    /// Share of the soft-match score in the final score
    pub soft_weight: f32,

    pub required_skills_points: f32,
    pub preferred_skills_points: f32,
    /// A job skill matches a resume skill when the fuzzy score is strictly above this
    pub fuzzy_match_threshold: f32,

    pub experience_points: f32,
    pub partial_experience_points: f32,
    /// Fraction of the required years that still earns the partial points
    pub partial_experience_ratio: f32,

    pub education_points: f32,

    pub project_points: f32,
    pub project_similarity_threshold: f32,

    pub certification_points_per_skill: f32,
    pub certification_max_points: f32,

    /// Ceiling of the hard-match total
    pub max_hard_score: f32,

    /// Share of the dense embedding similarity in the soft score
    pub dense_weight: f32,
    /// Share of the normalized BM25 score in the soft score
    pub ranking_weight: f32,
    pub bm25_k1: f32,
    pub bm25_b: f32,
    pub tfidf_max_features: usize,

    pub high_threshold: f32,
    pub medium_threshold: f32,

    pub max_suggestions: usize,
    pub max_missing_skills_listed: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    pub degree_keywords: Option<PathBuf>,
    pub education_keywords: Option<PathBuf>,
    pub stop_words: Option<PathBuf>,
    pub tech_skills: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub shortlist_size: usize,
    pub shortlist_min_score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-relevance")
            .join("models");

        Self {
            models_dir,
            default_embedding_model: "minishlab/potion-base-8M".to_string(),
            available_models: vec![
                AvailableModel {
                    name: "potion-base-8M".to_string(),
                    repo_id: "minishlab/potion-base-8M".to_string(),
                    size_mb: 33,
                    dimensions: 256,
                    description: "High-quality Model2Vec embeddings with 8M parameters".to_string(),
                },
                AvailableModel {
                    name: "m2v-base".to_string(),
                    repo_id: "minishlab/M2V_base_output".to_string(),
                    size_mb: 90,
                    dimensions: 256,
                    description: "Fast Model2Vec base embeddings model".to_string(),
                },
                AvailableModel {
                    name: "m2v-large".to_string(),
                    repo_id: "minishlab/M2V_large_output".to_string(),
                    size_mb: 250,
                    dimensions: 512,
                    description: "High-capacity Model2Vec large embeddings model".to_string(),
                },
            ],
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            hard_weight: 0.4,
            soft_weight: 0.6,
            required_skills_points: 30.0,
            preferred_skills_points: 10.0,
            fuzzy_match_threshold: 80.0,
            experience_points: 20.0,
            partial_experience_points: 10.0,
            partial_experience_ratio: 0.7,
            education_points: 20.0,
            project_points: 10.0,
            project_similarity_threshold: 0.3,
            certification_points_per_skill: 5.0,
            certification_max_points: 10.0,
            max_hard_score: 100.0,
            dense_weight: 0.7,
            ranking_weight: 0.3,
            bm25_k1: 1.5,
            bm25_b: 0.75,
            tfidf_max_features: 500,
            high_threshold: 75.0,
            medium_threshold: 50.0,
            max_suggestions: 5,
            max_missing_skills_listed: 5,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
            shortlist_size: 10,
            shortlist_min_score: 50.0,
        }
    }
}

impl ScoringConfig {
    /// Reject weight sets that would break the `[0, 100]` score range
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("hard_weight", self.hard_weight),
            ("soft_weight", self.soft_weight),
            ("required_skills_points", self.required_skills_points),
            ("preferred_skills_points", self.preferred_skills_points),
            ("experience_points", self.experience_points),
            ("partial_experience_points", self.partial_experience_points),
            ("education_points", self.education_points),
            ("project_points", self.project_points),
            ("certification_points_per_skill", self.certification_points_per_skill),
            ("certification_max_points", self.certification_max_points),
            ("dense_weight", self.dense_weight),
            ("ranking_weight", self.ranking_weight),
            ("bm25_k1", self.bm25_k1),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(RelevanceError::Configuration(format!(
                    "scoring.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if (self.hard_weight + self.soft_weight - 1.0).abs() > 1e-4 {
            return Err(RelevanceError::Configuration(format!(
                "scoring.hard_weight + scoring.soft_weight must equal 1.0, got {}",
                self.hard_weight + self.soft_weight
            )));
        }

        if (self.dense_weight + self.ranking_weight - 1.0).abs() > 1e-4 {
            return Err(RelevanceError::Configuration(format!(
                "scoring.dense_weight + scoring.ranking_weight must equal 1.0, got {}",
                self.dense_weight + self.ranking_weight
            )));
        }

        if !(0.0..=1.0).contains(&self.partial_experience_ratio)
            || !(0.0..=1.0).contains(&self.bm25_b)
        {
            return Err(RelevanceError::Configuration(
                "scoring.partial_experience_ratio and scoring.bm25_b must lie in [0, 1]".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.max_hard_score) {
            return Err(RelevanceError::Configuration(format!(
                "scoring.max_hard_score must lie in [0, 100], got {}",
                self.max_hard_score
            )));
        }

        if self.medium_threshold > self.high_threshold {
            return Err(RelevanceError::Configuration(format!(
                "scoring.medium_threshold ({}) exceeds scoring.high_threshold ({})",
                self.medium_threshold, self.high_threshold
            )));
        }

        Ok(())
    }
}

impl Config {
    /// Load from the user config directory, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.scoring.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Overwrite the user config file with defaults
    pub fn reset() -> Result<Self> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-relevance")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    pub fn get_model_by_name(&self, name: &str) -> Option<&AvailableModel> {
        self.models.available_models.iter().find(|m| m.name == name)
    }

    /// Resolve a model name from the catalog to its repo id; unknown names pass through
    pub fn resolve_model_id(&self, name: &str) -> String {
        self.get_model_by_name(name)
            .map(|m| m.repo_id.clone())
            .unwrap_or_else(|| name.to_string())
    }
}
