//! Semantic soft matching: dense embedding similarity blended with BM25

use crate::config::ScoringConfig;
use crate::processing::document::{JobDescription, Resume};
use crate::processing::similarity::{semantic_similarity, Embedder, Ranker};
use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct SoftMatchScorer {
    scoring: ScoringConfig,
    embedder: Arc<dyn Embedder>,
    ranker: Arc<dyn Ranker>,
    processor: Arc<TextProcessor>,
}

/// The two signals behind a soft-match score, both in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftMatchBreakdown {
    /// Embedding cosine ×100; negative when the embeddings point apart
    pub dense_similarity: f32,
    /// Job-vs-resume BM25 relative to the resume's self-score, in `[0, 100]`
    pub ranking_score: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoftMatchOutcome {
    pub score: f32,
    pub breakdown: SoftMatchBreakdown,
}

impl SoftMatchScorer {
    pub fn new(
        scoring: ScoringConfig,
        embedder: Arc<dyn Embedder>,
        ranker: Arc<dyn Ranker>,
        processor: Arc<TextProcessor>,
    ) -> Self {
        Self {
            scoring,
            embedder,
            ranker,
            processor,
        }
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Never fails: a provider error zeroes its own component and is logged.
    pub fn score(&self, resume: &Resume, job: &JobDescription) -> SoftMatchOutcome {
        let dense_similarity = match semantic_similarity(
            self.embedder.as_ref(),
            &resume.resume_text,
            &job.description_text,
        ) {
            Ok(similarity) if similarity.is_finite() => similarity,
            Ok(similarity) => {
                log::warn!(
                    "Embedding similarity for {} vs {} is not a number ({})",
                    resume.resume_id,
                    job.job_id,
                    similarity
                );
                0.0
            }
            Err(e) => {
                log::warn!(
                    "Embedding similarity failed for {} vs {}: {}",
                    resume.resume_id,
                    job.job_id,
                    e
                );
                0.0
            }
        };

        let ranking_score = self.ranking_score(resume, job);

        let blended =
            self.scoring.dense_weight * dense_similarity + self.scoring.ranking_weight * ranking_score;
        let score = blended.clamp(0.0, 100.0);

        log::debug!(
            "Soft match {} vs {}: {:.2} (dense {:.2}, ranking {:.2})",
            resume.resume_id,
            job.job_id,
            score,
            dense_similarity,
            ranking_score
        );

        SoftMatchOutcome {
            score,
            breakdown: SoftMatchBreakdown {
                dense_similarity,
                ranking_score,
            },
        }
    }

    /// BM25 of the job tokens against the resume, normalized by the resume
    /// scored against itself.
    fn ranking_score(&self, resume: &Resume, job: &JobDescription) -> f32 {
        let resume_tokens = self.processor.ranking_tokens(&resume.resume_text);
        let job_tokens = self.processor.ranking_tokens(&job.description_text);

        let normalized = self
            .ranker
            .score(&job_tokens, &resume_tokens)
            .and_then(|raw| {
                let ceiling = self.ranker.score(&resume_tokens, &resume_tokens)?;
                Ok(if ceiling > 0.0 { raw / ceiling * 100.0 } else { 0.0 })
            });

        match normalized {
            Ok(score) if score.is_finite() => score.clamp(0.0, 100.0),
            Ok(_) => 0.0,
            Err(e) => {
                log::warn!(
                    "Ranking failed for {} vs {}: {}",
                    resume.resume_id,
                    job.job_id,
                    e
                );
                0.0
            }
        }
    }
}
