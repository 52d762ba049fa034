//! Relevance evaluation engine combining hard and soft matching

use crate::config::{Config, ScoringConfig};
use crate::error::Result;
use crate::processing::document::{EvaluationResult, JobDescription, Resume, Verdict};
use crate::processing::hard_match::{HardMatchBreakdown, HardMatchScorer};
use crate::processing::similarity::{Bm25Ranker, Embedder, FuzzyMatcher, PartialRatioMatcher, Ranker};
use crate::processing::soft_match::{SoftMatchBreakdown, SoftMatchScorer};
use crate::processing::suggestions::SuggestionGenerator;
use crate::processing::text_processor::{TextProcessor, Vocabularies};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Scores resumes against job descriptions.
///
/// Holds no mutable state; share it behind an `Arc` to evaluate in parallel.
pub struct RelevanceEvaluator {
    scoring: ScoringConfig,
    hard_matcher: HardMatchScorer,
    soft_matcher: SoftMatchScorer,
    suggestions: SuggestionGenerator,
}

/// Assembles a [`RelevanceEvaluator`] from its capabilities.
///
/// Only the embedder is mandatory; the fuzzy matcher and ranker default to
/// [`PartialRatioMatcher`] and a [`Bm25Ranker`] parameterized from config.
pub struct RelevanceEvaluatorBuilder {
    scoring: ScoringConfig,
    vocabularies: Vocabularies,
    embedder: Arc<dyn Embedder>,
    fuzzy_matcher: Option<Arc<dyn FuzzyMatcher>>,
    ranker: Option<Arc<dyn Ranker>>,
}

/// Per-criterion contributions behind one evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub hard: HardMatchBreakdown,
    pub soft: SoftMatchBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedEvaluation {
    pub result: EvaluationResult,
    pub breakdown: ScoreBreakdown,
}

impl RelevanceEvaluatorBuilder {
    pub fn new(scoring: ScoringConfig, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            scoring,
            vocabularies: Vocabularies::default(),
            embedder,
            fuzzy_matcher: None,
            ranker: None,
        }
    }

    pub fn vocabularies(mut self, vocabularies: Vocabularies) -> Self {
        self.vocabularies = vocabularies;
        self
    }

    pub fn fuzzy_matcher(mut self, matcher: Arc<dyn FuzzyMatcher>) -> Self {
        self.fuzzy_matcher = Some(matcher);
        self
    }

    pub fn ranker(mut self, ranker: Arc<dyn Ranker>) -> Self {
        self.ranker = Some(ranker);
        self
    }

    pub fn build(self) -> Result<RelevanceEvaluator> {
        self.scoring.validate()?;

        let processor = Arc::new(TextProcessor::new(&self.vocabularies.stop_words));
        let fuzzy_matcher = self
            .fuzzy_matcher
            .unwrap_or_else(|| Arc::new(PartialRatioMatcher));
        let ranker = self.ranker.unwrap_or_else(|| {
            Arc::new(Bm25Ranker::new(self.scoring.bm25_k1, self.scoring.bm25_b))
        });

        let hard_matcher = HardMatchScorer::new(
            self.scoring.clone(),
            fuzzy_matcher,
            Arc::clone(&processor),
            self.vocabularies.degree_keywords,
        );
        let soft_matcher = SoftMatchScorer::new(
            self.scoring.clone(),
            self.embedder,
            ranker,
            Arc::clone(&processor),
        );
        let suggestions = SuggestionGenerator::new(self.scoring.clone(), processor);

        log::info!(
            "Relevance evaluator ready (embedder: {})",
            soft_matcher.embedder_name()
        );

        Ok(RelevanceEvaluator {
            scoring: self.scoring,
            hard_matcher,
            soft_matcher,
            suggestions,
        })
    }
}

impl RelevanceEvaluator {
    pub fn builder(scoring: ScoringConfig, embedder: Arc<dyn Embedder>) -> RelevanceEvaluatorBuilder {
        RelevanceEvaluatorBuilder::new(scoring, embedder)
    }

    /// Create an evaluator with the configured scoring policy and vocabularies
    pub fn new(config: &Config, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let vocabularies = Vocabularies::load(&config.vocabulary)?;
        Self::builder(config.scoring.clone(), embedder)
            .vocabularies(vocabularies)
            .build()
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn embedder_name(&self) -> &str {
        self.soft_matcher.embedder_name()
    }

    /// Score one resume against one job. Never fails: capability errors are
    /// logged and the affected component scores 0.
    pub fn evaluate(&self, resume: &Resume, job: &JobDescription) -> EvaluationResult {
        self.evaluate_detailed(resume, job).result
    }

    /// Like [`evaluate`](Self::evaluate), also returning the per-criterion breakdown
    pub fn evaluate_detailed(&self, resume: &Resume, job: &JobDescription) -> DetailedEvaluation {
        let start_time = Instant::now();

        let hard = self.hard_matcher.score(resume, job);
        let soft = self.soft_matcher.score(resume, job);

        let relevance_score = self.combine_scores(hard.score, soft.score);
        let verdict = self.classify_verdict(relevance_score);
        let suggestions =
            self.suggestions
                .generate(resume, job, &hard.missing_skills, relevance_score);

        log::debug!(
            "Evaluated {} vs {} in {:.2?}: {:.2} ({})",
            resume.resume_id,
            job.job_id,
            start_time.elapsed(),
            relevance_score,
            verdict
        );

        DetailedEvaluation {
            result: EvaluationResult {
                evaluation_id: EvaluationResult::evaluation_key(&resume.resume_id, &job.job_id),
                resume_id: resume.resume_id.clone(),
                job_id: job.job_id.clone(),
                relevance_score,
                hard_match_score: round_score(hard.score),
                soft_match_score: round_score(soft.score),
                missing_skills: hard.missing_skills,
                matching_skills: hard.matching_skills,
                verdict,
                suggestions,
                evaluated_at: Utc::now(),
            },
            breakdown: ScoreBreakdown {
                hard: hard.breakdown,
                soft: soft.breakdown,
            },
        }
    }

    /// Weighted blend of the two components, rounded to 2 decimals
    pub fn combine_scores(&self, hard_score: f32, soft_score: f32) -> f32 {
        let blended = self.scoring.hard_weight * hard_score + self.scoring.soft_weight * soft_score;
        if !blended.is_finite() {
            return 0.0;
        }
        round_score(blended.clamp(0.0, 100.0))
    }

    /// Lower band bounds are inclusive
    pub fn classify_verdict(&self, score: f32) -> Verdict {
        if score >= self.scoring.high_threshold {
            Verdict::High
        } else if score >= self.scoring.medium_threshold {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }

    /// Evaluate every resume against `job` on the blocking pool.
    ///
    /// Results come back best first, ties in input order. A resume whose
    /// evaluation task panics is logged and left out.
    pub async fn batch_evaluate(
        self: Arc<Self>,
        resumes: Vec<Resume>,
        job: &JobDescription,
    ) -> Vec<EvaluationResult> {
        let start_time = Instant::now();
        let total = resumes.len();
        let job = Arc::new(job.clone());

        log::info!("Evaluating {} resumes against job {}", total, job.job_id);

        let mut tasks = JoinSet::new();
        for (index, resume) in resumes.into_iter().enumerate() {
            let evaluator = Arc::clone(&self);
            let job = Arc::clone(&job);
            tasks.spawn_blocking(move || (index, evaluator.evaluate(&resume, &job)));
        }

        let mut scored = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(item) => scored.push(item),
                Err(e) => log::warn!("Skipping resume after failed evaluation task: {}", e),
            }
        }

        scored.sort_by(|(index_a, a), (index_b, b)| {
            b.relevance_score
                .total_cmp(&a.relevance_score)
                .then_with(|| index_a.cmp(index_b))
        });

        log::info!(
            "Batch finished: {}/{} resumes evaluated in {:.2?}",
            scored.len(),
            total,
            start_time.elapsed()
        );

        scored.into_iter().map(|(_, result)| result).collect()
    }
}

/// Results scoring at least `min_score`, best first, at most `top_n` of them
pub fn shortlist(results: &[EvaluationResult], top_n: usize, min_score: f32) -> Vec<EvaluationResult> {
    let mut selected: Vec<(usize, &EvaluationResult)> = results
        .iter()
        .enumerate()
        .filter(|(_, result)| result.relevance_score >= min_score)
        .collect();

    selected.sort_by(|(index_a, a), (index_b, b)| {
        b.relevance_score
            .total_cmp(&a.relevance_score)
            .then_with(|| index_a.cmp(index_b))
    });

    selected
        .into_iter()
        .take(top_n)
        .map(|(_, result)| result.clone())
        .collect()
}

fn round_score(score: f32) -> f32 {
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelevanceError;
    use crate::processing::embeddings::HashingEmbedder;

    fn evaluator() -> RelevanceEvaluator {
        RelevanceEvaluator::builder(ScoringConfig::default(), Arc::new(HashingEmbedder::default()))
            .build()
            .unwrap()
    }

    /// Every text maps to the same vector, so dense similarity is always 100
    struct ConstantEmbedder;

    impl Embedder for ConstantEmbedder {
        fn encode(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0, 0.0])
        }

        fn dimension(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn encode(&self, _text: &str) -> Result<Vec<f32>> {
            Err(RelevanceError::Embedding("offline".to_string()))
        }

        fn dimension(&self) -> usize {
            0
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct OverflowingEmbedder;

    impl Embedder for OverflowingEmbedder {
        fn encode(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![f32::INFINITY, 1.0, f32::NAN])
        }

        fn dimension(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "overflowing"
        }
    }

    fn reference_pair() -> (Resume, JobDescription) {
        let resume = Resume::new("Python and SQL developer with 3 years of experience building ML models")
            .with_skills(&["python", "sql"])
            .with_experience("3 years")
            .with_education(&["Bachelors in CS"])
            .with_projects(&["Built ML models"])
            .with_certifications(&["Python Certification"]);
        let job = JobDescription::new("Looking for a Python and SQL developer with machine learning skills")
            .with_required_skills(&["python", "sql"])
            .with_preferred_skills(&["machine learning"])
            .with_experience_required("2 years")
            .with_education(&["Bachelors in computer science"]);
        (resume, job)
    }

    #[test]
    fn test_combine_scores() {
        let evaluator = evaluator();
        assert_eq!(evaluator.combine_scores(100.0, 100.0), 100.0);
        assert_eq!(evaluator.combine_scores(0.0, 0.0), 0.0);
        assert_eq!(evaluator.combine_scores(50.0, 80.0), 68.0);
        assert_eq!(evaluator.combine_scores(33.333, 66.666), 53.33);
        assert_eq!(evaluator.combine_scores(f32::NAN, 50.0), 0.0);
    }

    #[test]
    fn test_verdict_boundaries() {
        let evaluator = evaluator();
        assert_eq!(evaluator.classify_verdict(75.0), Verdict::High);
        assert_eq!(evaluator.classify_verdict(74.99), Verdict::Medium);
        assert_eq!(evaluator.classify_verdict(50.0), Verdict::Medium);
        assert_eq!(evaluator.classify_verdict(49.99), Verdict::Low);
        assert_eq!(evaluator.classify_verdict(0.0), Verdict::Low);
    }

    #[test]
    fn test_reference_evaluation() {
        let (resume, job) = reference_pair();
        let result = evaluator().evaluate(&resume, &job);

        assert!(result.hard_match_score >= 50.0);
        assert!(result.matching_skills.contains(&"python".to_string()));
        assert!(result.matching_skills.contains(&"sql".to_string()));
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.evaluation_id, format!("{}{}", resume.resume_id, job.job_id));
        assert!(!result.suggestions.is_empty() && result.suggestions.len() <= 5);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let (resume, job) = reference_pair();
        let evaluator = evaluator();

        let mut first = evaluator.evaluate(&resume, &job);
        let second = evaluator.evaluate(&resume, &job);
        first.evaluated_at = second.evaluated_at;

        assert_eq!(first, second);
    }

    #[test]
    fn test_detailed_breakdown_matches_scores() {
        let (resume, job) = reference_pair();
        let detailed = evaluator().evaluate_detailed(&resume, &job);

        let hard_total = detailed.breakdown.hard.total().min(100.0);
        assert!((detailed.result.hard_match_score - hard_total).abs() < 0.01);
        assert_eq!(detailed.breakdown.hard.experience, 20.0);
    }

    #[test]
    fn test_adding_missing_skill_never_lowers_hard_score() {
        let evaluator = evaluator();
        let job = JobDescription::new("Backend role").with_required_skills(&["python", "docker"]);
        let before = Resume::new("Backend developer").with_skills(&["python"]);
        let after = Resume::new("Backend developer").with_skills(&["python", "docker"]);

        let before = evaluator.evaluate(&before, &job);
        let after = evaluator.evaluate(&after, &job);

        assert!(after.hard_match_score > before.hard_match_score);
        assert_eq!(before.missing_skills, vec!["docker"]);
        assert!(after.missing_skills.is_empty());
    }

    #[test]
    fn test_failing_embedder_does_not_abort() {
        let evaluator =
            RelevanceEvaluator::builder(ScoringConfig::default(), Arc::new(FailingEmbedder))
                .build()
                .unwrap();
        let (resume, job) = reference_pair();

        let result = evaluator.evaluate(&resume, &job);
        assert!(result.soft_match_score >= 0.0 && result.soft_match_score <= 30.0);
        assert!(result.relevance_score >= 0.0 && result.relevance_score <= 100.0);
    }

    #[tokio::test]
    async fn test_non_finite_embeddings_keep_scores_in_range() {
        let evaluator = Arc::new(
            RelevanceEvaluator::builder(ScoringConfig::default(), Arc::new(OverflowingEmbedder))
                .build()
                .unwrap(),
        );
        let (resume, job) = reference_pair();

        let result = evaluator.evaluate(&resume, &job);
        for score in [result.relevance_score, result.hard_match_score, result.soft_match_score] {
            assert!(score.is_finite() && (0.0..=100.0).contains(&score), "score {}", score);
        }
        assert!(result.soft_match_score <= 30.0);

        let weaker = Resume::new("Graphic designer").with_skills(&["photoshop"]);
        let ranked = Arc::clone(&evaluator)
            .batch_evaluate(vec![weaker, resume.clone()], &job)
            .await;
        assert_eq!(ranked[0].resume_id, resume.resume_id);
    }

    #[test]
    fn test_empty_records_stay_in_range() {
        let result = evaluator().evaluate(&Resume::new(""), &JobDescription::new(""));

        for score in [result.relevance_score, result.hard_match_score, result.soft_match_score] {
            assert!((0.0..=100.0).contains(&score));
        }
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn test_custom_weights_are_applied() {
        let scoring = ScoringConfig {
            hard_weight: 1.0,
            soft_weight: 0.0,
            ..ScoringConfig::default()
        };
        let evaluator = RelevanceEvaluator::builder(scoring, Arc::new(ConstantEmbedder))
            .build()
            .unwrap();
        let (resume, job) = reference_pair();

        let result = evaluator.evaluate(&resume, &job);
        assert_eq!(result.relevance_score, result.hard_match_score);
    }

    #[test]
    fn test_invalid_scoring_is_rejected() {
        let scoring = ScoringConfig {
            hard_weight: 0.9,
            ..ScoringConfig::default()
        };
        let built = RelevanceEvaluator::builder(scoring, Arc::new(ConstantEmbedder)).build();
        assert!(matches!(built, Err(RelevanceError::Configuration(_))));
    }

    #[test]
    fn test_shortlist() {
        let (resume, job) = reference_pair();
        let evaluator = evaluator();
        let template = evaluator.evaluate(&resume, &job);

        let results: Vec<EvaluationResult> = [40.0, 90.0, 70.0, 90.0]
            .iter()
            .enumerate()
            .map(|(i, score)| EvaluationResult {
                evaluation_id: format!("r{}", i),
                relevance_score: *score,
                ..template.clone()
            })
            .collect();

        let top = shortlist(&results, 2, 50.0);
        let ids: Vec<&str> = top.iter().map(|r| r.evaluation_id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r3"]);

        assert!(shortlist(&results, 10, 95.0).is_empty());
        assert_eq!(shortlist(&results, 10, 0.0).len(), 4);
    }

    #[tokio::test]
    async fn test_batch_evaluate_orders_by_score() {
        let evaluator = Arc::new(evaluator());
        let (strong, job) = reference_pair();
        let weak = Resume::new("Pastry chef with a passion for sourdough").with_skills(&["baking"]);

        let results = evaluator
            .batch_evaluate(vec![weak.clone(), strong.clone()], &job)
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].resume_id, strong.resume_id);
        assert_eq!(results[1].resume_id, weak.resume_id);
        assert!(results[0].relevance_score >= results[1].relevance_score);
    }

    #[tokio::test]
    async fn test_batch_ties_keep_input_order() {
        let evaluator = Arc::new(evaluator());
        let job = JobDescription::new("Rust engineer").with_required_skills(&["rust"]);
        let resumes: Vec<Resume> = ["first", "second", "third"]
            .iter()
            .map(|id| Resume {
                resume_id: id.to_string(),
                ..Resume::new("Same text")
            })
            .collect();

        let results = evaluator.batch_evaluate(resumes, &job).await;

        let ids: Vec<&str> = results.iter().map(|r| r.resume_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
        assert_eq!(results[0].relevance_score, results[2].relevance_score);
    }
}
