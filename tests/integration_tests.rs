//! Integration tests for the relevance evaluator

use resume_relevance::config::Config;
use resume_relevance::error::{RelevanceError, Result};
use resume_relevance::input::InputManager;
use resume_relevance::output::formatter::ReportGenerator;
use resume_relevance::output::report::{EvaluationReport, ReportMetadata};
use resume_relevance::processing::embeddings::HashingEmbedder;
use resume_relevance::processing::text_processor::Vocabularies;
use resume_relevance::{shortlist, Embedder, JobDescription, RelevanceEvaluator, Resume, Verdict};
use std::path::Path;
use std::sync::Arc;

struct UnavailableEmbedder;

impl Embedder for UnavailableEmbedder {
    fn encode(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RelevanceError::Embedding("model not loaded".to_string()))
    }

    fn dimension(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

fn evaluator() -> RelevanceEvaluator {
    RelevanceEvaluator::new(&Config::default(), Arc::new(HashingEmbedder::default())).unwrap()
}

async fn load_fixtures() -> (Resume, Resume, JobDescription) {
    let mut manager = InputManager::new(&Vocabularies::default()).unwrap();
    let job = manager
        .load_job(Path::new("tests/fixtures/sample_job.txt"), Some("Acme Analytics"), Some("Remote"))
        .await
        .unwrap();
    let strong = manager
        .load_resume(Path::new("tests/fixtures/strong_resume.txt"))
        .await
        .unwrap();
    let weak = manager
        .load_resume(Path::new("tests/fixtures/weak_resume.md"))
        .await
        .unwrap();
    (strong, weak, job)
}

#[tokio::test]
async fn test_job_fixture_extraction() {
    let (_, _, job) = load_fixtures().await;

    assert_eq!(job.role_title, "Senior Python Developer");
    assert_eq!(job.company, "Acme Analytics");
    assert_eq!(job.required_skills, vec!["python", "sql", "docker", "aws"]);
    assert_eq!(job.preferred_skills, vec!["kubernetes", "react"]);
    assert_eq!(job.experience_required, "5 years of experience");
}

#[tokio::test]
async fn test_end_to_end_strong_candidate() {
    let (strong, _, job) = load_fixtures().await;
    let result = evaluator().evaluate(&strong, &job);

    assert_eq!(strong.candidate_name, "Jane Doe");
    assert!(result.missing_skills.is_empty());
    assert!(result.matching_skills.contains(&"python".to_string()));
    assert!(result.matching_skills.contains(&"kubernetes".to_string()));
    assert!(!result.matching_skills.contains(&"react".to_string()));
    assert!(result.hard_match_score >= 75.0, "hard score {}", result.hard_match_score);
    assert!((0.0..=100.0).contains(&result.relevance_score));
    assert_eq!(
        result.evaluation_id,
        format!("{}{}", strong.resume_id, job.job_id)
    );
}

#[tokio::test]
async fn test_weak_candidate_scores_lower() {
    let (strong, weak, job) = load_fixtures().await;
    let evaluator = evaluator();

    let strong_result = evaluator.evaluate(&strong, &job);
    let weak_result = evaluator.evaluate(&weak, &job);

    assert_eq!(weak.candidate_name, "Sam Rivera");
    assert_eq!(weak_result.missing_skills, vec!["python", "sql", "docker", "aws"]);
    assert_eq!(weak_result.hard_match_score, 0.0);
    assert_ne!(weak_result.verdict, Verdict::High);
    assert!(strong_result.relevance_score > weak_result.relevance_score);
    assert!(weak_result
        .suggestions
        .iter()
        .any(|s| s.starts_with("Consider acquiring these missing skills:")));
}

#[tokio::test]
async fn test_evaluation_is_deterministic() {
    let (strong, _, job) = load_fixtures().await;
    let evaluator = evaluator();

    let first = evaluator.evaluate(&strong, &job);
    let second = evaluator.evaluate(&strong, &job);

    assert_eq!(first.evaluation_id, second.evaluation_id);
    assert_eq!(first.relevance_score, second.relevance_score);
    assert_eq!(first.hard_match_score, second.hard_match_score);
    assert_eq!(first.soft_match_score, second.soft_match_score);
    assert_eq!(first.suggestions, second.suggestions);
}

#[tokio::test]
async fn test_batch_ranks_best_first() {
    let (strong, weak, job) = load_fixtures().await;
    let evaluator = Arc::new(evaluator());

    let results = Arc::clone(&evaluator)
        .batch_evaluate(vec![weak.clone(), strong.clone()], &job)
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].resume_id, strong.resume_id);
    assert_eq!(results[1].resume_id, weak.resume_id);

    let picked = shortlist(&results, 5, results[0].relevance_score);
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].resume_id, strong.resume_id);
}

#[tokio::test]
async fn test_json_records_are_loaded_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let resume = Resume::new("Rust engineer with 4 years of experience")
        .with_candidate_name("Alex Kim")
        .with_skills(&["rust", "linux"])
        .with_experience("4 years");
    let path = dir.path().join("alex.json");
    std::fs::write(&path, serde_json::to_string_pretty(&resume).unwrap()).unwrap();

    let mut manager = InputManager::new(&Vocabularies::default()).unwrap();
    let loaded = manager.load_resume(&path).await.unwrap();

    assert_eq!(loaded, resume);
}

#[tokio::test]
async fn test_unavailable_embedder_degrades_soft_score() {
    let (strong, _, job) = load_fixtures().await;
    let degraded = RelevanceEvaluator::new(&Config::default(), Arc::new(UnavailableEmbedder)).unwrap();

    let full = evaluator().evaluate(&strong, &job);
    let partial = degraded.evaluate(&strong, &job);

    assert_eq!(partial.hard_match_score, full.hard_match_score);
    assert!(partial.soft_match_score <= 30.0);
    assert!((0.0..=100.0).contains(&partial.relevance_score));
}

#[tokio::test]
async fn test_detailed_report_renders_every_format() {
    let (strong, _, job) = load_fixtures().await;
    let evaluator = evaluator();
    let evaluation = evaluator.evaluate_detailed(&strong, &job);
    let report = EvaluationReport::new(
        &strong,
        &job,
        evaluation,
        true,
        ReportMetadata::new(evaluator.embedder_name(), 5),
    );
    let generator = ReportGenerator::with_options(false, true, true, true, true);

    for format in [
        resume_relevance::config::OutputFormat::Console,
        resume_relevance::config::OutputFormat::Json,
        resume_relevance::config::OutputFormat::Markdown,
        resume_relevance::config::OutputFormat::Html,
    ] {
        let content = generator.generate_report(&report, format).unwrap();
        assert!(content.contains("Jane Doe"), "{:?} output lacks candidate", format);
    }
}

#[test]
fn test_config_file_overrides_weights() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.scoring.hard_weight = 0.5;
    config.scoring.soft_weight = 0.5;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    let evaluator = RelevanceEvaluator::new(&loaded, Arc::new(HashingEmbedder::default())).unwrap();
    assert_eq!(evaluator.scoring().hard_weight, 0.5);
    assert_eq!(evaluator.combine_scores(80.0, 40.0), 60.0);
}

#[test]
fn test_config_rejects_unbalanced_weights() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.scoring.hard_weight = 0.9;
    config.save_to(&path).unwrap();

    assert!(matches!(
        Config::load_from(&path),
        Err(RelevanceError::Configuration(_))
    ));
}
