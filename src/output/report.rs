//! Report structures wrapping evaluation results for presentation

use crate::processing::analyzer::{DetailedEvaluation, ScoreBreakdown};
use crate::processing::document::{EvaluationResult, JobDescription, Resume};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One resume evaluated against one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub candidate: CandidateInfo,
    pub job: JobInfo,
    pub evaluation: EvaluationResult,
    /// Per-criterion contributions, present for detailed reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    pub metadata: ReportMetadata,
}

/// Many resumes ranked against one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub job: JobInfo,
    /// Best first
    pub entries: Vec<BatchEntry>,
    /// Candidates passing the shortlist cut, best first
    pub shortlist: Vec<BatchEntry>,
    pub shortlist_criteria: ShortlistCriteria,
    /// Resumes submitted, including any that failed to load or evaluate
    pub submitted: usize,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub rank: usize,
    pub candidate: CandidateInfo,
    pub evaluation: EvaluationResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortlistCriteria {
    pub top_n: usize,
    pub min_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub resume_id: String,
    pub name: String,
    pub email: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    pub job_id: String,
    pub role_title: String,
    pub company: String,
    pub location: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub embedding_model: String,
    pub processing_time_ms: u64,
}

impl From<&Resume> for CandidateInfo {
    fn from(resume: &Resume) -> Self {
        Self {
            resume_id: resume.resume_id.clone(),
            name: resume.candidate_name.clone(),
            email: resume.email.clone(),
            file: resume.file_path.clone(),
        }
    }
}

impl From<&JobDescription> for JobInfo {
    fn from(job: &JobDescription) -> Self {
        Self {
            job_id: job.job_id.clone(),
            role_title: job.role_title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            required_skills: job.required_skills.clone(),
            preferred_skills: job.preferred_skills.clone(),
        }
    }
}

impl ReportMetadata {
    pub fn new(embedding_model: &str, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            embedding_model: embedding_model.to_string(),
            processing_time_ms,
        }
    }
}

impl EvaluationReport {
    pub fn new(
        resume: &Resume,
        job: &JobDescription,
        evaluation: DetailedEvaluation,
        detailed: bool,
        metadata: ReportMetadata,
    ) -> Self {
        Self {
            candidate: CandidateInfo::from(resume),
            job: JobInfo::from(job),
            evaluation: evaluation.result,
            breakdown: detailed.then_some(evaluation.breakdown),
            metadata,
        }
    }

    /// Relevance score as a whole percentage
    pub fn score_percentage(&self) -> u8 {
        score_percentage(self.evaluation.relevance_score)
    }
}

impl BatchReport {
    /// `resumes` must contain every resume referenced by `results`; results
    /// are expected best first, as returned by batch evaluation.
    pub fn new(
        job: &JobDescription,
        resumes: &[Resume],
        results: Vec<EvaluationResult>,
        shortlisted: &[EvaluationResult],
        criteria: ShortlistCriteria,
        submitted: usize,
        metadata: ReportMetadata,
    ) -> Self {
        let candidate_for = |result: &EvaluationResult| {
            resumes
                .iter()
                .find(|r| r.resume_id == result.resume_id)
                .map(CandidateInfo::from)
                .unwrap_or_else(|| CandidateInfo {
                    resume_id: result.resume_id.clone(),
                    name: "Unknown".to_string(),
                    email: String::new(),
                    file: String::new(),
                })
        };

        let entries: Vec<BatchEntry> = results
            .into_iter()
            .enumerate()
            .map(|(i, evaluation)| BatchEntry {
                rank: i + 1,
                candidate: candidate_for(&evaluation),
                evaluation,
            })
            .collect();

        let shortlist = shortlisted
            .iter()
            .filter_map(|picked| {
                entries
                    .iter()
                    .find(|e| e.evaluation.evaluation_id == picked.evaluation_id)
                    .cloned()
            })
            .collect();

        Self {
            job: JobInfo::from(job),
            entries,
            shortlist,
            shortlist_criteria: criteria,
            submitted,
            metadata,
        }
    }

    pub fn skipped(&self) -> usize {
        self.submitted.saturating_sub(self.entries.len())
    }
}

pub fn score_percentage(score: f32) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}
