//! Structured records exchanged with the engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of the hex prefix used for content-derived ids
const CONTENT_ID_LEN: usize = 10;

/// Deterministic id for a document: the first 10 hex chars of its SHA-256.
pub fn content_id(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let bytes = hasher.finalize();
    let mut hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(CONTENT_ID_LEN);
    hex
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub job_id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role_title: String,
    #[serde(default)]
    pub location: String,
    /// Lower-cased skill tokens in extraction order, duplicates kept
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    /// Free text expected to start with a number of years, e.g. "2-4 years"
    #[serde(default)]
    pub experience_required: String,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub description_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub resume_id: String,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub file_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// `resume_id` followed by `job_id`; re-evaluating a pair yields the same key
    pub evaluation_id: String,
    pub resume_id: String,
    pub job_id: String,
    pub relevance_score: f32,
    pub hard_match_score: f32,
    pub soft_match_score: f32,
    pub missing_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub verdict: Verdict,
    pub suggestions: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

impl JobDescription {
    /// Create a job record whose id is derived from `description_text`
    pub fn new(description_text: impl Into<String>) -> Self {
        let description_text = description_text.into();
        Self {
            job_id: content_id(&description_text),
            company: "Unknown".to_string(),
            role_title: String::new(),
            location: "Unknown".to_string(),
            required_skills: Vec::new(),
            preferred_skills: Vec::new(),
            experience_required: String::new(),
            education: Vec::new(),
            description_text,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_role_title(mut self, role_title: impl Into<String>) -> Self {
        self.role_title = role_title.into();
        self
    }

    pub fn with_required_skills<S: AsRef<str>>(mut self, skills: &[S]) -> Self {
        self.required_skills = lowercase_all(skills);
        self
    }

    pub fn with_preferred_skills<S: AsRef<str>>(mut self, skills: &[S]) -> Self {
        self.preferred_skills = lowercase_all(skills);
        self
    }

    pub fn with_experience_required(mut self, experience: impl Into<String>) -> Self {
        self.experience_required = experience.into();
        self
    }

    pub fn with_education<S: AsRef<str>>(mut self, education: &[S]) -> Self {
        self.education = to_owned_all(education);
        self
    }

    /// Required skills followed by preferred skills, in listing order
    pub fn all_skills(&self) -> impl Iterator<Item = &String> {
        self.required_skills.iter().chain(self.preferred_skills.iter())
    }
}

impl Resume {
    /// Create a resume record whose id is derived from `resume_text`
    pub fn new(resume_text: impl Into<String>) -> Self {
        let resume_text = resume_text.into();
        Self {
            resume_id: content_id(&resume_text),
            candidate_name: "Unknown".to_string(),
            email: String::new(),
            phone: String::new(),
            skills: Vec::new(),
            experience: "0 years".to_string(),
            education: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            resume_text,
            file_path: String::new(),
        }
    }

    pub fn with_candidate_name(mut self, name: impl Into<String>) -> Self {
        self.candidate_name = name.into();
        self
    }

    pub fn with_skills<S: AsRef<str>>(mut self, skills: &[S]) -> Self {
        self.skills = lowercase_all(skills);
        self
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = experience.into();
        self
    }

    pub fn with_education<S: AsRef<str>>(mut self, education: &[S]) -> Self {
        self.education = to_owned_all(education);
        self
    }

    pub fn with_projects<S: AsRef<str>>(mut self, projects: &[S]) -> Self {
        self.projects = to_owned_all(projects);
        self
    }

    pub fn with_certifications<S: AsRef<str>>(mut self, certifications: &[S]) -> Self {
        self.certifications = to_owned_all(certifications);
        self
    }

    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = file_path.into();
        self
    }
}

impl EvaluationResult {
    pub fn evaluation_key(resume_id: &str, job_id: &str) -> String {
        format!("{}{}", resume_id, job_id)
    }
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::High => "High Suitability",
            Verdict::Medium => "Medium Suitability",
            Verdict::Low => "Low Suitability",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn lowercase_all<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_lowercase()).collect()
}

fn to_owned_all<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}
