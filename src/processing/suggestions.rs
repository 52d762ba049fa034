//! Rule-based improvement advice, most important first

use crate::config::ScoringConfig;
use crate::processing::document::{JobDescription, Resume};
use crate::processing::text_processor::TextProcessor;
use std::sync::Arc;

const MIN_PROJECTS: usize = 2;

pub struct SuggestionGenerator {
    scoring: ScoringConfig,
    processor: Arc<TextProcessor>,
}

impl SuggestionGenerator {
    pub fn new(scoring: ScoringConfig, processor: Arc<TextProcessor>) -> Self {
        Self { scoring, processor }
    }

    /// Gap-driven suggestions followed by the score-banded closing advice,
    /// truncated to `max_suggestions`.
    pub fn generate(
        &self,
        resume: &Resume,
        job: &JobDescription,
        missing_skills: &[String],
        final_score: f32,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();

        if !missing_skills.is_empty() {
            let listed: Vec<&str> = missing_skills
                .iter()
                .take(self.scoring.max_missing_skills_listed)
                .map(String::as_str)
                .collect();
            suggestions.push(format!(
                "Consider acquiring these missing skills: {}",
                listed.join(", ")
            ));
        }

        let required_years = self.processor.parse_years(&job.experience_required);
        let resume_years = self.processor.parse_years(&resume.experience);
        if resume_years < required_years {
            suggestions.push(format!(
                "Gain more experience. Required: {} years, You have: {} years",
                required_years, resume_years
            ));
        }

        if resume.projects.len() < MIN_PROJECTS {
            suggestions.push("Add more relevant projects to demonstrate practical skills".to_string());
        }

        if resume.certifications.is_empty() {
            suggestions.push("Consider obtaining relevant certifications in your domain".to_string());
        }

        if final_score < self.scoring.medium_threshold {
            suggestions.push("Your profile needs significant improvement to match this role".to_string());
            suggestions.push("Focus on building core skills mentioned in the job description".to_string());
        } else if final_score < self.scoring.high_threshold {
            suggestions.push("Your profile is moderately suitable. Focus on filling skill gaps".to_string());
        } else {
            suggestions.push(
                "Your profile is highly suitable. Minor improvements can make it perfect".to_string(),
            );
        }

        suggestions.truncate(self.scoring.max_suggestions);
        suggestions
    }
}
