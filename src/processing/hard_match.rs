//! Rule-based hard matching over skills, experience, education, projects and certifications

use crate::config::ScoringConfig;
use crate::processing::document::{JobDescription, Resume};
use crate::processing::similarity::{FuzzyMatcher, TfIdfSimilarity};
use crate::processing::text_processor::{TextProcessor, Vocabulary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Rule-based scorer producing the hard-match score and the skill partition
pub struct HardMatchScorer {
    scoring: ScoringConfig,
    matcher: Arc<dyn FuzzyMatcher>,
    processor: Arc<TextProcessor>,
    degree_keywords: Vocabulary,
    tfidf: TfIdfSimilarity,
}

/// Points earned per criterion, before the ceiling is applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardMatchBreakdown {
    pub required_skills: f32,
    pub preferred_skills: f32,
    pub experience: f32,
    pub education: f32,
    pub projects: f32,
    pub certifications: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HardMatchOutcome {
    /// Sum of the breakdown clamped to `[0, max_hard_score]`
    pub score: f32,
    pub matching_skills: Vec<String>,
    /// Required skills only; preferred skills never count as missing
    pub missing_skills: Vec<String>,
    pub breakdown: HardMatchBreakdown,
}

impl HardMatchBreakdown {
    pub fn total(&self) -> f32 {
        self.required_skills
            + self.preferred_skills
            + self.experience
            + self.education
            + self.projects
            + self.certifications
    }
}

impl HardMatchScorer {
    pub fn new(
        scoring: ScoringConfig,
        matcher: Arc<dyn FuzzyMatcher>,
        processor: Arc<TextProcessor>,
        degree_keywords: Vocabulary,
    ) -> Self {
        let tfidf = TfIdfSimilarity::new(scoring.tfidf_max_features);
        Self {
            scoring,
            matcher,
            processor,
            degree_keywords,
            tfidf,
        }
    }

    pub fn score(&self, resume: &Resume, job: &JobDescription) -> HardMatchOutcome {
        let mut breakdown = HardMatchBreakdown::default();
        let mut matching_skills = Vec::new();
        let mut missing_skills = Vec::new();

        let required_share = Self::share(self.scoring.required_skills_points, job.required_skills.len());
        for skill in &job.required_skills {
            if self.has_skill(resume, skill) {
                matching_skills.push(skill.clone());
                breakdown.required_skills += required_share;
            } else {
                missing_skills.push(skill.clone());
            }
        }

        let preferred_share = Self::share(self.scoring.preferred_skills_points, job.preferred_skills.len());
        for skill in &job.preferred_skills {
            if self.has_skill(resume, skill) {
                matching_skills.push(skill.clone());
                breakdown.preferred_skills += preferred_share;
            }
        }

        breakdown.experience = self.experience_points(resume, job);
        breakdown.education = self.education_points(resume, job);
        breakdown.projects = self.project_points(resume, job);
        breakdown.certifications = self.certification_points(resume, job, breakdown.total());

        let score = breakdown.total().clamp(0.0, self.scoring.max_hard_score);

        log::debug!(
            "Hard match {} vs {}: {:.2} ({:?})",
            resume.resume_id,
            job.job_id,
            score,
            breakdown
        );

        HardMatchOutcome {
            score,
            matching_skills,
            missing_skills,
            breakdown,
        }
    }

    /// Whether any resume skill fuzzily matches `skill` above the threshold
    pub fn has_skill(&self, resume: &Resume, skill: &str) -> bool {
        resume
            .skills
            .iter()
            .any(|candidate| self.matcher.score(skill, candidate) > self.scoring.fuzzy_match_threshold)
    }

    fn share(points: f32, count: usize) -> f32 {
        if count == 0 {
            0.0
        } else {
            points / count as f32
        }
    }

    fn experience_points(&self, resume: &Resume, job: &JobDescription) -> f32 {
        let required_years = self.processor.parse_years(&job.experience_required);
        let resume_years = self.processor.parse_years(&resume.experience);

        if resume_years >= required_years {
            self.scoring.experience_points
        } else if resume_years >= required_years * self.scoring.partial_experience_ratio {
            self.scoring.partial_experience_points
        } else {
            0.0
        }
    }

    /// A job without education requirements is satisfied by any resume
    fn education_points(&self, resume: &Resume, job: &JobDescription) -> f32 {
        if job.education.is_empty() {
            return self.scoring.education_points;
        }

        let resume_text = resume.education.join(" ").to_lowercase();
        let job_text = job.education.join(" ").to_lowercase();

        let shared_degree = self
            .degree_keywords
            .terms()
            .iter()
            .any(|degree| resume_text.contains(degree.as_str()) && job_text.contains(degree.as_str()));

        if shared_degree {
            self.scoring.education_points
        } else {
            0.0
        }
    }

    fn project_points(&self, resume: &Resume, job: &JobDescription) -> f32 {
        if resume.projects.is_empty() {
            return 0.0;
        }

        let project_terms = self.processor.vector_terms(&resume.projects.join(" "));
        let skill_text = job.all_skills().cloned().collect::<Vec<_>>().join(" ");
        let skill_terms = self.processor.vector_terms(&skill_text);

        let similarity = self.tfidf.similarity(&project_terms, &skill_terms);
        if similarity > self.scoring.project_similarity_threshold {
            self.scoring.project_points
        } else {
            0.0
        }
    }

    /// Walks job skills in listing order, so the result is reproducible even
    /// when a cap cuts the walk short.
    fn certification_points(&self, resume: &Resume, job: &JobDescription, running_total: f32) -> f32 {
        if resume.certifications.is_empty() {
            return 0.0;
        }

        let cert_text = resume.certifications.join(" ").to_lowercase();
        let mut points = 0.0_f32;

        for skill in job.all_skills() {
            if points >= self.scoring.certification_max_points
                || running_total + points >= self.scoring.max_hard_score
            {
                break;
            }
            let skill = skill.trim().to_lowercase();
            if !skill.is_empty() && cert_text.contains(&skill) {
                points = (points + self.scoring.certification_points_per_skill)
                    .min(self.scoring.certification_max_points);
            }
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::similarity::PartialRatioMatcher;
    use crate::processing::text_processor::Vocabularies;

    fn scorer_with(scoring: ScoringConfig) -> HardMatchScorer {
        let vocabs = Vocabularies::default();
        HardMatchScorer::new(
            scoring,
            Arc::new(PartialRatioMatcher),
            Arc::new(TextProcessor::new(&vocabs.stop_words)),
            vocabs.degree_keywords,
        )
    }

    fn scorer() -> HardMatchScorer {
        scorer_with(ScoringConfig::default())
    }

    fn base_job() -> JobDescription {
        JobDescription::new("Looking for a Python and SQL developer with ML skills")
            .with_required_skills(&["python", "sql"])
            .with_preferred_skills(&["machine learning"])
            .with_experience_required("2 years")
            .with_education(&["Bachelors in computer science"])
    }

    fn base_resume() -> Resume {
        Resume::new("Python and SQL developer with 3 years of experience")
            .with_skills(&["python", "sql"])
            .with_experience("3 years")
            .with_education(&["Bachelors in CS"])
            .with_projects(&["Built ML models"])
            .with_certifications(&["Python Certification"])
    }

    #[test]
    fn test_reference_scenario() {
        let outcome = scorer().score(&base_resume(), &base_job());

        assert!(outcome.score >= 50.0);
        assert!(outcome.matching_skills.contains(&"python".to_string()));
        assert!(outcome.matching_skills.contains(&"sql".to_string()));
        assert!(outcome.missing_skills.is_empty());
        assert_eq!(outcome.breakdown.required_skills, 30.0);
        assert_eq!(outcome.breakdown.preferred_skills, 0.0);
        assert_eq!(outcome.breakdown.experience, 20.0);
        assert_eq!(outcome.breakdown.education, 20.0);
        assert_eq!(outcome.breakdown.certifications, 5.0);
    }

    #[test]
    fn test_missing_required_skill() {
        let job = JobDescription::new("Rust engineer").with_required_skills(&["rust"]);
        let resume = Resume::new("Python person").with_skills(&["python"]);

        let outcome = scorer().score(&resume, &job);
        assert_eq!(outcome.missing_skills, vec!["rust"]);
        assert!(outcome.matching_skills.is_empty());
        assert_eq!(outcome.breakdown.required_skills, 0.0);
    }

    #[test]
    fn test_no_required_skills_contributes_zero() {
        let job = JobDescription::new("Generalist");
        let resume = Resume::new("Anything").with_skills(&["python"]);

        let outcome = scorer().score(&resume, &job);
        assert_eq!(outcome.breakdown.required_skills, 0.0);
        assert_eq!(outcome.breakdown.preferred_skills, 0.0);
        assert!(outcome.missing_skills.is_empty());
    }

    #[test]
    fn test_preferred_skills_are_bonus_only() {
        let job = JobDescription::new("Data role")
            .with_required_skills(&["python"])
            .with_preferred_skills(&["spark", "airflow"]);
        let resume = Resume::new("Data person").with_skills(&["python", "spark"]);

        let outcome = scorer().score(&resume, &job);
        assert_eq!(outcome.matching_skills, vec!["python", "spark"]);
        assert!(outcome.missing_skills.is_empty());
        assert_eq!(outcome.breakdown.preferred_skills, 5.0);
    }

    #[test]
    fn test_fuzzy_skill_match() {
        let job = JobDescription::new("Infra role").with_required_skills(&["kubernetes", "sql"]);
        let resume = Resume::new("Infra person").with_skills(&["kubernetis", "mysql"]);

        let outcome = scorer().score(&resume, &job);
        assert!(outcome.missing_skills.is_empty());
        assert_eq!(outcome.breakdown.required_skills, 30.0);
    }

    #[test]
    fn test_experience_bands() {
        let scorer = scorer();
        let job = JobDescription::new("Senior role").with_experience_required("10+ years");

        let full = Resume::new("a").with_experience("12 years");
        let partial = Resume::new("b").with_experience("7 years");
        let none = Resume::new("c").with_experience("6 years");
        let unparsable = Resume::new("d").with_experience("lots of experience");

        assert_eq!(scorer.score(&full, &job).breakdown.experience, 20.0);
        assert_eq!(scorer.score(&partial, &job).breakdown.experience, 10.0);
        assert_eq!(scorer.score(&none, &job).breakdown.experience, 0.0);
        assert_eq!(scorer.score(&unparsable, &job).breakdown.experience, 0.0);
    }

    #[test]
    fn test_education_rules() {
        let scorer = scorer();
        let resume = Resume::new("a").with_education(&["Master of Science"]);

        let no_requirement = JobDescription::new("x");
        let matching = JobDescription::new("y").with_education(&["MASTER degree preferred"]);
        let different = JobDescription::new("z").with_education(&["PhD required"]);

        assert_eq!(scorer.score(&resume, &no_requirement).breakdown.education, 20.0);
        assert_eq!(scorer.score(&resume, &matching).breakdown.education, 20.0);
        assert_eq!(scorer.score(&resume, &different).breakdown.education, 0.0);
    }

    #[test]
    fn test_project_relevance() {
        let scorer = scorer();
        let job = JobDescription::new("x").with_required_skills(&["python", "django"]);

        let relevant = Resume::new("a").with_projects(&["Python Django web shop"]);
        let unrelated = Resume::new("b").with_projects(&["Painted a mural downtown"]);
        let none = Resume::new("c");

        assert_eq!(scorer.score(&relevant, &job).breakdown.projects, 10.0);
        assert_eq!(scorer.score(&unrelated, &job).breakdown.projects, 0.0);
        assert_eq!(scorer.score(&none, &job).breakdown.projects, 0.0);
    }

    #[test]
    fn test_certification_cap() {
        let job = JobDescription::new("x").with_required_skills(&["aws", "azure", "gcp"]);
        let resume = Resume::new("a").with_certifications(&["AWS, Azure and GCP certified"]);

        assert_eq!(scorer().score(&resume, &job).breakdown.certifications, 10.0);

        let uncapped = scorer_with(ScoringConfig {
            certification_max_points: 100.0,
            ..ScoringConfig::default()
        });
        assert_eq!(uncapped.score(&resume, &job).breakdown.certifications, 15.0);
    }

    #[test]
    fn test_blank_job_skill_earns_no_certification_points() {
        let job = JobDescription::new("x").with_required_skills(&["", "  ", "aws"]);
        let resume = Resume::new("a").with_certifications(&["AWS Certified Developer"]);

        assert_eq!(scorer().score(&resume, &job).breakdown.certifications, 5.0);
    }

    #[test]
    fn test_score_is_clamped() {
        let generous = scorer_with(ScoringConfig {
            required_skills_points: 90.0,
            ..ScoringConfig::default()
        });
        let outcome = generous.score(&base_resume(), &base_job());

        assert!(outcome.breakdown.total() > 100.0);
        assert_eq!(outcome.score, 100.0);
    }

    #[test]
    fn test_empty_inputs() {
        let outcome = scorer().score(&Resume::new(""), &JobDescription::new(""));
        assert!(outcome.score >= 0.0 && outcome.score <= 100.0);
        assert!(outcome.matching_skills.is_empty());
        assert!(outcome.missing_skills.is_empty());
    }
}
