//! Heuristic field extraction turning plain text into scoring records

use crate::error::{RelevanceError, Result};
use crate::processing::document::{JobDescription, Resume};
use crate::processing::text_processor::{Vocabularies, Vocabulary};
use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use std::collections::HashSet;

const MAX_EDUCATION_ENTRIES: usize = 3;
const MAX_PROJECTS: usize = 5;
const MIN_PROJECT_LEN: usize = 20;
const MAX_CERTIFICATIONS: usize = 5;
const MAX_FALLBACK_SKILLS: usize = 5;
const MAX_LISTED_SKILLS: usize = 10;
const HEADER_LINES: usize = 5;

const CERTIFICATION_KEYWORDS: [&str; 3] = ["certification", "certified", "certificate"];
const BULLET_CHARS: &[char] = &['-', '*', '•', '·', '▪', '▫', '◦', '‣', '⁃'];

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| RelevanceError::TextProcessing(format!("Invalid pattern {}: {}", pattern, e)))
}

/// Finds vocabulary terms in free text as whole words
pub struct SkillMatcher {
    automaton: AhoCorasick,
    terms: Vec<String>,
}

impl SkillMatcher {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let terms = vocabulary.terms().to_vec();
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&terms)
            .map_err(|e| RelevanceError::TextProcessing(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self { automaton, terms })
    }

    /// Terms present in `text`, in vocabulary order, each once
    pub fn find(&self, text: &str) -> Vec<String> {
        let mut found = HashSet::new();

        for mat in self.automaton.find_iter(text) {
            let before = text[..mat.start()].chars().next_back();
            let after = text[mat.end()..].chars().next();
            let bounded = |c: Option<char>| c.map_or(true, |c| !c.is_alphanumeric());
            if bounded(before) && bounded(after) {
                found.insert(mat.pattern().as_usize());
            }
        }

        self.terms
            .iter()
            .enumerate()
            .filter(|(i, _)| found.contains(i))
            .map(|(_, term)| term.clone())
            .collect()
    }
}

pub struct ResumeExtractor {
    skills: SkillMatcher,
    education_keywords: Vocabulary,
    email_regex: Regex,
    phone_regex: Regex,
    experience_regex: Regex,
    projects_heading: Regex,
    section_heading: Regex,
    enumerator: Regex,
}

impl ResumeExtractor {
    pub fn new(vocabularies: &Vocabularies) -> Result<Self> {
        Ok(Self {
            skills: SkillMatcher::new(&vocabularies.tech_skills)?,
            education_keywords: vocabularies.education_keywords.clone(),
            email_regex: compile(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?,
            phone_regex: compile(r"[+(]?[1-9][0-9 .\-()]{8,}[0-9]")?,
            experience_regex: compile(r"(?i)\b\d+\s*\+?\s*years?\s*(?:of\s*)?experience")?,
            projects_heading: compile(r"(?i)^\s*projects?\b\s*:?\s*(.*)$")?,
            section_heading: compile(
                r"(?i)^\s*(?:work\s+|professional\s+|technical\s+)?(?:experience|education|skills|certifications?)\b\s*:?",
            )?,
            enumerator: compile(r"^\d+\.\s*")?,
        })
    }

    /// Build a resume record from its full text; `source` is kept as the file path
    pub fn extract(&self, text: &str, source: &str) -> Resume {
        let resume = Resume::new(text)
            .with_candidate_name(self.extract_name(text))
            .with_skills(&self.skills.find(text))
            .with_experience(self.extract_experience(text))
            .with_education(&self.extract_education(text))
            .with_projects(&self.extract_projects(text))
            .with_certifications(&self.extract_certifications(text))
            .with_file_path(source);

        Resume {
            email: self.first_match(&self.email_regex, text),
            phone: self.first_match(&self.phone_regex, text),
            ..resume
        }
    }

    fn first_match(&self, regex: &Regex, text: &str) -> String {
        regex
            .find(text)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    }

    /// First short header line that looks like a personal name
    fn extract_name(&self, text: &str) -> String {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(HEADER_LINES)
            .find(|line| {
                let words = line.split_whitespace().count();
                (2..=50).contains(&line.chars().count())
                    && (1..=4).contains(&words)
                    && !line.chars().any(|c| c.is_ascii_digit() || c == '@' || c == ':')
                    && line.chars().next().is_some_and(char::is_alphabetic)
            })
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn extract_experience(&self, text: &str) -> String {
        self.experience_regex
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "0 years".to_string())
    }

    fn extract_education(&self, text: &str) -> Vec<String> {
        text.lines()
            .filter(|line| {
                let lower = line.to_lowercase();
                self.education_keywords
                    .terms()
                    .iter()
                    .any(|keyword| lower.contains(keyword.as_str()))
            })
            .map(|line| line.trim().to_string())
            .take(MAX_EDUCATION_ENTRIES)
            .collect()
    }

    /// Items of the "Projects" section, up to the next known section heading
    fn extract_projects(&self, text: &str) -> Vec<String> {
        let mut lines = text.lines();
        let mut section = Vec::new();

        for line in lines.by_ref() {
            if let Some(caps) = self.projects_heading.captures(line) {
                if let Some(inline) = caps.get(1) {
                    section.push(inline.as_str());
                }
                break;
            }
        }
        for line in lines {
            if self.section_heading.is_match(line) {
                break;
            }
            section.push(line);
        }

        section
            .into_iter()
            .map(|line| self.strip_list_marker(line))
            .filter(|item| item.chars().count() > MIN_PROJECT_LEN)
            .take(MAX_PROJECTS)
            .collect()
    }

    fn strip_list_marker(&self, line: &str) -> String {
        let line = line.trim().trim_start_matches(BULLET_CHARS).trim_start();
        self.enumerator.replace(line, "").trim().to_string()
    }

    /// Lines mentioning a certification, each followed by the next line
    fn extract_certifications(&self, text: &str) -> Vec<String> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let mut picked: Vec<usize> = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            let lower = line.to_lowercase();
            if !CERTIFICATION_KEYWORDS.iter().any(|k| lower.contains(k)) {
                continue;
            }
            for index in [i, i + 1] {
                let usable = lines.get(index).is_some_and(|l| !l.is_empty());
                if usable && !picked.contains(&index) {
                    picked.push(index);
                }
            }
            if picked.len() >= MAX_CERTIFICATIONS {
                break;
            }
        }

        picked
            .into_iter()
            .take(MAX_CERTIFICATIONS)
            .map(|index| lines[index].to_string())
            .collect()
    }
}

pub struct JobExtractor {
    skills: SkillMatcher,
    education_keywords: Vocabulary,
    required_section: Regex,
    preferred_section: Regex,
    list_separator: Regex,
    experience_regex: Regex,
}

impl JobExtractor {
    pub fn new(vocabularies: &Vocabularies) -> Result<Self> {
        Ok(Self {
            skills: SkillMatcher::new(&vocabularies.tech_skills)?,
            education_keywords: vocabularies.education_keywords.clone(),
            required_section: compile(
                r"(?is)(?:required|must.?have|mandatory)[:\s]+skills?[:\s]+(.*?)(?:preferred|good.?to.?have|nice.?to.?have|desired|responsibilities|$)",
            )?,
            preferred_section: compile(
                r"(?is)(?:preferred|good.?to.?have|nice.?to.?have|desired)[:\s]+skills?[:\s]+(.*?)(?:responsibilities|qualifications|$)",
            )?,
            list_separator: compile(r"[,\n•·▪▫◦‣⁃;]|\d+\.")?,
            experience_regex: compile(r"(?i)\b\d+\s*(?:\+|[-–]\s*\d+)?\s*\+?\s*years?\b(?:\s+of)?(?:\s+experience)?")?,
        })
    }

    /// Build a job record from a posting; missing company or location become "Unknown"
    pub fn extract(&self, text: &str, company: Option<&str>, location: Option<&str>) -> JobDescription {
        let required_skills = self
            .section_skills(&self.required_section, text)
            .unwrap_or_else(|| {
                let mut general = self.skills.find(text);
                general.truncate(MAX_FALLBACK_SKILLS);
                general
            });
        let preferred_skills = self
            .section_skills(&self.preferred_section, text)
            .unwrap_or_default();

        JobDescription::new(text)
            .with_company(company.unwrap_or("Unknown"))
            .with_location(location.unwrap_or("Unknown"))
            .with_role_title(self.extract_role_title(text))
            .with_required_skills(&required_skills)
            .with_preferred_skills(&preferred_skills)
            .with_experience_required(self.extract_experience(text))
            .with_education(&self.extract_education(text))
    }

    fn extract_role_title(&self, text: &str) -> String {
        text.lines()
            .take(HEADER_LINES)
            .map(str::trim)
            .find(|line| (6..100).contains(&line.chars().count()))
            .map(str::to_string)
            .unwrap_or_else(|| "Software Engineer".to_string())
    }

    /// Skills listed under a section heading; `None` when the heading is absent
    fn section_skills(&self, section: &Regex, text: &str) -> Option<Vec<String>> {
        let body = section.captures(text)?.get(1)?.as_str();

        let skills = self
            .list_separator
            .split(body)
            .map(|item| {
                item.trim()
                    .trim_start_matches(BULLET_CHARS)
                    .trim_end_matches('.')
                    .trim()
                    .to_lowercase()
            })
            .filter(|item| (2..50).contains(&item.chars().count()))
            .take(MAX_LISTED_SKILLS)
            .collect();

        Some(skills)
    }

    fn extract_experience(&self, text: &str) -> String {
        self.experience_regex
            .find(text)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| "0-2 years".to_string())
    }

    /// First sentence mentioning each education keyword, in keyword order
    fn extract_education(&self, text: &str) -> Vec<String> {
        let sentences: Vec<&str> = text.split(['.', '\n']).collect();
        let mut requirements: Vec<String> = Vec::new();

        for keyword in self.education_keywords.terms() {
            if requirements.len() >= MAX_EDUCATION_ENTRIES {
                break;
            }
            let found = sentences
                .iter()
                .map(|s| s.trim())
                .find(|s| s.to_lowercase().contains(keyword.as_str()));
            if let Some(sentence) = found {
                if !requirements.iter().any(|r| r == sentence) {
                    requirements.push(sentence.to_string());
                }
            }
        }

        requirements
    }
}
