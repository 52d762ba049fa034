//! Tokenization, stop-word filtering and vocabulary loading

use crate::config::VocabularyConfig;
use crate::error::{RelevanceError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

const DEGREE_KEYWORDS: &str = include_str!("../../data/degree_keywords.txt");
const EDUCATION_KEYWORDS: &str = include_str!("../../data/education_keywords.txt");
const STOP_WORDS: &str = include_str!("../../data/stop_words.txt");
const TECH_SKILLS: &str = include_str!("../../data/tech_skills.txt");

/// An ordered word list loaded from data, one entry per line
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
}

/// All word lists the engine and the extractors rely on
#[derive(Debug, Clone)]
pub struct Vocabularies {
    pub degree_keywords: Vocabulary,
    pub education_keywords: Vocabulary,
    pub stop_words: Vocabulary,
    pub tech_skills: Vocabulary,
}

impl Vocabulary {
    /// Parse a word list. Blank lines and `#` comments are skipped, entries are lower-cased.
    pub fn parse(content: &str) -> Self {
        let mut seen = HashSet::new();
        let terms = content
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.to_lowercase())
            .filter(|term| seen.insert(term.clone()))
            .collect();
        Self { terms }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RelevanceError::Configuration(format!(
                "Failed to read vocabulary {}: {}",
                path.display(),
                e
            ))
        })?;
        let vocabulary = Self::parse(&content);
        if vocabulary.is_empty() {
            log::warn!("Vocabulary {} is empty", path.display());
        }
        Ok(vocabulary)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Vocabularies {
    /// Built-in lists, overridden by any file configured in `[vocabulary]`
    pub fn load(config: &VocabularyConfig) -> Result<Self> {
        fn pick(path: &Option<std::path::PathBuf>, builtin: &str) -> Result<Vocabulary> {
            match path {
                Some(path) => Vocabulary::from_file(path),
                None => Ok(Vocabulary::parse(builtin)),
            }
        }

        Ok(Self {
            degree_keywords: pick(&config.degree_keywords, DEGREE_KEYWORDS)?,
            education_keywords: pick(&config.education_keywords, EDUCATION_KEYWORDS)?,
            stop_words: pick(&config.stop_words, STOP_WORDS)?,
            tech_skills: pick(&config.tech_skills, TECH_SKILLS)?,
        })
    }
}

impl Default for Vocabularies {
    fn default() -> Self {
        Self {
            degree_keywords: Vocabulary::parse(DEGREE_KEYWORDS),
            education_keywords: Vocabulary::parse(EDUCATION_KEYWORDS),
            stop_words: Vocabulary::parse(STOP_WORDS),
            tech_skills: Vocabulary::parse(TECH_SKILLS),
        }
    }
}

pub struct TextProcessor {
    stop_words: HashSet<String>,
    number_regex: Regex,
    term_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new(&Vocabulary::parse(STOP_WORDS))
    }
}

impl TextProcessor {
    pub fn new(stop_words: &Vocabulary) -> Self {
        let number_regex = Regex::new(r"\d+").expect("Invalid number regex");
        // Two or more word characters, the usual bag-of-words token shape
        let term_regex = Regex::new(r"\b\w\w+\b").expect("Invalid term regex");

        Self {
            stop_words: stop_words.terms().iter().cloned().collect(),
            number_regex,
            term_regex,
        }
    }

    /// Lower-cased, purely alphanumeric word tokens with stop words removed.
    pub fn ranking_tokens(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| word.chars().all(|c| c.is_alphanumeric()))
            .filter(|word| !self.stop_words.contains(word))
            .collect()
    }

    /// Lower-cased terms of two or more word characters with stop words removed
    pub fn vector_terms(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.term_regex
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .filter(|term| !self.stop_words.contains(term))
            .collect()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// First integer in the text, as years. Text without digits counts as 0.
    pub fn parse_years(&self, text: &str) -> f32 {
        self.number_regex
            .find(text)
            .and_then(|m| m.as_str().parse::<f32>().ok())
            .unwrap_or(0.0)
    }
}
