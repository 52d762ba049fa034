//! Input manager turning files into scoring records

use crate::error::{RelevanceError, Result};
use crate::input::extractor::{JobExtractor, ResumeExtractor};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::document::{JobDescription, Resume};
use crate::processing::text_processor::Vocabularies;
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    resume_extractor: ResumeExtractor,
    job_extractor: JobExtractor,
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new(vocabularies: &Vocabularies) -> Result<Self> {
        Ok(Self {
            resume_extractor: ResumeExtractor::new(vocabularies)?,
            job_extractor: JobExtractor::new(vocabularies)?,
            cache: HashMap::new(),
            enable_cache: true,
        })
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Load a resume from a `.json` record or extract one from `.txt`/`.md`
    pub async fn load_resume(&mut self, path: &Path) -> Result<Resume> {
        match self.validate(path)? {
            FileType::Json => {
                let text = self.extract_text(path).await?;
                let resume: Resume = serde_json::from_str(&text)?;
                Ok(resume)
            }
            _ => {
                let text = self.extract_text(path).await?;
                Self::ensure_not_empty(&text, path)?;
                Ok(self
                    .resume_extractor
                    .extract(&text, &path.to_string_lossy()))
            }
        }
    }

    /// Load a job description; `company` and `location` apply to text input only
    pub async fn load_job(
        &mut self,
        path: &Path,
        company: Option<&str>,
        location: Option<&str>,
    ) -> Result<JobDescription> {
        match self.validate(path)? {
            FileType::Json => {
                let text = self.extract_text(path).await?;
                let job: JobDescription = serde_json::from_str(&text)?;
                Ok(job)
            }
            _ => {
                let text = self.extract_text(path).await?;
                Self::ensure_not_empty(&text, path)?;
                Ok(self.job_extractor.extract(&text, company, location))
            }
        }
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        let text = match self.validate(path)? {
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            _ => {
                info!("Reading file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    fn validate(&self, path: &Path) -> Result<FileType> {
        if !path.exists() {
            return Err(RelevanceError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        match FileType::from_path(path) {
            FileType::Unknown => Err(RelevanceError::UnsupportedFormat(format!(
                "{} (supported: {})",
                path.display(),
                FileType::supported_extensions().join(", ")
            ))),
            file_type => Ok(file_type),
        }
    }

    fn ensure_not_empty(text: &str, path: &Path) -> Result<()> {
        if text.trim().is_empty() {
            return Err(RelevanceError::InvalidInput(format!(
                "No text found in {}",
                path.display()
            )));
        }
        Ok(())
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
