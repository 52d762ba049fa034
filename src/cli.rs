//! CLI interface for the relevance evaluator

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-relevance")]
#[command(about = "Score resumes against job descriptions")]
#[command(long_about = "Evaluate how well resumes match a job description by combining rule-based skill, experience and education matching with embedding and BM25 similarity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate one resume against a job description
    Evaluate {
        /// Path to resume file (TXT, MD, JSON)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, JSON)
        #[arg(short, long)]
        job: PathBuf,

        /// Hiring company, for text job descriptions
        #[arg(long)]
        company: Option<String>,

        /// Job location, for text job descriptions
        #[arg(long)]
        location: Option<String>,

        /// Embedding model name or Hugging Face repo id
        #[arg(short, long)]
        embedding: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Use the built-in hashing embedder instead of loading a model
        #[arg(long)]
        offline: bool,

        /// Include the per-criterion score breakdown
        #[arg(short, long)]
        detailed: bool,
    },

    /// Rank many resumes against one job description
    Batch {
        /// Path to job description file (TXT, MD, JSON)
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files to evaluate
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Hiring company, for text job descriptions
        #[arg(long)]
        company: Option<String>,

        /// Job location, for text job descriptions
        #[arg(long)]
        location: Option<String>,

        /// Number of candidates to shortlist
        #[arg(short, long)]
        top: Option<usize>,

        /// Minimum relevance score to be shortlisted
        #[arg(short, long)]
        min_score: Option<f32>,

        /// Embedding model name or Hugging Face repo id
        #[arg(short, long)]
        embedding: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Use the built-in hashing embedder instead of loading a model
        #[arg(long)]
        offline: bool,

        /// Show missing skills for every candidate
        #[arg(short, long)]
        detailed: bool,
    },

    /// Embedding model commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known embedding models
    List,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
