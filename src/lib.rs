//! Resume relevance library
//!
//! Scores resumes against job descriptions by blending rule-based hard
//! matching with embedding and BM25 soft matching.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{RelevanceError, Result};
pub use processing::analyzer::{shortlist, RelevanceEvaluator};
pub use processing::document::{EvaluationResult, JobDescription, Resume, Verdict};
pub use processing::similarity::{Embedder, FuzzyMatcher, Ranker};
