//! Scoring engine: records, similarity primitives, scorers and the evaluator

pub mod document;
pub mod text_processor;
pub mod similarity;
pub mod embeddings;
pub mod hard_match;
pub mod soft_match;
pub mod suggestions;
pub mod analyzer;
