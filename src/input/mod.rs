//! Input processing module
//! Handles file detection, text extraction, and record extraction

pub mod extractor;
pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use manager::InputManager;
