//! Data models module
//!
//! Defines the lesson request types, the provider credential and the Anthropic API wire structures

pub mod anthropic;
pub mod credential;
pub mod lesson;

pub use credential::Credential;
pub use lesson::{AgeGroup, GenerationRequest, LessonForm, PagesField, Presentation};
