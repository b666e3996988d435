//! Service layer module
//!
//! Contains the prompt builder, cost calculator, Anthropic client,
//! generation orchestrator and display renderer

pub mod client;
pub mod cost;
pub mod orchestrator;
pub mod prompt;
pub mod render;

pub use client::{AnthropicClient, GenerationBackend};
pub use cost::{calculate_cost, CostSummary, Pricing};
pub use orchestrator::{BusyFlag, Lesson, Orchestrator};
pub use prompt::{PromptBuilder, TemplateVariant};
pub use render::{sanitize_article, FormStatus, Renderer};
