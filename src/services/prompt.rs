//! Prompt builder
//!
//! Turns a lesson request into the instruction text sent to the model.
//! Template variants share one body and differ only in which capability
//! flags they switch on.

use crate::models::lesson::{AgeGroup, GenerationRequest, NarrativeStyle};
use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

/// Named template variants, oldest to newest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVariant {
    /// Headings, paragraphs and lists only
    Basic,
    /// Adds data tables and real-world examples
    Structured,
    /// Adds an FAQ section and inline data rules
    Enriched,
    /// Adds typography rules
    Complete,
}

/// Optional requirements layered on top of the base template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptFeatures {
    pub require_tables: bool,
    pub require_examples: bool,
    pub require_faq: bool,
    pub require_inline_data: bool,
    pub typography_rules: bool,
}

impl TemplateVariant {
    pub fn features(self) -> PromptFeatures {
        let rank = self as u8;
        PromptFeatures {
            require_tables: rank >= TemplateVariant::Structured as u8,
            require_examples: rank >= TemplateVariant::Structured as u8,
            require_faq: rank >= TemplateVariant::Enriched as u8,
            require_inline_data: rank >= TemplateVariant::Enriched as u8,
            typography_rules: rank >= TemplateVariant::Complete as u8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TemplateVariant::Basic => "basic",
            TemplateVariant::Structured => "structured",
            TemplateVariant::Enriched => "enriched",
            TemplateVariant::Complete => "complete",
        }
    }
}

impl FromStr for TemplateVariant {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(TemplateVariant::Basic),
            "structured" => Ok(TemplateVariant::Structured),
            "enriched" => Ok(TemplateVariant::Enriched),
            "complete" => Ok(TemplateVariant::Complete),
            other => Err(AppError::Validation(format!(
                "Unknown prompt template '{}'. Expected basic, structured, enriched or complete",
                other
            ))),
        }
    }
}

/// Builds lesson prompts
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    features: PromptFeatures,
}

impl PromptBuilder {
    pub fn new(variant: TemplateVariant) -> Self {
        Self::with_features(variant.features())
    }

    pub fn with_features(features: PromptFeatures) -> Self {
        Self { features }
    }

    pub fn features(&self) -> PromptFeatures {
        self.features
    }

    pub fn for_request(&self, request: &GenerationRequest) -> String {
        self.build(&request.topic, request.age_group, request.target_word_count())
    }

    /// Entry point for callers holding a raw age group key
    pub fn build_for_key(&self, topic: &str, age_key: &str, word_count: u64) -> AppResult<String> {
        if topic.trim().is_empty() {
            return Err(AppError::Validation("Topic cannot be empty".to_string()));
        }
        if word_count == 0 {
            return Err(AppError::Validation("Word count must be greater than 0".to_string()));
        }
        let age_group: AgeGroup = age_key.parse()?;
        Ok(self.build(topic, age_group, word_count))
    }

    pub fn build(&self, topic: &str, age_group: AgeGroup, word_count: u64) -> String {
        let features = self.features;
        let mut rules: Vec<String> = vec![
            "Make it age-appropriate for the target audience".to_string(),
            "Use proper formatting with clear headings and sections".to_string(),
            "Include interesting facts and examples".to_string(),
            "Make it engaging and educational".to_string(),
            "Use HTML formatting (h1, h2, h3, p, ul, ol tags) to structure the content".to_string(),
            "Start with a main title using <h1>".to_string(),
            "Break content into logical sections with <h2> headings".to_string(),
            "Use <h3> for subsections if needed".to_string(),
            "Use paragraphs <p> for body text".to_string(),
            list_rule(age_group.narrative_style()).to_string(),
        ];

        if features.require_tables {
            rules.push(
                "Include at least one data table (<table> with <thead>, <tbody>, <th> and <td>) that compares or summarises key facts"
                    .to_string(),
            );
        }
        if features.require_examples {
            rules.push(format!(
                "Include exactly {} real-world examples, each tied to something the reader can see or experience",
                age_group.example_count()
            ));
        }
        if features.require_inline_data {
            rules.push(
                "Weave concrete numbers, dates and measurements into the sentences themselves; wrap each key figure in <strong>"
                    .to_string(),
            );
        }
        if features.require_faq {
            rules.push(
                "End with a section titled \"Frequently Asked Questions\" as an <h2>, with each question as an <h3> followed by a <p> answer"
                    .to_string(),
            );
        }
        if features.typography_rules {
            rules.push(typography_rule(age_group.narrative_style()).to_string());
        }

        let mut prompt = format!(
            "You are a friendly, knowledgeable teacher creating educational content about \"{}\" for {}\n\n\
             Please write an informative, fact-based, knowledge-enhancing article that is approximately {} words long.\n\n\
             Requirements:\n",
            topic,
            age_group.description(),
            word_count
        );

        for (index, rule) in rules.iter().enumerate() {
            let _ = writeln!(prompt, "{}. {}", index + 1, rule);
        }

        prompt.push_str(
            "\nDo not include any markdown formatting. Only use HTML tags. \
             Do not include <html>, <body>, or <head> tags - just the content that will go inside an article element.\n\n\
             Begin the article now:",
        );

        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(TemplateVariant::Complete)
    }
}

fn list_rule(style: NarrativeStyle) -> &'static str {
    match style {
        NarrativeStyle::Storytelling => {
            "Tell the topic as a story in flowing paragraphs; use a short <ul> only for a handful of fun facts"
        }
        NarrativeStyle::Guided => {
            "Explain mostly in paragraphs, using <ul> or <ol> for steps and key points where they help"
        }
        NarrativeStyle::Analytical => {
            "Use lists <ul> or <ol> where appropriate for comparisons and sequences, but keep the analysis itself in paragraphs"
        }
    }
}

fn typography_rule(style: NarrativeStyle) -> &'static str {
    match style {
        NarrativeStyle::Storytelling => {
            "Keep paragraphs to two or three short sentences, use <em> for new words, and never put more than five items in a list"
        }
        NarrativeStyle::Guided => {
            "Keep paragraphs under five sentences, bold new terms with <strong> the first time they appear, and use <blockquote> for one memorable quote or question"
        }
        NarrativeStyle::Analytical => {
            "Use <strong> for defined terms, <em> for emphasis, <blockquote> for primary-source quotes, and avoid headings deeper than <h3>"
        }
    }
}
