//! Lesson request models
//!
//! Age buckets, the submitted lesson form and its validated counterpart

use crate::models::credential::Credential;
use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Words the generated article should contain per requested page
pub const WORDS_PER_PAGE: u32 = 500;

/// Page count used when the form omits one
pub const DEFAULT_PAGES: u32 = 1;

/// Target audience bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "5-7")]
    EarlyYears,
    #[serde(rename = "8-10")]
    Children,
    #[serde(rename = "11-13")]
    PreTeens,
    #[serde(rename = "14-16")]
    Teens,
    #[serde(rename = "17+")]
    Adults,
}

/// Typographic grouping of age buckets used by the output and print views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Presentation {
    Young,
    PreTeen,
    TeenAdult,
}

/// How much the article should lean on prose versus lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeStyle {
    Storytelling,
    Guided,
    Analytical,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::EarlyYears,
        AgeGroup::Children,
        AgeGroup::PreTeens,
        AgeGroup::Teens,
        AgeGroup::Adults,
    ];

    /// Form key
    pub fn key(self) -> &'static str {
        match self {
            AgeGroup::EarlyYears => "5-7",
            AgeGroup::Children => "8-10",
            AgeGroup::PreTeens => "11-13",
            AgeGroup::Teens => "14-16",
            AgeGroup::Adults => "17+",
        }
    }

    /// Label shown in the age group selector
    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::EarlyYears => "5-7 years",
            AgeGroup::Children => "8-10 years",
            AgeGroup::PreTeens => "11-13 years",
            AgeGroup::Teens => "14-16 years",
            AgeGroup::Adults => "17+ years",
        }
    }

    /// Audience description interpolated into the prompt
    pub fn description(self) -> &'static str {
        match self {
            AgeGroup::EarlyYears => "very young children (5-7 years old). Use simple words, short sentences, and include fun facts. Make it engaging and easy to understand.",
            AgeGroup::Children => "children (8-10 years old). Use clear language, interesting examples, and include some fun interactive elements.",
            AgeGroup::PreTeens => "pre-teens (11-13 years old). Use age-appropriate vocabulary, detailed explanations, and include thought-provoking questions.",
            AgeGroup::Teens => "teenagers (14-16 years old). Use sophisticated language, in-depth analysis, and connect to real-world applications.",
            AgeGroup::Adults => "young adults and adults. Use advanced vocabulary, comprehensive coverage, and include critical thinking elements.",
        }
    }

    pub fn presentation(self) -> Presentation {
        match self {
            AgeGroup::EarlyYears | AgeGroup::Children => Presentation::Young,
            AgeGroup::PreTeens => Presentation::PreTeen,
            AgeGroup::Teens | AgeGroup::Adults => Presentation::TeenAdult,
        }
    }

    pub fn narrative_style(self) -> NarrativeStyle {
        match self {
            AgeGroup::EarlyYears | AgeGroup::Children => NarrativeStyle::Storytelling,
            AgeGroup::PreTeens => NarrativeStyle::Guided,
            AgeGroup::Teens | AgeGroup::Adults => NarrativeStyle::Analytical,
        }
    }

    /// Number of real-world examples the article must include
    pub fn example_count(self) -> u8 {
        match self {
            AgeGroup::EarlyYears => 2,
            AgeGroup::Children | AgeGroup::PreTeens => 3,
            AgeGroup::Teens => 4,
            AgeGroup::Adults => 5,
        }
    }

    fn accepted_keys() -> String {
        Self::ALL.iter().map(|g| g.key()).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for AgeGroup {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|group| group.key() == key)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Unrecognized age group '{}'. Expected one of: {}",
                    key,
                    Self::accepted_keys()
                ))
            })
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Presentation {
    /// CSS class applied to the article container
    pub fn css_class(self) -> &'static str {
        match self {
            Presentation::Young => "young",
            Presentation::PreTeen => "pre-teen",
            Presentation::TeenAdult => "teen-adult",
        }
    }
}

/// Page count as submitted; HTML forms send text, JSON clients send numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PagesField {
    Number(i64),
    Text(String),
}

/// Lesson form exactly as the browser or API client submitted it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonForm {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub age_group: String,
    #[serde(default)]
    pub pages: Option<PagesField>,
}

/// A validated lesson request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub age_group: AgeGroup,
    pub pages: u32,
}

impl LessonForm {
    /// Page count, defaulting when absent
    pub fn page_count(&self) -> AppResult<u32> {
        let invalid = || AppError::Validation("Page count must be a whole number of at least 1".to_string());

        let pages = match &self.pages {
            None => return Ok(DEFAULT_PAGES),
            Some(PagesField::Text(text)) if text.trim().is_empty() => return Ok(DEFAULT_PAGES),
            Some(PagesField::Number(n)) => *n,
            Some(PagesField::Text(text)) => text.trim().parse::<i64>().map_err(|_| invalid())?,
        };

        u32::try_from(pages).ok().filter(|p| *p >= 1).ok_or_else(invalid)
    }

    /// Validate the form against the resolved credential
    ///
    /// Every missing field is reported at once; nothing here touches the network.
    pub fn validate(&self, credential: Option<&Credential>) -> AppResult<GenerationRequest> {
        let mut missing = Vec::new();
        if credential.is_none() {
            missing.push("API key");
        }
        if self.topic.trim().is_empty() {
            missing.push("topic");
        }
        if self.age_group.trim().is_empty() {
            missing.push("age group");
        }
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Please fill in the missing field(s): {}",
                missing.join(", ")
            )));
        }

        Ok(GenerationRequest {
            topic: self.topic.trim().to_string(),
            age_group: self.age_group.parse()?,
            pages: self.page_count()?,
        })
    }

    /// The form as it looks after "create another lesson": topic cleared, everything else kept
    pub fn reset(&self) -> LessonForm {
        LessonForm {
            api_key: String::new(),
            topic: String::new(),
            age_group: self.age_group.clone(),
            pages: self.pages.clone(),
        }
    }
}

impl GenerationRequest {
    /// Requested length in words; widened so large page counts never wrap
    pub fn target_word_count(&self) -> u64 {
        u64::from(self.pages) * u64::from(WORDS_PER_PAGE)
    }
}
