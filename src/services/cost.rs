//! Cost estimation for generated lessons

use crate::config::settings::PricingConfig;
use crate::models::anthropic::Usage;
use serde::{Serialize, Serializer};

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Per-million-token prices in USD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

impl Pricing {
    /// Claude 3 Haiku list prices
    pub const HAIKU: Pricing = Pricing {
        input_per_mtok: 0.25,
        output_per_mtok: 1.25,
    };

    #[must_use]
    pub fn summarize(&self, usage: Usage) -> CostSummary {
        let total_cost = usage.input_tokens as f64 * self.input_per_mtok / TOKENS_PER_MILLION
            + usage.output_tokens as f64 * self.output_per_mtok / TOKENS_PER_MILLION;

        CostSummary {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            total_tokens: usage.input_tokens.saturating_add(usage.output_tokens),
            total_cost,
        }
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::HAIKU
    }
}

impl From<&PricingConfig> for Pricing {
    fn from(config: &PricingConfig) -> Self {
        Self {
            input_per_mtok: config.input_per_mtok,
            output_per_mtok: config.output_per_mtok,
        }
    }
}

/// Token usage and the estimated cost of one generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    #[serde(serialize_with = "four_decimals")]
    pub total_cost: f64,
}

impl CostSummary {
    /// Cost with four decimal places, no currency symbol
    #[must_use]
    pub fn formatted_cost(&self) -> String {
        format!("{:.4}", self.total_cost)
    }
}

/// Estimate cost at the default (Haiku) rates
#[must_use]
pub fn calculate_cost(input_tokens: u64, output_tokens: u64) -> CostSummary {
    Pricing::HAIKU.summarize(Usage {
        input_tokens,
        output_tokens,
    })
}

fn four_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.4}", value))
}
