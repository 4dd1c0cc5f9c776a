use super::cost::{Cost, CostBreakdown};
use super::ids::{ConversationId, ModelId};
use super::usage::TokenUsage;
use crate::constants::UNKNOWN_LABEL;
use crate::formatting::format_cost;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-model aggregate within one conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelBreakdownEntry {
    pub model: ModelId,
    pub cost: Cost,
    pub token_usage: TokenUsage,
    pub record_count: usize,
    pub provider: String,
    pub category: String,
}

impl ModelBreakdownEntry {
    pub(crate) fn new(model: ModelId) -> Self {
        Self {
            model,
            cost: Cost::default(),
            token_usage: TokenUsage::default(),
            record_count: 0,
            provider: UNKNOWN_LABEL.to_string(),
            category: UNKNOWN_LABEL.to_string(),
        }
    }
}

/// Cost estimate for a whole conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationCostSummary {
    pub conversation_id: ConversationId,
    pub total_cost: Cost,
    pub cost_breakdown: CostBreakdown,
    pub token_usage: TokenUsage,
    /// Sorted by cost, most expensive first
    pub model_breakdown: Vec<ModelBreakdownEntry>,
    /// Tokens from records whose price could not be resolved
    pub unpriced_tokens: u64,
    pub last_updated: DateTime<Utc>,
}

impl ConversationCostSummary {
    /// Model of the most expensive breakdown entry
    pub fn primary_model(&self) -> Option<&ModelId> {
        self.model_breakdown.first().map(|entry| &entry.model)
    }

    pub fn to_display(&self) -> ConversationCostDisplay {
        ConversationCostDisplay {
            total_cost: format_cost(self.total_cost.value()),
            total_cost_raw: self.total_cost.value(),
            primary_model: self
                .primary_model()
                .map(|model| model.to_string())
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            total_tokens: self.token_usage.total(),
            last_updated: self.last_updated,
        }
    }
}

/// Shape consumed by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationCostDisplay {
    pub total_cost: String,
    pub total_cost_raw: f64,
    pub primary_model: String,
    pub total_tokens: u64,
    pub last_updated: DateTime<Utc>,
}
