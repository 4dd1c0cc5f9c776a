use crate::pricing::{PricingResolver, calculate_cost};
use crate::types::{
    ConversationCostSummary, ConversationId, CostBreakdown, ModelBreakdownEntry, ModelId,
    TokenUsage, UsageRecord,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Folds a conversation's usage records into a cost summary.
///
/// Aggregation is a pure single pass over the records; the only state is the
/// injected pricing resolver, which is read-only.
#[derive(Debug, Clone)]
pub struct CostAggregator {
    resolver: PricingResolver,
}

impl CostAggregator {
    pub fn new(resolver: PricingResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &PricingResolver {
        &self.resolver
    }

    /// Summarize `records` (in occurrence order). Returns `None` when there
    /// are no records at all.
    ///
    /// Records without any tokens are skipped except for their timestamp.
    /// Records whose model cannot be priced cost nothing but still count
    /// toward token totals, the model breakdown and `unpriced_tokens`.
    pub fn aggregate(
        &self,
        conversation_id: &ConversationId,
        records: &[UsageRecord],
    ) -> Option<ConversationCostSummary> {
        if records.is_empty() {
            return None;
        }

        let now = Utc::now();
        let mut cost_breakdown = CostBreakdown::default();
        let mut token_usage = TokenUsage::default();
        let mut unpriced_tokens = 0u64;
        let mut last_updated: Option<DateTime<Utc>> = None;

        // Breakdown entries in first-encountered order
        let mut model_breakdown: Vec<ModelBreakdownEntry> = Vec::new();
        let mut entry_index: HashMap<&ModelId, usize> = HashMap::new();
        let mut warned: HashSet<&ModelId> = HashSet::new();

        for record in records {
            if let Some(timestamp) = record.timestamp {
                last_updated = Some(last_updated.map_or(timestamp, |last| last.max(timestamp)));
            }

            let tokens = record.token_usage();
            if tokens.is_empty() {
                continue;
            }
            token_usage += tokens;

            let Some(model) = &record.model else {
                // No model to price against (e.g. a user turn)
                continue;
            };

            let at = record.timestamp.unwrap_or(now);
            let record_cost = match self.resolver.resolve(model, at) {
                Some(period) => calculate_cost(&tokens, period),
                None => {
                    unpriced_tokens = unpriced_tokens.saturating_add(tokens.total());
                    if warned.insert(model) {
                        tracing::warn!(
                            model = %model,
                            date = %at.date_naive(),
                            conversation = %conversation_id,
                            "no pricing for model; counting its tokens at zero cost"
                        );
                    }
                    CostBreakdown::default()
                }
            };
            cost_breakdown += record_cost;

            let index = *entry_index.entry(model).or_insert_with(|| {
                model_breakdown.push(ModelBreakdownEntry::new(model.clone()));
                model_breakdown.len() - 1
            });
            let entry = &mut model_breakdown[index];
            entry.cost += record_cost.total();
            entry.token_usage += tokens;
            entry.record_count += 1;
        }

        // Stable: equal costs keep first-encountered order
        model_breakdown.sort_by(|a, b| b.cost.value().total_cmp(&a.cost.value()));
        for entry in &mut model_breakdown {
            entry.cost = entry.cost.rounded();
            if let Some(metadata) = self.resolver.metadata(&entry.model) {
                entry.provider = metadata.provider;
                entry.category = metadata.category;
            }
        }

        let summary = ConversationCostSummary {
            conversation_id: conversation_id.clone(),
            total_cost: cost_breakdown.total().rounded(),
            cost_breakdown: cost_breakdown.rounded(),
            token_usage,
            model_breakdown,
            unpriced_tokens,
            last_updated: last_updated.unwrap_or(now),
        };

        tracing::debug!(
            conversation = %conversation_id,
            records = records.len(),
            total_cost = summary.total_cost.value(),
            total_tokens = summary.token_usage.total(),
            "aggregated conversation cost"
        );

        Some(summary)
    }
}
