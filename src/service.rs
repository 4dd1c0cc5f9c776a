use crate::aggregator::CostAggregator;
use crate::config::CostConfig;
use crate::error::Result;
use crate::pricing::{PricingResolver, PricingTable};
use crate::source::{RecordQuery, RecordSource};
use crate::types::{ConversationCostDisplay, ConversationCostSummary, ConversationId, UserId};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;

/// Conversation cost lookups over a record source
pub struct CostService<S> {
    source: S,
    aggregator: CostAggregator,
    batch_size: usize,
}

impl<S: RecordSource> CostService<S> {
    pub fn new(source: S, aggregator: CostAggregator, batch_size: usize) -> Self {
        Self {
            source,
            aggregator,
            batch_size: batch_size.max(1),
        }
    }

    /// Wire a service from configuration and an already loaded pricing table
    pub fn from_config(source: S, table: Arc<PricingTable>, config: &CostConfig) -> Self {
        let resolver = PricingResolver::new(table, config.miss_policy);
        Self::new(source, CostAggregator::new(resolver), config.batch_size)
    }

    pub fn aggregator(&self) -> &CostAggregator {
        &self.aggregator
    }

    /// Full summary for one conversation; `None` when it has no records.
    /// Record source failures are returned to the caller.
    pub async fn get_conversation_cost(
        &self,
        conversation_id: &ConversationId,
        user: Option<&UserId>,
    ) -> Result<Option<ConversationCostSummary>> {
        let mut query = RecordQuery::new(conversation_id.clone());
        if let Some(user) = user {
            query = query.with_user(user.clone());
        }

        let records = self.source.fetch_usage_records(&query).await?;
        Ok(self.aggregator.aggregate(conversation_id, &records))
    }

    pub async fn get_conversation_cost_display(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Option<ConversationCostDisplay>> {
        Ok(self
            .get_conversation_cost(conversation_id, None)
            .await?
            .map(|summary| summary.to_display()))
    }

    /// Display results for many conversations.
    ///
    /// Conversations are fetched `batch_size` at a time; a batch finishes
    /// before the next starts. A failure maps to `None` for that
    /// conversation only.
    pub async fn get_multiple_conversation_costs(
        &self,
        conversation_ids: &[ConversationId],
    ) -> HashMap<ConversationId, Option<ConversationCostDisplay>> {
        let mut results = HashMap::with_capacity(conversation_ids.len());

        for batch in conversation_ids.chunks(self.batch_size) {
            let outcomes = join_all(batch.iter().map(|conversation_id| async move {
                let outcome = self.get_conversation_cost_display(conversation_id).await;
                (conversation_id, outcome)
            }))
            .await;

            for (conversation_id, outcome) in outcomes {
                let display = outcome.unwrap_or_else(|err| {
                    tracing::warn!(
                        conversation = %conversation_id,
                        error = %err,
                        "failed to compute conversation cost"
                    );
                    None
                });
                results.insert(conversation_id.clone(), display);
            }
        }

        results
    }
}
