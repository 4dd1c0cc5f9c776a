use super::{RecordQuery, RecordSource};
use crate::error::Result;
use crate::types::{ConversationId, UsageRecord};
use async_trait::async_trait;
use std::collections::HashMap;

/// Records already held in memory, e.g. the messages of an open conversation
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordSource {
    conversations: HashMap<ConversationId, Vec<UsageRecord>>,
}

impl MemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the records of a conversation; they are expected in occurrence order
    pub fn insert(&mut self, conversation_id: ConversationId, records: Vec<UsageRecord>) {
        self.conversations.insert(conversation_id, records);
    }
}

impl FromIterator<(ConversationId, Vec<UsageRecord>)> for MemoryRecordSource {
    fn from_iter<I: IntoIterator<Item = (ConversationId, Vec<UsageRecord>)>>(iter: I) -> Self {
        Self {
            conversations: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    async fn fetch_usage_records(&self, query: &RecordQuery) -> Result<Vec<UsageRecord>> {
        Ok(self
            .conversations
            .get(&query.conversation_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| query.admits(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_inserted_records() {
        let mut source = MemoryRecordSource::new();
        source.insert(
            ConversationId::from("c1"),
            vec![UsageRecord {
                token_count: Some(5),
                ..UsageRecord::default()
            }],
        );

        let records = source
            .fetch_usage_records(&RecordQuery::new(ConversationId::from("c1")))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);

        let missing = source
            .fetch_usage_records(&RecordQuery::new(ConversationId::from("c2")))
            .await
            .unwrap();
        assert!(missing.is_empty());
    }
}
