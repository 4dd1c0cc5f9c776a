mod jsonl;
mod memory;

pub use jsonl::JsonlRecordSource;
pub use memory::MemoryRecordSource;

use crate::error::Result;
use crate::types::{ConversationId, UsageRecord, UserId};
use async_trait::async_trait;

/// Which records to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub conversation_id: ConversationId,
    /// Only records attributed to this user, when set
    pub user: Option<UserId>,
}

impl RecordQuery {
    pub fn new(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            user: None,
        }
    }

    pub fn with_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    /// Whether `record` passes the user filter
    pub(crate) fn admits(&self, record: &UsageRecord) -> bool {
        match &self.user {
            Some(user) => record.user.as_ref() == Some(user),
            None => true,
        }
    }
}

/// Provider of a conversation's usage records, ordered by occurrence time.
/// An unknown conversation yields an empty list rather than an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_usage_records(&self, query: &RecordQuery) -> Result<Vec<UsageRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_user_filter() {
        let with_user: UsageRecord = serde_json::from_str(r#"{"user": "u1"}"#).unwrap();
        let other_user: UsageRecord = serde_json::from_str(r#"{"user": "u2"}"#).unwrap();
        let no_user = UsageRecord::default();

        let all = RecordQuery::new(ConversationId::from("c"));
        assert!(all.admits(&with_user));
        assert!(all.admits(&no_user));

        let filtered = all.with_user(UserId::from("u1"));
        assert!(filtered.admits(&with_user));
        assert!(!filtered.admits(&other_user));
        assert!(!filtered.admits(&no_user));
    }
}
