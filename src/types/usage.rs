use super::ids::{ModelId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// One message or ledger transaction carrying token counts.
///
/// Three historical payload shapes are accepted and may coexist on the same
/// record; [`UsageRecord::token_usage`] picks one of them by precedence.
/// Counts are signed on the wire because ledger debits are stored negative.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    #[serde(default, alias = "modelId")]
    pub model: Option<ModelId>,
    #[serde(default, alias = "createdAt")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<UserId>,
    #[serde(default)]
    pub token_count: Option<i64>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub tokens: Option<TokenPair>,
    #[serde(default)]
    pub cache_tokens: Option<CacheTokens>,
}

/// OpenAI-style usage object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<i64>,
    pub completion_tokens: Option<i64>,
    pub reasoning_tokens: Option<i64>,
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

impl Usage {
    /// Reasoning tokens, either top-level or nested under the completion details
    fn reasoning(&self) -> Option<i64> {
        self.reasoning_tokens.or_else(|| {
            self.completion_tokens_details
                .as_ref()
                .and_then(|details| details.reasoning_tokens)
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionTokensDetails {
    pub reasoning_tokens: Option<i64>,
}

/// Alternate prompt/completion object (also written as input/output)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenPair {
    #[serde(alias = "input")]
    pub prompt: Option<i64>,
    #[serde(alias = "output")]
    pub completion: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheTokens {
    pub write: Option<i64>,
    pub read: Option<i64>,
}

/// Token counts per category, used both per record and as running totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub cache_write_tokens: u64,
    pub cache_read_tokens: u64,
    pub reasoning_tokens: u64,
}

impl TokenUsage {
    /// Sum over all five categories
    #[inline]
    pub fn total(&self) -> u64 {
        self.prompt_tokens
            .saturating_add(self.completion_tokens)
            .saturating_add(self.cache_write_tokens)
            .saturating_add(self.cache_read_tokens)
            .saturating_add(self.reasoning_tokens)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(rhs.prompt_tokens);
        self.completion_tokens = self.completion_tokens.saturating_add(rhs.completion_tokens);
        self.cache_write_tokens = self.cache_write_tokens.saturating_add(rhs.cache_write_tokens);
        self.cache_read_tokens = self.cache_read_tokens.saturating_add(rhs.cache_read_tokens);
        self.reasoning_tokens = self.reasoning_tokens.saturating_add(rhs.reasoning_tokens);
    }
}

#[inline]
fn magnitude(value: Option<i64>) -> u64 {
    value.map(i64::unsigned_abs).unwrap_or(0)
}

impl UsageRecord {
    /// Normalize the token payload.
    ///
    /// Precedence: `usage` > `tokens` > `tokenCount`. A flat count belongs to
    /// completion when the record names a model and to prompt otherwise.
    /// Cache counts always come from `cacheTokens`.
    pub fn token_usage(&self) -> TokenUsage {
        let mut tokens = if let Some(usage) = &self.usage {
            TokenUsage {
                prompt_tokens: magnitude(usage.prompt_tokens),
                completion_tokens: magnitude(usage.completion_tokens),
                reasoning_tokens: magnitude(usage.reasoning()),
                ..TokenUsage::default()
            }
        } else if let Some(pair) = &self.tokens {
            TokenUsage {
                prompt_tokens: magnitude(pair.prompt),
                completion_tokens: magnitude(pair.completion),
                ..TokenUsage::default()
            }
        } else if let Some(count) = self.token_count {
            if self.model.is_some() {
                TokenUsage {
                    completion_tokens: count.unsigned_abs(),
                    ..TokenUsage::default()
                }
            } else {
                TokenUsage {
                    prompt_tokens: count.unsigned_abs(),
                    ..TokenUsage::default()
                }
            }
        } else {
            TokenUsage::default()
        };

        if let Some(cache) = &self.cache_tokens {
            tokens.cache_write_tokens = magnitude(cache.write);
            tokens.cache_read_tokens = magnitude(cache.read);
        }

        tokens
    }
}
