mod table;

use crate::config::CostConfig;
use crate::constants::TOKENS_PER_MILLION;
use crate::error::{CostError, Result};
use crate::types::{
    CostBreakdown, MissPolicy, ModelId, ModelMetadata, ModelPricing, PricingPeriod, TokenUsage,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Read-only mapping from model ID to its pricing history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingTable {
    models: HashMap<ModelId, ModelPricing>,
}

impl PricingTable {
    /// Build a table, rejecting entries no lookup could use
    pub fn new(models: HashMap<ModelId, ModelPricing>) -> Result<Self> {
        for (model, pricing) in &models {
            validate(model, pricing)?;
        }
        Ok(Self { models })
    }

    /// Parse a JSON object keyed by model ID
    pub fn from_json_str(json: &str, context: &str) -> Result<Self> {
        let models: HashMap<ModelId, ModelPricing> =
            serde_json::from_str(json).map_err(|source| CostError::JsonParse {
                context: context.to_string(),
                source,
            })?;
        Self::new(models)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| CostError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents, &path.display().to_string())
    }

    /// The configured pricing file, else the per-user file, else the
    /// built-in table
    pub fn load(config: &CostConfig) -> Result<Self> {
        match config.pricing_file_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading pricing table");
                Self::from_json_file(&path)
            }
            None => Ok(Self::builtin()),
        }
    }

    #[inline]
    pub fn get(&self, model: &ModelId) -> Option<&ModelPricing> {
        self.models.get(model)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn validate(model: &ModelId, pricing: &ModelPricing) -> Result<()> {
    let invalid = |message: String| CostError::InvalidPricing {
        message: format!("{}: {}", model, message),
    };

    if pricing.periods.is_empty() {
        return Err(invalid("no pricing periods".to_string()));
    }

    for period in &pricing.periods {
        if let Some(to) = period.effective_to
            && to < period.effective_from
        {
            return Err(invalid(format!(
                "period ends ({}) before it starts ({})",
                to, period.effective_from
            )));
        }
        if period.prices().any(|price| !price.is_finite() || price < 0.0) {
            return Err(invalid(format!(
                "negative or non-finite price in period from {}",
                period.effective_from
            )));
        }
    }

    Ok(())
}

/// Resolves the unit prices effective for a model at a point in time
#[derive(Debug, Clone)]
pub struct PricingResolver {
    table: Arc<PricingTable>,
    miss_policy: MissPolicy,
}

impl PricingResolver {
    pub fn new(table: Arc<PricingTable>, miss_policy: MissPolicy) -> Self {
        Self { table, miss_policy }
    }

    pub fn miss_policy(&self) -> MissPolicy {
        self.miss_policy
    }

    /// Period covering `at` (by UTC date). `None` for unknown models, and
    /// for dates outside every period under [`MissPolicy::Strict`].
    pub fn resolve(&self, model: &ModelId, at: DateTime<Utc>) -> Option<&PricingPeriod> {
        self.table
            .get(model)?
            .period_at(at.date_naive(), self.miss_policy)
    }

    pub fn metadata(&self, model: &ModelId) -> Option<ModelMetadata> {
        self.table.get(model).map(ModelPricing::metadata)
    }
}

/// Per-category cost of `tokens` under `period`; a category without a
/// unit price costs nothing
pub fn calculate_cost(tokens: &TokenUsage, period: &PricingPeriod) -> CostBreakdown {
    let cost = |count: u64, price: Option<f64>| match price {
        Some(price) if count > 0 => count as f64 * (price / TOKENS_PER_MILLION),
        _ => 0.0,
    };

    CostBreakdown {
        prompt: cost(tokens.prompt_tokens, Some(period.prompt)),
        completion: cost(tokens.completion_tokens, Some(period.completion)),
        cache_write: cost(tokens.cache_write_tokens, period.cache_write),
        cache_read: cost(tokens.cache_read_tokens, period.cache_read),
        reasoning: cost(tokens.reasoning_tokens, period.reasoning),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn at(timestamp: &str) -> DateTime<Utc> {
        timestamp.parse().unwrap()
    }

    fn resolver(policy: MissPolicy) -> PricingResolver {
        PricingResolver::new(Arc::new(PricingTable::builtin()), policy)
    }

    #[test]
    fn test_calculate_cost() {
        let period = PricingPeriod::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 15.0, 75.0)
            .with_cache(Some(18.75), 1.5);

        // Test with all token types
        let tokens = TokenUsage {
            prompt_tokens: 1000,
            completion_tokens: 500,
            cache_write_tokens: 200,
            cache_read_tokens: 300,
            reasoning_tokens: 400,
        };

        let cost = calculate_cost(&tokens, &period);

        // Expected: (1000 * 15) + (500 * 75) + (200 * 18.75) + (300 * 1.5) per million
        // = 0.015 + 0.0375 + 0.00375 + 0.00045 = 0.0567, reasoning unpriced
        assert!((cost.total().value() - 0.0567).abs() < 1e-10);
        assert_eq!(cost.reasoning, 0.0);
    }

    #[test]
    fn test_resolve_known_model() {
        let resolver = resolver(MissPolicy::FallbackToOldest);
        let period = resolver
            .resolve(&ModelId::from("gpt-4o"), at("2024-06-01T00:00:00Z"))
            .unwrap();
        assert_eq!(period.completion, 15.0);
    }

    #[test]
    fn test_resolve_unknown_model() {
        let resolver = resolver(MissPolicy::FallbackToOldest);
        assert!(
            resolver
                .resolve(&ModelId::from("mystery-model"), at("2024-06-01T00:00:00Z"))
                .is_none()
        );
        assert!(resolver.metadata(&ModelId::from("mystery-model")).is_none());
    }

    #[test]
    fn test_resolve_straddles_price_change() {
        let resolver = resolver(MissPolicy::FallbackToOldest);
        let model = ModelId::from("gpt-3.5-turbo");
        let before = resolver.resolve(&model, at("2023-11-10T09:00:00Z")).unwrap();
        let after = resolver.resolve(&model, at("2024-06-01T09:00:00Z")).unwrap();
        assert_eq!(before.completion, 2.0);
        assert_eq!(after.completion, 1.5);
    }

    #[test]
    fn test_resolve_before_first_period() {
        let model = ModelId::from("gpt-4o");
        let early = at("2020-01-01T00:00:00Z");

        let fallback = resolver(MissPolicy::FallbackToOldest);
        assert!(fallback.resolve(&model, early).is_some());

        let strict = resolver(MissPolicy::Strict);
        assert!(strict.resolve(&model, early).is_none());
    }

    #[test]
    fn test_metadata_from_builtin() {
        let resolver = resolver(MissPolicy::default());
        let sonnet = resolver.metadata(&ModelId::from("claude-3-5-sonnet")).unwrap();
        assert_eq!(sonnet.provider, "Anthropic");
        assert!(sonnet.supports_caching);
        assert!(!sonnet.supports_reasoning);

        let o1 = resolver.metadata(&ModelId::from("o1")).unwrap();
        assert!(o1.supports_reasoning);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "house-model": {{
                    "provider": "Acme",
                    "category": "House",
                    "periods": [
                        {{"effectiveFrom": "2025-01-01", "prompt": 1.0, "completion": 2.0}},
                        {{"effectiveFrom": "2024-01-01", "effectiveTo": "2024-12-31", "prompt": 2.0, "completion": 4.0}}
                    ]
                }}
            }}"#
        )
        .unwrap();

        let table = PricingTable::from_json_file(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        let pricing = table.get(&ModelId::from("house-model")).unwrap();
        assert_eq!(pricing.provider, "Acme");
        assert_eq!(pricing.periods.len(), 2);
    }

    #[test]
    fn test_load_prefers_configured_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"only": {{"provider": "P", "category": "C",
                "periods": [{{"effectiveFrom": "2024-01-01", "prompt": 1.0, "completion": 1.0}}]}}}}"#
        )
        .unwrap();

        let config = CostConfig {
            pricing_file: Some(file.path().to_path_buf()),
            ..CostConfig::default()
        };
        let table = PricingTable::load(&config).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = PricingTable::from_json_file(Path::new("/nonexistent/pricing.json")).unwrap_err();
        assert!(matches!(err, CostError::FileRead { .. }));
    }

    #[test]
    fn test_rejects_invalid_tables() {
        let err = PricingTable::from_json_str("not json", "inline").unwrap_err();
        assert!(matches!(err, CostError::JsonParse { .. }));

        let empty = r#"{"m": {"provider": "P", "category": "C", "periods": []}}"#;
        let err = PricingTable::from_json_str(empty, "inline").unwrap_err();
        assert!(matches!(err, CostError::InvalidPricing { .. }));

        let negative = r#"{"m": {"provider": "P", "category": "C",
            "periods": [{"effectiveFrom": "2024-01-01", "prompt": -1.0, "completion": 1.0}]}}"#;
        assert!(PricingTable::from_json_str(negative, "inline").is_err());

        let inverted = r#"{"m": {"provider": "P", "category": "C",
            "periods": [{"effectiveFrom": "2024-01-01", "effectiveTo": "2023-01-01",
                         "prompt": 1.0, "completion": 1.0}]}}"#;
        assert!(PricingTable::from_json_str(inverted, "inline").is_err());
    }
}
