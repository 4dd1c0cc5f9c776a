use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A date range over which a model's unit prices were fixed.
///
/// Prices are USD per 1,000,000 tokens. Both ends of the range are inclusive;
/// an absent `effective_to` leaves the period open-ended.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPeriod {
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    pub prompt: f64,
    pub completion: f64,
    #[serde(default)]
    pub cache_write: Option<f64>,
    #[serde(default)]
    pub cache_read: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<f64>,
}

impl PricingPeriod {
    /// Open-ended period with prompt and completion prices only
    pub fn new(effective_from: NaiveDate, prompt: f64, completion: f64) -> Self {
        Self {
            effective_from,
            effective_to: None,
            prompt,
            completion,
            cache_write: None,
            cache_read: None,
            reasoning: None,
        }
    }

    pub fn until(mut self, effective_to: NaiveDate) -> Self {
        self.effective_to = Some(effective_to);
        self
    }

    pub fn with_cache(mut self, write: Option<f64>, read: f64) -> Self {
        self.cache_write = write;
        self.cache_read = Some(read);
        self
    }

    pub fn with_reasoning(mut self, reasoning: f64) -> Self {
        self.reasoning = Some(reasoning);
        self
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.is_none_or(|to| date <= to)
    }

    /// All unit prices defined by this period
    pub(crate) fn prices(&self) -> impl Iterator<Item = f64> {
        [self.prompt, self.completion]
            .into_iter()
            .chain(self.cache_write)
            .chain(self.cache_read)
            .chain(self.reasoning)
    }
}

/// What to do when a known model has no period covering the requested date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissPolicy {
    /// Use the last-listed (oldest) period
    #[default]
    FallbackToOldest,
    /// Treat the model as unpriced for that date
    Strict,
}

impl FromStr for MissPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" | "fallback-to-oldest" | "oldest" => Ok(MissPolicy::FallbackToOldest),
            "strict" => Ok(MissPolicy::Strict),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for MissPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissPolicy::FallbackToOldest => write!(f, "fallback"),
            MissPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Pricing history of one model. Periods are kept newest-first.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelPricing {
    pub provider: String,
    pub category: String,
    pub periods: Vec<PricingPeriod>,
}

impl ModelPricing {
    pub fn new(
        provider: impl Into<String>,
        category: impl Into<String>,
        periods: Vec<PricingPeriod>,
    ) -> Self {
        Self {
            provider: provider.into(),
            category: category.into(),
            periods,
        }
    }

    /// First listed period containing `date`; on a miss, the last-listed
    /// period under [`MissPolicy::FallbackToOldest`]
    pub fn period_at(&self, date: NaiveDate, policy: MissPolicy) -> Option<&PricingPeriod> {
        self.periods
            .iter()
            .find(|period| period.contains(date))
            .or_else(|| match policy {
                MissPolicy::FallbackToOldest => self.periods.last(),
                MissPolicy::Strict => None,
            })
    }

    pub fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            provider: self.provider.clone(),
            category: self.category.clone(),
            supports_caching: self
                .periods
                .iter()
                .any(|p| p.cache_write.is_some() || p.cache_read.is_some()),
            supports_reasoning: self.periods.iter().any(|p| p.reasoning.is_some()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub provider: String,
    pub category: String,
    pub supports_caching: bool,
    pub supports_reasoning: bool,
}
