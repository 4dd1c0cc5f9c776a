use crate::constants::USD_DECIMAL_PLACES;
use serde::Serialize;
use std::fmt;
use std::ops::AddAssign;

/// A newtype wrapper for cost values in USD
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Cost(f64);

impl Cost {
    /// Create a new Cost from a raw value
    #[inline]
    pub fn new(value: f64) -> Self {
        Cost(value)
    }

    /// Get the raw value
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Round to the summary precision (5 decimal places)
    #[inline]
    pub fn rounded(&self) -> Self {
        Cost(round_usd(self.0))
    }

    /// Format for display, with more precision the smaller the amount
    /// (e.g. "<$0.001", "$0.0030", "$0.060", "$7.68")
    pub fn to_formatted_string(&self) -> String {
        let value = self.0;
        if value < 0.001 {
            "<$0.001".to_string()
        } else if value < 0.01 {
            format!("${:.4}", value)
        } else if value < 1.0 {
            format!("${:.3}", value)
        } else {
            format!("${:.2}", value)
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_formatted_string())
    }
}

impl From<f64> for Cost {
    fn from(value: f64) -> Self {
        Cost(value)
    }
}

impl From<Cost> for f64 {
    fn from(cost: Cost) -> Self {
        cost.0
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Round a USD amount to [`USD_DECIMAL_PLACES`]
#[inline]
pub fn round_usd(value: f64) -> f64 {
    let factor = 10f64.powi(USD_DECIMAL_PLACES);
    (value * factor).round() / factor
}

/// USD sub-totals per token category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub prompt: f64,
    pub completion: f64,
    pub cache_write: f64,
    pub cache_read: f64,
    pub reasoning: f64,
}

impl CostBreakdown {
    #[inline]
    pub fn total(&self) -> Cost {
        Cost(self.prompt + self.completion + self.cache_write + self.cache_read + self.reasoning)
    }

    /// Every field rounded to the summary precision
    pub fn rounded(&self) -> Self {
        Self {
            prompt: round_usd(self.prompt),
            completion: round_usd(self.completion),
            cache_write: round_usd(self.cache_write),
            cache_read: round_usd(self.cache_read),
            reasoning: round_usd(self.reasoning),
        }
    }
}

impl AddAssign for CostBreakdown {
    fn add_assign(&mut self, rhs: Self) {
        self.prompt += rhs.prompt;
        self.completion += rhs.completion;
        self.cache_write += rhs.cache_write;
        self.cache_read += rhs.cache_read;
        self.reasoning += rhs.reasoning;
    }
}
