use super::PricingTable;
use crate::types::{ModelId, ModelPricing, PricingPeriod};
use chrono::NaiveDate;
use std::collections::HashMap;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("built-in pricing dates are valid")
}

impl PricingTable {
    /// Built-in pricing history (USD per 1M tokens), newest period first
    pub fn builtin() -> Self {
        let mut models = HashMap::new();
        let mut add = |model: &str, provider: &str, category: &str, periods: Vec<PricingPeriod>| {
            models.insert(
                ModelId::from(model),
                ModelPricing::new(provider, category, periods),
            );
        };

        // OpenAI
        add(
            "gpt-4o",
            "OpenAI",
            "GPT-4o",
            vec![PricingPeriod::new(date(2024, 5, 13), 5.0, 15.0)],
        );
        add(
            "gpt-4o-2024-08-06",
            "OpenAI",
            "GPT-4o",
            vec![PricingPeriod::new(date(2024, 8, 6), 2.5, 10.0).with_cache(None, 1.25)],
        );
        add(
            "gpt-4o-mini",
            "OpenAI",
            "GPT-4o",
            vec![PricingPeriod::new(date(2024, 7, 18), 0.15, 0.6).with_cache(None, 0.075)],
        );
        add(
            "gpt-4-turbo",
            "OpenAI",
            "GPT-4",
            vec![PricingPeriod::new(date(2024, 4, 9), 10.0, 30.0)],
        );
        add(
            "gpt-4",
            "OpenAI",
            "GPT-4",
            vec![PricingPeriod::new(date(2023, 3, 14), 30.0, 60.0)],
        );
        add(
            "gpt-3.5-turbo",
            "OpenAI",
            "GPT-3.5",
            vec![
                PricingPeriod::new(date(2024, 1, 25), 0.5, 1.5),
                PricingPeriod::new(date(2023, 11, 6), 1.0, 2.0).until(date(2024, 1, 24)),
                PricingPeriod::new(date(2023, 6, 13), 1.5, 2.0).until(date(2023, 11, 5)),
            ],
        );
        add(
            "o1",
            "OpenAI",
            "o-series",
            vec![
                PricingPeriod::new(date(2024, 12, 17), 15.0, 60.0)
                    .with_cache(None, 7.5)
                    .with_reasoning(15.0),
                PricingPeriod::new(date(2024, 9, 12), 15.0, 60.0).until(date(2024, 12, 16)),
            ],
        );
        add(
            "o1-mini",
            "OpenAI",
            "o-series",
            vec![PricingPeriod::new(date(2024, 9, 12), 3.0, 12.0).with_reasoning(3.0)],
        );
        add(
            "o3-mini",
            "OpenAI",
            "o-series",
            vec![
                PricingPeriod::new(date(2025, 1, 31), 1.1, 4.4)
                    .with_cache(None, 0.55)
                    .with_reasoning(4.4),
            ],
        );

        // Anthropic
        add(
            "claude-3-5-sonnet",
            "Anthropic",
            "Claude 3.5",
            vec![PricingPeriod::new(date(2024, 6, 20), 3.0, 15.0).with_cache(Some(3.75), 0.3)],
        );
        add(
            "claude-3-5-haiku",
            "Anthropic",
            "Claude 3.5",
            vec![PricingPeriod::new(date(2024, 11, 4), 0.8, 4.0).with_cache(Some(1.0), 0.08)],
        );
        add(
            "claude-3-opus",
            "Anthropic",
            "Claude 3",
            vec![PricingPeriod::new(date(2024, 3, 4), 15.0, 75.0).with_cache(Some(18.75), 1.5)],
        );
        add(
            "claude-3-haiku",
            "Anthropic",
            "Claude 3",
            vec![PricingPeriod::new(date(2024, 3, 13), 0.25, 1.25).with_cache(Some(0.3), 0.03)],
        );
        add(
            "claude-sonnet-4",
            "Anthropic",
            "Claude 4",
            vec![PricingPeriod::new(date(2025, 5, 22), 3.0, 15.0).with_cache(Some(3.75), 0.3)],
        );
        add(
            "claude-opus-4",
            "Anthropic",
            "Claude 4",
            vec![PricingPeriod::new(date(2025, 5, 22), 15.0, 75.0).with_cache(Some(18.75), 1.5)],
        );

        // Google
        add(
            "gemini-1.5-pro",
            "Google",
            "Gemini 1.5",
            vec![
                PricingPeriod::new(date(2024, 10, 1), 1.25, 5.0),
                PricingPeriod::new(date(2024, 5, 14), 3.5, 10.5).until(date(2024, 9, 30)),
            ],
        );
        add(
            "gemini-1.5-flash",
            "Google",
            "Gemini 1.5",
            vec![
                PricingPeriod::new(date(2024, 8, 12), 0.075, 0.3),
                PricingPeriod::new(date(2024, 5, 14), 0.35, 1.05).until(date(2024, 8, 11)),
            ],
        );

        Self { models }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MissPolicy;

    #[test]
    fn test_builtin_table_is_valid() {
        let table = PricingTable::builtin();
        let rebuilt = PricingTable::new(table.models.clone()).unwrap();
        assert_eq!(rebuilt, table);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_builtin_periods_are_newest_first_and_disjoint() {
        let table = PricingTable::builtin();
        for (model, pricing) in &table.models {
            for pair in pricing.periods.windows(2) {
                let (newer, older) = (&pair[0], &pair[1]);
                assert!(
                    newer.effective_from > older.effective_from,
                    "{} periods out of order",
                    model
                );
                let older_end = older.effective_to.unwrap();
                assert!(older_end < newer.effective_from, "{} periods overlap", model);
            }
        }
    }

    #[test]
    fn test_o1_reasoning_period() {
        let table = PricingTable::builtin();
        let o1 = table.get(&ModelId::from("o1")).unwrap();
        let current = o1.period_at(date(2025, 1, 15), MissPolicy::Strict).unwrap();
        assert_eq!(current.reasoning, Some(15.0));
        let preview = o1.period_at(date(2024, 10, 1), MissPolicy::Strict).unwrap();
        assert_eq!(preview.reasoning, None);
    }
}
