/// Unit prices in the pricing table are quoted per this many tokens
pub const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Costs are rounded to this many decimal places (USD) in summaries
pub const USD_DECIMAL_PLACES: i32 = 5;

/// Number of conversations fetched concurrently by the batch variant
/// Batches run one after another; this bounds outstanding fetches
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Label used for provider, category and primary model when nothing is known
pub const UNKNOWN_LABEL: &str = "Unknown";
