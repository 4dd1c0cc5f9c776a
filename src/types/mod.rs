pub mod cost;
pub mod ids;
pub mod pricing;
pub mod summary;
pub mod usage;

pub use cost::{Cost, CostBreakdown};
pub use ids::{ConversationId, ModelId, UserId};
pub use pricing::{MissPolicy, ModelMetadata, ModelPricing, PricingPeriod};
pub use summary::{ConversationCostDisplay, ConversationCostSummary, ModelBreakdownEntry};
pub use usage::{CacheTokens, TokenPair, TokenUsage, Usage, UsageRecord};
