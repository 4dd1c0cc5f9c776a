// Module declarations
pub mod aggregator;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatting;
pub mod pricing;
pub mod service;
pub mod source;
pub mod types;

// Re-export commonly used items
pub use aggregator::CostAggregator;
pub use config::CostConfig;
pub use error::{CostError, Result};
pub use pricing::{PricingResolver, PricingTable, calculate_cost};
pub use service::CostService;
pub use source::{JsonlRecordSource, MemoryRecordSource, RecordQuery, RecordSource};
pub use types::{
    ConversationCostDisplay, ConversationCostSummary, ConversationId, Cost, CostBreakdown,
    MissPolicy, ModelBreakdownEntry, ModelId, ModelMetadata, ModelPricing, PricingPeriod,
    TokenUsage, UsageRecord, UserId,
};
