use async_trait::async_trait;

use super::error::ApiError;
use crate::filters::FilterState;
use crate::models::{
    CloseTradeInput, CoachingGuidance, CompleteTradeInput, CreateRuleInput, CreateTradeInput,
    MindsetCheck, MindsetCheckInput, Trade, TradingRule, UpdateRuleInput, UpdateTradeInput,
};

/// Trade resource as seen by the trades store.
#[async_trait]
pub trait TradeGateway: Send + Sync {
    async fn list_trades(&self, filters: &FilterState) -> Result<Vec<Trade>, ApiError>;

    async fn get_trade(&self, id: &str) -> Result<Trade, ApiError>;

    async fn create_trade(&self, input: &CreateTradeInput) -> Result<Trade, ApiError>;

    async fn update_trade(&self, id: &str, input: &UpdateTradeInput) -> Result<Trade, ApiError>;

    async fn close_trade(&self, id: &str, input: &CloseTradeInput) -> Result<Trade, ApiError>;

    async fn complete_trade(&self, id: &str, input: &CompleteTradeInput)
        -> Result<Trade, ApiError>;

    async fn delete_trade(&self, id: &str) -> Result<(), ApiError>;
}

/// Rule (guardrail) CRUD as seen by the rules store.
#[async_trait]
pub trait RuleGateway: Send + Sync {
    async fn list_rules(&self) -> Result<Vec<TradingRule>, ApiError>;

    async fn create_rule(&self, input: &CreateRuleInput) -> Result<TradingRule, ApiError>;

    async fn update_rule(&self, id: &str, input: &UpdateRuleInput)
        -> Result<TradingRule, ApiError>;

    async fn toggle_rule(&self, id: &str) -> Result<TradingRule, ApiError>;

    async fn delete_rule(&self, id: &str) -> Result<(), ApiError>;
}

/// Coaching endpoints used by the coaching service.
#[async_trait]
pub trait CoachingGateway: Send + Sync {
    /// `None` when today's check has not been submitted yet.
    async fn todays_mindset_check(&self) -> Result<Option<MindsetCheck>, ApiError>;

    async fn submit_mindset_check(&self, input: &MindsetCheckInput)
        -> Result<MindsetCheck, ApiError>;

    async fn guidance(&self) -> Result<CoachingGuidance, ApiError>;
}
