pub mod admin;
pub mod broker;
pub mod client;
pub mod coaching;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod http;
pub mod insights;
pub mod rules;
pub mod suggestions;
pub mod symbols;
pub mod trades;

#[cfg(test)]
pub(crate) mod test_support;

pub use admin::AdminApi;
pub use broker::BrokerApi;
pub use client::{CoachingGateway, RuleGateway, TradeGateway};
pub use coaching::CoachingApi;
pub use credentials::{KeyringTokenStore, MemoryTokenStore, Session, TokenStore};
pub use envelope::{ApiEnvelope, unwrap_envelope};
pub use error::ApiError;
pub use http::ApiClient;
pub use insights::InsightsApi;
pub use rules::RulesApi;
pub use suggestions::SuggestionsApi;
pub use symbols::{SymbolSearch, SymbolsApi};
pub use trades::TradesApi;
