use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::trade::TradeDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Broker {
    Alpaca,
    Tradier,
    InteractiveBrokers,
}

impl Broker {
    pub const ALL: [Broker; 3] = [Broker::Alpaca, Broker::Tradier, Broker::InteractiveBrokers];

    /// Path segment used in `/broker/:broker/...`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Broker::Alpaca => "alpaca",
            Broker::Tradier => "tradier",
            Broker::InteractiveBrokers => "interactive_brokers",
        }
    }
}

impl fmt::Display for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerStatus {
    pub broker: Broker,
    pub connected: bool,
    pub account_id: Option<String>,
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl BrokerStatus {
    /// Placeholder shown when the status call itself failed.
    pub fn unavailable(broker: Broker) -> Self {
        Self {
            broker,
            connected: false,
            account_id: None,
            last_sync_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerConnectResponse {
    pub authorization_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerSyncResult {
    pub imported: u32,
    pub updated: u32,
    pub externally_closed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerPosition {
    pub symbol: String,
    pub direction: TradeDirection,
    pub quantity: f64,
    pub average_price: f64,
    pub market_value: Option<f64>,
    pub unrealized_pnl: Option<f64>,
}
