use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    Stock,
    Option,
    Future,
    Forex,
    Crypto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeStatus {
    Open,
    Closed,
    /// Closed at the broker, not yet journaled.
    ExternallyClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSource {
    Manual,
    Imported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Calm,
    Confident,
    Focused,
    Anxious,
    Fearful,
    Greedy,
    Frustrated,
    Excited,
    Impatient,
    Fomo,
    Revenge,
    Bored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    TargetHit,
    StopHit,
    ManualExit,
    TimeExit,
    Emotional,
    NewsEvent,
}

/// Outcome of comparing an exit against the planned stop and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAdherence {
    Followed,
    EarlyExit,
    BrokeStop,
    NoPlan,
}

macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    other => Err(format!("Unknown {}: {}", stringify!($ty), other)),
                }
            }
        }
    };
}

string_enum!(InstrumentType {
    Stock => "stock",
    Option => "option",
    Future => "future",
    Forex => "forex",
    Crypto => "crypto",
});

string_enum!(TradeDirection {
    Buy => "buy",
    Sell => "sell",
});

string_enum!(TradeStatus {
    Open => "open",
    Closed => "closed",
    ExternallyClosed => "externally_closed",
});

string_enum!(TradeSource {
    Manual => "manual",
    Imported => "imported",
});

string_enum!(Emotion {
    Calm => "calm",
    Confident => "confident",
    Focused => "focused",
    Anxious => "anxious",
    Fearful => "fearful",
    Greedy => "greedy",
    Frustrated => "frustrated",
    Excited => "excited",
    Impatient => "impatient",
    Fomo => "fomo",
    Revenge => "revenge",
    Bored => "bored",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub symbol: String,
    pub instrument_type: InstrumentType,
    pub direction: TradeDirection,
    pub quantity: f64,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub planned_stop_loss: Option<f64>,
    pub planned_target: Option<f64>,
    pub confidence: Option<u8>,  // 1-10
    pub risk_comfort: Option<u8>, // 1-5
    pub status: TradeStatus,
    #[serde(default)]
    pub emotions: Vec<Emotion>,
    pub source: TradeSource,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub pnl: Option<f64>,
    pub exit_reason: Option<ExitReason>,
    pub plan_adherence: Option<PlanAdherence>,
    pub lessons: Option<String>,
}

impl Trade {
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// Closed at the broker but still waiting for the completion wizard.
    pub fn needs_completion(&self) -> bool {
        self.status == TradeStatus::ExternallyClosed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTradeInput {
    pub symbol: String,
    pub instrument_type: InstrumentType,
    pub direction: TradeDirection,
    pub quantity: f64,
    pub entry_price: f64,
    pub planned_stop_loss: Option<f64>,
    pub planned_target: Option<f64>,
    pub confidence: Option<u8>,
    pub risk_comfort: Option<u8>,
    pub emotions: Vec<Emotion>,
    pub notes: Option<String>,
}

/// Partial update for `PUT /trades/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTradeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotions: Option<Vec<Emotion>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTradeInput {
    pub exit_price: f64,
    pub exit_time: Option<DateTime<Utc>>,
    pub exit_reason: ExitReason,
    pub plan_adherence: PlanAdherence,
    pub emotions: Vec<Emotion>,
    pub lessons: Option<String>,
}

/// Journaling for a trade the broker already closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTradeInput {
    pub exit_price: f64,
    pub followed_plan: bool,
    pub emotions: Vec<Emotion>,
    pub lessons: String,
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: u32,
    pub skipped: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[cfg(test)]
impl Trade {
    /// AAPL long, 10 @ 100 with stop 95 and target 110.
    pub(crate) fn sample(id: &str, status: TradeStatus) -> Self {
        use chrono::TimeZone;

        Self {
            id: id.to_string(),
            symbol: "AAPL".to_string(),
            instrument_type: InstrumentType::Stock,
            direction: TradeDirection::Buy,
            quantity: 10.0,
            entry_price: 100.0,
            exit_price: None,
            planned_stop_loss: Some(95.0),
            planned_target: Some(110.0),
            confidence: Some(7),
            risk_comfort: Some(4),
            status,
            emotions: Vec::new(),
            source: TradeSource::Manual,
            entry_time: Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap(),
            exit_time: None,
            notes: None,
            pnl: None,
            exit_reason: None,
            plan_adherence: None,
            lessons: None,
        }
    }
}
