use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MindsetState {
    Focused,
    Calm,
    Tired,
    Stressed,
    Overconfident,
    Tilted,
}

impl MindsetState {
    /// States where coaching leans toward sitting out or sizing down.
    pub fn is_at_risk(&self) -> bool {
        matches!(
            self,
            MindsetState::Stressed | MindsetState::Overconfident | MindsetState::Tilted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindsetCheck {
    pub id: String,
    pub date: NaiveDate,
    pub state: MindsetState,
    pub energy: u8, // 1-5
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindsetCheckInput {
    pub state: MindsetState,
    pub energy: u8,
    pub notes: Option<String>,
}

impl MindsetCheckInput {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.energy) {
            return Err("Energy must be between 1 and 5".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingGuidance {
    pub headline: String,
    #[serde(default)]
    pub tips: Vec<String>,
    pub focus_rule: Option<String>,
    pub generated_at: DateTime<Utc>,
}
