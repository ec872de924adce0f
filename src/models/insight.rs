use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time window the backend aggregates insights over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightsRange {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl InsightsRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightsRange::Week => "7d",
            InsightsRange::Month => "30d",
            InsightsRange::Quarter => "90d",
            InsightsRange::Year => "1y",
            InsightsRange::All => "all",
        }
    }
}

impl fmt::Display for InsightsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub severity: InsightSeverity,
    pub metric: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightAction {
    pub label: String,
    /// Client route or rule type the action points at.
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightCardV2 {
    pub id: String,
    pub kind: String,
    pub headline: String,
    pub body: String,
    pub severity: InsightSeverity,
    #[serde(default)]
    pub evidence: Vec<String>,
    pub confidence: f64,
    #[serde(default)]
    pub actions: Vec<InsightAction>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralSnapshot {
    pub range: InsightsRange,
    pub discipline_score: f64,
    pub risk_score: f64,
    pub psychology_score: f64,
    pub trades_analyzed: u32,
    pub status: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnaTrait {
    pub name: String,
    pub score: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingDna {
    pub archetype: String,
    pub summary: String,
    #[serde(default)]
    pub traits: Vec<DnaTrait>,
    pub computed_at: DateTime<Utc>,
}

impl TradingDna {
    /// Traits ordered by score, strongest first.
    pub fn dominant_traits(&self, count: usize) -> Vec<&DnaTrait> {
        let mut traits: Vec<&DnaTrait> = self.traits.iter().collect();
        traits.sort_by(|a, b| b.score.total_cmp(&a.score));
        traits.truncate(count);
        traits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_wire_values() {
        assert_eq!(serde_json::to_string(&InsightsRange::Quarter).unwrap(), "\"90d\"");
        let range: InsightsRange = serde_json::from_str("\"1y\"").unwrap();
        assert_eq!(range, InsightsRange::Year);
        assert_eq!(InsightsRange::default().as_str(), "30d");
    }

    #[test]
    fn test_dominant_traits() {
        let dna = TradingDna {
            archetype: "Disciplined Scalper".to_string(),
            summary: String::new(),
            traits: vec![
                DnaTrait { name: "patience".into(), score: 0.4, description: None },
                DnaTrait { name: "discipline".into(), score: 0.9, description: None },
                DnaTrait { name: "risk".into(), score: 0.7, description: None },
            ],
            computed_at: Utc::now(),
        };
        let names: Vec<&str> = dna.dominant_traits(2).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["discipline", "risk"]);
    }
}
