/// Dollar risk and reward of a planned trade.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskReward {
    pub risk: f64,
    pub reward: f64,
    /// Reward per unit of risk, two decimals, or "N/A" when there is no risk.
    pub ratio: String,
}

impl RiskReward {
    pub fn ratio_value(&self) -> Option<f64> {
        if self.risk > 0.0 {
            Some(self.reward / self.risk)
        } else {
            None
        }
    }
}

pub fn risk_reward(entry_price: f64, stop_loss: f64, target: f64, quantity: f64) -> RiskReward {
    let risk = (entry_price - stop_loss).abs() * quantity;
    let reward = (target - entry_price).abs() * quantity;
    let ratio = if risk > 0.0 {
        format!("{:.2}", reward / risk)
    } else {
        "N/A".to_string()
    };

    RiskReward { risk, reward, ratio }
}
