use crate::models::{PlanAdherence, TradeDirection};

/// An exit within 5% of the target counts as reaching it.
pub const TARGET_TOLERANCE: f64 = 0.05;
/// An exit within 2% of the stop counts as honoring it.
pub const STOP_TOLERANCE: f64 = 0.02;

/// Pre-fill for the exit wizard's plan adherence answer.
///
/// Checks run in order and the first match wins:
///
/// | plan          | exit                                 | result      |
/// |---------------|--------------------------------------|-------------|
/// | none          | any                                  | `NoPlan`    |
/// | target        | at or past target minus band         | `Followed`  |
/// | stop          | within band of stop                  | `Followed`  |
/// | stop          | past stop plus band                  | `BrokeStop` |
/// | stop + target | between them                         | `Followed`  |
/// | target only   | short of target band                 | `EarlyExit` |
/// | stop only     | on the profit side of the stop band  | `Followed`  |
///
/// "Past" is direction-aware: below for buys, above for sells.
pub fn suggest_plan_adherence(
    direction: TradeDirection,
    exit_price: f64,
    stop_loss: Option<f64>,
    target: Option<f64>,
) -> PlanAdherence {
    if stop_loss.is_none() && target.is_none() {
        return PlanAdherence::NoPlan;
    }

    // Signed distance in the trade's favor: positive means more profit
    let favor = |price: f64| match direction {
        TradeDirection::Buy => exit_price - price,
        TradeDirection::Sell => price - exit_price,
    };

    if let Some(target) = target {
        if favor(target) >= -(target.abs() * TARGET_TOLERANCE) {
            return PlanAdherence::Followed;
        }
    }

    if let Some(stop) = stop_loss {
        let band = stop.abs() * STOP_TOLERANCE;
        if favor(stop).abs() <= band {
            return PlanAdherence::Followed;
        }
        if favor(stop) < -band {
            return PlanAdherence::BrokeStop;
        }
    }

    match (stop_loss, target) {
        (Some(_), Some(_)) => PlanAdherence::Followed,
        (None, Some(_)) => PlanAdherence::EarlyExit,
        _ => PlanAdherence::Followed,
    }
}
