pub mod adherence;
pub mod nudges;
pub mod pnl;
pub mod risk;

pub use adherence::{STOP_TOLERANCE, TARGET_TOLERANCE, suggest_plan_adherence};
pub use nudges::{NudgeContext, NudgeKind, NudgeSeverity, RiskNudge, risk_nudges};
pub use pnl::{PnlPreview, gross_pnl, pnl_percent};
pub use risk::{RiskReward, risk_reward};
