use crate::models::{Trade, TradeDirection};

/// Gross P&L before fees: buy `(exit - entry) * qty`, sell `(entry - exit) * qty`.
pub fn gross_pnl(direction: TradeDirection, entry_price: f64, exit_price: f64, quantity: f64) -> f64 {
    match direction {
        TradeDirection::Buy => (exit_price - entry_price) * quantity,
        TradeDirection::Sell => (entry_price - exit_price) * quantity,
    }
}

/// Return on the position's cost basis, in percent. `None` for a zero basis.
pub fn pnl_percent(
    direction: TradeDirection,
    entry_price: f64,
    exit_price: f64,
    quantity: f64,
) -> Option<f64> {
    let basis = entry_price * quantity;
    if basis == 0.0 {
        return None;
    }
    Some(gross_pnl(direction, entry_price, exit_price, quantity) / basis.abs() * 100.0)
}

/// P&L shown on the exit review step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PnlPreview {
    pub gross: f64,
    pub percent: Option<f64>,
}

impl PnlPreview {
    pub fn for_exit(trade: &Trade, exit_price: f64) -> Self {
        Self {
            gross: gross_pnl(trade.direction, trade.entry_price, exit_price, trade.quantity),
            percent: pnl_percent(trade.direction, trade.entry_price, exit_price, trade.quantity),
        }
    }

    pub fn is_win(&self) -> bool {
        self.gross > 0.0
    }
}
