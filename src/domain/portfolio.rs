//! Portfolio ledger: cash and position accounting.

use std::collections::HashMap;

use super::order::Order;
use super::position::Position;

/// Cash balance plus per-symbol positions.
///
/// The ledger does not bound exposure (that is the risk gate's job at
/// order-submission time) and does not flag negative cash; unconstrained
/// leverage is implicit. It also keeps no equity history — the backtest
/// orchestrator owns the time-indexed equity series and queries [`value`]
/// per bar.
///
/// [`value`]: Portfolio::value
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub positions: HashMap<String, Position>,
}

impl Portfolio {
    pub fn new(cash: f64) -> Self {
        Portfolio {
            cash,
            positions: HashMap::new(),
        }
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Apply a fill at `price` with slippage and commission in basis points.
    ///
    /// Slippage moves the fill price against the trader: up for buys, down
    /// for sells. Commission is charged on the absolute fill notional. The
    /// average-cost basis is the size-weighted average of the old position
    /// cost and the new trade cost; when a single order flips the position
    /// through zero the same formula is applied unchanged, so the resulting
    /// `avg_price` is an artifact of the arithmetic rather than a true cost
    /// basis for the opposite-sign exposure. Known approximation, kept as-is.
    pub fn process_order(
        &mut self,
        symbol: &str,
        order: &Order,
        price: f64,
        commission_bps: f64,
        slippage_bps: f64,
    ) {
        let signed_size = order.side.signed(order.size);
        let direction = if signed_size > 0.0 { 1.0 } else { -1.0 };
        let fill_price = price + price * (slippage_bps / 10_000.0) * direction;

        let cost = fill_price * signed_size;
        let commission = (fill_price * order.size).abs() * (commission_bps / 10_000.0);
        self.cash -= cost + commission;

        let pos = self.positions.entry(symbol.to_string()).or_default();
        let new_size = pos.size + signed_size;
        if new_size == 0.0 {
            pos.size = 0.0;
            pos.avg_price = 0.0;
        } else {
            pos.avg_price = (pos.avg_price * pos.size + fill_price * signed_size) / new_size;
            pos.size = new_size;
        }
    }

    /// Mark-to-market equity: cash plus the signed value of every position.
    pub fn value(&self, price_lookup: impl Fn(&str) -> f64) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .map(|(symbol, pos)| pos.market_value(price_lookup(symbol)))
            .sum();
        self.cash + position_value
    }
}
