//! Per-symbol position tracking.

/// Signed net exposure in one symbol.
///
/// `size` > 0 is long, < 0 is short. `avg_price` is the size-weighted
/// average price at which the current net exposure was accumulated and is
/// meaningful only while `size != 0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Position {
    pub size: f64,
    pub avg_price: f64,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.size > 0.0
    }

    pub fn is_short(&self) -> bool {
        self.size < 0.0
    }

    pub fn is_flat(&self) -> bool {
        self.size == 0.0
    }

    /// Signed mark-to-market value: size × price.
    pub fn market_value(&self, price: f64) -> f64 {
        self.size * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.size * (price - self.avg_price)
    }
}
