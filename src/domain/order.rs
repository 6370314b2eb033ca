//! Order representation exchanged between strategies, the risk gate,
//! the portfolio ledger, and brokers.

use std::fmt;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// +size for buys, -size for sells.
    pub fn signed(&self, size: f64) -> f64 {
        match self {
            Side::Buy => size,
            Side::Sell => -size,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// A single order emitted by a strategy on one bar.
///
/// `limit` is carried for broker submission but unused by the simulation;
/// backtest fills are always at the bar's closing price.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub side: Side,
    pub size: f64,
    pub limit: Option<f64>,
}

impl Order {
    pub fn market(side: Side, size: f64) -> Self {
        Order {
            side,
            size,
            limit: None,
        }
    }
}
