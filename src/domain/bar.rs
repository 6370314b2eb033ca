//! OHLCV bar representation.

use chrono::NaiveDateTime;

/// One open/high/low/close/volume observation for a fixed time interval.
///
/// Bars are immutable once produced and arrive ordered ascending by
/// timestamp; the simulation assumes no duplicate or out-of-order
/// timestamps and does not validate this.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub ts: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
