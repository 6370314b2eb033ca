//! Pre-trade risk gate.

use super::order::Order;

/// Whole-order notional cap, evaluated per order at submission time.
///
/// An order passes if its notional (close × size) does not exceed
/// `initial_cash × max_position_pct`. There is no partial sizing and no
/// memory of cumulative exposure across orders in the same bar; a
/// rejection silently drops the order.
pub fn passes_risk(order: &Order, close: f64, initial_cash: f64, max_position_pct: f64) -> bool {
    let max_value = initial_cash * max_position_pct;
    let notional = close * order.size;
    notional <= max_value
}
