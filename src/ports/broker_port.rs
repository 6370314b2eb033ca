//! Order placement port trait.

use crate::domain::error::QuantbotError;
use crate::domain::order::Order;

/// Accepts a symbol and an order, returning an opaque order identifier.
pub trait BrokerPort {
    fn place_order(&self, symbol: &str, order: &Order) -> Result<String, QuantbotError>;
}
