//! Live order submission over a broker port.
//!
//! Kept deliberately thin: brokers accept an order and return an opaque
//! identifier. No fill confirmation, partial fills, or cancellation are
//! modeled.

use super::error::QuantbotError;
use super::order::Order;
use crate::ports::broker_port::BrokerPort;

/// Submits strategy orders to a broker and collects the returned ids.
pub struct LiveTrader<B: BrokerPort> {
    broker: B,
}

impl<B: BrokerPort> LiveTrader<B> {
    pub fn new(broker: B) -> Self {
        LiveTrader { broker }
    }

    pub fn execute(&self, symbol: &str, orders: &[Order]) -> Result<Vec<String>, QuantbotError> {
        let mut ids = Vec::with_capacity(orders.len());
        for order in orders {
            ids.push(self.broker.place_order(symbol, order)?);
        }
        Ok(ids)
    }
}
