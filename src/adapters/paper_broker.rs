//! Paper broker — accepts every order without routing it anywhere.
//!
//! Useful as a wiring target for `LiveTrader` until a real brokerage
//! adapter exists. Order ids are sequential within the broker instance.

use crate::domain::error::QuantbotError;
use crate::domain::order::Order;
use crate::ports::broker_port::BrokerPort;
use std::cell::Cell;

#[derive(Default)]
pub struct PaperBroker {
    next_id: Cell<u64>,
}

impl PaperBroker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BrokerPort for PaperBroker {
    fn place_order(&self, symbol: &str, order: &Order) -> Result<String, QuantbotError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        eprintln!(
            "[paper] {} {} x{} for {}",
            order.side,
            symbol,
            order.size,
            order
                .limit
                .map(|p| format!("limit {p}"))
                .unwrap_or_else(|| "market".to_string())
        );
        Ok(format!("paper-{id}"))
    }
}
