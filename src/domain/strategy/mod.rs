//! Strategy interface, parameter mapping, and name registry.
//!
//! Strategies are bar-driven decision units: the orchestrator hands each
//! strategy the current bar plus the history of all prior bars and collects
//! zero or more orders. A strategy never touches the portfolio; the only
//! state it may mutate is its own (notably a private intended-exposure
//! flag). Given identical (bar, history, internal state) the same orders
//! must result, so runs replay deterministically.

pub mod ma_cross;
pub mod momentum;
pub mod mean_reversion;
pub mod donchian;

use std::collections::HashMap;

use super::bar::Bar;
use super::error::QuantbotError;
use super::order::Order;

pub use donchian::DonchianBreakout;
pub use ma_cross::MovingAverageCross;
pub use mean_reversion::MeanReversion;
pub use momentum::Momentum;

/// Bar-driven decision unit.
pub trait Strategy {
    /// Called once before the loop with an empty history.
    fn on_start(&mut self, _history: &[Bar]) {}

    /// Called once per bar. `history` holds all prior bars; the current
    /// bar is excluded. Returns the orders to submit, in emission order.
    fn on_bar(&mut self, bar: &Bar, history: &[Bar]) -> Vec<Order>;

    /// Called once after the loop ends, on every exit path.
    fn on_stop(&mut self) {}
}

impl std::fmt::Debug for dyn Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Strategy")
    }
}

/// A strategy's privately tracked intended exposure.
///
/// Deliberately duplicated state: this could in principle be derived from
/// the portfolio's actual position, but decisions must not depend on
/// authoritative ledger state, so each strategy mirrors its own flag and
/// uses it only to avoid re-emitting redundant orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exposure {
    #[default]
    Flat,
    Long,
    Short,
}

/// Free-form numeric parameter mapping for strategy construction.
///
/// Cloned on every use: two configurations never alias the same mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrategyParams(HashMap<String, f64>);

impl StrategyParams {
    pub fn new(params: HashMap<String, f64>) -> Self {
        StrategyParams(params)
    }

    pub fn get(&self, key: &str, default: f64) -> f64 {
        self.0.get(key).copied().unwrap_or(default)
    }

    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        self.0
            .get(key)
            .map(|&v| v as usize)
            .unwrap_or(default)
    }
}

impl FromIterator<(String, f64)> for StrategyParams {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        StrategyParams(iter.into_iter().collect())
    }
}

/// Name-to-constructor registry for selection by configuration.
pub fn build_strategy(
    name: &str,
    params: &StrategyParams,
) -> Result<Box<dyn Strategy>, QuantbotError> {
    match name {
        "ma_cross" => Ok(Box::new(MovingAverageCross::new(params))),
        "momentum" => Ok(Box::new(Momentum::new(params))),
        "mean_reversion" => Ok(Box::new(MeanReversion::new(params))),
        "donchian" => Ok(Box::new(DonchianBreakout::new(params))),
        _ => Err(QuantbotError::UnknownStrategy {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_defaulting() {
        let params: StrategyParams = [("fast".to_string(), 3.0)].into_iter().collect();
        assert_eq!(params.get_usize("fast", 5), 3);
        assert_eq!(params.get_usize("slow", 20), 20);
        assert!((params.get("size", 100.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn params_clone_does_not_alias() {
        let a: StrategyParams = [("size".to_string(), 50.0)].into_iter().collect();
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn registry_resolves_all_reference_variants() {
        let params = StrategyParams::default();
        for name in ["ma_cross", "momentum", "mean_reversion", "donchian"] {
            assert!(build_strategy(name, &params).is_ok(), "{name} missing");
        }
    }

    #[test]
    fn registry_rejects_unknown_name() {
        let params = StrategyParams::default();
        let err = build_strategy("hodl", &params).unwrap_err();
        assert!(matches!(
            err,
            QuantbotError::UnknownStrategy { ref name } if name == "hodl"
        ));
    }
}
