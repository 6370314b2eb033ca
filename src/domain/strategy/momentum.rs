//! Momentum strategy on close-to-close returns.
//!
//! Percentage return over a lookback window ending at the current bar:
//! long while positive, flat otherwise. No signal until more than
//! `lookback` closes are available.

use crate::domain::bar::Bar;
use crate::domain::order::{Order, Side};
use crate::domain::strategy::{Exposure, Strategy, StrategyParams};

pub struct Momentum {
    lookback: usize,
    size: f64,
    exposure: Exposure,
}

impl Momentum {
    pub fn new(params: &StrategyParams) -> Self {
        Momentum {
            lookback: params.get_usize("lookback", 20),
            size: params.get("size", 100.0),
            exposure: Exposure::Flat,
        }
    }
}

impl Strategy for Momentum {
    fn on_bar(&mut self, bar: &Bar, history: &[Bar]) -> Vec<Order> {
        if history.len() < self.lookback {
            return Vec::new();
        }
        let reference = history[history.len() - self.lookback].close;
        let ret = bar.close / reference - 1.0;

        let mut orders = Vec::new();
        if ret > 0.0 && self.exposure != Exposure::Long {
            orders.push(Order::market(Side::Buy, self.size));
            self.exposure = Exposure::Long;
        } else if ret <= 0.0 && self.exposure == Exposure::Long {
            orders.push(Order::market(Side::Sell, self.size));
            self.exposure = Exposure::Flat;
        }
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                ts: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    fn run(strategy: &mut Momentum, closes: &[f64]) -> Vec<(usize, Order)> {
        let series = bars(closes);
        let mut emitted = Vec::new();
        for (i, bar) in series.iter().enumerate() {
            for order in strategy.on_bar(bar, &series[..i]) {
                emitted.push((i, order));
            }
        }
        emitted
    }

    fn params(lookback: f64) -> StrategyParams {
        [("lookback".to_string(), lookback)].into_iter().collect()
    }

    #[test]
    fn no_signal_during_warmup() {
        let mut strategy = Momentum::new(&params(3.0));
        assert!(run(&mut strategy, &[10.0, 11.0, 12.0]).is_empty());
    }

    #[test]
    fn enters_long_on_positive_momentum() {
        let mut strategy = Momentum::new(&params(2.0));
        let emitted = run(&mut strategy, &[10.0, 10.0, 11.0, 12.0]);
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].0, 2);
        assert_eq!(emitted[0].1.side, Side::Buy);
    }

    #[test]
    fn flattens_when_momentum_turns_non_positive() {
        let mut strategy = Momentum::new(&params(2.0));
        let emitted = run(&mut strategy, &[10.0, 10.0, 11.0, 12.0, 9.0]);
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[1].0, 4);
        assert_eq!(emitted[1].1.side, Side::Sell);
    }

    #[test]
    fn never_goes_short() {
        let mut strategy = Momentum::new(&params(2.0));
        let emitted = run(&mut strategy, &[10.0, 9.0, 8.0, 7.0, 6.0]);
        assert!(emitted.is_empty());
    }
}
