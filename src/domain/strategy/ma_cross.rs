//! Moving-average crossover strategy.
//!
//! Simple moving averages over two lookback windows (fast < slow) on
//! closing prices including the current bar. Goes long when the fast
//! average is above the slow one and short when it is below. No signal
//! until more than `slow` closes are available.

use crate::domain::bar::Bar;
use crate::domain::order::{Order, Side};
use crate::domain::strategy::{Exposure, Strategy, StrategyParams};

pub struct MovingAverageCross {
    fast: usize,
    slow: usize,
    size: f64,
    exposure: Exposure,
}

impl MovingAverageCross {
    pub fn new(params: &StrategyParams) -> Self {
        MovingAverageCross {
            fast: params.get_usize("fast", 5),
            slow: params.get_usize("slow", 20),
            size: params.get("size", 100.0),
            exposure: Exposure::Flat,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

impl Strategy for MovingAverageCross {
    fn on_bar(&mut self, bar: &Bar, history: &[Bar]) -> Vec<Order> {
        if history.len() < self.slow {
            return Vec::new();
        }
        let mut closes: Vec<f64> = history.iter().map(|b| b.close).collect();
        closes.push(bar.close);

        let fast_ma = mean(&closes[closes.len() - self.fast..]);
        let slow_ma = mean(&closes[closes.len() - self.slow..]);

        let mut orders = Vec::new();
        if fast_ma > slow_ma && self.exposure != Exposure::Long {
            orders.push(Order::market(Side::Buy, self.size));
            self.exposure = Exposure::Long;
        } else if fast_ma < slow_ma && self.exposure != Exposure::Short {
            orders.push(Order::market(Side::Sell, self.size));
            self.exposure = Exposure::Short;
        }
        orders
    }
}
