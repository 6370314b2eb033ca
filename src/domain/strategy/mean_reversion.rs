//! Z-score mean reversion on closing prices.
//!
//! Rolling z-score of the current close against the mean and population
//! standard deviation of the trailing window (current bar included).
//! Oversold enters long, overbought enters short, reversion toward the
//! mean flattens. Zero-variance windows produce no signal.

use crate::domain::bar::Bar;
use crate::domain::order::{Order, Side};
use crate::domain::strategy::{Exposure, Strategy, StrategyParams};

pub struct MeanReversion {
    lookback: usize,
    entry_z: f64,
    exit_z: f64,
    size: f64,
    exposure: Exposure,
}

impl MeanReversion {
    pub fn new(params: &StrategyParams) -> Self {
        MeanReversion {
            lookback: params.get_usize("lookback", 20),
            entry_z: params.get("entry_z", 1.0),
            exit_z: params.get("exit_z", 0.2),
            size: params.get("size", 100.0),
            exposure: Exposure::Flat,
        }
    }
}

impl Strategy for MeanReversion {
    fn on_bar(&mut self, bar: &Bar, history: &[Bar]) -> Vec<Order> {
        if history.len() < self.lookback {
            return Vec::new();
        }
        let mut closes: Vec<f64> = history.iter().map(|b| b.close).collect();
        closes.push(bar.close);
        let window = &closes[closes.len() - self.lookback..];

        let mean = window.iter().sum::<f64>() / window.len() as f64;
        let variance =
            window.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / window.len() as f64;
        let std = variance.sqrt();
        if std == 0.0 {
            return Vec::new();
        }
        let z = (bar.close - mean) / std;

        let mut orders = Vec::new();
        if z <= -self.entry_z && self.exposure != Exposure::Long {
            // oversold -> long
            orders.push(Order::market(Side::Buy, self.size));
            self.exposure = Exposure::Long;
        } else if z >= self.entry_z && self.exposure != Exposure::Short {
            // overbought -> short
            orders.push(Order::market(Side::Sell, self.size));
            self.exposure = Exposure::Short;
        } else if z.abs() < self.exit_z && self.exposure != Exposure::Flat {
            // revert to flat
            let side = if self.exposure == Exposure::Long {
                Side::Sell
            } else {
                Side::Buy
            };
            orders.push(Order::market(side, self.size));
            self.exposure = Exposure::Flat;
        }
        orders
    }
}
