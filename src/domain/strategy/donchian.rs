//! Donchian channel breakout strategy.
//!
//! Enters long when the close reaches the highest high of the trailing
//! entry window and exits to flat when it reaches the lowest low of the
//! trailing exit window. Long-only.

use crate::domain::bar::Bar;
use crate::domain::order::{Order, Side};
use crate::domain::strategy::{Exposure, Strategy, StrategyParams};

pub struct DonchianBreakout {
    lookback: usize,
    exit_lookback: usize,
    size: f64,
    exposure: Exposure,
}

impl DonchianBreakout {
    pub fn new(params: &StrategyParams) -> Self {
        DonchianBreakout {
            lookback: params.get_usize("lookback", 20),
            exit_lookback: params.get_usize("exit_lookback", 10),
            size: params.get("size", 100.0),
            exposure: Exposure::Flat,
        }
    }
}

impl Strategy for DonchianBreakout {
    fn on_bar(&mut self, bar: &Bar, history: &[Bar]) -> Vec<Order> {
        if history.len() < self.lookback {
            return Vec::new();
        }
        let mut highs: Vec<f64> = history.iter().map(|b| b.high).collect();
        highs.push(bar.high);
        let mut lows: Vec<f64> = history.iter().map(|b| b.low).collect();
        lows.push(bar.low);

        let entry_high = highs[highs.len() - self.lookback..]
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let exit_low = lows[lows.len() - self.exit_lookback..]
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);

        let mut orders = Vec::new();
        if bar.close >= entry_high && self.exposure != Exposure::Long {
            orders.push(Order::market(Side::Buy, self.size));
            self.exposure = Exposure::Long;
        } else if bar.close <= exit_low && self.exposure == Exposure::Long {
            orders.push(Order::market(Side::Sell, self.size));
            self.exposure = Exposure::Flat;
        }
        orders
    }
}
