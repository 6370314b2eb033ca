#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use quantbot::domain::bar::Bar;
use quantbot::domain::config::{
    AppConfig, BacktestConfig, DataConfig, RiskConfig, StrategyConfig,
};
use quantbot::domain::error::QuantbotError;
use quantbot::domain::strategy::StrategyParams;
use quantbot::ports::data_port::DataProvider;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockProvider {
    pub data: HashMap<String, Vec<Bar>>,
    /// Errors returned before the data, one per call, in order.
    pub failures: RefCell<Vec<QuantbotError>>,
    pub calls: RefCell<usize>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            failures: RefCell::new(Vec::new()),
            calls: RefCell::new(0),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_failures(self, failures: Vec<QuantbotError>) -> Self {
        *self.failures.borrow_mut() = failures;
        self
    }

    pub fn call_count(&self) -> usize {
        *self.calls.borrow()
    }
}

impl DataProvider for MockProvider {
    fn fetch_history(
        &self,
        symbol: &str,
        _start: Option<NaiveDate>,
        _end: Option<NaiveDate>,
        interval: &str,
    ) -> Result<Vec<Bar>, QuantbotError> {
        *self.calls.borrow_mut() += 1;
        if !self.failures.borrow().is_empty() {
            return Err(self.failures.borrow_mut().remove(0));
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => Ok(bars.clone()),
            _ => Err(QuantbotError::NoData {
                symbol: symbol.to_string(),
                interval: interval.to_string(),
            }),
        }
    }
}

pub fn ts(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_bar(day: u32, close: f64) -> Bar {
    Bar {
        ts: ts(day),
        open: close,
        high: close,
        low: close,
        close,
        volume: 1000.0,
    }
}

pub fn flat_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i as u32 + 1, close))
        .collect()
}

pub fn sample_config(strategy: &str, params: StrategyParams) -> AppConfig {
    AppConfig {
        data: DataConfig {
            symbol: "TEST".into(),
            timeframe: "1d".into(),
            start: None,
            end: None,
            provider: "csv".into(),
        },
        strategy: StrategyConfig {
            name: strategy.into(),
            params,
        },
        risk: RiskConfig {
            max_position_pct: 0.2,
            daily_stop_pct: 0.9,
        },
        backtest: BacktestConfig {
            initial_cash: 100_000.0,
            slippage_bps: 0.0,
            commission_bps: 0.0,
            risk_free_rate: 0.0,
        },
    }
}

pub fn params(pairs: &[(&str, f64)]) -> StrategyParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}
