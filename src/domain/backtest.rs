//! Backtest orchestrator: the bar-driven event loop.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use super::bar::Bar;
use super::config::AppConfig;
use super::error::QuantbotError;
use super::metrics::compute_stats;
use super::portfolio::Portfolio;
use super::risk::passes_risk;
use super::strategy::Strategy;
use crate::ports::data_port::{fetch_history_with_retry, DataProvider};

/// One mark-to-market observation of total portfolio value.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub ts: NaiveDateTime,
    pub equity: f64,
}

/// Final output of a run: the equity trajectory plus named statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub equity_curve: Vec<EquityPoint>,
    pub stats: HashMap<String, f64>,
}

/// Drives one backtest run: strategy decisions, risk gating, ledger
/// updates, equity tracking, and the drawdown stop.
///
/// The orchestrator is the single owner of the time-indexed equity
/// history; the portfolio only answers stateless valuation queries. Each
/// run owns an independent strategy and portfolio, so separate runs share
/// no mutable state.
pub struct Backtester {
    config: AppConfig,
    strategy: Box<dyn Strategy>,
    portfolio: Portfolio,
}

impl Backtester {
    pub fn new(config: AppConfig, strategy: Box<dyn Strategy>) -> Self {
        let portfolio = Portfolio::new(config.backtest.initial_cash);
        Backtester {
            config,
            strategy,
            portfolio,
        }
    }

    /// Fetch the bar series (exactly once, before streaming begins) and
    /// run the event loop over it. Data problems surface here; the run
    /// never starts on an empty series.
    pub fn run(&mut self, provider: &dyn DataProvider) -> Result<BacktestResult, QuantbotError> {
        let bars = fetch_history_with_retry(
            provider,
            &self.config.data.symbol,
            self.config.data.start,
            self.config.data.end,
            &self.config.data.timeframe,
        )?;
        Ok(self.run_series(&bars))
    }

    /// The streaming loop over an in-memory bar series.
    ///
    /// Per bar: ask the strategy for orders given the history of prior
    /// bars, gate each order, fill survivors at the bar close, append the
    /// bar to history, snapshot equity at the bar close, and check the
    /// drawdown stop. Breaching the stop truncates the stream; the
    /// remaining bars are never processed. The strategy's teardown hook
    /// runs on every exit path.
    pub fn run_series(&mut self, bars: &[Bar]) -> BacktestResult {
        let symbol = self.config.data.symbol.clone();
        let mut history: Vec<Bar> = Vec::with_capacity(bars.len());
        let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(bars.len());
        let mut peak_equity = self.portfolio.cash;

        self.strategy.on_start(&history);

        for bar in bars {
            let orders = self.strategy.on_bar(bar, &history);
            for order in &orders {
                if !passes_risk(
                    order,
                    bar.close,
                    self.config.backtest.initial_cash,
                    self.config.risk.max_position_pct,
                ) {
                    continue;
                }
                self.portfolio.process_order(
                    &symbol,
                    order,
                    bar.close,
                    self.config.backtest.commission_bps,
                    self.config.backtest.slippage_bps,
                );
            }
            history.push(bar.clone());

            let equity = self.portfolio.value(|_| bar.close);
            equity_curve.push(EquityPoint {
                ts: bar.ts,
                equity,
            });
            if equity > peak_equity {
                peak_equity = equity;
            }
            if breached_drawdown(equity, peak_equity, self.config.risk.daily_stop_pct) {
                break;
            }
        }

        self.strategy.on_stop();

        let stats = compute_stats(&equity_curve, self.config.backtest.risk_free_rate);
        BacktestResult {
            equity_curve,
            stats,
        }
    }
}

fn breached_drawdown(equity: f64, peak_equity: f64, daily_stop_pct: f64) -> bool {
    if peak_equity == 0.0 {
        return false;
    }
    let drop = (peak_equity - equity) / peak_equity;
    drop >= daily_stop_pct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{BacktestConfig, DataConfig, RiskConfig, StrategyConfig};
    use crate::domain::order::{Order, Side};
    use crate::domain::strategy::StrategyParams;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use std::cell::Cell;
    use std::rc::Rc;

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

    fn config(max_position_pct: f64, daily_stop_pct: f64) -> AppConfig {
        AppConfig {
            data: DataConfig {
                symbol: "TEST".into(),
                timeframe: "1d".into(),
                start: None,
                end: None,
                provider: "csv".into(),
            },
            strategy: StrategyConfig {
                name: "scripted".into(),
                params: StrategyParams::default(),
            },
            risk: RiskConfig {
                max_position_pct,
                daily_stop_pct,
            },
            backtest: BacktestConfig {
                initial_cash: 100_000.0,
                slippage_bps: 0.0,
                commission_bps: 0.0,
                risk_free_rate: 0.0,
            },
        }
    }

    /// Emits a fixed order on chosen bar indices and records lifecycle calls.
    struct Scripted {
        orders: Vec<(usize, Order)>,
        seen: usize,
        started: Rc<Cell<bool>>,
        stopped: Rc<Cell<bool>>,
    }

    impl Scripted {
        fn new(orders: Vec<(usize, Order)>) -> Self {
            Scripted {
                orders,
                seen: 0,
                started: Rc::new(Cell::new(false)),
                stopped: Rc::new(Cell::new(false)),
            }
        }

        fn lifecycle_flags(&self) -> (Rc<Cell<bool>>, Rc<Cell<bool>>) {
            (Rc::clone(&self.started), Rc::clone(&self.stopped))
        }
    }

    impl Strategy for Scripted {
        fn on_start(&mut self, history: &[Bar]) {
            assert!(history.is_empty());
            self.started.set(true);
        }

        fn on_bar(&mut self, _bar: &Bar, history: &[Bar]) -> Vec<Order> {
            assert_eq!(history.len(), self.seen, "history must exclude current bar");
            let i = self.seen;
            self.seen += 1;
            self.orders
                .iter()
                .filter(|(at, _)| *at == i)
                .map(|(_, o)| o.clone())
                .collect()
        }

        fn on_stop(&mut self) {
            self.stopped.set(true);
        }
    }

    #[test]
    fn idle_strategy_produces_flat_equity() {
        let mut backtester = Backtester::new(config(0.2, 0.5), Box::new(Scripted::new(vec![])));
        let result = backtester.run_series(&bars(&[10.0, 11.0, 12.0]));

        assert_eq!(result.equity_curve.len(), 3);
        for point in &result.equity_curve {
            assert_relative_eq!(point.equity, 100_000.0);
        }
        assert_relative_eq!(result.stats["total_return"], 0.0);
        assert_relative_eq!(result.stats["sharpe"], 0.0);
    }

    #[test]
    fn fills_happen_at_bar_close() {
        let order = Order::market(Side::Buy, 100.0);
        let mut backtester =
            Backtester::new(config(0.2, 0.9), Box::new(Scripted::new(vec![(0, order)])));
        let result = backtester.run_series(&bars(&[100.0, 110.0]));

        // bought 100 @ 100 on bar 0; equity marks at each close
        assert_relative_eq!(result.equity_curve[0].equity, 100_000.0);
        assert_relative_eq!(result.equity_curve[1].equity, 101_000.0);
        assert_relative_eq!(result.stats["final_equity"], 101_000.0);
    }

    #[test]
    fn oversized_order_never_reaches_the_ledger() {
        // cap = 100_000 × 0.2 = 20_000; notional = 300 × 100 = 30_000
        let order = Order::market(Side::Buy, 300.0);
        let mut backtester =
            Backtester::new(config(0.2, 0.9), Box::new(Scripted::new(vec![(0, order)])));
        let result = backtester.run_series(&bars(&[100.0, 120.0]));

        for point in &result.equity_curve {
            assert_relative_eq!(point.equity, 100_000.0);
        }
    }

    #[test]
    fn drawdown_stop_truncates_the_stream() {
        let order = Order::market(Side::Buy, 100.0);
        let mut backtester =
            Backtester::new(config(0.2, 0.05), Box::new(Scripted::new(vec![(0, order)])));
        // long 100 from 100.0: bar 2 drops equity by 6% from peak
        let series = bars(&[100.0, 102.0, 40.0, 40.0, 40.0]);
        let result = backtester.run_series(&series);

        assert!(result.equity_curve.len() < series.len());
        assert_eq!(result.equity_curve.len(), 3);
    }

    #[test]
    fn teardown_runs_on_normal_exhaustion() {
        let scripted = Scripted::new(vec![]);
        let (started, stopped) = scripted.lifecycle_flags();
        let mut backtester = Backtester::new(config(0.2, 0.5), Box::new(scripted));
        backtester.run_series(&bars(&[10.0, 11.0]));
        assert!(started.get());
        assert!(stopped.get());
    }

    #[test]
    fn teardown_runs_on_drawdown_break() {
        let order = Order::market(Side::Buy, 100.0);
        let scripted = Scripted::new(vec![(0, order)]);
        let (_, stopped) = scripted.lifecycle_flags();
        let mut backtester = Backtester::new(config(0.2, 0.05), Box::new(scripted));
        let result = backtester.run_series(&bars(&[100.0, 40.0, 40.0]));

        assert_eq!(result.equity_curve.len(), 2);
        assert!(stopped.get());
    }

    #[test]
    fn empty_series_yields_empty_stats() {
        let mut backtester = Backtester::new(config(0.2, 0.5), Box::new(Scripted::new(vec![])));
        let result = backtester.run_series(&[]);
        assert!(result.equity_curve.is_empty());
        assert!(result.stats.is_empty());
    }

    #[test]
    fn costs_reduce_equity() {
        let mut config = config(0.5, 0.9);
        config.backtest.slippage_bps = 10.0;
        config.backtest.commission_bps = 5.0;
        let buy = Order::market(Side::Buy, 100.0);
        let sell = Order::market(Side::Sell, 100.0);
        let mut backtester = Backtester::new(
            config,
            Box::new(Scripted::new(vec![(0, buy), (1, sell)])),
        );
        let result = backtester.run_series(&bars(&[100.0, 100.0]));
        assert!(result.stats["final_equity"] < 100_000.0);
    }
}
