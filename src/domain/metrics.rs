//! Performance statistics over an equity series.

use std::collections::HashMap;

use super::backtest::EquityPoint;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Compute the named-statistics mapping for an equity series.
///
/// Keys: `total_return`, `max_drawdown`, `sharpe`, `final_equity`. An
/// empty equity series yields an empty mapping rather than an error, and
/// a zero-volatility return series yields a Sharpe of 0 rather than an
/// undefined value.
pub fn compute_stats(equity: &[EquityPoint], risk_free_rate: f64) -> HashMap<String, f64> {
    let mut stats = HashMap::new();
    if equity.is_empty() {
        return stats;
    }

    let first = equity[0].equity;
    let last = equity[equity.len() - 1].equity;
    let total_return = if first > 0.0 { last / first - 1.0 } else { 0.0 };

    let returns = period_returns(equity);
    let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;

    stats.insert("total_return".to_string(), total_return);
    stats.insert("max_drawdown".to_string(), max_drawdown(equity));
    stats.insert("sharpe".to_string(), sharpe_ratio(&returns, daily_rf));
    stats.insert("final_equity".to_string(), last);
    stats
}

/// Bar-to-bar percentage changes; the first period's undefined return is 0,
/// so the return series has the same length as the equity series.
fn period_returns(equity: &[EquityPoint]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(equity.len());
    returns.push(0.0);
    returns.extend(equity.windows(2).map(|w| {
        let prev = w[0].equity;
        let curr = w[1].equity;
        if prev > 0.0 { curr / prev - 1.0 } else { 0.0 }
    }));
    returns
}

/// Largest peak-to-trough decline as a fraction of the running peak.
fn max_drawdown(equity: &[EquityPoint]) -> f64 {
    let mut peak = equity[0].equity;
    let mut max_dd = 0.0_f64;
    for point in equity {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Annualized mean excess return over annualized volatility, assuming
/// daily bars. Sample standard deviation; zero volatility yields 0.
fn sharpe_ratio(returns: &[f64], daily_rf: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    let mean = excess.iter().sum::<f64>() / n;
    let variance = excess.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let vol = variance.sqrt();
    if vol == 0.0 {
        return 0.0;
    }
    (mean * TRADING_DAYS_PER_YEAR) / (vol * TRADING_DAYS_PER_YEAR.sqrt())
}
