//! Run configuration: assembly from a config port plus validation.
//!
//! Configuration is consumed once at construction and not re-validated
//! mid-run. All config structs are plain values; cloning a config never
//! aliases the strategy parameter mapping.

use chrono::NaiveDate;

use super::error::QuantbotError;
use super::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    pub symbol: String,
    pub timeframe: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub name: String,
    pub params: StrategyParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub max_position_pct: f64,
    pub daily_stop_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    pub slippage_bps: f64,
    pub commission_bps: f64,
    pub risk_free_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data: DataConfig,
    pub strategy: StrategyConfig,
    pub risk: RiskConfig,
    pub backtest: BacktestConfig,
}

impl AppConfig {
    /// Assemble and validate a full run configuration.
    pub fn from_port(port: &dyn ConfigPort) -> Result<Self, QuantbotError> {
        let symbol = port
            .get_string("data", "symbol")
            .ok_or_else(|| QuantbotError::ConfigMissing {
                section: "data".into(),
                key: "symbol".into(),
            })?;
        let strategy_name =
            port.get_string("strategy", "name")
                .ok_or_else(|| QuantbotError::ConfigMissing {
                    section: "strategy".into(),
                    key: "name".into(),
                })?;

        let params = parse_params(port)?;

        let config = AppConfig {
            data: DataConfig {
                symbol,
                timeframe: port
                    .get_string("data", "timeframe")
                    .unwrap_or_else(|| "1d".to_string()),
                start: parse_date(port, "data", "start")?,
                end: parse_date(port, "data", "end")?,
                provider: port
                    .get_string("data", "provider")
                    .unwrap_or_else(|| "csv".to_string()),
            },
            strategy: StrategyConfig {
                name: strategy_name,
                params,
            },
            risk: RiskConfig {
                max_position_pct: port.get_double("risk", "max_position_pct", 0.2),
                daily_stop_pct: port.get_double("risk", "daily_stop_pct", 0.05),
            },
            backtest: BacktestConfig {
                initial_cash: port.get_double("backtest", "initial_cash", 100_000.0),
                slippage_bps: port.get_double("backtest", "slippage_bps", 2.0),
                commission_bps: port.get_double("backtest", "commission_bps", 1.0),
                risk_free_rate: port.get_double("backtest", "risk_free_rate", 0.0),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), QuantbotError> {
        check_range(
            "risk",
            "max_position_pct",
            self.risk.max_position_pct,
            |v| v > 0.0 && v <= 1.0,
            "must be in (0, 1]",
        )?;
        check_range(
            "risk",
            "daily_stop_pct",
            self.risk.daily_stop_pct,
            |v| v > 0.0 && v <= 1.0,
            "must be in (0, 1]",
        )?;
        check_range(
            "backtest",
            "initial_cash",
            self.backtest.initial_cash,
            |v| v > 0.0,
            "must be positive",
        )?;
        check_range(
            "backtest",
            "slippage_bps",
            self.backtest.slippage_bps,
            |v| v >= 0.0,
            "must be non-negative",
        )?;
        check_range(
            "backtest",
            "commission_bps",
            self.backtest.commission_bps,
            |v| v >= 0.0,
            "must be non-negative",
        )?;
        if let (Some(start), Some(end)) = (self.data.start, self.data.end) {
            if end < start {
                return Err(QuantbotError::ConfigInvalid {
                    section: "data".into(),
                    key: "end".into(),
                    reason: "end date precedes start date".into(),
                });
            }
        }
        Ok(())
    }
}

fn check_range(
    section: &str,
    key: &str,
    value: f64,
    ok: impl Fn(f64) -> bool,
    reason: &str,
) -> Result<(), QuantbotError> {
    if ok(value) {
        Ok(())
    } else {
        Err(QuantbotError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: format!("{reason} (got {value})"),
        })
    }
}

fn parse_date(
    port: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, QuantbotError> {
    match port.get_string(section, key).filter(|s| !s.trim().is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| QuantbotError::ConfigInvalid {
                section: section.into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }),
    }
}

/// Read the free-form `[params]` section into a numeric parameter mapping.
fn parse_params(port: &dyn ConfigPort) -> Result<StrategyParams, QuantbotError> {
    let mut params = Vec::new();
    for (key, value) in port.get_section("params") {
        let parsed: f64 = value
            .trim()
            .parse()
            .map_err(|_| QuantbotError::ConfigInvalid {
                section: "params".into(),
                key: key.clone(),
                reason: format!("not a number: {value}"),
            })?;
        params.push((key, parsed));
    }
    Ok(params.into_iter().collect())
}
