//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::build_provider;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestResult, Backtester};
use crate::domain::config::AppConfig;
use crate::domain::error::QuantbotError;
use crate::domain::strategy::build_strategy;

#[derive(Parser, Debug)]
#[command(name = "quantbot", about = "Bar-driven trading strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest for one symbol
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured symbol
        #[arg(short, long)]
        symbol: Option<String>,
        /// Write the equity curve as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Backtest several symbols and rank them by total return
    Rank {
        #[arg(short, long)]
        config: PathBuf,
        /// Symbols to rank (comma separated or repeated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        symbols: Vec<String>,
    },
    /// Validate a configuration file without running anything
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            output,
        } => run_backtest(&config, symbol.as_deref(), output.as_ref()),
        Command::Rank { config, symbols } => run_rank(&config, &symbols),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuantbotError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_backtest(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let mut app_config = match AppConfig::from_port(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(symbol) = symbol_override {
        app_config.data.symbol = symbol.to_uppercase();
    }

    // Stage 2: Build provider and strategy from the registries
    let provider = match build_provider(&app_config.data.provider, &adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "Running {} on {} ({})",
        app_config.strategy.name, app_config.data.symbol, app_config.data.timeframe
    );

    // Stage 3: Run
    let result = match run_single(app_config.clone(), provider.as_ref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Human summary on stderr, stat lines on stdout
    print_stats(&result);
    let mut keys: Vec<&String> = result.stats.keys().collect();
    keys.sort();
    for key in keys {
        println!("{}={:.6}", key, result.stats[key]);
    }

    // Stage 5: Optional equity curve export
    if let Some(output) = output_path {
        if let Err(e) = write_equity_csv(output, &result) {
            eprintln!("error: failed to write {}: {e}", output.display());
            return ExitCode::from(1);
        }
        eprintln!("Equity curve written to: {}", output.display());
    }

    ExitCode::SUCCESS
}

fn run_rank(config_path: &PathBuf, symbols: &[String]) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let app_config = match AppConfig::from_port(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let provider = match build_provider(&app_config.data.provider, &adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Ranking {} symbols with {}",
        symbols.len(),
        app_config.strategy.name
    );

    // Each symbol gets a fresh strategy and ledger; a failed symbol is
    // reported and skipped rather than aborting the ranking.
    let mut ranked: Vec<(String, f64)> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let mut config = app_config.clone();
        config.data.symbol = symbol.trim().to_uppercase();
        let symbol = config.data.symbol.clone();
        match run_single(config, provider.as_ref()) {
            Ok(result) => {
                let total_return = result.stats.get("total_return").copied().unwrap_or(0.0);
                ranked.push((symbol, total_return));
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", symbol, e);
            }
        }
    }

    if ranked.is_empty() {
        eprintln!("error: no symbol produced a result");
        return ExitCode::from(5);
    }

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!("rank,symbol,total_return");
    for (i, (symbol, total_return)) in ranked.iter().enumerate() {
        println!("{},{},{:.4}", i + 1, symbol, total_return);
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let app_config = match AppConfig::from_port(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // The strategy and provider names must resolve, even though nothing runs.
    if let Err(e) = build_strategy(&app_config.strategy.name, &app_config.strategy.params) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = build_provider(&app_config.data.provider, &adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("  symbol:   {}", app_config.data.symbol);
    eprintln!("  strategy: {}", app_config.strategy.name);
    eprintln!("  provider: {}", app_config.data.provider);
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_single(
    config: AppConfig,
    provider: &dyn crate::ports::data_port::DataProvider,
) -> Result<BacktestResult, QuantbotError> {
    let strategy = build_strategy(&config.strategy.name, &config.strategy.params)?;
    let mut backtester = Backtester::new(config, strategy);
    backtester.run(provider)
}

fn print_stats(result: &BacktestResult) {
    let stat = |key: &str| result.stats.get(key).copied().unwrap_or(0.0);
    eprintln!("\n=== Results ===");
    eprintln!("Bars Processed:   {}", result.equity_curve.len());
    eprintln!("Total Return:     {:.2}%", stat("total_return") * 100.0);
    eprintln!("Max Drawdown:     -{:.1}%", stat("max_drawdown") * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", stat("sharpe"));
    eprintln!("Final Equity:     ${:.2}", stat("final_equity"));
}

fn write_equity_csv(path: &PathBuf, result: &BacktestResult) -> Result<(), QuantbotError> {
    let csv_err = |e: csv::Error| QuantbotError::Data {
        reason: e.to_string(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(["ts", "equity"]).map_err(csv_err)?;
    for point in &result.equity_curve {
        writer
            .write_record([
                point.ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                format!("{:.2}", point.equity),
            ])
            .map_err(csv_err)?;
    }
    writer.flush()?;
    Ok(())
}
