//! CSV file data provider.
//!
//! Reads `<dir>/<symbol>.csv` with columns ts, open, high, low, close,
//! volume. This is the hermetic stand-in for a market-data vendor; the
//! provider contract (ordered bars, NoData on empty, rate-limit retry at
//! the call site) is the same either way.

use crate::domain::bar::Bar;
use crate::domain::error::QuantbotError;
use crate::ports::data_port::DataProvider;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

pub struct CsvProvider {
    base_path: PathBuf,
}

impl CsvProvider {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_ts(value: &str) -> Result<NaiveDateTime, QuantbotError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|e| QuantbotError::Data {
            reason: format!("invalid timestamp {value:?}: {e}"),
        })
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, QuantbotError> {
    record
        .get(index)
        .ok_or_else(|| QuantbotError::Data {
            reason: format!("missing {name} column"),
        })?
        .trim()
        .parse()
        .map_err(|e| QuantbotError::Data {
            reason: format!("invalid {name} value: {e}"),
        })
}

impl DataProvider for CsvProvider {
    fn fetch_history(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        interval: &str,
    ) -> Result<Vec<Bar>, QuantbotError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| QuantbotError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QuantbotError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ts_str = record.get(0).ok_or_else(|| QuantbotError::Data {
                reason: "missing ts column".into(),
            })?;
            let ts = parse_ts(ts_str.trim())?;

            if let Some(start) = start {
                if ts.date() < start {
                    continue;
                }
            }
            if let Some(end) = end {
                if ts.date() > end {
                    continue;
                }
            }

            bars.push(Bar {
                ts,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        if bars.is_empty() {
            return Err(QuantbotError::NoData {
                symbol: symbol.to_string(),
                interval: interval.to_string(),
            });
        }

        bars.sort_by_key(|b| b.ts);
        Ok(bars)
    }
}
