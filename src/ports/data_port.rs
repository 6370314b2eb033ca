//! Historical data access port trait.

use std::thread;
use std::time::Duration;

use crate::domain::bar::Bar;
use crate::domain::error::QuantbotError;
use chrono::NaiveDate;

/// Number of fetch attempts before a rate-limit failure propagates.
pub const FETCH_ATTEMPTS: usize = 3;

/// Base delay between retries; attempt n waits `RETRY_BACKOFF × n`.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// Source of historical bar series.
///
/// Implementations must return bars ordered ascending by timestamp and
/// must fail with [`QuantbotError::NoData`] when the requested range is
/// empty, never with an empty success.
pub trait DataProvider {
    fn fetch_history(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        interval: &str,
    ) -> Result<Vec<Bar>, QuantbotError>;
}

impl std::fmt::Debug for dyn DataProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn DataProvider")
    }
}

/// Fetch with bounded retry on transient rate limiting.
///
/// Up to [`FETCH_ATTEMPTS`] attempts with increasing delay between them;
/// only [`QuantbotError::RateLimited`] is retried, any other error
/// propagates immediately. After the final attempt the failure surfaces
/// as [`QuantbotError::RetriesExhausted`].
pub fn fetch_history_with_retry(
    provider: &dyn DataProvider,
    symbol: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    interval: &str,
) -> Result<Vec<Bar>, QuantbotError> {
    for attempt in 1..FETCH_ATTEMPTS {
        match provider.fetch_history(symbol, start, end, interval) {
            Err(QuantbotError::RateLimited { .. }) => {
                thread::sleep(RETRY_BACKOFF * attempt as u32);
            }
            other => return other,
        }
    }
    provider
        .fetch_history(symbol, start, end, interval)
        .map_err(|err| match err {
            QuantbotError::RateLimited { .. } => QuantbotError::RetriesExhausted {
                symbol: symbol.to_string(),
                attempts: FETCH_ATTEMPTS,
            },
            other => other,
        })
}
