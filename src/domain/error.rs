//! Domain error types.

/// Top-level error type for quantbot.
#[derive(Debug, thiserror::Error)]
pub enum QuantbotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("unknown provider: {name}")]
    UnknownProvider { name: String },

    #[error("no data returned for {symbol} {interval}")]
    NoData { symbol: String, interval: String },

    /// Transient provider throttling; retried with backoff before it
    /// surfaces as [`QuantbotError::RetriesExhausted`].
    #[error("rate limited: {reason}")]
    RateLimited { reason: String },

    #[error("rate limit retries exhausted for {symbol} after {attempts} attempts")]
    RetriesExhausted { symbol: String, attempts: usize },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuantbotError> for std::process::ExitCode {
    fn from(err: &QuantbotError) -> Self {
        let code: u8 = match err {
            QuantbotError::Io(_) => 1,
            QuantbotError::ConfigParse { .. }
            | QuantbotError::ConfigMissing { .. }
            | QuantbotError::ConfigInvalid { .. } => 2,
            QuantbotError::Data { .. } => 3,
            QuantbotError::UnknownStrategy { .. } | QuantbotError::UnknownProvider { .. } => 4,
            QuantbotError::NoData { .. }
            | QuantbotError::RateLimited { .. }
            | QuantbotError::RetriesExhausted { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
