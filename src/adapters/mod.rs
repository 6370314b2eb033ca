//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod paper_broker;

use std::path::PathBuf;

use crate::domain::error::QuantbotError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataProvider;

use csv_adapter::CsvProvider;

/// Name-to-constructor registry for data providers.
///
/// Provider-specific settings are read from the config here, at the edge,
/// so the domain never sees them.
pub fn build_provider(
    name: &str,
    config: &dyn ConfigPort,
) -> Result<Box<dyn DataProvider>, QuantbotError> {
    match name {
        "csv" => {
            let dir = config
                .get_string("data", "csv_dir")
                .ok_or_else(|| QuantbotError::ConfigMissing {
                    section: "data".into(),
                    key: "csv_dir".into(),
                })?;
            Ok(Box::new(CsvProvider::new(PathBuf::from(dir))))
        }
        _ => Err(QuantbotError::UnknownProvider {
            name: name.to_string(),
        }),
    }
}
