//! Core domain types and simulation logic.

pub mod bar;
pub mod order;
pub mod position;
pub mod portfolio;
pub mod risk;
pub mod strategy;
pub mod backtest;
pub mod metrics;
pub mod execution;
pub mod config;
pub mod error;
