//! Core domain types and logic.

pub mod config_validation;
pub mod engine_config;
pub mod error;
pub mod indicator;
pub mod metadata;
pub mod ohlcv;
pub mod runner;
pub mod screener;
pub mod signal;
pub mod strategy;
pub mod volatility;
