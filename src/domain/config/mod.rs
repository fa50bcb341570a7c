//! Configuration domain

mod app_config;

pub use app_config::{
    AppConfig, DEFAULT_LOG_LEVEL, DEFAULT_MAX_ITEMS, DEFAULT_POLL_INTERVAL_MS,
    MIN_POLL_INTERVAL_MS, VALID_LOG_LEVELS,
};
