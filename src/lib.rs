// Library interface for magnet_courier
// This allows tests and external crates to use the courier components

pub mod app_state;
pub mod config;
pub mod delivery;
pub mod extractor;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod payload;
pub mod settings;
