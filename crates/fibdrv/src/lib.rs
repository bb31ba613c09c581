//! Application logic for the fibdrv device client.

pub mod app;
pub mod config;
pub mod errors;
