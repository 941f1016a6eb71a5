//! Data models for configuration and extraction output.

pub mod config;
pub mod records;
