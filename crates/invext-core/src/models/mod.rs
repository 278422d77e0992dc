//! Data models: invoice records and configuration.

pub mod config;
pub mod invoice;
