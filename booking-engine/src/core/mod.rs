//! Core engine configuration

pub mod config;

pub use config::EngineConfig;
