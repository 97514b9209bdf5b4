//! # Core Engine Module
//!
//! Shared configuration types used by every subsystem and by the demo binary.

pub mod config;

pub use config::{ApplicationConfig, Config, ConfigError, EngineConfig, SceneConfig};
