//! Foundation module - Core utilities and types
//!
//! - Math aliases and matrix builders
//! - Arena keys and named slot maps
//! - Frame timing
//! - Logging setup

pub mod collections;
pub mod logging;
pub mod math;
pub mod time;
