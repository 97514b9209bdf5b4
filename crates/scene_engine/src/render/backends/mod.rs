//! Backend implementations for the render module
//!
//! Only the headless recorder ships with the engine. Device-backed
//! implementations live with the application that owns the window.

/// Command-recording backend without a GPU
pub mod headless;
