//! Backend-facing API
//!
//! Traits and data that cross the boundary between the scene pipeline and a
//! rendering backend.

pub mod frame_data;
pub mod render_backend;

pub use frame_data::{MatrixBuffer, ShaderPayload};
pub use render_backend::{BackendResult, MeshHandle, RenderBackend, ShaderDesc, ShaderHandle, TextureHandle};
