//! # Scene Engine
//!
//! Scene graph and frame orchestration for a forward renderer.
//!
//! ## Features
//!
//! - **Hierarchical Transforms**: Arena-backed node tree with parent-first world matrix updates
//! - **Frustum Culling**: Per-node bounding sphere tests against the main camera
//! - **Camera and Light Nodes**: Tagged node variants with typed accessors
//! - **Backend Seam**: Materials, meshes and draws go through [`render::RenderBackend`]
//! - **Configuration**: TOML or RON scene settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn load(builder: &mut SceneBuilder<'_>) -> Result<(), SceneError> {
//!     let shader = builder.load_shader("Flat", &ShaderDesc::new("Flat", "flat.vs", "flat.ps"))?;
//!     builder.add_material(Material::normal_as_color("Normal", shader))?;
//!     let cube = builder.load_model("Cube", &[Mesh::cube(1.0)], "Normal")?;
//!
//!     let root = builder.root();
//!     let camera = builder.add_node(root, SceneNode::camera("Camera", CameraData::default()))?;
//!     builder.set_main_camera(camera)?;
//!     builder.add_node(
//!         root,
//!         SceneNode::new("Cube").with_model(cube).with_transform(Transform::from_position(Vec3::new(0.0, 0.0, 5.0))),
//!     )?;
//!     Ok(())
//! }
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut backend = HeadlessBackend::new();
//!     let mut scene = Scene::new("quick start", SceneConfig::default());
//!     scene.initialize(&mut backend, &mut load)?;
//!
//!     for _ in 0..3 {
//!         scene.update(1.0 / 60.0)?;
//!         scene.render(&mut backend)?;
//!     }
//!     scene.shutdown(&mut backend);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ApplicationConfig, Config, ConfigError, EngineConfig, SceneConfig},
        foundation::{
            collections::{MaterialId, ModelId, NodeId},
            math::{Mat4, Quat, Vec3, Vec4},
            time::FrameClock,
        },
        render::{
            HeadlessBackend, Material, Mesh, PhongProperties, RenderBackend, RenderError, ShaderDesc,
        },
        scene::{
            CameraData, LightData, NodeBehavior, NodeFlags, RenderStats, Scene, SceneBuilder, SceneError,
            SceneLoader, SceneNode, SceneState, Transform,
        },
    };
}
