//! Scene orchestration
//!
//! [`Scene`] drives the per-frame cycle and owns everything it touches:
//!
//! 1. `initialize` creates the root, runs the loader, picks up the main camera
//!    and lights, and builds the camera projections for the viewport.
//! 2. `update` runs behavior hooks, refreshes every world matrix top-down,
//!    regenerates the camera view and writes camera and light data into the
//!    shared payload.
//! 3. `render` builds a frustum from the camera and draws the tree.
//! 4. `shutdown` hands every backend resource back.
//!
//! The lifecycle is one-way: uninitialized, initialized, shut down.

use crate::core::config::SceneConfig;
use crate::foundation::collections::NodeId;
use crate::render::{RenderBackend, ShaderPayload, MAX_LIGHTS};
use crate::scene::loader::{SceneBuilder, SceneLoader};
use crate::scene::node::{NodeFlags, SceneNode};
use crate::scene::resources::SceneResources;
use crate::scene::scene_graph::{RenderStats, SceneGraph};
use crate::scene::SceneError;

/// Lifecycle stage of a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Created, not yet loaded
    Uninitialized,
    /// Loaded and renderable
    Initialized,
    /// Resources released; no further use
    Shutdown,
}

/// Per-frame hook for nodes flagged [`NodeFlags::MOVING`]
///
/// Runs before world matrices are refreshed, so local transform edits made
/// here show up in the same frame. Covers the scene root's tree and any
/// detached tree holding the main camera or a light.
pub trait NodeBehavior {
    /// Advance `node` by `delta_time` seconds
    fn update(&mut self, node: &mut SceneNode, delta_time: f32);
}

/// A loaded scene and its per-frame state
pub struct Scene {
    name: String,
    config: SceneConfig,
    state: SceneState,
    graph: SceneGraph,
    resources: SceneResources,
    root: Option<NodeId>,
    main_camera: Option<NodeId>,
    lights: Vec<NodeId>,
    payload: ShaderPayload,
    viewport: (u32, u32),
    behavior: Option<Box<dyn NodeBehavior>>,
    elapsed: f32,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("nodes", &self.graph.len())
            .field("models", &self.resources.model_count())
            .field("lights", &self.lights.len())
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Create an empty, uninitialized scene
    pub fn new(name: impl Into<String>, config: SceneConfig) -> Self {
        let mut payload = ShaderPayload::default();
        payload.lighting.global_ambient = config.global_ambient;
        payload.lighting.specular_blinn = u32::from(config.specular_blinn);

        Self {
            name: name.into(),
            viewport: (config.viewport_width, config.viewport_height),
            config,
            state: SceneState::Uninitialized,
            graph: SceneGraph::new(),
            resources: SceneResources::new(),
            root: None,
            main_camera: None,
            lights: Vec::new(),
            payload,
            behavior: None,
            elapsed: 0.0,
        }
    }

    /// Install the hook that animates [`NodeFlags::MOVING`] nodes
    pub fn set_behavior(&mut self, behavior: Box<dyn NodeBehavior>) {
        self.behavior = Some(behavior);
    }

    /// Load the scene and prepare the camera for the configured viewport.
    ///
    /// On failure everything created so far is released and the scene stays
    /// uninitialized.
    pub fn initialize(&mut self, backend: &mut dyn RenderBackend, loader: &mut dyn SceneLoader) -> Result<(), SceneError> {
        match self.state {
            SceneState::Uninitialized => {}
            SceneState::Initialized => return Err(SceneError::AlreadyInitialized),
            SceneState::Shutdown => return Err(SceneError::ShutDown),
        }

        self.config.validate().map_err(SceneError::InvalidConfig)?;

        log::info!("Initializing scene '{}'", self.name);
        if let Err(err) = self.load(backend, loader) {
            log::error!("Scene '{}' failed to initialize: {}", self.name, err);
            self.clear(backend);
            return Err(err);
        }

        self.state = SceneState::Initialized;
        log::info!(
            "Scene '{}' ready: {} nodes, {} models, {} materials, {} lights",
            self.name,
            self.graph.len(),
            self.resources.model_count(),
            self.resources.material_count(),
            self.lights.len()
        );
        Ok(())
    }

    fn load(&mut self, backend: &mut dyn RenderBackend, loader: &mut dyn SceneLoader) -> Result<(), SceneError> {
        let root = self.graph.insert(SceneNode::new("root"))?;
        self.root = Some(root);

        let (main_camera, lights) = {
            let mut builder = SceneBuilder::new(backend, &mut self.resources, &mut self.graph, &self.config, root);
            loader.load(&mut builder)?;
            (builder.main_camera, builder.lights)
        };

        let camera_id = main_camera.ok_or(SceneError::NoCamera)?;
        self.main_camera = Some(camera_id);
        self.lights = lights;

        let (width, height) = self.viewport;
        self.regenerate_projection(width, height)?;
        self.refresh_transforms(root, camera_id)
    }

    /// Advance one frame: behavior hooks, world matrices, camera, lights
    pub fn update(&mut self, delta_time: f32) -> Result<(), SceneError> {
        self.ensure_initialized()?;
        let root = self.root.ok_or(SceneError::NotInitialized)?;
        let camera_id = self.main_camera.ok_or(SceneError::NoCamera)?;
        self.elapsed += delta_time;

        self.run_behavior(root, camera_id, delta_time);
        self.refresh_transforms(root, camera_id)?;

        let camera_node = self.graph.get(camera_id).ok_or(SceneError::NoCamera)?;
        let camera = camera_node.as_camera().ok_or(SceneError::NoCamera)?;
        self.payload.set_camera(
            *camera.view(),
            *camera.projection(),
            *camera.ortho(),
            camera_node.transform.world_position(),
        );

        let graph = &self.graph;
        let packed = self
            .lights
            .iter()
            .filter_map(|&id| graph.get(id))
            .filter_map(|node| node.as_light().map(|light| light.to_struct(node.transform.global_matrix())));
        let offered = self.payload.lighting.set_lights(packed);
        if offered > MAX_LIGHTS {
            log::debug!("{} lights registered, only the first {} are shaded", offered, MAX_LIGHTS);
        }

        log::trace!("Scene '{}' updated (dt {:.4}s)", self.name, delta_time);
        Ok(())
    }

    /// Draw the tree from the main camera, culling against its frustum when
    /// culling is enabled in the configuration
    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> Result<RenderStats, SceneError> {
        self.render_pass(backend, self.config.enable_frustum_culling)
    }

    /// Draw the tree without any frustum test
    pub fn render_without_culling(&mut self, backend: &mut dyn RenderBackend) -> Result<RenderStats, SceneError> {
        self.render_pass(backend, false)
    }

    fn render_pass(&mut self, backend: &mut dyn RenderBackend, cull: bool) -> Result<RenderStats, SceneError> {
        self.ensure_initialized()?;
        let root = self.root.ok_or(SceneError::NotInitialized)?;
        let camera_id = self.main_camera.ok_or(SceneError::NoCamera)?;

        let frustum = if cull {
            let node = self.graph.get(camera_id).ok_or(SceneError::NoCamera)?;
            let camera = node.as_camera().ok_or(SceneError::NoCamera)?;
            Some(camera.frustum(node.transform.global_matrix()))
        } else {
            None
        };

        let stats = self
            .graph
            .render(root, &self.resources, backend, &mut self.payload, frustum.as_ref())
            .map_err(|err| {
                log::error!("Frame render of scene '{}' failed: {}", self.name, err);
                SceneError::Render(err)
            })?;
        log::debug!(
            "Rendered {} nodes: {} models drawn, {} culled, {} draw calls",
            stats.nodes_visited,
            stats.models_drawn,
            stats.culled,
            stats.draw_calls
        );
        Ok(stats)
    }

    /// Rebuild the camera projections for a new viewport size.
    ///
    /// The node tree is left alone. Zero-area viewports are rejected and the
    /// previous projection stays in effect.
    pub fn handle_resize(&mut self, width: u32, height: u32) -> Result<(), SceneError> {
        self.ensure_initialized()?;
        self.regenerate_projection(width, height)?;
        log::info!("Scene '{}' resized to {}x{}", self.name, width, height);
        Ok(())
    }

    /// Release every backend resource and drop the tree.
    ///
    /// Safe to call more than once; only the first call does anything.
    pub fn shutdown(&mut self, backend: &mut dyn RenderBackend) {
        if self.state == SceneState::Shutdown {
            log::warn!("Scene '{}' is already shut down", self.name);
            return;
        }
        self.clear(backend);
        self.state = SceneState::Shutdown;
        log::info!("Scene '{}' shut down after {:.2}s", self.name, self.elapsed);
    }

    fn clear(&mut self, backend: &mut dyn RenderBackend) {
        self.resources.release_all(backend);
        self.graph = SceneGraph::new();
        self.root = None;
        self.main_camera = None;
        self.lights.clear();
    }

    fn ensure_initialized(&self) -> Result<(), SceneError> {
        match self.state {
            SceneState::Initialized => Ok(()),
            SceneState::Uninitialized => Err(SceneError::NotInitialized),
            SceneState::Shutdown => Err(SceneError::ShutDown),
        }
    }

    fn regenerate_projection(&mut self, width: u32, height: u32) -> Result<(), SceneError> {
        let camera_id = self.main_camera.ok_or(SceneError::NoCamera)?;
        let (near, far) = (self.config.screen_near, self.config.screen_depth);
        let node = self.graph.get_mut(camera_id).ok_or(SceneError::NodeNotFound(camera_id))?;
        let name = node.name().to_owned();
        let camera = node.as_camera_mut().ok_or(SceneError::NotACamera(name))?;
        camera.generate_projection_matrices(width, height, near, far)?;
        self.viewport = (width, height);
        Ok(())
    }

    /// Tops of every tree the frame depends on: the scene root, then the
    /// trees holding the main camera and each light when those hang outside it.
    fn tree_roots(&self, root: NodeId, camera_id: NodeId) -> Vec<NodeId> {
        let mut roots = vec![root];
        for id in std::iter::once(camera_id).chain(self.lights.iter().copied()) {
            if let Some(top) = self.graph.root_of(id) {
                if !roots.contains(&top) {
                    roots.push(top);
                }
            }
        }
        roots
    }

    /// World matrices for every tree in [`tree_roots`](Self::tree_roots),
    /// then the camera view.
    fn refresh_transforms(&mut self, root: NodeId, camera_id: NodeId) -> Result<(), SceneError> {
        for top in self.tree_roots(root, camera_id) {
            self.graph.update_transform(top)?;
        }
        let camera = self.graph.get_mut(camera_id).ok_or(SceneError::NoCamera)?;
        if !camera.refresh_camera_view() {
            return Err(SceneError::NotACamera(camera.name().to_owned()));
        }
        Ok(())
    }

    fn run_behavior(&mut self, root: NodeId, camera_id: NodeId, delta_time: f32) {
        if self.behavior.is_none() {
            return;
        }
        let moving: Vec<NodeId> = self
            .tree_roots(root, camera_id)
            .into_iter()
            .flat_map(|top| self.graph.depth_first(top))
            .filter(|&id| self.graph.get(id).is_some_and(|node| node.flags.contains(NodeFlags::MOVING)))
            .collect();
        let Some(behavior) = self.behavior.as_mut() else {
            return;
        };
        for id in moving {
            if let Some(node) = self.graph.get_mut(id) {
                behavior.update(node, delta_time);
            }
        }
    }

    /// Scene name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lifecycle stage
    #[must_use]
    pub const fn state(&self) -> SceneState {
        self.state
    }

    /// Settings the scene was created with
    #[must_use]
    pub const fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Node tree
    #[must_use]
    pub const fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable node tree, for animation and edits between frames
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Resource tables
    #[must_use]
    pub const fn resources(&self) -> &SceneResources {
        &self.resources
    }

    /// Mutable resource tables, for material reassignment
    pub fn resources_mut(&mut self) -> &mut SceneResources {
        &mut self.resources
    }

    /// Root node, once initialized
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Camera the scene renders from
    #[must_use]
    pub const fn main_camera(&self) -> Option<NodeId> {
        self.main_camera
    }

    /// Registered lights in registration order
    #[must_use]
    pub fn lights(&self) -> &[NodeId] {
        &self.lights
    }

    /// Payload written by the last update
    #[must_use]
    pub const fn payload(&self) -> &ShaderPayload {
        &self.payload
    }

    /// Current viewport size
    #[must_use]
    pub const fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Seconds accumulated by `update`
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
