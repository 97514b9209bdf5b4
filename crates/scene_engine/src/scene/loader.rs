//! Scene population
//!
//! Scenes are filled by a [`SceneLoader`] during `Scene::initialize`. The
//! loader gets a [`SceneBuilder`] that creates backend resources, registers
//! them by name and builds the node tree under the scene root. Where the
//! description comes from (code, a file, a script) is up to the loader.

use crate::core::config::SceneConfig;
use crate::foundation::collections::{MaterialId, ModelId, NodeId};
use crate::render::{Material, Mesh, Model, RenderBackend, ShaderDesc, ShaderHandle, TextureHandle};
use crate::scene::node::{NodeType, SceneNode};
use crate::scene::resources::SceneResources;
use crate::scene::scene_graph::SceneGraph;
use crate::scene::SceneError;

/// Fills a scene with resources and nodes
pub trait SceneLoader {
    /// Populate the scene through `builder`.
    ///
    /// Returning an error aborts initialization; anything created so far is
    /// released by the scene.
    fn load(&mut self, builder: &mut SceneBuilder<'_>) -> Result<(), SceneError>;
}

impl<F> SceneLoader for F
where
    F: FnMut(&mut SceneBuilder<'_>) -> Result<(), SceneError>,
{
    fn load(&mut self, builder: &mut SceneBuilder<'_>) -> Result<(), SceneError> {
        self(builder)
    }
}

/// Construction context handed to a [`SceneLoader`]
pub struct SceneBuilder<'a> {
    backend: &'a mut dyn RenderBackend,
    resources: &'a mut SceneResources,
    graph: &'a mut SceneGraph,
    config: &'a SceneConfig,
    root: NodeId,
    pub(crate) main_camera: Option<NodeId>,
    pub(crate) lights: Vec<NodeId>,
}

impl<'a> SceneBuilder<'a> {
    pub(crate) fn new(
        backend: &'a mut dyn RenderBackend,
        resources: &'a mut SceneResources,
        graph: &'a mut SceneGraph,
        config: &'a SceneConfig,
        root: NodeId,
    ) -> Self {
        Self {
            backend,
            resources,
            graph,
            config,
            root,
            main_camera: None,
            lights: Vec::new(),
        }
    }

    /// Root node every loaded node hangs from
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Settings the scene was created with
    #[must_use]
    pub const fn config(&self) -> &SceneConfig {
        self.config
    }

    /// Read access to the tree built so far
    #[must_use]
    pub fn graph(&self) -> &SceneGraph {
        &*self.graph
    }

    /// Compile a shader and register it as `name`
    pub fn load_shader(&mut self, name: &str, desc: &ShaderDesc) -> Result<ShaderHandle, SceneError> {
        if self.resources.shader(name).is_some() {
            return Err(SceneError::DuplicateName(name.to_owned()));
        }
        let shader = self.backend.create_shader(desc).map_err(|source| SceneError::AssetLoad {
            name: name.to_owned(),
            source,
        })?;
        self.resources.add_shader(name, shader);
        log::debug!("Loaded shader '{name}'");
        Ok(shader)
    }

    /// Load a texture from `path` and register it as `name`
    pub fn load_texture(&mut self, name: &str, path: &str) -> Result<TextureHandle, SceneError> {
        if self.resources.texture(name).is_some() {
            return Err(SceneError::DuplicateName(name.to_owned()));
        }
        let texture = self.backend.create_texture(path).map_err(|source| SceneError::AssetLoad {
            name: name.to_owned(),
            source,
        })?;
        self.resources.add_texture(name, texture);
        log::debug!("Loaded texture '{name}' from {path}");
        Ok(texture)
    }

    /// Register a material under its own name
    pub fn add_material(&mut self, material: Material) -> Result<MaterialId, SceneError> {
        let name = material.name.clone();
        self.resources.add_material(material).ok_or(SceneError::DuplicateName(name))
    }

    /// Upload `meshes` as a model drawn with the material called `material`
    pub fn load_model(&mut self, name: &str, meshes: &[Mesh], material: &str) -> Result<ModelId, SceneError> {
        if self.resources.model_id(name).is_some() {
            return Err(SceneError::DuplicateName(name.to_owned()));
        }
        let material = self.material(material)?;
        let model = Model::from_meshes(&mut *self.backend, name, meshes, material).map_err(|source| {
            SceneError::AssetLoad {
                name: name.to_owned(),
                source,
            }
        })?;
        self.resources.add_model(model).ok_or_else(|| SceneError::DuplicateName(name.to_owned()))
    }

    /// Registered shader by name
    pub fn shader(&self, name: &str) -> Result<ShaderHandle, SceneError> {
        self.resources.shader(name).ok_or_else(|| SceneError::MissingAsset(name.to_owned()))
    }

    /// Registered texture by name
    pub fn texture(&self, name: &str) -> Result<TextureHandle, SceneError> {
        self.resources.texture(name).ok_or_else(|| SceneError::MissingAsset(name.to_owned()))
    }

    /// Registered material by name
    pub fn material(&self, name: &str) -> Result<MaterialId, SceneError> {
        self.resources.material_id(name).ok_or_else(|| SceneError::MissingAsset(name.to_owned()))
    }

    /// Registered model by name
    pub fn model(&self, name: &str) -> Result<ModelId, SceneError> {
        self.resources.model_id(name).ok_or_else(|| SceneError::MissingAsset(name.to_owned()))
    }

    /// Insert `node` as the last child of `parent`
    pub fn add_node(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId, SceneError> {
        let id = self.graph.insert(node)?;
        if let Err(err) = self.graph.add_child(parent, id) {
            self.graph.remove_subtree(id)?;
            return Err(err);
        }
        Ok(id)
    }

    /// Insert `node` without attaching it; see [`attach`](Self::attach)
    pub fn create_node(&mut self, node: SceneNode) -> Result<NodeId, SceneError> {
        self.graph.insert(node)
    }

    /// Attach a detached node, e.g. one created before its parent existed
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.graph.add_child(parent, child)
    }

    /// Insert a light node under `parent` and register it for the lighting pass
    pub fn add_light(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId, SceneError> {
        if node.node_type() != NodeType::Light {
            return Err(SceneError::NotALight(node.name().to_owned()));
        }
        let id = self.add_node(parent, node)?;
        self.lights.push(id);
        Ok(id)
    }

    /// Make a camera node the one the scene renders from
    pub fn set_main_camera(&mut self, id: NodeId) -> Result<(), SceneError> {
        let node = self.graph.get(id).ok_or(SceneError::NodeNotFound(id))?;
        if node.as_camera().is_none() {
            return Err(SceneError::NotACamera(node.name().to_owned()));
        }
        self.main_camera = Some(id);
        Ok(())
    }
}
