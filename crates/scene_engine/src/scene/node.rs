//! Scene nodes
//!
//! Nodes live in the [`SceneGraph`](crate::scene::SceneGraph) arena and refer
//! to their parent and children by [`NodeId`]. Every node has a transform and
//! an optional model; camera and light nodes carry extra state in
//! [`NodeKind`].

use bitflags::bitflags;

use crate::foundation::collections::{ModelId, NodeId};
use crate::scene::camera::CameraData;
use crate::scene::light::LightData;
use crate::scene::transform::Transform;

bitflags! {
    /// Free-form behavior flags read by update hooks and tools
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        /// Handed to the scene's behavior hook every update
        const MOVING = 1 << 0;
        /// Omitted from editor listings; has no effect on rendering
        const EDITOR_HIDDEN = 1 << 1;
    }
}

/// Variant tag of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Plain group or model node
    Node,
    /// Camera
    Camera,
    /// Point light
    Light,
}

impl NodeType {
    /// Stable lowercase name, as used by scene descriptions and tools
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Camera => "camera",
            Self::Light => "light",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific node state
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// No extra state
    Node,
    /// Camera matrices and field of view
    Camera(CameraData),
    /// Light color, falloff and switch
    Light(LightData),
}

/// Element of the scene tree
#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,
    /// Local transform and cached world matrix
    pub transform: Transform,
    /// Model drawn at this node, if any
    pub model: Option<ModelId>,
    /// Behavior flags
    pub flags: NodeFlags,
    kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) culled: bool,
}

impl SceneNode {
    /// Plain node
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Node)
    }

    /// Camera node
    pub fn camera(name: impl Into<String>, camera: CameraData) -> Self {
        Self::with_kind(name, NodeKind::Camera(camera))
    }

    /// Light node
    pub fn light(name: impl Into<String>, light: LightData) -> Self {
        Self::with_kind(name, NodeKind::Light(light))
    }

    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            model: None,
            flags: NodeFlags::empty(),
            kind,
            parent: None,
            children: Vec::new(),
            culled: false,
        }
    }

    /// Set the local transform
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Draw `model` at this node
    #[must_use]
    pub const fn with_model(mut self, model: ModelId) -> Self {
        self.model = Some(model);
        self
    }

    /// Set behavior flags
    #[must_use]
    pub const fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Unique name within the scene
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variant tag
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Node => NodeType::Node,
            NodeKind::Camera(_) => NodeType::Camera,
            NodeKind::Light(_) => NodeType::Light,
        }
    }

    /// Variant state
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Camera state, if this is a camera node
    #[must_use]
    pub const fn as_camera(&self) -> Option<&CameraData> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mutable camera state, if this is a camera node
    pub fn as_camera_mut(&mut self) -> Option<&mut CameraData> {
        match &mut self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Light state, if this is a light node
    #[must_use]
    pub const fn as_light(&self) -> Option<&LightData> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Mutable light state, if this is a light node
    pub fn as_light_mut(&mut self) -> Option<&mut LightData> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Parent node, `None` for roots and detached nodes
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the last culled render pass skipped this node's model
    #[must_use]
    pub const fn is_culled(&self) -> bool {
        self.culled
    }

    /// Regenerate this camera node's view from its current world matrix.
    /// Returns `false` for non-camera nodes.
    pub fn refresh_camera_view(&mut self) -> bool {
        let world = *self.transform.global_matrix();
        match self.as_camera_mut() {
            Some(camera) => {
                camera.generate_view_matrix(&world);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Vec3};

    #[test]
    fn test_type_tags() {
        assert_eq!(SceneNode::new("group").node_type().as_str(), "node");
        assert_eq!(SceneNode::camera("cam", CameraData::default()).node_type().as_str(), "camera");
        assert_eq!(SceneNode::light("sun", LightData::default()).node_type().to_string(), "light");
    }

    #[test]
    fn test_typed_accessors_reject_other_variants() {
        let mut light = SceneNode::light("lamp", LightData::default());
        assert!(light.as_camera().is_none());
        assert!(light.as_camera_mut().is_none());
        assert!(light.as_light().is_some());

        light.as_light_mut().unwrap().toggle();
        assert!(!light.as_light().unwrap().enabled);
    }

    #[test]
    fn test_refresh_camera_view_only_for_cameras() {
        let mut group = SceneNode::new("group");
        assert!(!group.refresh_camera_view());

        let mut camera = SceneNode::camera("cam", CameraData::default());
        camera.transform.update_global_matrix(&Mat4::new_translation(&Vec3::new(0.0, 0.0, -5.0)));
        assert!(camera.refresh_camera_view());

        let view = camera.as_camera().unwrap().view();
        assert!((view.m34 - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_new_node_is_detached() {
        let node = SceneNode::new("loose").with_flags(NodeFlags::MOVING);
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert!(!node.is_culled());
        assert!(node.flags.contains(NodeFlags::MOVING));
    }
}
