//! Scene pipeline tests: load, update and render through the headless backend


use crate::core::config::SceneConfig;
use crate::foundation::collections::NodeId;
use crate::foundation::math::{constants, Vec3};
use crate::render::{HeadlessBackend, Material, Mesh, ShaderDesc};
use crate::scene::{CameraData, Scene, SceneBuilder, SceneError, SceneNode, Transform};

/// Shader, material and a unit cube model named "Cube", plus a camera at the
/// origin looking down +Z
fn load_basics(builder: &mut SceneBuilder<'_>) -> Result<NodeId, SceneError> {
    let shader = builder.load_shader("Flat", &ShaderDesc::new("Flat", "flat.vs", "flat.ps"))?;
    builder.add_material(Material::normal_as_color("Normal", shader))?;
    builder.load_model("Cube", &[Mesh::cube(1.0)], "Normal")?;

    let root = builder.root();
    let camera = builder.add_node(root, SceneNode::camera("Camera", CameraData::new(constants::QUARTER_PI)))?;
    builder.set_main_camera(camera)?;
    Ok(camera)
}

fn cube_node(builder: &SceneBuilder<'_>, name: &str, position: Vec3) -> Result<SceneNode, SceneError> {
    Ok(SceneNode::new(name)
        .with_model(builder.model("Cube")?)
        .with_transform(Transform::from_position(position)))
}

/// Loader that adds the basics and then runs `populate`
fn with_basics<F>(mut populate: F) -> impl FnMut(&mut SceneBuilder<'_>) -> Result<(), SceneError>
where
    F: FnMut(&mut SceneBuilder<'_>) -> Result<(), SceneError>,
{
    move |builder| {
        load_basics(builder)?;
        populate(builder)
    }
}

fn initialized_scene<F>(config: SceneConfig, populate: F) -> (Scene, HeadlessBackend)
where
    F: FnMut(&mut SceneBuilder<'_>) -> Result<(), SceneError>,
{
    let mut backend = HeadlessBackend::new();
    let mut scene = Scene::new("test", config);
    scene.initialize(&mut backend, &mut with_basics(populate)).unwrap();
    (scene, backend)
}

fn node(scene: &Scene, name: &str) -> NodeId {
    scene.graph().find(name).unwrap()
}
