//! Demo scene description
//!
//! Builds the showcase scene from procedural meshes: a spinning teapot
//! carrying a car that carries a second teapot, a light riding on the camera,
//! a small lamp sphere and a large ground plane.

use scene_engine::foundation::math::utils;
use scene_engine::prelude::*;

/// Loader for the showcase scene
pub struct DemoLoader;

impl DemoLoader {
    fn load_assets(builder: &mut SceneBuilder<'_>) -> Result<(), SceneError> {
        let normal_shader = builder.load_shader(
            "Normal To Color",
            &ShaderDesc::new("Normal To Color", "shaders/normal_color.vs", "shaders/normal_color.ps"),
        )?;
        let phong_shader = builder.load_shader(
            "Phong Lighting",
            &ShaderDesc::new("Phong Lighting", "shaders/phong.vs", "shaders/phong.ps"),
        )?;

        let thread = builder.load_texture("Thread", "textures/thread.dds")?;
        let emerald = builder.load_texture("Emerald", "textures/emerald.dds")?;

        builder.add_material(Material::normal_as_color("Normal Color", normal_shader))?;
        builder.add_material(Material::phong(
            "Emerald Red Rubber",
            phong_shader,
            PhongProperties::RED_RUBBER,
            Some(emerald),
        ))?;
        builder.add_material(Material::phong(
            "Emerald Plastic",
            phong_shader,
            PhongProperties::GREEN_PLASTIC,
            Some(emerald),
        ))?;
        builder.add_material(Material::phong("Lit Thread", phong_shader, PhongProperties::DEFAULT, Some(thread)))?;

        builder.load_model("Teapot", &[Mesh::uv_sphere(1.0, 24, 16)], "Emerald Red Rubber")?;
        builder.load_model("Car", &[Mesh::cube(1.0)], "Emerald Plastic")?;
        builder.load_model("Sphere", &[Mesh::uv_sphere(1.0, 16, 8)], "Normal Color")?;
        builder.load_model("Plane", &[Mesh::plane(1.0)], "Lit Thread")?;
        Ok(())
    }
}

impl SceneLoader for DemoLoader {
    fn load(&mut self, builder: &mut SceneBuilder<'_>) -> Result<(), SceneError> {
        Self::load_assets(builder)?;
        let root = builder.root();

        let fov = utils::deg_to_rad(builder.config().field_of_view_degrees);
        let camera = builder.add_node(
            root,
            SceneNode::camera("Main Camera", CameraData::new(fov))
                .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -5.0))),
        )?;
        builder.set_main_camera(camera)?;

        // Three levels deep so the whole chain turns with the first teapot
        let teapot = builder.model("Teapot")?;
        let node1 = builder.add_node(
            root,
            SceneNode::new("node1").with_model(teapot).with_flags(NodeFlags::MOVING),
        )?;
        let node2 = builder.add_node(
            node1,
            SceneNode::new("node2")
                .with_model(builder.model("Car")?)
                .with_transform(Transform::from_position(Vec3::new(25.0, 0.0, -4.0))),
        )?;
        builder.add_node(
            node2,
            SceneNode::new("node3")
                .with_model(teapot)
                .with_transform(Transform::from_position(Vec3::new(30.0, 0.0, 0.0))),
        )?;

        builder.add_light(
            camera,
            SceneNode::light(
                "Light1",
                LightData::new(Vec4::new(0.941, 0.973, 1.0, 1.0), Vec3::new(1.0, 0.2, 0.0)),
            ),
        )?;
        builder.add_light(
            root,
            SceneNode::light(
                "Light2",
                LightData::new(Vec4::new(0.678, 0.847, 0.902, 1.0), Vec3::new(1.0, 0.2, 0.1)),
            )
            .with_model(builder.model("Sphere")?)
            .with_transform(Transform::from_position(Vec3::new(-2.0, 4.0, -1.0)).with_scale(Vec3::new(0.3, 0.3, 0.3))),
        )?;

        builder.add_node(
            root,
            SceneNode::new("Ground")
                .with_model(builder.model("Plane")?)
                .with_transform(Transform::from_position(Vec3::new(0.0, -2.0, 0.0)).with_scale(Vec3::new(50.0, 1.0, 50.0))),
        )?;

        log::info!("Demo scene loaded with {} nodes", builder.graph().len());
        Ok(())
    }
}

/// Turns every moving node about its local Y axis
pub struct Spin {
    radians_per_second: f32,
}

impl Spin {
    /// Spin at `degrees_per_second`
    pub fn new(degrees_per_second: f32) -> Self {
        Self {
            radians_per_second: utils::deg_to_rad(degrees_per_second),
        }
    }
}

impl NodeBehavior for Spin {
    fn update(&mut self, node: &mut SceneNode, delta_time: f32) {
        let yaw = node.transform.rotation.y + self.radians_per_second * delta_time;
        node.transform.rotation.y = utils::wrap_angle(yaw);
    }
}
