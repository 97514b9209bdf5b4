//! Scene demo
//!
//! Loads the showcase scene into a headless backend and pumps a fixed number
//! of frames through it, resizing the viewport halfway through.
//!
//! Usage: `scene_demo [config.toml|config.ron]`

mod demo_scene;

use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use thiserror::Error;

use crate::demo_scene::{DemoLoader, Spin};

const FRAME_COUNT: u64 = 240;
const RESIZE_AT_FRAME: u64 = FRAME_COUNT / 2;
const RESIZED_VIEWPORT: (u32, u32) = (1280, 720);
const SPIN_DEGREES_PER_SECOND: f32 = 15.0;

#[derive(Debug, Error)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

fn load_config() -> Result<ApplicationConfig, AppError> {
    let config = match std::env::args().nth(1) {
        Some(path) => ApplicationConfig::load_from_file(&path)?,
        None => ApplicationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(config: &ApplicationConfig) -> Result<(), AppError> {
    let mut backend = HeadlessBackend::new();
    let mut scene = Scene::new("Demo", config.scene.clone());
    scene.initialize(&mut backend, &mut DemoLoader)?;
    scene.set_behavior(Box::new(Spin::new(SPIN_DEGREES_PER_SECOND)));

    let fps = config.engine.target_fps.unwrap_or(60).max(1);
    let mut clock = FrameClock::fixed(1.0 / fps as f32);
    let mut total_draws = 0;
    let mut failed_frames = 0;

    while clock.frame_count() < FRAME_COUNT {
        let delta_time = clock.tick();
        if clock.frame_count() == RESIZE_AT_FRAME {
            let (width, height) = RESIZED_VIEWPORT;
            scene.handle_resize(width, height)?;
        }

        scene.update(delta_time)?;
        match scene.render(&mut backend) {
            Ok(stats) => {
                total_draws += stats.draw_calls;
                log::debug!(
                    "Frame {}: {} drawn, {} culled, {} draw calls",
                    clock.frame_count(),
                    stats.models_drawn,
                    stats.culled,
                    stats.draw_calls
                );
            }
            // A failed frame is dropped; the next one starts clean
            Err(err) => {
                failed_frames += 1;
                log::warn!("Frame {} dropped: {}", clock.frame_count(), err);
            }
        }
        backend.clear_commands();
    }

    log::info!(
        "Ran {} frames over {:.2}s simulated: {} draw calls, {} dropped frames",
        clock.frame_count(),
        clock.total_time(),
        total_draws,
        failed_frames
    );
    scene.shutdown(&mut backend);
    Ok(())
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            logging::init();
            log::error!("{err}");
            std::process::exit(1);
        }
    };
    logging::init_with_level(&config.engine.log_level);
    if config.engine.debug_mode {
        log::debug!("Loaded configuration: {config:?}");
    }

    if let Err(err) = run(&config) {
        log::error!("Demo failed: {err}");
        std::process::exit(1);
    }
}
