use clap::Parser;
use glam::Vec3A;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use toypath::{CameraParams, ProgressiveRenderer, Scene};

mod cli;
mod logger;
mod output;

use cli::{Args, ScenePreset};
use logger::init_logger;
use output::save_image;

/// Build the selected scene and the camera that frames it.
fn create_scene(preset: ScenePreset, seed: u64, aspect_ratio: f32) -> (Scene, CameraParams) {
    match preset {
        ScenePreset::BookCover => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let camera = CameraParams {
                origin: Vec3A::new(13.0, 2.0, 3.0),
                look_at: Vec3A::ZERO,
                up: Vec3A::Y,
                vertical_fov_degrees: 20.0,
                aspect_ratio,
                aperture: 0.1,
                focus_distance: 10.0,
            };
            (Scene::book_cover(&mut rng), camera)
        }
        ScenePreset::Showcase => {
            let origin = Vec3A::new(3.0, 3.0, 2.0);
            let look_at = Vec3A::new(0.0, 0.0, -1.0);
            let camera = CameraParams {
                origin,
                look_at,
                up: Vec3A::Y,
                vertical_fov_degrees: 20.0,
                aspect_ratio,
                aperture: 0.5,
                focus_distance: (origin - look_at).length(),
            };
            (Scene::showcase(), camera)
        }
        ScenePreset::Single => {
            let camera = CameraParams {
                aspect_ratio,
                ..CameraParams::default()
            };
            (Scene::single_sphere(), camera)
        }
    }
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    info!("ToyPath - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let settings = args.render_settings();
    info!(
        "Image resolution: {}x{}, samples per pixel: {}, frames: {}",
        settings.width, settings.height, settings.samples_per_pixel, args.frames
    );

    let mut renderer = match ProgressiveRenderer::new(settings) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let (scene, mut camera) = create_scene(args.scene, args.seed, settings.aspect_ratio());
    if let Some(aperture) = args.aperture {
        camera.aperture = aperture;
    }
    info!("Scene {:?}: {} spheres, {} materials", args.scene, scene.spheres().len(), scene.materials().len());

    let pb = ProgressBar::new(args.frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} {pos}/{len} frames {msg} ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for _ in 0..args.frames {
        match renderer.render(&camera, &scene) {
            Ok(stats) => {
                pb.set_message(format!("{:.1} Mrays/s", stats.rays_per_second() / 1.0e6));
                pb.inc(1);
            }
            Err(e) => {
                pb.abandon();
                error!("Frame {} failed: {}", renderer.state().frame, e);
                std::process::exit(1);
            }
        }
    }
    pb.finish();

    let total_time = renderer.total_time();
    let total_rays = renderer.total_rays();
    let rays_per_second = if total_time.as_secs_f64() > 0.0 {
        total_rays as f64 / total_time.as_secs_f64()
    } else {
        0.0
    };
    info!(
        "Rendered {} frames in {:.2?}: {} rays ({:.2} Mrays/s)",
        args.frames,
        total_time,
        total_rays,
        rays_per_second / 1.0e6
    );

    if let Err(e) = save_image(renderer.image(), &args.output, settings.width, settings.height) {
        error!("{}", e);
        std::process::exit(1);
    }
}
