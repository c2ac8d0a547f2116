//! Frame dispatch and the reference progressive driver.
//!
//! [`render_frame`] is one kernel pass: every pixel is shaded independently
//! from `(pixel, FrameState, Scene)` and blended with the previous buffer into
//! the next one. The image is cut into 8x8 tiles (smaller at the right and
//! bottom edges) and each tile is one rayon work item.
//!
//! [`ProgressiveRenderer`] plays the host's part: it owns both accumulation
//! buffers and the [`FrameState`], and advances the state after each pass,
//! which flips the buffer roles.

use std::time::{Duration, Instant};

use log::{debug, info};
use rayon::prelude::*;

use crate::accumulation::{self, AccumulationBuffers};
use crate::camera::{Camera, CameraParams};
use crate::error::{Error, Result};
use crate::integrator::{self, RayCounter};
use crate::math::Color;
use crate::random;
use crate::scene::Scene;

/// Edge length of a dispatch tile in pixels.
pub const TILE_SIZE: usize = 8;

/// Resolution, sampling and seeding for a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Camera rays averaged per pixel per frame
    pub samples_per_pixel: u32,
    /// Base seed for the per-pixel random streams
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            samples_per_pixel: 1,
            seed: 0,
        }
    }
}

impl RenderSettings {
    /// Number of pixels in one buffer.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Width over height, for [`CameraParams::aspect_ratio`].
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Reject zero dimensions or a zero sample count.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidSettings(format!(
                "resolution {}x{} has no pixels",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(Error::InvalidSettings("samples per pixel must be at least 1".into()));
        }
        Ok(())
    }
}

/// Per-frame render state owned by the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameState {
    /// Monotonic frame index, 0 for the first accumulated frame
    pub frame: u32,
    /// Which of the two accumulation buffers is read this frame; the other
    /// one is written
    pub previous_buffer: usize,
    /// Base seed for the per-pixel random streams
    pub seed: u64,
}

impl FrameState {
    /// First frame with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { frame: 0, previous_buffer: 0, seed }
    }

    /// State for the following frame: next index, buffer roles flipped.
    pub fn advance(self) -> Self {
        Self {
            frame: self.frame.wrapping_add(1),
            previous_buffer: self.previous_buffer ^ 1,
            seed: self.seed,
        }
    }
}

/// What one kernel pass reports back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Frame index that was rendered
    pub frame: u32,
    /// Ray segments traced during the pass
    pub rays: u64,
    /// Wall time of the pass
    pub elapsed: Duration,
}

impl FrameStats {
    /// Throughput of the pass.
    pub fn rays_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.rays as f64 / secs
        } else {
            0.0
        }
    }
}

/// Shade one pixel: average `samples_per_pixel` jittered paths.
///
/// Returns the averaged color and the number of ray segments traced.
pub fn shade_pixel(
    settings: &RenderSettings,
    state: &FrameState,
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
) -> (Color, u64) {
    let pixel_index = y as u64 * settings.width as u64 + x as u64;
    let mut rng = random::pixel_rng(state.seed, state.frame, pixel_index);

    let width = settings.width as f32;
    let height = settings.height as f32;
    let mut color = Color::ZERO;
    let mut segments = 0u64;

    for _ in 0..settings.samples_per_pixel {
        let s = (x as f32 + random::random_f32(&mut rng)) / width;
        // Row 0 is the top of the image
        let t = 1.0 - (y as f32 + random::random_f32(&mut rng)) / height;

        let ray = camera.sample_ray(s, t, &mut rng);
        let sample = integrator::trace_path(ray, scene, &mut rng);
        color += sample.color;
        segments += sample.segments as u64;
    }

    (color / settings.samples_per_pixel as f32, segments)
}

/// One block of at most `TILE_SIZE x TILE_SIZE` pixels.
struct Tile<'a> {
    x0: usize,
    y0: usize,
    /// Output row and matching input row, top to bottom
    rows: Vec<(&'a mut [Color], &'a [Color])>,
}

/// Cut row-major buffers into disjoint tiles, left to right then top to bottom.
fn split_tiles<'a>(width: usize, previous: &'a [Color], next: &'a mut [Color]) -> Vec<Tile<'a>> {
    let tiles_x = width.div_ceil(TILE_SIZE);
    let mut tiles = Vec::new();

    let bands = next.chunks_mut(width * TILE_SIZE).zip(previous.chunks(width * TILE_SIZE));
    for (band, (out_band, in_band)) in bands.enumerate() {
        let first = tiles.len();
        tiles.extend((0..tiles_x).map(|tile_x| Tile {
            x0: tile_x * TILE_SIZE,
            y0: band * TILE_SIZE,
            rows: Vec::with_capacity(TILE_SIZE),
        }));

        for (out_row, in_row) in out_band.chunks_mut(width).zip(in_band.chunks(width)) {
            let pieces = out_row.chunks_mut(TILE_SIZE).zip(in_row.chunks(TILE_SIZE));
            for (tile_x, piece) in pieces.enumerate() {
                tiles[first + tile_x].rows.push(piece);
            }
        }
    }
    tiles
}

/// Render one frame of `scene` into `next`, blending with `previous`.
///
/// Both buffers must hold `width * height` row-major pixels and must be
/// distinct; the borrow rules already guarantee the latter.
pub fn render_frame(
    settings: &RenderSettings,
    state: &FrameState,
    camera: &Camera,
    scene: &Scene,
    previous: &[Color],
    next: &mut [Color],
) -> Result<FrameStats> {
    settings.validate()?;
    let expected = settings.pixel_count();
    for actual in [previous.len(), next.len()] {
        if actual != expected {
            return Err(Error::BufferSize { expected, actual });
        }
    }

    let start = Instant::now();
    let counter = RayCounter::new();
    let width = settings.width as usize;

    split_tiles(width, previous, next).into_par_iter().for_each(|tile| {
        let mut tile_rays = 0;
        for (row, (out_row, in_row)) in tile.rows.into_iter().enumerate() {
            let y = (tile.y0 + row) as u32;
            for (i, (pixel, prev)) in out_row.iter_mut().zip(in_row.iter()).enumerate() {
                let x = (tile.x0 + i) as u32;
                let (color, rays) = shade_pixel(settings, state, camera, scene, x, y);
                *pixel = accumulation::blend(*prev, color, state.frame);
                tile_rays += rays;
            }
        }
        counter.add(tile_rays);
    });

    let stats = FrameStats {
        frame: state.frame,
        rays: counter.take(),
        elapsed: start.elapsed(),
    };
    debug!(
        "Frame {} traced {} rays in {:.2?} ({:.2} Mrays/s)",
        stats.frame,
        stats.rays,
        stats.elapsed,
        stats.rays_per_second() / 1.0e6
    );
    Ok(stats)
}

/// Reference host loop: owns the buffers and advances the frame state.
#[derive(Debug, Clone)]
pub struct ProgressiveRenderer {
    settings: RenderSettings,
    buffers: AccumulationBuffers,
    state: FrameState,
    total_rays: u64,
    total_time: Duration,
}

impl ProgressiveRenderer {
    /// Allocate both accumulation buffers for `settings`.
    pub fn new(settings: RenderSettings) -> Result<Self> {
        settings.validate()?;
        info!(
            "Progressive renderer {}x{}, {} spp, {} threads",
            settings.width,
            settings.height,
            settings.samples_per_pixel,
            rayon::current_num_threads()
        );
        Ok(Self {
            settings,
            buffers: AccumulationBuffers::new(settings.pixel_count()),
            state: FrameState::new(settings.seed),
            total_rays: 0,
            total_time: Duration::ZERO,
        })
    }

    /// Render the next frame with a camera built from `params`, then advance.
    pub fn render(&mut self, params: &CameraParams, scene: &Scene) -> Result<FrameStats> {
        let camera = Camera::new(params);
        let (previous, next) = self.buffers.split(self.state.previous_buffer);
        let stats = render_frame(&self.settings, &self.state, &camera, scene, previous, next)?;

        self.state = self.state.advance();
        self.total_rays += stats.rays;
        self.total_time += stats.elapsed;
        Ok(stats)
    }

    /// Latest accumulated image, row-major, top row first.
    pub fn image(&self) -> &[Color] {
        self.buffers.get(self.state.previous_buffer)
    }

    /// State that the next call to [`render`](Self::render) will use.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Settings this renderer was built with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Ray segments traced since creation or the last reset.
    pub fn total_rays(&self) -> u64 {
        self.total_rays
    }

    /// Kernel time since creation or the last reset.
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// Restart accumulation, e.g. after the camera moved.
    pub fn reset(&mut self) {
        self.buffers.clear();
        self.state = FrameState::new(self.settings.seed);
        self.total_rays = 0;
        self.total_time = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3A;

    fn tiny() -> RenderSettings {
        RenderSettings { width: 13, height: 11, samples_per_pixel: 2, seed: 5 }
    }

    fn camera_for(settings: &RenderSettings) -> CameraParams {
        CameraParams { aspect_ratio: settings.aspect_ratio(), ..CameraParams::default() }
    }

    #[test]
    fn frame_state_advances_and_flips() {
        let state = FrameState::new(9).advance();
        assert_eq!(state, FrameState { frame: 1, previous_buffer: 1, seed: 9 });
        assert_eq!(state.advance().previous_buffer, 0);
    }

    #[test]
    fn tiles_cover_every_pixel_once() {
        let (width, height) = (13usize, 11usize);
        let previous: Vec<Color> = (0..width * height).map(|i| Vec3A::splat(i as f32)).collect();
        let mut next = vec![Color::ZERO; width * height];

        let tiles = split_tiles(width, &previous, &mut next);
        assert_eq!(tiles.len(), 4);
        for tile in tiles {
            assert!(tile.rows.len() <= TILE_SIZE);
            for (row, (out_row, in_row)) in tile.rows.into_iter().enumerate() {
                assert!(out_row.len() <= TILE_SIZE);
                assert_eq!(out_row.len(), in_row.len());
                for (i, (pixel, prev)) in out_row.iter_mut().zip(in_row).enumerate() {
                    let index = (tile.y0 + row) * width + tile.x0 + i;
                    assert_eq!(prev.x, index as f32);
                    *pixel += Vec3A::ONE;
                }
            }
        }
        assert!(next.iter().all(|c| *c == Vec3A::ONE));
    }

    #[test]
    fn rejects_bad_settings_and_buffers() {
        assert!(matches!(
            RenderSettings { width: 0, ..tiny() }.validate(),
            Err(Error::InvalidSettings(_))
        ));
        assert!(RenderSettings { samples_per_pixel: 0, ..tiny() }.validate().is_err());

        let settings = tiny();
        let camera = Camera::new(&camera_for(&settings));
        let previous = vec![Color::ZERO; settings.pixel_count()];
        let mut next = vec![Color::ZERO; settings.pixel_count() - 1];
        let err = render_frame(&settings, &FrameState::new(0), &camera, &Scene::default(), &previous, &mut next)
            .unwrap_err();
        assert!(matches!(err, Error::BufferSize { actual, .. } if actual == settings.pixel_count() - 1));
    }

    #[test]
    fn render_is_deterministic_for_a_seed() {
        let settings = tiny();
        let camera = Camera::new(&camera_for(&settings));
        let scene = Scene::showcase();
        let previous = vec![Color::ZERO; settings.pixel_count()];
        let mut a = vec![Color::ZERO; settings.pixel_count()];
        let mut b = vec![Color::ZERO; settings.pixel_count()];

        let state = FrameState::new(settings.seed);
        let stats_a = render_frame(&settings, &state, &camera, &scene, &previous, &mut a).unwrap();
        let stats_b = render_frame(&settings, &state, &camera, &scene, &previous, &mut b).unwrap();
        assert_eq!(a, b);
        assert_eq!(stats_a.rays, stats_b.rays);
        assert!(a.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn empty_scene_renders_sky_and_counts_one_ray_per_sample() {
        let settings = tiny();
        let mut renderer = ProgressiveRenderer::new(settings).unwrap();
        let stats = renderer.render(&camera_for(&settings), &Scene::default()).unwrap();

        let samples = settings.pixel_count() as u64 * settings.samples_per_pixel as u64;
        assert_eq!(stats.rays, samples);
        assert_eq!(stats.frame, 0);
        // Top row looks up, bottom row looks down
        let top = renderer.image()[0];
        let bottom = renderer.image()[settings.pixel_count() - 1];
        assert!(top.x < bottom.x);
        assert!(renderer.image().iter().all(|c| c.z == 1.0));
    }

    #[test]
    fn second_frame_blends_half_and_half() {
        let settings = RenderSettings { width: 4, height: 4, samples_per_pixel: 1, seed: 1 };
        let params = camera_for(&settings);
        let scene = Scene::single_sphere();
        let camera = Camera::new(&params);

        let mut renderer = ProgressiveRenderer::new(settings).unwrap();
        renderer.render(&params, &scene).unwrap();
        let first = renderer.image().to_vec();
        assert_eq!(renderer.state().frame, 1);
        assert_eq!(renderer.state().previous_buffer, 1);
        assert_eq!(renderer.image(), renderer.buffers.get(1));

        renderer.render(&params, &scene).unwrap();
        let frame_one = FrameState::new(settings.seed).advance();
        for (i, blended) in renderer.image().iter().enumerate() {
            let (x, y) = ((i % 4) as u32, (i / 4) as u32);
            let (color, _) = shade_pixel(&settings, &frame_one, &camera, &scene, x, y);
            let expected = (first[i] + color) * 0.5;
            assert!(blended.abs_diff_eq(expected, 1e-5));
        }
    }

    #[test]
    fn reset_restarts_accumulation() {
        let settings = tiny();
        let mut renderer = ProgressiveRenderer::new(settings).unwrap();
        let params = camera_for(&settings);
        renderer.render(&params, &Scene::single_sphere()).unwrap();
        renderer.render(&params, &Scene::single_sphere()).unwrap();
        assert!(renderer.total_rays() > 0);

        renderer.reset();
        assert_eq!(renderer.state(), FrameState::new(settings.seed));
        assert_eq!(renderer.total_rays(), 0);
        assert!(renderer.image().iter().all(|c| *c == Vec3A::ZERO));
    }
}
