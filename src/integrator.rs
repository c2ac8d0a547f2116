//! Bounded-depth path integration.
//!
//! A path is a small state machine: it keeps `Tracing` while surfaces scatter,
//! and ends in one of three terminal states. Only a miss contributes light;
//! absorption and running out of depth contribute black.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3A;
use rand::Rng;

use crate::hittable::Hittable;
use crate::interval::Interval;
use crate::math::{self, Color};
use crate::ray::Ray;
use crate::scene::Scene;

/// Maximum number of ray segments traced per path.
pub const MAX_DEPTH: u32 = 10;

/// Sky color straight down (and at the horizon blend start).
const SKY_BOTTOM: Color = Vec3A::ONE;
/// Sky color straight up.
const SKY_TOP: Color = Vec3A::new(0.5, 0.7, 1.0);

/// How a path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Escaped the scene and picked up the background.
    Miss,
    /// A material absorbed the path.
    Absorbed,
    /// `MAX_DEPTH` segments were traced without escaping.
    DepthExceeded,
}

/// Result of integrating one camera ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    /// Radiance carried back to the camera.
    pub color: Color,
    /// Number of ray segments intersected against the scene.
    pub segments: u32,
    /// Terminal state reached.
    pub termination: Termination,
}

enum PathState {
    Tracing { depth: u32, ray: Ray, throughput: Color },
    Done(Termination, Color),
}

/// Vertical white-to-blue gradient keyed on the normalized direction's y.
#[inline]
pub fn background(ray: &Ray) -> Color {
    let unit_direction = math::safe_normalize(ray.direction, Vec3A::Y);
    let a = 0.5 * (unit_direction.y + 1.0);
    math::lerp(SKY_BOTTOM, SKY_TOP, a)
}

/// Follow `ray` through `scene` until it misses, is absorbed or hits the depth limit.
pub fn trace_path<R: Rng + ?Sized>(ray: Ray, scene: &Scene, rng: &mut R) -> PathSample {
    let mut segments = 0;
    let mut state = PathState::Tracing { depth: 0, ray, throughput: Vec3A::ONE };

    loop {
        state = match state {
            PathState::Tracing { depth, .. } if depth >= MAX_DEPTH => {
                PathState::Done(Termination::DepthExceeded, Color::ZERO)
            }
            PathState::Tracing { depth, ray, throughput } => {
                segments += 1;
                match scene.hit(&ray, Interval::HIT_RANGE) {
                    None => PathState::Done(Termination::Miss, throughput * background(&ray)),
                    Some(rec) => match scene.material(&rec).scatter(&ray, &rec, rng) {
                        None => PathState::Done(Termination::Absorbed, Color::ZERO),
                        Some(scatter) => PathState::Tracing {
                            depth: depth + 1,
                            ray: scatter.ray,
                            throughput: throughput * scatter.attenuation,
                        },
                    },
                }
            }
            PathState::Done(termination, color) => {
                return PathSample { color, segments, termination };
            }
        };
    }
}

/// Frame-wide count of traced ray segments.
///
/// Shared by every pixel task of a frame; increments are atomic and may
/// arrive in any order.
#[derive(Debug, Default)]
pub struct RayCounter(AtomicU64);

impl RayCounter {
    /// Counter starting at zero.
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Add `rays` segments.
    #[inline]
    pub fn add(&self, rays: u64) {
        self.0.fetch_add(rays, Ordering::Relaxed);
    }

    /// Current total.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Return the total and reset to zero.
    pub fn take(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}
