//! ToyPath progressive path tracer
//!
//! Renders a scene of spheres with stochastic path tracing and blends each
//! frame's samples into a ping-ponged pair of accumulation buffers. Window,
//! device and presentation plumbing belong to the host; this crate is the
//! kernel plus a reference CPU driver built on rayon.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod math;
pub mod ray;
pub mod interval;
pub mod error;
pub mod material;
pub mod sphere;
pub mod hittable;
pub mod scene;
pub mod camera;
pub mod random;
pub mod integrator;
pub mod accumulation;
pub mod renderer;

pub use accumulation::{blend, lerp_factor, AccumulationBuffers};
pub use camera::{Camera, CameraParams};
pub use error::{Error, SceneError};
pub use integrator::{trace_path, PathSample, RayCounter, Termination, MAX_DEPTH};
pub use material::Material;
pub use math::Color;
pub use ray::Ray;
pub use renderer::{render_frame, FrameState, FrameStats, ProgressiveRenderer, RenderSettings};
pub use scene::Scene;
pub use sphere::Sphere;
