//! Error types for scene loading and frame wiring.
//!
//! The per-pixel kernel is infallible; these only surface at the edges where
//! host data enters the crate.

use thiserror::Error;

/// Problems found while building a [`Scene`](crate::scene::Scene) from host data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Material kind tag outside `{0: Lambertian, 1: Metal, 2: Dielectric}`
    #[error("Unknown material kind {kind} at material {index}")]
    UnknownMaterialKind {
        /// Position in the material table
        index: usize,
        /// Tag found there
        kind: i32,
    },

    /// Sphere references a material that does not exist
    #[error("Sphere {sphere} references material {material}, but only {count} materials exist")]
    MaterialIndexOutOfRange {
        /// Position in the sphere table
        sphere: usize,
        /// Material index it carries
        material: i64,
        /// Number of materials in the scene
        count: usize,
    },

    /// Raw byte buffer does not hold a whole number of aligned records
    #[error("Invalid {what} buffer: {reason}")]
    BufferLayout {
        /// Which buffer, `"sphere"` or `"material"`
        what: &'static str,
        /// Why the cast failed
        reason: String,
    },
}

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene data was rejected
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Accumulation buffer does not match the configured resolution
    #[error("Buffer size mismatch: expected {expected} pixels, got {actual}")]
    BufferSize {
        /// `width * height`
        expected: usize,
        /// Length of the buffer passed in
        actual: usize,
    },

    /// Resolution or sample count of zero
    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    /// Writing an output image failed
    #[error("Failed to write {path}: {reason}")]
    Output {
        /// Destination file
        path: String,
        /// Underlying encoder or I/O error
        reason: String,
    },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
