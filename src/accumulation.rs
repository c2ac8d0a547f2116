//! Progressive accumulation across frames.
//!
//! Two buffers alternate roles: the one written last frame is read as the
//! blend input while the other receives this frame's result. The renderer
//! never writes the buffer it reads; the host flips roles once per frame.

use glam::Vec3A;

use crate::math::{self, Color};

/// Blend weight given to the new frame: `frame / (frame + 1)`.
///
/// This grows toward 1, so later frames dominate the running value rather
/// than being averaged in at `1 / (frame + 1)`. Kept as-is; see DESIGN.md.
#[inline]
pub fn lerp_factor(frame: u32) -> f32 {
    let frame = frame as f32;
    frame / (frame + 1.0)
}

/// Combine the stored value with this frame's color.
///
/// Frame 0 has no meaningful previous value and writes `frame_color` as is.
#[inline]
pub fn blend(previous: Color, frame_color: Color, frame: u32) -> Color {
    if frame == 0 {
        frame_color
    } else {
        math::lerp(previous, frame_color, lerp_factor(frame))
    }
}

/// The ping-pong pair of per-pixel radiance buffers.
///
/// Holds no notion of which buffer is current; callers pass the index they
/// read from, normally [`FrameState::previous_buffer`](crate::renderer::FrameState::previous_buffer).
#[derive(Debug, Clone)]
pub struct AccumulationBuffers {
    buffers: [Vec<Color>; 2],
}

impl AccumulationBuffers {
    /// Two zeroed buffers of `pixel_count` entries.
    pub fn new(pixel_count: usize) -> Self {
        Self {
            buffers: [vec![Vec3A::ZERO; pixel_count], vec![Vec3A::ZERO; pixel_count]],
        }
    }

    /// Pixels per buffer.
    pub fn len(&self) -> usize {
        self.buffers[0].len()
    }

    /// True for a zero-sized image.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buffer `index`, taken modulo 2.
    pub fn get(&self, index: usize) -> &[Color] {
        &self.buffers[index & 1]
    }

    /// Borrow `(previous, next)` for a frame: read buffer `previous`, write the other.
    pub fn split(&mut self, previous: usize) -> (&[Color], &mut [Color]) {
        let [first, second] = &mut self.buffers;
        if previous & 1 == 0 {
            (first.as_slice(), second.as_mut_slice())
        } else {
            (second.as_slice(), first.as_mut_slice())
        }
    }

    /// Zero both buffers.
    pub fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(Vec3A::ZERO);
        }
    }
}
