//! Parameter ranges for ray hits.

/// Smallest accepted hit distance; keeps secondary rays off their own surface.
pub const MIN_T: f32 = 0.001;

/// Upper bound meaning "nothing found yet".
pub const MAX_T: f32 = 1.0e7;

/// Open interval `(min, max)` of accepted ray parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound (exclusive)
    pub min: f32,
    /// Upper bound (exclusive)
    pub max: f32,
}

impl Interval {
    /// Range used for every scene query: `(MIN_T, MAX_T)`.
    pub const HIT_RANGE: Interval = Interval { min: MIN_T, max: MAX_T };

    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    #[inline]
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same lower bound, tightened upper bound.
    #[inline]
    pub fn with_max(&self, max: f32) -> Self {
        Self { min: self.min, max }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::HIT_RANGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrounds_is_exclusive() {
        let range = Interval::new(1.0, 2.0);
        assert!(!range.surrounds(1.0));
        assert!(range.surrounds(1.5));
        assert!(!range.surrounds(2.0));
    }

    #[test]
    fn hit_range_rejects_self_intersection_distances() {
        assert!(!Interval::HIT_RANGE.surrounds(0.0));
        assert!(!Interval::HIT_RANGE.surrounds(0.0005));
        assert!(Interval::HIT_RANGE.surrounds(0.01));
        assert_eq!(Interval::HIT_RANGE.with_max(3.0).max, 3.0);
    }
}
