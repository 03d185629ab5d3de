//! Global elevation aggregate over all stored height tiles.
//!
//! The incremental path can only ever widen the range; exact narrowing
//! requires the storage facade's full recompute, which scans every height
//! pixel.

/// A (min, max) elevation pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeightRange {
    pub min: f32,
    pub max: f32,
}

impl HeightRange {
    pub const ZERO: HeightRange = HeightRange { min: 0.0, max: 0.0 };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Widen to include another range. O(1); never narrows.
    pub fn widen(&mut self, other: HeightRange) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Widen to include a single height value. O(1); never narrows.
    pub fn widen_scalar(&mut self, height: f32) {
        self.min = self.min.min(height);
        self.max = self.max.max(height);
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen_extends_both_bounds() {
        let mut range = HeightRange::new(0.0, 10.0);
        range.widen(HeightRange::new(-5.0, 20.0));
        assert_eq!(range, HeightRange::new(-5.0, 20.0));
    }

    #[test]
    fn test_widen_never_narrows() {
        let mut range = HeightRange::new(-5.0, 20.0);
        range.widen(HeightRange::new(0.0, 1.0));
        assert_eq!(range, HeightRange::new(-5.0, 20.0));
    }

    #[test]
    fn test_widen_scalar() {
        let mut range = HeightRange::ZERO;
        range.widen_scalar(50.0);
        range.widen_scalar(-3.0);
        assert_eq!(range, HeightRange::new(-3.0, 50.0));
        assert_eq!(range.span(), 53.0);
    }
}
