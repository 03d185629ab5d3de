//! Parameters for GPU-side procedural noise blending at the terrain edges.
//!
//! Only the parameters live here; the blending math itself runs in the
//! material shader, outside this library.

/// Noise blending configuration passed through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    pub enabled: bool,
    /// Noise frequency scale.
    pub scale: f32,
    /// Maximum noise elevation in world units.
    pub height: f32,
    /// Blend start as a fraction of the blend band, clamped to 0..=1.
    pub blend_near: f32,
    /// Blend end as a fraction of the blend band, clamped to 0..=1.
    pub blend_far: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            enabled: false,
            scale: 2.0,
            height: 300.0,
            blend_near: 0.5,
            blend_far: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_values() {
        let noise = NoiseParams::default();
        assert!(!noise.enabled);
        assert_eq!(noise.scale, 2.0);
        assert_eq!(noise.height, 300.0);
        assert_eq!(noise.blend_near, 0.5);
        assert_eq!(noise.blend_far, 1.0);
    }
}
