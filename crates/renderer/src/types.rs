use std::path::PathBuf;

/// How the quad is scaled when the texture and surface aspect ratios differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Quad fills the surface, distorting the texture if aspects differ.
    #[default]
    Stretch,
    /// Largest aspect-preserving quad that fits inside the surface.
    Contain,
    /// Smallest aspect-preserving quad that covers the surface.
    Cover,
}

impl FitMode {
    /// NDC scale factors for a full-surface quad showing a texture of the
    /// given size. `(1.0, 1.0)` means the quad spans the whole surface.
    pub fn quad_scale(self, surface: (u32, u32), texture: (u32, u32)) -> [f32; 2] {
        if matches!(self, Self::Stretch) {
            return [1.0, 1.0];
        }

        let surface_aspect = surface.0.max(1) as f32 / surface.1.max(1) as f32;
        let texture_aspect = texture.0.max(1) as f32 / texture.1.max(1) as f32;
        let ratio = texture_aspect / surface_aspect;

        let wider = ratio >= 1.0;
        match (self, wider) {
            // Texture wider than the surface: pin width, shrink height.
            (Self::Contain, true) => [1.0, 1.0 / ratio],
            (Self::Contain, false) => [ratio, 1.0],
            // Cover flips the axis that gets pinned.
            (Self::Cover, true) => [ratio, 1.0],
            (Self::Cover, false) => [1.0, 1.0 / ratio],
            (Self::Stretch, _) => [1.0, 1.0],
        }
    }
}

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    #[default]
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

/// Immutable configuration passed to the viewer at start-up.
///
/// Mirrors CLI flags and settings-file defaults: which texture to open, how to
/// fit it, and how the window should start out.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Texture to open; `None` means "ask with the file dialog".
    pub texture_path: Option<PathBuf>,
    /// Fit policy applied when window and texture aspects differ.
    pub fit: FitMode,
    /// Anti-aliasing policy for the quad pipeline.
    pub antialiasing: Antialiasing,
    /// Explicit initial window size; `None` sizes the window to the texture.
    pub window_size: Option<(u32, u32)>,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Directory the file dialog opens in when no better candidate exists.
    pub browse_dir: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            texture_path: None,
            fit: FitMode::default(),
            antialiasing: Antialiasing::default(),
            window_size: None,
            fullscreen: false,
            browse_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_scale(actual: [f32; 2], expected: [f32; 2]) {
        assert!(
            (actual[0] - expected[0]).abs() < 1e-6 && (actual[1] - expected[1]).abs() < 1e-6,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn stretch_always_fills_the_surface() {
        assert_scale(FitMode::Stretch.quad_scale((1920, 1080), (256, 256)), [1.0, 1.0]);
        assert_scale(FitMode::Stretch.quad_scale((100, 100), (512, 64)), [1.0, 1.0]);
    }

    #[test]
    fn contain_letterboxes_the_narrow_axis() {
        // Square texture on a 2:1 surface leaves pillarboxes.
        assert_scale(FitMode::Contain.quad_scale((200, 100), (64, 64)), [0.5, 1.0]);
        // Wide texture on a square surface leaves letterboxes.
        assert_scale(FitMode::Contain.quad_scale((100, 100), (128, 64)), [1.0, 0.5]);
    }

    #[test]
    fn cover_overflows_the_wide_axis() {
        assert_scale(FitMode::Cover.quad_scale((200, 100), (64, 64)), [1.0, 2.0]);
        assert_scale(FitMode::Cover.quad_scale((100, 100), (128, 64)), [2.0, 1.0]);
    }

    #[test]
    fn matching_aspects_are_identity_for_every_mode() {
        for mode in [FitMode::Stretch, FitMode::Contain, FitMode::Cover] {
            assert_scale(mode.quad_scale((512, 256), (1024, 512)), [1.0, 1.0]);
        }
    }

    #[test]
    fn degenerate_surface_does_not_divide_by_zero() {
        let scale = FitMode::Contain.quad_scale((0, 0), (64, 64));
        assert!(scale[0].is_finite() && scale[1].is_finite());
    }
}
