use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;

use crate::types::FitMode;

/// CPU-side mirror of the `QuadParams` uniform block.
///
/// The layout matches the GLSL declaration in `compile.rs` and therefore must
/// observe std140 alignment rules: three vec4 slots, 48 bytes total.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct QuadUniforms {
    /// Surface width/height in physical pixels; zw unused.
    pub surface: [f32; 4],
    /// Texture width/height and resident mip count; w unused.
    pub tex_size: [f32; 4],
    /// NDC scale applied to the quad by the vertex stage; zw unused.
    pub fit: [f32; 4],
}

unsafe impl Zeroable for QuadUniforms {}
unsafe impl Pod for QuadUniforms {}

impl QuadUniforms {
    pub fn new(
        surface: PhysicalSize<u32>,
        texture: (u32, u32),
        mip_count: u32,
        fit: FitMode,
    ) -> Self {
        let mut uniforms = Self {
            surface: [surface.width as f32, surface.height as f32, 0.0, 0.0],
            tex_size: [texture.0 as f32, texture.1 as f32, mip_count as f32, 0.0],
            fit: [1.0, 1.0, 0.0, 0.0],
        };
        uniforms.refresh_fit(fit);
        uniforms
    }

    /// Updates the surface slot after a resize and recomputes the fit scale.
    pub fn set_surface(&mut self, size: PhysicalSize<u32>, fit: FitMode) {
        self.surface[0] = size.width as f32;
        self.surface[1] = size.height as f32;
        self.refresh_fit(fit);
    }

    /// Updates the texture slot after a swap and recomputes the fit scale.
    pub fn set_texture(&mut self, width: u32, height: u32, mip_count: u32, fit: FitMode) {
        self.tex_size[0] = width as f32;
        self.tex_size[1] = height as f32;
        self.tex_size[2] = mip_count as f32;
        self.refresh_fit(fit);
    }

    fn refresh_fit(&mut self, fit: FitMode) {
        let scale = fit.quad_scale(
            (self.surface[0] as u32, self.surface[1] as u32),
            (self.tex_size[0] as u32, self.tex_size[1] as u32),
        );
        self.fit[0] = scale[0];
        self.fit[1] = scale[1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    /// Sanity-checks that the CPU mirror of the uniform block matches the
    /// layout baked into the GLSL declaration.
    #[test]
    fn quad_uniforms_follow_std140_layout() {
        let uniforms = QuadUniforms::new(PhysicalSize::new(800, 600), (256, 256), 1, FitMode::Stretch);
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<QuadUniforms>(), 16);
        assert_eq!(size_of::<QuadUniforms>(), 48);
        assert_eq!((&uniforms.surface as *const _ as usize) - base, 0);
        assert_eq!((&uniforms.tex_size as *const _ as usize) - base, 16);
        assert_eq!((&uniforms.fit as *const _ as usize) - base, 32);
    }

    #[test]
    fn resize_recomputes_fit_scale() {
        let mut uniforms =
            QuadUniforms::new(PhysicalSize::new(100, 100), (64, 64), 1, FitMode::Contain);
        assert_eq!(uniforms.fit[..2], [1.0, 1.0]);

        uniforms.set_surface(PhysicalSize::new(200, 100), FitMode::Contain);
        assert_eq!(uniforms.fit[..2], [0.5, 1.0]);
    }

    #[test]
    fn texture_swap_recomputes_fit_scale() {
        let mut uniforms =
            QuadUniforms::new(PhysicalSize::new(100, 100), (64, 64), 1, FitMode::Contain);

        uniforms.set_texture(128, 64, 8, FitMode::Contain);
        assert_eq!(uniforms.tex_size[..3], [128.0, 64.0, 8.0]);
        assert_eq!(uniforms.fit[..2], [1.0, 0.5]);
    }
}
