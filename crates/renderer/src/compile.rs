//! The fixed shader set, compiled once at start-up.
//!
//! Both stages are embedded GLSL compiled through wgpu's naga front end; there
//! is no runtime shader authoring in a texture viewer, so nothing is read
//! from disk.

use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

/// Compiles the quad vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("quad vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the textured-quad fragment shader.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("quad fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

/// Vertex stage: scales the unit quad by the fit factors from the uniform
/// block and forwards UVs untouched.
///
/// The uniform block layout must match [`QuadUniforms`](crate::gpu) field for
/// field under std140 rules.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 in_pos;
layout(location = 1) in vec2 in_uv;
layout(location = 0) out vec2 v_uv;

layout(std140, set = 0, binding = 0) uniform QuadParams {
    vec4 surface;
    vec4 tex_size;
    vec4 fit;
} ubo;

void main() {
    v_uv = in_uv;
    gl_Position = vec4(in_pos * ubo.fit.xy, 0.0, 1.0);
}
";

/// Fragment stage: one textured sample, nothing else.
const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 out_color;

layout(set = 1, binding = 0) uniform texture2D quad_texture;
layout(set = 1, binding = 1) uniform sampler quad_sampler;

void main() {
    out_color = texture(sampler2D(quad_texture, quad_sampler), v_uv);
}
";
