use anyhow::{Context, Result};
use wgpu::util::{DeviceExt, TextureDataOrder};

use dxtex::{TexelFormat, TextureData};

/// The one resident texture plus the sampler that reads it. Keeping the
/// texture alive here keeps the bind group valid.
pub(crate) struct TextureResources {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
    pub mip_count: u32,
}

/// Uploads a loaded texture, preferring the compressed payload when the
/// device can sample it. When it cannot, the file is re-read decoded; the
/// compressed payload cannot be expanded in place.
pub(crate) fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &dxtex::Texture,
    bc_supported: bool,
) -> Result<TextureResources> {
    match &texture.data {
        TextureData::Compressed {
            format,
            mip_count,
            bytes,
        } if bc_supported => Ok(create_compressed(
            device, queue, texture, *format, *mip_count, bytes,
        )),
        TextureData::Compressed { format, .. } => {
            tracing::warn!(
                source = %texture.source.display(),
                format = format.name(),
                "device cannot sample BC textures; decoding on the CPU"
            );
            let decoded = dxtex::load_rgba8(&texture.source).with_context(|| {
                format!("failed to decode {}", texture.source.display())
            })?;
            match &decoded.data {
                TextureData::Rgba8 { bytes } => Ok(create_rgba8(
                    device,
                    queue,
                    &decoded,
                    decoded.width,
                    decoded.height,
                    bytes,
                )),
                TextureData::Compressed { .. } => {
                    anyhow::bail!("decoder unexpectedly returned a compressed payload")
                }
            }
        }
        TextureData::Rgba8 { bytes } => Ok(create_rgba8(
            device,
            queue,
            texture,
            texture.width,
            texture.height,
            bytes,
        )),
    }
}

fn create_compressed(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &dxtex::Texture,
    format: TexelFormat,
    mip_count: u32,
    bytes: &[u8],
) -> TextureResources {
    let gpu_texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(&format!("texture ({})", texture.source.display())),
            size: wgpu::Extent3d {
                width: texture.width,
                height: texture.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: map_format(format),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        bytes,
    );

    finish(device, gpu_texture, texture.width, texture.height, mip_count)
}

fn create_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &dxtex::Texture,
    width: u32,
    height: u32,
    bytes: &[u8],
) -> TextureResources {
    let gpu_texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(&format!("texture ({})", texture.source.display())),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        bytes,
    );

    finish(device, gpu_texture, width, height, 1)
}

fn finish(
    device: &wgpu::Device,
    texture: wgpu::Texture,
    width: u32,
    height: u32,
    mip_count: u32,
) -> TextureResources {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    TextureResources {
        _texture: texture,
        view,
        sampler,
        width,
        height,
        mip_count,
    }
}

fn map_format(format: TexelFormat) -> wgpu::TextureFormat {
    match format {
        TexelFormat::Bc1Unorm => wgpu::TextureFormat::Bc1RgbaUnorm,
        TexelFormat::Bc1UnormSrgb => wgpu::TextureFormat::Bc1RgbaUnormSrgb,
        TexelFormat::Bc2Unorm => wgpu::TextureFormat::Bc2RgbaUnorm,
        TexelFormat::Bc2UnormSrgb => wgpu::TextureFormat::Bc2RgbaUnormSrgb,
        TexelFormat::Bc3Unorm => wgpu::TextureFormat::Bc3RgbaUnorm,
        TexelFormat::Bc3UnormSrgb => wgpu::TextureFormat::Bc3RgbaUnormSrgb,
        TexelFormat::Bc4Unorm => wgpu::TextureFormat::Bc4RUnorm,
        TexelFormat::Bc4Snorm => wgpu::TextureFormat::Bc4RSnorm,
        TexelFormat::Bc5Unorm => wgpu::TextureFormat::Bc5RgUnorm,
        TexelFormat::Bc5Snorm => wgpu::TextureFormat::Bc5RgSnorm,
        TexelFormat::Bc7Unorm => wgpu::TextureFormat::Bc7RgbaUnorm,
        TexelFormat::Bc7UnormSrgb => wgpu::TextureFormat::Bc7RgbaUnormSrgb,
    }
}
