//! Reads texture files from disk and classifies their payloads.
//!
//! Types:
//!
//! - `TextureError` classifies I/O, container-parse, layout, and decode
//!   failures so callers can report them without guessing.
//! - `TextureData` is the loaded payload: raw block-compressed mips or one
//!   decoded RGBA8 surface.
//! - `Texture` bundles the payload with its dimensions and source path. The
//!   path is kept so the renderer can re-read the file decoded when the GPU
//!   cannot sample BC formats.
//!
//! Functions:
//!
//! - `load` prefers the compressed payload when the DDS is a plain 2D BC
//!   surface, and decodes everything else.
//! - `load_rgba8` forces the decode path regardless of container contents.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use image_dds::ddsfile::{Caps2, Dds};
use thiserror::Error;
use tracing::debug;

use crate::format::{self, TexelFormat};

const DDS_MAGIC: [u8; 4] = *b"DDS ";

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse DDS container at {}: {source}", .path.display())]
    DdsParse {
        path: PathBuf,
        #[source]
        source: image_dds::ddsfile::Error,
    },

    #[error("texture at {} has zero extent ({width}x{height})", .path.display())]
    ZeroExtent {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    #[error(
        "DDS at {} declares {declared} mip level(s) but carries {available} byte(s); expected {expected}",
        .path.display()
    )]
    TruncatedPayload {
        path: PathBuf,
        declared: u32,
        available: usize,
        expected: u64,
    },

    #[error("failed to decode DDS at {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("failed to decode image at {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Payload handed to the renderer.
#[derive(Debug, Clone)]
pub enum TextureData {
    /// Tightly packed mip chain in the container's block format.
    Compressed {
        format: TexelFormat,
        mip_count: u32,
        bytes: Vec<u8>,
    },
    /// One decoded mip, 4 bytes per pixel, row-major from the top-left.
    Rgba8 { bytes: Vec<u8> },
}

/// A texture loaded from disk.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub data: TextureData,
    pub source: PathBuf,
}

impl Texture {
    pub fn is_compressed(&self) -> bool {
        matches!(self.data, TextureData::Compressed { .. })
    }

    /// Short payload description for logging.
    pub fn format_name(&self) -> &'static str {
        match &self.data {
            TextureData::Compressed { format, .. } => format.name(),
            TextureData::Rgba8 { .. } => "RGBA8",
        }
    }
}

/// Loads a texture, keeping DDS block data compressed when possible.
pub fn load(path: &Path) -> Result<Texture, TextureError> {
    if is_dds(path)? {
        load_dds(path, true)
    } else {
        load_image(path)
    }
}

/// Loads a texture, always decoding to RGBA8.
pub fn load_rgba8(path: &Path) -> Result<Texture, TextureError> {
    if is_dds(path)? {
        load_dds(path, false)
    } else {
        load_image(path)
    }
}

/// DDS detection by extension first, then the 4-byte magic, so files with odd
/// extensions still open.
fn is_dds(path: &Path) -> Result<bool, TextureError> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dds"))
    {
        return Ok(true);
    }

    let mut file = File::open(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut magic = [0u8; 4];
    Ok(file.read_exact(&mut magic).is_ok() && magic == DDS_MAGIC)
}

fn load_dds(path: &Path, allow_compressed: bool) -> Result<Texture, TextureError> {
    let file = File::open(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dds = Dds::read(BufReader::new(file)).map_err(|source| TextureError::DdsParse {
        path: path.to_path_buf(),
        source,
    })?;

    let width = dds.header.width;
    let height = dds.header.height;
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroExtent {
            path: path.to_path_buf(),
            width,
            height,
        });
    }

    if allow_compressed {
        if let Some(texture) = try_compressed(path, &dds)? {
            return Ok(texture);
        }
    }

    decode_dds(path, &dds)
}

/// Attempts to keep the container's block data untouched. Returns `Ok(None)`
/// when the surface needs the decode path instead.
fn try_compressed(path: &Path, dds: &Dds) -> Result<Option<Texture>, TextureError> {
    let format = match image_dds::dds_image_format(dds)
        .ok()
        .and_then(TexelFormat::from_image_format)
    {
        Some(format) => format,
        None => {
            debug!(path = %path.display(), "DDS format has no direct-upload mapping; decoding");
            return Ok(None);
        }
    };

    if dds.header.caps2.contains(Caps2::CUBEMAP) || dds.header.depth.unwrap_or(1) > 1 {
        debug!(path = %path.display(), "cubemap or volume DDS; decoding base surface");
        return Ok(None);
    }

    let width = dds.header.width;
    let height = dds.header.height;
    // wgpu requires the base level of a compressed texture to be block-aligned.
    if width % 4 != 0 || height % 4 != 0 {
        debug!(
            path = %path.display(),
            width,
            height,
            "base level is not block-aligned; decoding"
        );
        return Ok(None);
    }

    let declared = dds.header.mip_map_count.unwrap_or(1).max(1);
    let mip_count = declared.min(format::max_mip_count(width, height));
    let expected = format::mip_chain_bytes(width, height, mip_count, format.block_bytes());
    if (dds.data.len() as u64) < expected {
        return Err(TextureError::TruncatedPayload {
            path: path.to_path_buf(),
            declared: mip_count,
            available: dds.data.len(),
            expected,
        });
    }

    // Trailing bytes (extra array layers, padding) are ignored.
    let bytes = dds.data[..expected as usize].to_vec();
    debug!(
        path = %path.display(),
        format = format.name(),
        width,
        height,
        mip_count,
        "loaded block-compressed texture"
    );

    Ok(Some(Texture {
        width,
        height,
        data: TextureData::Compressed {
            format,
            mip_count,
            bytes,
        },
        source: path.to_path_buf(),
    }))
}

fn decode_dds(path: &Path, dds: &Dds) -> Result<Texture, TextureError> {
    let image = image_dds::image_from_dds(dds, 0).map_err(|err| TextureError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let width = image.width();
    let height = image.height();
    debug!(path = %path.display(), width, height, "decoded DDS to RGBA8");

    Ok(Texture {
        width,
        height,
        data: TextureData::Rgba8 {
            bytes: image.into_raw(),
        },
        source: path.to_path_buf(),
    })
}

fn load_image(path: &Path) -> Result<Texture, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = image.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroExtent {
            path: path.to_path_buf(),
            width,
            height,
        });
    }

    debug!(path = %path.display(), width, height, "loaded raster image");

    Ok(Texture {
        width,
        height,
        data: TextureData::Rgba8 {
            bytes: rgba.into_raw(),
        },
        source: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_dds::ddsfile::{AlphaMode, D3D10ResourceDimension, DxgiFormat, NewDxgiParams};

    fn write_dds(
        dir: &Path,
        name: &str,
        format: DxgiFormat,
        width: u32,
        height: u32,
        mips: u32,
        data: Vec<u8>,
    ) -> PathBuf {
        let mut dds = Dds::new_dxgi(NewDxgiParams {
            width,
            height,
            depth: None,
            format,
            mipmap_levels: Some(mips),
            array_layers: None,
            caps2: None,
            is_cubemap: false,
            resource_dimension: D3D10ResourceDimension::Texture2D,
            alpha_mode: AlphaMode::Straight,
        })
        .unwrap();
        dds.data = data;

        let path = dir.join(name);
        let mut out = Vec::new();
        dds.write(&mut out).unwrap();
        std::fs::write(&path, out).unwrap();
        path
    }

    #[test]
    fn keeps_bc1_mip_chain_compressed() {
        let dir = tempfile::tempdir().unwrap();
        // 8x8 BC1 with a full chain: 4 blocks + 1 + 1 + 1, 8 bytes each.
        let payload = vec![0xAB; (4 + 1 + 1 + 1) * 8];
        let path = write_dds(dir.path(), "chain.dds", DxgiFormat::BC1_UNorm, 8, 8, 4, payload);

        let texture = load(&path).unwrap();
        assert_eq!(texture.width, 8);
        assert_eq!(texture.height, 8);
        match texture.data {
            TextureData::Compressed {
                format,
                mip_count,
                ref bytes,
            } => {
                assert_eq!(format, TexelFormat::Bc1Unorm);
                assert_eq!(mip_count, 4);
                assert_eq!(bytes.len(), (4 + 1 + 1 + 1) * 8);
            }
            TextureData::Rgba8 { .. } => panic!("expected a compressed payload"),
        }
    }

    #[test]
    fn rejects_truncated_mip_chain() {
        let dir = tempfile::tempdir().unwrap();
        // Header says 4 mips but the payload only covers the base level.
        let payload = vec![0u8; 4 * 8];
        let path = write_dds(dir.path(), "short.dds", DxgiFormat::BC1_UNorm, 8, 8, 4, payload);

        let err = load(&path).unwrap_err();
        assert!(matches!(err, TextureError::TruncatedPayload { .. }));
    }

    #[test]
    fn uncompressed_dds_takes_the_decode_path() {
        let dir = tempfile::tempdir().unwrap();
        let payload = vec![0x7F; 4 * 4 * 4];
        let path = write_dds(
            dir.path(),
            "plain.dds",
            DxgiFormat::R8G8B8A8_UNorm,
            4,
            4,
            1,
            payload,
        );

        let texture = load(&path).unwrap();
        assert!(!texture.is_compressed());
        match texture.data {
            TextureData::Rgba8 { ref bytes } => assert_eq!(bytes.len(), 4 * 4 * 4),
            TextureData::Compressed { .. } => panic!("expected a decoded payload"),
        }
    }

    #[test]
    fn load_rgba8_decodes_even_bc_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        // All-zero BC3 blocks decode to a valid (black, transparent) surface.
        let payload = vec![0u8; 4 * 16];
        let path = write_dds(dir.path(), "force.dds", DxgiFormat::BC3_UNorm, 8, 8, 1, payload);

        let texture = load_rgba8(&path).unwrap();
        assert!(!texture.is_compressed());
        assert_eq!(texture.width, 8);
        assert_eq!(texture.height, 8);
    }

    #[test]
    fn loads_png_through_the_image_crate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let texture = load(&path).unwrap();
        assert_eq!(texture.width, 3);
        assert_eq!(texture.height, 2);
        assert_eq!(texture.format_name(), "RGBA8");
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = load(Path::new("/nonexistent/texture.png")).unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));
    }
}
