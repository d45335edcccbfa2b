//! Block-compressed format classification and size arithmetic.
//!
//! Types:
//!
//! - `TexelFormat` names the BC formats the renderer can hand to the GPU
//!   untouched, and knows each format's block footprint and sRGB-ness.
//!
//! Functions:
//!
//! - `mip_level_bytes` and `mip_chain_bytes` compute the exact payload a 2D
//!   surface must carry, used by the loader to validate DDS data against the
//!   header before anything reaches the GPU.
//! - `max_mip_count` bounds a header-declared mip chain to what the base
//!   dimensions can actually hold.

use image_dds::ImageFormat;

/// BC formats eligible for direct GPU upload.
///
/// BC6H is deliberately absent: HDR viewing would need tone mapping the
/// pipeline does not do, so those files take the CPU-decode path instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelFormat {
    Bc1Unorm,
    Bc1UnormSrgb,
    Bc2Unorm,
    Bc2UnormSrgb,
    Bc3Unorm,
    Bc3UnormSrgb,
    Bc4Unorm,
    Bc4Snorm,
    Bc5Unorm,
    Bc5Snorm,
    Bc7Unorm,
    Bc7UnormSrgb,
}

impl TexelFormat {
    /// Maps the container-declared format onto an uploadable one.
    pub(crate) fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::BC1RgbaUnorm => Some(Self::Bc1Unorm),
            ImageFormat::BC1RgbaUnormSrgb => Some(Self::Bc1UnormSrgb),
            ImageFormat::BC2RgbaUnorm => Some(Self::Bc2Unorm),
            ImageFormat::BC2RgbaUnormSrgb => Some(Self::Bc2UnormSrgb),
            ImageFormat::BC3RgbaUnorm => Some(Self::Bc3Unorm),
            ImageFormat::BC3RgbaUnormSrgb => Some(Self::Bc3UnormSrgb),
            ImageFormat::BC4RUnorm => Some(Self::Bc4Unorm),
            ImageFormat::BC4RSnorm => Some(Self::Bc4Snorm),
            ImageFormat::BC5RgUnorm => Some(Self::Bc5Unorm),
            ImageFormat::BC5RgSnorm => Some(Self::Bc5Snorm),
            ImageFormat::BC7RgbaUnorm => Some(Self::Bc7Unorm),
            ImageFormat::BC7RgbaUnormSrgb => Some(Self::Bc7UnormSrgb),
            _ => None,
        }
    }

    /// Bytes per 4x4 block.
    pub fn block_bytes(self) -> u32 {
        match self {
            Self::Bc1Unorm | Self::Bc1UnormSrgb | Self::Bc4Unorm | Self::Bc4Snorm => 8,
            _ => 16,
        }
    }

    pub fn is_srgb(self) -> bool {
        matches!(
            self,
            Self::Bc1UnormSrgb | Self::Bc2UnormSrgb | Self::Bc3UnormSrgb | Self::Bc7UnormSrgb
        )
    }

    /// Short format name for logging.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bc1Unorm => "BC1_UNORM",
            Self::Bc1UnormSrgb => "BC1_UNORM_SRGB",
            Self::Bc2Unorm => "BC2_UNORM",
            Self::Bc2UnormSrgb => "BC2_UNORM_SRGB",
            Self::Bc3Unorm => "BC3_UNORM",
            Self::Bc3UnormSrgb => "BC3_UNORM_SRGB",
            Self::Bc4Unorm => "BC4_UNORM",
            Self::Bc4Snorm => "BC4_SNORM",
            Self::Bc5Unorm => "BC5_UNORM",
            Self::Bc5Snorm => "BC5_SNORM",
            Self::Bc7Unorm => "BC7_UNORM",
            Self::Bc7UnormSrgb => "BC7_UNORM_SRGB",
        }
    }
}

/// Payload size of a single mip level of a block-compressed 2D surface.
pub(crate) fn mip_level_bytes(width: u32, height: u32, level: u32, block_bytes: u32) -> u64 {
    let w = (width >> level).max(1) as u64;
    let h = (height >> level).max(1) as u64;
    w.div_ceil(4) * h.div_ceil(4) * block_bytes as u64
}

/// Payload size of the whole mip chain, tightly packed in mip-major order.
pub(crate) fn mip_chain_bytes(width: u32, height: u32, mip_count: u32, block_bytes: u32) -> u64 {
    (0..mip_count)
        .map(|level| mip_level_bytes(width, height, level, block_bytes))
        .sum()
}

/// Longest mip chain the base dimensions admit (full chain down to 1x1).
pub fn max_mip_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height).max(1);
    32 - largest.leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_footprints_match_dxgi() {
        assert_eq!(TexelFormat::Bc1Unorm.block_bytes(), 8);
        assert_eq!(TexelFormat::Bc4Snorm.block_bytes(), 8);
        assert_eq!(TexelFormat::Bc2Unorm.block_bytes(), 16);
        assert_eq!(TexelFormat::Bc3UnormSrgb.block_bytes(), 16);
        assert_eq!(TexelFormat::Bc5Unorm.block_bytes(), 16);
        assert_eq!(TexelFormat::Bc7UnormSrgb.block_bytes(), 16);
    }

    #[test]
    fn srgb_variants_are_flagged() {
        assert!(TexelFormat::Bc1UnormSrgb.is_srgb());
        assert!(TexelFormat::Bc7UnormSrgb.is_srgb());
        assert!(!TexelFormat::Bc1Unorm.is_srgb());
        assert!(!TexelFormat::Bc5Snorm.is_srgb());
    }

    #[test]
    fn maps_supported_container_formats() {
        assert_eq!(
            TexelFormat::from_image_format(ImageFormat::BC3RgbaUnorm),
            Some(TexelFormat::Bc3Unorm)
        );
        assert_eq!(
            TexelFormat::from_image_format(ImageFormat::BC7RgbaUnormSrgb),
            Some(TexelFormat::Bc7UnormSrgb)
        );
        assert_eq!(
            TexelFormat::from_image_format(ImageFormat::Rgba8Unorm),
            None
        );
    }

    #[test]
    fn mip_levels_round_up_to_whole_blocks() {
        // 256x128 BC1: 64x32 blocks at 8 bytes each.
        assert_eq!(mip_level_bytes(256, 128, 0, 8), 64 * 32 * 8);
        // Mip 6 of 256x128 is 4x2, still one row of one block.
        assert_eq!(mip_level_bytes(256, 128, 6, 8), 8);
        // 1x1 tail occupies a full block.
        assert_eq!(mip_level_bytes(256, 128, 8, 8), 8);
    }

    #[test]
    fn chain_bytes_sum_every_level() {
        // 8x8 BC1 down to 1x1: 4 blocks + 1 + 1 + 1, 8 bytes each.
        assert_eq!(mip_chain_bytes(8, 8, 4, 8), (4 + 1 + 1 + 1) * 8);
        assert_eq!(mip_chain_bytes(8, 8, 1, 8), 4 * 8);
    }

    #[test]
    fn mip_count_is_bounded_by_largest_edge() {
        assert_eq!(max_mip_count(1, 1), 1);
        assert_eq!(max_mip_count(8, 8), 4);
        assert_eq!(max_mip_count(256, 16), 9);
        assert_eq!(max_mip_count(1024, 1024), 11);
    }
}
