//! Texture-loading library for the DXT viewer.
//!
//! The crate knows nothing about the GPU: it reads a file from disk and hands
//! back either a raw block-compressed payload (when the DDS container carries
//! a format the renderer can upload directly) or a decoded RGBA8 surface. The
//! renderer decides what to do with the bytes.
//!
//! ```text
//!   path ──▶ load() ──▶ DDS?  ──▶ BC1-7 2D surface ──▶ Texture (compressed)
//!                        │             │
//!                        │             └─ anything else ─▶ CPU decode ─▶ Texture (RGBA8)
//!                        └─ PNG/JPEG/BMP/... ─▶ image crate ─▶ Texture (RGBA8)
//! ```

mod format;
mod loader;
mod path;

pub use format::{max_mip_count, TexelFormat};
pub use loader::{load, load_rgba8, Texture, TextureData, TextureError};
pub use path::PathResolver;
