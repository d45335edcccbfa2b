//! Renderer crate for dxtview.
//!
//! Glues a `winit` window, a `wgpu` quad pipeline, and the `dxtex` texture
//! loader together. The overall flow is:
//!
//! ```text
//!   CLI / dxtview
//!          │ ViewerConfig
//!          ▼
//!   Viewer::run ──▶ load startup texture ──▶ WindowState ──▶ winit event loop
//!                                                  │
//!                                                  ├─▶ render_frame() ─▶ quad draw
//!                                                  └─▶ key dispatch (Esc/F/N/O)
//! ```
//!
//! `WindowState` owns all GPU resources (surface, device, pipeline, the one
//! resident texture), while `Viewer` is the thin entry point that resolves the
//! startup texture and spins up the window. The shader pipeline is fixed and
//! built once; the only thing that ever changes afterwards is the bound
//! texture and the uniform block.

mod compile;
mod gpu;
mod types;
mod window;

use anyhow::Result;

pub use types::{Antialiasing, FitMode, ViewerConfig};

/// High-level entry point that owns the chosen configuration.
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    /// Builds a viewer for the supplied configuration.
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    /// Opens the window and drives the event loop until the user quits.
    ///
    /// Fails when no texture can be resolved (the configured path is
    /// unloadable and the file dialog was cancelled) or when GPU
    /// initialization fails.
    pub fn run(&mut self) -> Result<()> {
        window::run(&self.config)
    }
}
