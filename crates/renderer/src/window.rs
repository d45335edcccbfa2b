//! The viewer window and its event loop.
//!
//! This is the event-handler plumbing the whole program exists for: resolve a
//! startup texture (falling back to the file dialog), open a window sized to
//! it, then wait for events. Keys mirror the classic viewer bindings:
//! `Escape` quits, `F` goes borderless fullscreen, `N` restores the window,
//! `O` opens another file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::types::ViewerConfig;

const WINDOW_TITLE: &str = "DXT Texture Viewer";

/// Upper bound on the texture-derived window size; the GPU context still
/// validates against the adapter's real limit.
const MAX_WINDOW_EDGE: u32 = 16_384;

pub(crate) fn run(config: &ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;

    let texture = resolve_startup_texture(config)?;
    info!(
        source = %texture.source.display(),
        width = texture.width,
        height = texture.height,
        format = texture.format_name(),
        "loaded startup texture"
    );

    let window_size = initial_window_size(config, &texture);
    let mut builder = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(window_size);
    if config.fullscreen {
        builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = builder
        .build(&event_loop)
        .context("failed to create viewer window")?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window.clone(), config, &texture)?;
    state.window().request_redraw();

    // The dialog reopens wherever the last texture came from.
    let mut browse_dir = texture
        .source
        .parent()
        .map(Path::to_path_buf)
        .or_else(|| config.browse_dir.clone());

    event_loop
        .run(move |event, elwt| {
            // Static content: sleep until the platform hands us an event.
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            state.resize(new_size);
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            // Keep the current logical size when the scale factor changes.
                            let _ = inner_size_writer.request_inner_size(state.size());
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.state == ElementState::Pressed && !event.repeat {
                                match &event.logical_key {
                                    Key::Named(NamedKey::Escape) => {
                                        elwt.exit();
                                    }
                                    Key::Character(value)
                                        if value.as_str().eq_ignore_ascii_case("f") =>
                                    {
                                        state
                                            .window()
                                            .set_fullscreen(Some(Fullscreen::Borderless(None)));
                                        state.window().request_redraw();
                                    }
                                    Key::Character(value)
                                        if value.as_str().eq_ignore_ascii_case("n") =>
                                    {
                                        state.window().set_fullscreen(None);
                                        state.window().request_redraw();
                                    }
                                    Key::Character(value)
                                        if value.as_str().eq_ignore_ascii_case("o") =>
                                    {
                                        if let Some(path) =
                                            pick_texture_file(browse_dir.as_deref())
                                        {
                                            browse_dir =
                                                path.parent().map(Path::to_path_buf);
                                            state.open_texture(&path);
                                            state.window().request_redraw();
                                        }
                                    }
                                    _ => {}
                                }
                            }
                        }
                        WindowEvent::RedrawRequested => match state.render_frame() {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                state.resize(state.size());
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                tracing::error!("surface out of memory; exiting");
                                elwt.exit();
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                warn!("surface timeout; retrying next frame");
                            }
                            Err(other) => {
                                warn!(error = ?other, "surface error; retrying next frame");
                            }
                        },
                        _ => {}
                    }
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

/// Loads the configured texture, falling back to the file dialog when it is
/// absent or unloadable. Cancelling the dialog with nothing loaded is fatal.
fn resolve_startup_texture(config: &ViewerConfig) -> Result<dxtex::Texture> {
    if let Some(path) = &config.texture_path {
        match dxtex::load(path) {
            Ok(texture) => return Ok(texture),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to load requested texture; opening file dialog"
                );
            }
        }
    }

    let start_dir = config
        .texture_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .or_else(|| config.browse_dir.clone());

    let picked = pick_texture_file(start_dir.as_deref())
        .ok_or_else(|| anyhow!("no texture selected"))?;
    dxtex::load(&picked)
        .with_context(|| format!("failed to load texture at {}", picked.display()))
}

/// The window opens at the texture's native size unless the caller asked for
/// a specific size.
fn initial_window_size(config: &ViewerConfig, texture: &dxtex::Texture) -> PhysicalSize<u32> {
    let (width, height) = config.window_size.unwrap_or((texture.width, texture.height));
    PhysicalSize::new(
        width.clamp(1, MAX_WINDOW_EDGE),
        height.clamp(1, MAX_WINDOW_EDGE),
    )
}

fn pick_texture_file(start_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Open texture")
        .add_filter("DDS textures", &["dds"])
        .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "gif"])
        .add_filter("All files", &["*"]);
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file()
}

/// Aggregates GPU state for the open window.
struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &ViewerConfig, texture: &dxtex::Texture) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(
            window.as_ref(),
            size,
            texture,
            config.fit,
            config.antialiasing,
        )?;
        Ok(Self { window, gpu })
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    /// Loads and swaps in a new texture; a failure keeps the previous one.
    fn open_texture(&mut self, path: &Path) {
        let loaded = match dxtex::load(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load texture; keeping previous");
                return;
            }
        };

        match self.gpu.set_texture(&loaded) {
            Ok(()) => {
                info!(
                    source = %loaded.source.display(),
                    width = loaded.width,
                    height = loaded.height,
                    format = loaded.format_name(),
                    "swapped texture"
                );
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to upload texture; keeping previous");
            }
        }
    }

    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.gpu.render()
    }
}
