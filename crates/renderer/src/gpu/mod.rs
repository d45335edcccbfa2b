//! GPU orchestration for the quad viewer.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `texture` turns a loaded `dxtex::Texture` into a resident GPU texture,
//!   compressed when the adapter can sample BC formats.
//! - `pipeline` compiles the fixed shader pair into the one render pipeline
//!   and owns the quad geometry buffers.
//! - `uniforms` mirrors the std140 block consumed by the vertex stage.
//! - `state` glues everything together and exposes the `GpuState` API used by
//!   `window`.

mod context;
mod pipeline;
mod state;
mod texture;
mod uniforms;

pub(crate) use state::GpuState;
