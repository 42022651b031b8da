//! Prism render pipeline.
//!
//! Schedules [`RenderPass`]es over a [`Scene`] once per frame:
//!
//! - [`RenderPipeline`] - Persistent and per-frame pass lists, drained until empty
//! - [`Frame`] - What a pass sees while it runs, including its neighbours
//! - [`IntermediateTargets`] - Primary and secondary targets sized to the output
//! - [`DeviceRenderContext`] - [`RenderContext`] backed by a wgpu device

mod context;
mod device_context;
mod error;
mod frame;
mod output;
mod pass;
pub mod passes;
mod pipeline;
mod render_context;
mod scene;
mod target;

pub use context::*;
pub use device_context::*;
pub use error::*;
pub use frame::*;
pub use output::*;
pub use pass::*;
pub use pipeline::{MAX_APPEND_ITERATIONS, PipelineConfig, RenderPipeline};
pub use render_context::*;
pub use scene::*;
pub use target::*;

pub use prism_test_utils::{DeviceError, GpuTexture, GraphicsDevice};
#[cfg(feature = "mock")]
pub use prism_test_utils::{DeviceCall, MockGraphicsDevice};
pub use wgpu;
