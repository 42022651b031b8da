//! A [`RenderContext`] backed by a real wgpu device.

use std::sync::Arc;

use prism_core::profiling::profile_function;
use prism_test_utils::GraphicsDevice;

use crate::context::GraphicsContext;
use crate::output::OutputConfig;
use crate::render_context::RenderContext;
use crate::target::TargetHandle;

/// Rendering context for a wgpu device.
///
/// Holds the output configuration, the stack of active render targets and the
/// command encoder passes record into between [`begin_frame`](Self::begin_frame)
/// and [`finish_frame`](Self::finish_frame).
pub struct DeviceRenderContext {
    graphics: Arc<GraphicsContext>,
    output: OutputConfig,
    targets: Vec<TargetHandle>,
    encoder: Option<wgpu::CommandEncoder>,
}

impl DeviceRenderContext {
    pub fn new(graphics: Arc<GraphicsContext>, output: OutputConfig) -> Self {
        Self {
            graphics,
            output,
            targets: Vec::new(),
            encoder: None,
        }
    }

    pub fn graphics(&self) -> &Arc<GraphicsContext> {
        &self.graphics
    }

    /// Change the output size. Intermediate targets follow on the next frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.output.width = width;
        self.output.height = height;
    }

    pub fn set_output_config(&mut self, output: OutputConfig) {
        self.output = output;
    }

    /// Start recording a frame.
    pub fn begin_frame(&mut self) {
        if self.encoder.is_some() {
            tracing::warn!("begin_frame called with an unfinished frame, submitting it");
            self.finish_frame();
        }

        self.encoder = Some(self.graphics.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            },
        ));
    }

    /// The encoder of the frame being recorded, if any.
    pub fn encoder(&mut self) -> Option<&mut wgpu::CommandEncoder> {
        self.encoder.as_mut()
    }

    /// Submit the recorded frame. Returns `false` if no frame was recording.
    pub fn finish_frame(&mut self) -> bool {
        profile_function!();

        if !self.targets.is_empty() {
            tracing::warn!(
                "Finishing frame with {} render targets still pushed",
                self.targets.len()
            );
        }

        match self.encoder.take() {
            Some(encoder) => {
                self.graphics.queue.submit(std::iter::once(encoder.finish()));
                true
            }
            None => false,
        }
    }

    /// Number of pushed render targets.
    pub fn target_depth(&self) -> usize {
        self.targets.len()
    }
}

impl RenderContext for DeviceRenderContext {
    fn device(&self) -> &dyn GraphicsDevice {
        self.graphics.as_ref()
    }

    fn output_config(&self) -> OutputConfig {
        self.output
    }

    fn push_render_target(&mut self, target: TargetHandle) {
        self.targets.push(target);
    }

    fn pop_render_target(&mut self) -> Option<TargetHandle> {
        let popped = self.targets.pop();
        if popped.is_none() {
            tracing::warn!("pop_render_target called on an empty target stack");
        }
        popped
    }

    fn current_render_target(&self) -> Option<&TargetHandle> {
        self.targets.last()
    }
}

impl Drop for DeviceRenderContext {
    fn drop(&mut self) {
        if self.encoder.is_some() {
            self.finish_frame();
        }
    }
}
