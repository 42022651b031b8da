use crate::device_context::DeviceRenderContext;
use crate::error::PassError;
use crate::frame::Frame;
use crate::pass::RenderPass;
use crate::render_context::RenderContext;

/// Clears the active render target before the scene is drawn.
///
/// Clears color, and depth/stencil when the target has a depth attachment.
#[derive(Debug, Clone)]
pub struct ClearPass {
    color: wgpu::Color,
    depth: f32,
    stencil: u32,
}

impl ClearPass {
    pub fn new(color: wgpu::Color) -> Self {
        Self {
            color,
            depth: 1.0,
            stencil: 0,
        }
    }

    /// Set the depth clear value (1.0 by default).
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_stencil(mut self, stencil: u32) -> Self {
        self.stencil = stencil;
        self
    }
}

impl Default for ClearPass {
    fn default() -> Self {
        Self::new(wgpu::Color::BLACK)
    }
}

impl RenderPass<DeviceRenderContext> for ClearPass {
    fn name(&self) -> &str {
        "clear"
    }

    fn begin_render_pass(&self, frame: &mut Frame<'_, DeviceRenderContext>) -> Result<(), PassError> {
        let context = frame.context_mut();
        let target = context
            .current_render_target()
            .cloned()
            .ok_or("no render target is active")?;
        let color_view = target
            .color_view()
            .ok_or("active render target has no color view")?;
        let depth_format = target.config().depth_stencil_format;

        let depth_stencil_attachment =
            target
                .depth_view()
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: depth_format.filter(|f| f.has_depth_aspect()).map(|_| {
                        wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.depth),
                            store: wgpu::StoreOp::Store,
                        }
                    }),
                    stencil_ops: depth_format.filter(|f| f.has_stencil_aspect()).map(|_| {
                        wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.stencil),
                            store: wgpu::StoreOp::Store,
                        }
                    }),
                });

        let encoder = context
            .encoder()
            .ok_or("no frame is recording, call begin_frame first")?;

        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        Ok(())
    }

    fn end_render_pass(&self, _frame: &mut Frame<'_, DeviceRenderContext>) -> Result<(), PassError> {
        Ok(())
    }
}
