//! Headless Frame - Render a few frames offscreen
//!
//! Registers a clear pass and a mirror pass that appends a second clear pass
//! every frame, then prints the frame statistics.
//!
//! Run with:
//!   cargo run -p prism-render --example headless_frame
//!
//! With `RUST_LOG=trace` every begin/end hook is logged with its neighbours.

use std::sync::Arc;

use prism_core::profiling::{new_frame, profile_scope};
use prism_core::{Config, ProfilingMode};
use prism_render::passes::ClearPass;
use prism_render::{
    DeviceRenderContext, Frame, GraphicsContext, OutputConfig, PassError, RenderPass,
    RenderPipeline, Scene, SharedEntity, SharedRenderPass, wgpu,
};

/// Requests an extra pass for the reflected view.
struct MirrorPass {
    reflection: SharedRenderPass<DeviceRenderContext>,
}

impl RenderPass<DeviceRenderContext> for MirrorPass {
    fn name(&self) -> &str {
        "mirror"
    }

    fn begin_render_pass(&self, _frame: &mut Frame<'_, DeviceRenderContext>) -> Result<(), PassError> {
        Ok(())
    }

    fn end_render_pass(&self, frame: &mut Frame<'_, DeviceRenderContext>) -> Result<(), PassError> {
        frame.append_render_pass(Arc::clone(&self.reflection));
        Ok(())
    }
}

struct EmptyScene;

impl Scene<DeviceRenderContext> for EmptyScene {
    fn entities(&self) -> &[SharedEntity<DeviceRenderContext>] {
        &[]
    }
}

fn main() {
    Config {
        log_filter: None,
        profiling: ProfilingMode::On,
    }
    .init();

    let graphics = GraphicsContext::new_owned_sync().expect("Failed to create graphics context");
    tracing::info!("Using adapter: {:?}", graphics.info());

    let output = OutputConfig::new(640, 480, wgpu::TextureFormat::Rgba8UnormSrgb)
        .with_depth_stencil(wgpu::TextureFormat::Depth32Float);
    let mut context = DeviceRenderContext::new(graphics, output);

    let mut pipeline = RenderPipeline::<DeviceRenderContext>::new();
    pipeline.add_render_pass(Arc::new(ClearPass::new(wgpu::Color::BLACK)));
    pipeline.add_render_pass(Arc::new(MirrorPass {
        reflection: Arc::new(ClearPass::new(wgpu::Color::BLUE).with_depth(0.0)),
    }));

    for frame in 0..3 {
        new_frame();
        profile_scope!("frame");

        if frame == 2 {
            context.resize(800, 600);
        }

        context.begin_frame();
        match pipeline.render(&EmptyScene, &mut context) {
            Ok(stats) => println!("{:?}", stats),
            Err(e) => eprintln!("Frame failed: {}", e),
        }
        context.finish_frame();
    }
}
