//! The rendering context a frame is drawn through.

use prism_test_utils::GraphicsDevice;

use crate::output::OutputConfig;
use crate::target::TargetHandle;

/// Device state shared by every pass of a frame.
///
/// The pipeline only needs the device for target allocation, the output
/// configuration, and a stack of render destinations. Everything else a pass
/// configures (pipelines, bind groups, blend and depth state) lives on the
/// concrete context type and is reached through
/// [`Frame::context`](crate::Frame::context).
pub trait RenderContext {
    /// Device used to allocate intermediate targets.
    fn device(&self) -> &dyn GraphicsDevice;

    /// The current presentation output. Polled once per frame.
    fn output_config(&self) -> OutputConfig;

    /// Make `target` the active draw destination.
    ///
    /// Pushes nest: a pass may push its own target and pop it again.
    fn push_render_target(&mut self, target: TargetHandle);

    /// Restore the previously active destination.
    fn pop_render_target(&mut self) -> Option<TargetHandle>;

    /// The active draw destination, or `None` for the presentation surface.
    fn current_render_target(&self) -> Option<&TargetHandle>;
}
