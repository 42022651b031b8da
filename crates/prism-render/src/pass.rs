//! The render pass contract.

use std::sync::Arc;

use crate::error::PassError;
use crate::frame::Frame;
use crate::render_context::RenderContext;

/// Category of a render pass. Decides which pipeline collection it joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PassKind {
    /// Draws every entity of the scene plus the scene's below/above hooks.
    #[default]
    Standard,
    /// Operates on the rendered image as a whole. Always ordered after all
    /// standard passes.
    PostProcessing,
}

/// One stage of a frame.
///
/// The pipeline drives each standard pass through
/// `begin_render_pass` → draw → `end_render_pass`. Passes find their
/// neighbours in the realized execution order through the frame:
/// [`Frame::previous_pass`] during begin and [`Frame::next_pass`] during end.
/// The next pass is resolved when asked, so a pass that appends work in its
/// own `end_render_pass` sees that work as its successor.
///
/// A pass does not need to restore device state in `end_render_pass`; the
/// next pass configures everything it relies on.
///
/// Hooks take `&self`. Per-frame GPU state lives behind interior mutability.
pub trait RenderPass<C: RenderContext>: Send + Sync {
    /// Name used in logs, profiling scopes and errors.
    fn name(&self) -> &str;

    /// Fixed for the lifetime of the pass.
    fn kind(&self) -> PassKind {
        PassKind::Standard
    }

    fn is_post_processing_pass(&self) -> bool {
        self.kind() == PassKind::PostProcessing
    }

    /// Configure the context for this pass (shaders, blend/depth state, targets).
    fn begin_render_pass(&self, frame: &mut Frame<'_, C>) -> Result<(), PassError>;

    /// Finish the pass, e.g. resolve a target for the next pass to sample.
    fn end_render_pass(&self, frame: &mut Frame<'_, C>) -> Result<(), PassError>;
}

/// Passes are shared by reference counting; identity is pointer identity.
pub type SharedRenderPass<C> = Arc<dyn RenderPass<C>>;

/// Check whether two handles refer to the same pass.
pub fn same_pass<C: RenderContext>(a: &SharedRenderPass<C>, b: &SharedRenderPass<C>) -> bool {
    Arc::ptr_eq(a, b)
}
