//! Scene and entity contracts consumed by standard passes.

use std::sync::Arc;

use crate::frame::Frame;
use crate::render_context::RenderContext;

/// A renderable entity, drawn once per standard pass.
pub trait Entity<C: RenderContext> {
    fn render(&self, scene: &dyn Scene<C>, frame: &mut Frame<'_, C>);
}

pub type SharedEntity<C> = Arc<dyn Entity<C>>;

/// The world a frame renders.
///
/// For every standard pass the pipeline calls [`render_below`](Scene::render_below),
/// then each entity in [`entities`](Scene::entities) order, then
/// [`render_above`](Scene::render_above).
pub trait Scene<C: RenderContext> {
    /// Entities to draw. Must stay the same for the duration of a frame.
    fn entities(&self) -> &[SharedEntity<C>];

    /// Background and world geometry drawn before the entities.
    fn render_below(&self, _frame: &mut Frame<'_, C>) {}

    /// Overlays drawn after the entities.
    fn render_above(&self, _frame: &mut Frame<'_, C>) {}
}
