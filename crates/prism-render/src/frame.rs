//! Per-frame execution state handed to passes, entities and scene hooks.

use std::sync::Arc;

use prism_core::profiling::profile_scope;

use crate::error::{PassStage, PipelineError};
use crate::pass::SharedRenderPass;
use crate::pipeline::{TransientPasses, next_in_sequence};
use crate::render_context::RenderContext;
use crate::scene::Scene;

/// Statistics for a rendered frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame_index: u64,
    /// Standard passes that ran, persistent and transient.
    pub passes_executed: usize,
    pub transient_passes_executed: usize,
    /// Number of transient drain iterations.
    pub expansion_iterations: usize,
    /// Entity draw calls across all passes.
    pub entity_draws: usize,
    pub targets_reallocated: bool,
    /// Post-processing passes that were registered or appended but not executed.
    pub post_processing_skipped: usize,
}

/// A frame in flight.
///
/// Gives passes access to the rendering context, to their neighbours in the
/// execution order, and to [`append_render_pass`](Frame::append_render_pass)
/// for requesting more rendering in the same frame.
pub struct Frame<'a, C: RenderContext> {
    context: &'a mut C,
    transient: &'a mut TransientPasses<C>,
    post_processing: &'a [SharedRenderPass<C>],
    batch: Vec<SharedRenderPass<C>>,
    index: usize,
    previous: Option<SharedRenderPass<C>>,
    stats: FrameStats,
}

impl<'a, C: RenderContext> Frame<'a, C> {
    pub(crate) fn new(
        context: &'a mut C,
        transient: &'a mut TransientPasses<C>,
        post_processing: &'a [SharedRenderPass<C>],
        stats: FrameStats,
    ) -> Self {
        Self {
            context,
            transient,
            post_processing,
            batch: Vec::new(),
            index: 0,
            previous: None,
            stats,
        }
    }

    pub fn context(&self) -> &C {
        self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        self.context
    }

    /// Queue `pass` to run later in this frame.
    ///
    /// Standard passes run after every pass already scheduled and before any
    /// post-processing pass.
    pub fn append_render_pass(&mut self, pass: SharedRenderPass<C>) -> SharedRenderPass<C> {
        self.transient.push(pass)
    }

    /// The pass that ran immediately before the current one, or `None` for
    /// the first pass of the frame.
    pub fn previous_pass(&self) -> Option<&SharedRenderPass<C>> {
        self.previous.as_ref()
    }

    /// The pass currently executing.
    pub fn current_pass(&self) -> Option<&SharedRenderPass<C>> {
        self.batch.get(self.index)
    }

    /// The pass that will run immediately after the current one, or `None`
    /// if it is the last. Reflects passes appended up to this call.
    pub fn next_pass(&self) -> Option<&SharedRenderPass<C>> {
        next_in_sequence(&self.batch, self.index, &*self.transient, self.post_processing)
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub(crate) fn has_pending_standard(&self) -> bool {
        !self.transient.standard.is_empty()
    }

    /// Snapshot the pending standard passes and clear the queue.
    pub(crate) fn take_pending_standard(&mut self) -> Vec<SharedRenderPass<C>> {
        std::mem::take(&mut self.transient.standard)
    }

    pub(crate) fn stats_mut(&mut self) -> &mut FrameStats {
        &mut self.stats
    }

    pub(crate) fn into_stats(self) -> FrameStats {
        self.stats
    }

    /// Run every pass of `batch` through begin → draw → end.
    pub(crate) fn run_batch(
        &mut self,
        batch: Vec<SharedRenderPass<C>>,
        scene: &dyn Scene<C>,
    ) -> Result<(), PipelineError> {
        self.batch = batch;

        for index in 0..self.batch.len() {
            self.index = index;
            let pass = Arc::clone(&self.batch[index]);
            profile_scope!("render_pass", pass.name());

            tracing::trace!(
                pass = pass.name(),
                previous = ?self.previous.as_ref().map(|p| p.name().to_string()),
                "begin_render_pass"
            );
            pass.begin_render_pass(self)
                .map_err(|source| PipelineError::PassFailed {
                    pass: pass.name().to_string(),
                    stage: PassStage::Begin,
                    source,
                })?;

            self.draw(scene);

            pass.end_render_pass(self)
                .map_err(|source| PipelineError::PassFailed {
                    pass: pass.name().to_string(),
                    stage: PassStage::End,
                    source,
                })?;

            self.previous = Some(pass);
            self.stats.passes_executed += 1;
        }

        Ok(())
    }

    fn draw(&mut self, scene: &dyn Scene<C>) {
        scene.render_below(self);

        for entity in scene.entities() {
            entity.render(scene, self);
            self.stats.entity_draws += 1;
        }

        scene.render_above(self);
    }
}
