//! Render pipeline: pass scheduling and per-frame execution.
//!
//! The pipeline provides:
//! - Persistent standard and post-processing pass lists, run in registration order
//! - Transient passes appended while a frame renders, drained until none remain
//! - Intermediate render targets kept in step with the output configuration
//!
//! # Example
//!
//! ```ignore
//! use prism_render::*;
//!
//! let mut pipeline = RenderPipeline::new();
//!
//! pipeline.add_render_pass(Arc::new(ClearPass::new(wgpu::Color::BLACK)));
//! pipeline.add_render_pass(Arc::new(MirrorPass::new()));
//!
//! // Once per frame
//! let stats = pipeline.render(&scene, &mut context)?;
//! ```

use std::sync::Arc;

use prism_core::profiling::{profile_function, profile_scope};
use prism_test_utils::GraphicsDevice;

use crate::error::PipelineError;
use crate::frame::{Frame, FrameStats};
use crate::pass::{PassKind, SharedRenderPass};
use crate::render_context::RenderContext;
use crate::scene::Scene;
use crate::target::{IntermediateTargets, RenderTarget};

/// Default number of transient drain iterations allowed per frame.
pub const MAX_APPEND_ITERATIONS: usize = 100;

/// Pipeline tunables.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// How many times per frame the transient standard queue may be drained
    /// before the frame fails with [`PipelineError::ExpansionLimitExceeded`].
    pub max_append_iterations: usize,
    /// Debug label prefix of the intermediate targets.
    pub target_label: &'static str,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_append_iterations: MAX_APPEND_ITERATIONS,
            target_label: "Intermediate",
        }
    }
}

/// Passes appended for the current frame only.
pub(crate) struct TransientPasses<C: RenderContext> {
    pub(crate) standard: Vec<SharedRenderPass<C>>,
    pub(crate) post_processing: Vec<SharedRenderPass<C>>,
}

impl<C: RenderContext> TransientPasses<C> {
    fn new() -> Self {
        Self {
            standard: Vec::new(),
            post_processing: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, pass: SharedRenderPass<C>) -> SharedRenderPass<C> {
        match pass.kind() {
            PassKind::Standard => self.standard.push(Arc::clone(&pass)),
            PassKind::PostProcessing => self.post_processing.push(Arc::clone(&pass)),
        }
        pass
    }

    fn len(&self) -> usize {
        self.standard.len() + self.post_processing.len()
    }
}

/// The pass that follows `batch[index]` in the realized execution order.
///
/// Fallback order: the rest of the executing batch, then pending transient
/// standard passes, then persistent post-processing passes, then pending
/// transient post-processing passes.
pub(crate) fn next_in_sequence<'a, C: RenderContext>(
    batch: &'a [SharedRenderPass<C>],
    index: usize,
    transient: &'a TransientPasses<C>,
    post_processing: &'a [SharedRenderPass<C>],
) -> Option<&'a SharedRenderPass<C>> {
    batch
        .get(index + 1)
        .or_else(|| transient.standard.first())
        .or_else(|| post_processing.first())
        .or_else(|| transient.post_processing.first())
}

/// Orders render passes and drives them once per frame.
///
/// Standard passes draw the whole scene into the primary intermediate target.
/// Post-processing passes are accepted and ordered after all standard work,
/// and take part in [`Frame::next_pass`] lookahead, but are not executed yet:
/// there is no way to hand them the previous pass's output.
///
/// Dropping the pipeline does not go through the device. Call
/// [`release_targets`](Self::release_targets) to tear the intermediate
/// targets down explicitly.
pub struct RenderPipeline<C: RenderContext> {
    config: PipelineConfig,
    standard: Vec<SharedRenderPass<C>>,
    post_processing: Vec<SharedRenderPass<C>>,
    transient: TransientPasses<C>,
    targets: IntermediateTargets,
    frame_index: u64,
}

impl<C: RenderContext> RenderPipeline<C> {
    /// Create a new pipeline with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        let targets = IntermediateTargets::new(config.target_label);
        Self {
            config,
            standard: Vec::new(),
            post_processing: Vec::new(),
            transient: TransientPasses::new(),
            targets,
            frame_index: 0,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Register a pass for every frame.
    ///
    /// Standard and post-processing passes each run in registration order.
    /// Registering a pass that is already registered does nothing.
    pub fn add_render_pass(&mut self, pass: SharedRenderPass<C>) -> SharedRenderPass<C> {
        let passes = self.persistent_mut(pass.kind());
        if passes.iter().any(|p| Arc::ptr_eq(p, &pass)) {
            tracing::warn!("Render pass '{}' is already registered", pass.name());
            return pass;
        }

        tracing::debug!("Added {:?} render pass '{}'", pass.kind(), pass.name());
        passes.push(Arc::clone(&pass));
        pass
    }

    /// Unregister a pass added with [`add_render_pass`](Self::add_render_pass).
    ///
    /// Returns `false` if the pass was not registered. Appended passes are
    /// never affected.
    pub fn remove_render_pass(&mut self, pass: &SharedRenderPass<C>) -> bool {
        let passes = self.persistent_mut(pass.kind());
        match passes.iter().position(|p| Arc::ptr_eq(p, pass)) {
            Some(position) => {
                passes.remove(position);
                tracing::debug!("Removed render pass '{}'", pass.name());
                true
            }
            None => {
                tracing::trace!("Render pass '{}' is not registered", pass.name());
                false
            }
        }
    }

    /// Queue a pass for a single frame.
    ///
    /// Outside of [`render`](Self::render) the pass runs during the next frame.
    /// Passes and entities append during a frame through
    /// [`Frame::append_render_pass`].
    pub fn append_render_pass(&mut self, pass: SharedRenderPass<C>) -> SharedRenderPass<C> {
        self.transient.push(pass)
    }

    /// Render one frame of `scene` through `context`.
    ///
    /// The primary intermediate target is pushed on the context for the whole
    /// of standard-pass execution and popped again before returning, whether
    /// or not the frame succeeds.
    pub fn render(
        &mut self,
        scene: &dyn Scene<C>,
        context: &mut C,
    ) -> Result<FrameStats, PipelineError> {
        profile_function!();

        let frame_index = self.frame_index;
        self.frame_index += 1;

        let output = context.output_config();
        let provisioned = self
            .targets
            .provision(context.device(), &output)
            .inspect_err(|e| tracing::error!("Frame {} aborted: {}", frame_index, e))?;

        let standard = self.standard.clone();
        let post_processing = self.post_processing.clone();

        context.push_render_target(provisioned.primary);

        let stats = FrameStats {
            frame_index,
            targets_reallocated: provisioned.reallocated,
            ..Default::default()
        };
        let mut frame = Frame::new(context, &mut self.transient, &post_processing, stats);
        let result = drive_frame(
            &mut frame,
            scene,
            standard,
            self.config.max_append_iterations,
        );
        let mut stats = frame.into_stats();

        context.pop_render_target();

        stats.post_processing_skipped = post_processing.len() + self.transient.post_processing.len();
        if stats.post_processing_skipped > 0 {
            tracing::trace!(
                "Skipping {} post-processing passes; post-processing execution is not implemented",
                stats.post_processing_skipped
            );
        }
        self.transient.post_processing.clear();

        if let Err(e) = result {
            self.transient.standard.clear();
            tracing::error!("Frame {} aborted: {}", frame_index, e);
            return Err(e);
        }

        tracing::debug!(
            frame = frame_index,
            passes = stats.passes_executed,
            transient = stats.transient_passes_executed,
            iterations = stats.expansion_iterations,
            "Rendered frame"
        );

        Ok(stats)
    }

    /// Registered standard passes, in execution order.
    pub fn standard_passes(&self) -> &[SharedRenderPass<C>] {
        &self.standard
    }

    /// Registered post-processing passes, in registration order.
    pub fn post_processing_passes(&self) -> &[SharedRenderPass<C>] {
        &self.post_processing
    }

    /// Number of appended passes waiting for the next frame.
    pub fn pending_pass_count(&self) -> usize {
        self.transient.len()
    }

    pub fn primary_target(&self) -> Option<&RenderTarget> {
        self.targets.primary()
    }

    pub fn secondary_target(&self) -> Option<&RenderTarget> {
        self.targets.secondary()
    }

    /// Index the next rendered frame will have.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Release the intermediate targets. They are reallocated on the next frame.
    pub fn release_targets(&mut self, device: &dyn GraphicsDevice) {
        self.targets.release(device);
    }

    fn persistent_mut(&mut self, kind: PassKind) -> &mut Vec<SharedRenderPass<C>> {
        match kind {
            PassKind::Standard => &mut self.standard,
            PassKind::PostProcessing => &mut self.post_processing,
        }
    }
}

impl<C: RenderContext> Default for RenderPipeline<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the persistent standard passes, then drain appended standard passes
/// until none remain or `limit` drains have run.
fn drive_frame<C: RenderContext>(
    frame: &mut Frame<'_, C>,
    scene: &dyn Scene<C>,
    standard: Vec<SharedRenderPass<C>>,
    limit: usize,
) -> Result<(), PipelineError> {
    frame.run_batch(standard, scene)?;

    let mut iterations = 0;
    while frame.has_pending_standard() {
        if iterations == limit {
            return Err(PipelineError::ExpansionLimitExceeded { limit });
        }
        iterations += 1;
        profile_scope!("transient_drain");

        let batch = frame.take_pending_standard();
        let stats = frame.stats_mut();
        stats.transient_passes_executed += batch.len();
        stats.expansion_iterations = iterations;

        frame.run_batch(batch, scene)?;
    }

    Ok(())
}
