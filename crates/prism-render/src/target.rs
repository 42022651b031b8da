//! Intermediate render targets owned by the pipeline.
//!
//! A [`RenderTarget`] is an off-screen color texture with an optional
//! depth/stencil attachment, sized and formatted after an [`OutputConfig`].
//! [`IntermediateTargets`] keeps the primary and secondary targets in step
//! with the output: each slot is either empty or matches the output exactly.

use std::sync::atomic::{AtomicU64, Ordering};

use prism_core::profiling::profile_function;
use prism_test_utils::{GpuTexture, GraphicsDevice};

use crate::error::PipelineError;
use crate::output::OutputConfig;

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one allocation of a render target.
///
/// Every (re)allocation gets a new id, so an unchanged id across frames
/// means the target was reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(u64);

impl TargetId {
    fn next() -> Self {
        Self(NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// An offscreen render target with an optional depth/stencil attachment.
///
/// Textures are only destroyed through [`release`](Self::release). Dropping a
/// target leaves that to the backend, and a mock device keeps counting them.
#[derive(Debug)]
pub struct RenderTarget {
    id: TargetId,
    label: String,
    config: OutputConfig,
    color_texture: GpuTexture,
    color_view: Option<wgpu::TextureView>,
    depth_texture: Option<GpuTexture>,
    depth_view: Option<wgpu::TextureView>,
}

impl RenderTarget {
    /// Allocate a target matching `config`.
    ///
    /// If the depth attachment fails, the already allocated color texture is
    /// destroyed before the error is returned.
    pub fn allocate(
        device: &dyn GraphicsDevice,
        config: OutputConfig,
        label: &str,
    ) -> Result<Self, PipelineError> {
        let color_label = format!("{} Color", label);
        let color_texture = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some(&color_label),
                size: config.extent(),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: config.color_format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            })
            .map_err(|source| PipelineError::TargetAllocation {
                label: label.to_string(),
                source,
            })?;

        let depth_texture = match config.depth_stencil_format {
            Some(format) => {
                let depth_label = format!("{} Depth", label);
                let result = device.create_texture(&wgpu::TextureDescriptor {
                    label: Some(&depth_label),
                    size: config.extent(),
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                        | wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                });

                match result {
                    Ok(texture) => Some(texture),
                    Err(source) => {
                        device.destroy_texture(&color_texture);
                        return Err(PipelineError::TargetAllocation {
                            label: label.to_string(),
                            source,
                        });
                    }
                }
            }
            None => None,
        };

        let color_view = color_texture.create_view();
        let depth_view = depth_texture.as_ref().and_then(GpuTexture::create_view);

        Ok(Self {
            id: TargetId::next(),
            label: label.to_string(),
            config,
            color_texture,
            color_view,
            depth_texture,
            depth_view,
        })
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The output configuration this target was allocated for.
    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.config.color_format
    }

    pub fn depth_stencil_format(&self) -> Option<wgpu::TextureFormat> {
        self.config.depth_stencil_format
    }

    pub fn color_texture(&self) -> &GpuTexture {
        &self.color_texture
    }

    pub fn depth_texture(&self) -> Option<&GpuTexture> {
        self.depth_texture.as_ref()
    }

    /// Check whether width, height, color format and depth/stencil format
    /// all equal the given output.
    pub fn matches(&self, config: &OutputConfig) -> bool {
        self.config == *config
    }

    /// A non-owning handle for binding this target on a render context.
    pub fn handle(&self) -> TargetHandle {
        TargetHandle {
            id: self.id,
            config: self.config,
            color_view: self.color_view.clone(),
            depth_view: self.depth_view.clone(),
        }
    }

    /// Release the GPU memory of this target.
    pub fn release(self, device: &dyn GraphicsDevice) {
        device.destroy_texture(&self.color_texture);
        if let Some(depth) = &self.depth_texture {
            device.destroy_texture(depth);
        }
    }
}

/// What a render context binds as the active draw destination.
///
/// Handles do not own the target; the pipeline may replace the target on a
/// later frame, at which point old handles refer to released textures.
#[derive(Debug, Clone)]
pub struct TargetHandle {
    id: TargetId,
    config: OutputConfig,
    color_view: Option<wgpu::TextureView>,
    depth_view: Option<wgpu::TextureView>,
}

impl TargetHandle {
    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Color view to render into. `None` on mock devices.
    pub fn color_view(&self) -> Option<&wgpu::TextureView> {
        self.color_view.as_ref()
    }

    /// Depth/stencil view, if the target has a depth attachment on a real device.
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth_view.as_ref()
    }
}

/// The two intermediate targets of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSlot {
    Primary,
    Secondary,
}

impl TargetSlot {
    pub fn name(&self) -> &'static str {
        match self {
            TargetSlot::Primary => "Primary",
            TargetSlot::Secondary => "Secondary",
        }
    }
}

/// Handles to freshly provisioned targets.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub primary: TargetHandle,
    pub secondary: TargetHandle,
    /// `true` if at least one target was (re)allocated.
    pub reallocated: bool,
}

/// Primary and secondary intermediate targets, lazily provisioned.
#[derive(Debug)]
pub struct IntermediateTargets {
    label_prefix: &'static str,
    primary: Option<RenderTarget>,
    secondary: Option<RenderTarget>,
}

impl IntermediateTargets {
    pub fn new(label_prefix: &'static str) -> Self {
        Self {
            label_prefix,
            primary: None,
            secondary: None,
        }
    }

    pub fn get(&self, slot: TargetSlot) -> Option<&RenderTarget> {
        match slot {
            TargetSlot::Primary => self.primary.as_ref(),
            TargetSlot::Secondary => self.secondary.as_ref(),
        }
    }

    pub fn primary(&self) -> Option<&RenderTarget> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&RenderTarget> {
        self.secondary.as_ref()
    }

    /// Make both targets match `config`, replacing any that are stale.
    pub fn provision(
        &mut self,
        device: &dyn GraphicsDevice,
        config: &OutputConfig,
    ) -> Result<Provisioned, PipelineError> {
        profile_function!();

        if config.is_empty() {
            return Err(PipelineError::EmptyOutput {
                width: config.width,
                height: config.height,
            });
        }

        let primary_label = format!("{} {}", self.label_prefix, TargetSlot::Primary.name());
        let (primary, primary_reallocated) =
            update_target(&mut self.primary, device, config, &primary_label)?;

        let secondary_label = format!("{} {}", self.label_prefix, TargetSlot::Secondary.name());
        let (secondary, secondary_reallocated) =
            update_target(&mut self.secondary, device, config, &secondary_label)?;

        Ok(Provisioned {
            primary,
            secondary,
            reallocated: primary_reallocated || secondary_reallocated,
        })
    }

    /// Release both targets, leaving the slots empty.
    pub fn release(&mut self, device: &dyn GraphicsDevice) {
        for target in [self.primary.take(), self.secondary.take()]
            .into_iter()
            .flatten()
        {
            target.release(device);
        }
    }
}

fn update_target(
    target: &mut Option<RenderTarget>,
    device: &dyn GraphicsDevice,
    config: &OutputConfig,
    label: &str,
) -> Result<(TargetHandle, bool), PipelineError> {
    if let Some(current) = target.as_ref().filter(|t| t.matches(config)) {
        return Ok((current.handle(), false));
    }

    if let Some(stale) = target.take() {
        tracing::debug!(
            "Render target '{}' is out of date ({:?} -> {:?}), reallocating",
            stale.label(),
            stale.config(),
            config
        );
        stale.release(device);
    }

    let fresh = target.insert(RenderTarget::allocate(device, *config, label)?);
    tracing::debug!(
        "Allocated render target '{}' {}x{} {:?}",
        fresh.label(),
        fresh.width(),
        fresh.height(),
        fresh.color_format()
    );

    Ok((fresh.handle(), true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_test_utils::{DeviceCall, MockGraphicsDevice};
    use std::sync::atomic::AtomicUsize;

    fn output(width: u32, height: u32) -> OutputConfig {
        OutputConfig::new(width, height, wgpu::TextureFormat::Rgba8UnormSrgb)
            .with_depth_stencil(wgpu::TextureFormat::Depth24PlusStencil8)
    }

    #[test]
    fn test_allocate_creates_color_and_depth() {
        let device = MockGraphicsDevice::new();
        let target = RenderTarget::allocate(&device, output(64, 32), "Test").unwrap();

        assert_eq!(device.count_texture_creates(), 2);
        assert_eq!(target.width(), 64);
        assert_eq!(target.height(), 32);
        assert!(target.depth_texture().is_some());
        assert!(target.matches(&output(64, 32)));
        assert!(!target.matches(&output(64, 33)));
    }

    #[test]
    fn test_allocate_without_depth() {
        let device = MockGraphicsDevice::new();
        let config = OutputConfig::new(16, 16, wgpu::TextureFormat::Bgra8Unorm);
        let target = RenderTarget::allocate(&device, config, "Test").unwrap();

        assert_eq!(device.count_texture_creates(), 1);
        assert!(target.depth_texture().is_none());
        assert!(target.handle().depth_view().is_none());
    }

    /// Lets the first texture through and fails the second one.
    struct FailDepth<'a> {
        inner: &'a MockGraphicsDevice,
        creates: AtomicUsize,
    }

    impl GraphicsDevice for FailDepth<'_> {
        fn create_texture(
            &self,
            desc: &wgpu::TextureDescriptor,
        ) -> Result<GpuTexture, prism_test_utils::DeviceError> {
            if self.creates.fetch_add(1, Ordering::Relaxed) == 1 {
                self.inner.fail_texture_creates(1);
            }
            self.inner.create_texture(desc)
        }

        fn destroy_texture(&self, texture: &GpuTexture) {
            self.inner.destroy_texture(texture)
        }
    }

    #[test]
    fn test_depth_failure_releases_color() {
        let device = MockGraphicsDevice::new();
        let failing = FailDepth {
            inner: &device,
            creates: AtomicUsize::new(0),
        };

        let err = RenderTarget::allocate(&failing, output(8, 8), "Broken").unwrap_err();

        assert!(matches!(err, PipelineError::TargetAllocation { ref label, .. } if label == "Broken"));
        assert_eq!(device.count_texture_creates(), 1);
        assert_eq!(device.count_texture_destroys(), 1);
        assert_eq!(device.live_texture_count(), 0);
    }

    #[test]
    fn test_provision_reuses_matching_targets() {
        let device = MockGraphicsDevice::new();
        let mut targets = IntermediateTargets::new("Intermediate");

        assert!(targets.provision(&device, &output(100, 100)).unwrap().reallocated);
        let primary = targets.primary().unwrap().id();
        let secondary = targets.secondary().unwrap().id();
        assert_ne!(primary, secondary);

        let again = targets.provision(&device, &output(100, 100)).unwrap();
        assert!(!again.reallocated);
        assert_eq!(again.primary.id(), primary);
        assert_eq!(targets.primary().unwrap().id(), primary);
        assert_eq!(targets.secondary().unwrap().id(), secondary);
        assert_eq!(device.count_texture_creates(), 4);
        assert_eq!(device.count_texture_destroys(), 0);
    }

    #[test]
    fn test_provision_replaces_stale_targets() {
        let device = MockGraphicsDevice::new();
        let mut targets = IntermediateTargets::new("Intermediate");
        targets.provision(&device, &output(100, 100)).unwrap();
        let old = targets.primary().unwrap().id();

        let resized = output(200, 100);
        assert!(targets.provision(&device, &resized).unwrap().reallocated);
        assert_ne!(targets.primary().unwrap().id(), old);
        assert!(targets.primary().unwrap().matches(&resized));
        assert_eq!(device.count_texture_destroys(), 4);
        assert_eq!(device.live_texture_count(), 4);
    }

    #[test]
    fn test_provision_destroys_before_allocating() {
        let device = MockGraphicsDevice::new();
        let mut targets = IntermediateTargets::new("Intermediate");
        targets
            .provision(&device, &OutputConfig::new(10, 10, wgpu::TextureFormat::Rgba8Unorm))
            .unwrap();
        device.clear_calls();

        targets
            .provision(&device, &OutputConfig::new(10, 10, wgpu::TextureFormat::Bgra8Unorm))
            .unwrap();

        let calls = device.calls();
        assert!(matches!(calls[0], DeviceCall::DestroyTexture { .. }));
        assert!(matches!(calls[1], DeviceCall::CreateTexture { .. }));
    }

    #[test]
    fn test_provision_rejects_empty_output() {
        let device = MockGraphicsDevice::new();
        let mut targets = IntermediateTargets::new("Intermediate");
        let err = targets.provision(&device, &output(0, 720)).unwrap_err();

        assert!(matches!(err, PipelineError::EmptyOutput { width: 0, height: 720 }));
        assert_eq!(device.count_texture_creates(), 0);
    }

    #[test]
    fn test_release_empties_slots() {
        let device = MockGraphicsDevice::new();
        let mut targets = IntermediateTargets::new("Intermediate");
        targets.provision(&device, &output(4, 4)).unwrap();

        targets.release(&device);
        assert!(targets.get(TargetSlot::Primary).is_none());
        assert!(targets.get(TargetSlot::Secondary).is_none());
        assert_eq!(device.live_texture_count(), 0);
    }
}
