use std::sync::Arc;

use prism_test_utils::{DeviceError, GpuTexture, GraphicsDevice};

use crate::error::GraphicsError;

/// A shared wgpu device and queue.
///
/// # Ownership Pattern
///
/// ```rust,no_run
/// use prism_render::GraphicsContext;
///
/// let ctx = GraphicsContext::new_owned_sync().expect("no GPU"); // Arc<Self>
/// let ctx2 = ctx.clone(); // Cheap clone (Arc)
/// ```
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

/// Options for creating a [`GraphicsContext`].
#[derive(Debug, Clone)]
pub struct GraphicsContextDescriptor {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    /// Use a software adapter (useful for headless CI).
    pub force_fallback_adapter: bool,
    pub limits: wgpu::Limits,
    pub label: Option<&'static str>,
}

impl Default for GraphicsContextDescriptor {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            limits: wgpu::Limits::default(),
            label: None,
        }
    }
}

impl GraphicsContext {
    /// Creates a new graphics context asynchronously.
    pub async fn new_owned() -> Result<Arc<Self>, GraphicsError> {
        Self::new_owned_with_descriptor(GraphicsContextDescriptor::default()).await
    }

    /// Creates a new graphics context, blocking the current thread.
    pub fn new_owned_sync() -> Result<Arc<Self>, GraphicsError> {
        pollster::block_on(Self::new_owned())
    }

    /// Creates a new graphics context with a custom descriptor.
    pub async fn new_owned_with_descriptor(
        descriptor: GraphicsContextDescriptor,
    ) -> Result<Arc<Self>, GraphicsError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: descriptor.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: descriptor.power_preference,
                compatible_surface: None,
                force_fallback_adapter: descriptor.force_fallback_adapter,
            })
            .await
            .map_err(|e| GraphicsError::NoAdapter(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: descriptor.label,
                required_features: wgpu::Features::empty(),
                required_limits: descriptor.limits.clone(),
                ..Default::default()
            })
            .await
            .map_err(|e| GraphicsError::DeviceRequest(e.to_string()))?;

        tracing::info!("Created graphics context on {}", adapter.get_info().name);

        Ok(Arc::new(Self {
            instance,
            adapter,
            device,
            queue,
        }))
    }

    /// Get device info
    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Get device limits
    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    /// Check if `format` can be rendered to and sampled, as intermediate targets require.
    pub fn supports_render_target_format(&self, format: wgpu::TextureFormat) -> bool {
        let capabilities = self.adapter.get_texture_format_features(format);
        capabilities.allowed_usages.contains(
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }
}

impl GraphicsDevice for GraphicsContext {
    fn create_texture(&self, desc: &wgpu::TextureDescriptor) -> Result<GpuTexture, DeviceError> {
        // Scopes pop in reverse order: validation first, then out-of-memory.
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let texture = self.device.create_texture(desc);

        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());
        let label = desc.label.unwrap_or("unlabelled").to_string();

        if out_of_memory.is_some() {
            texture.destroy();
            return Err(DeviceError::OutOfMemory { label });
        }
        if let Some(error) = validation {
            texture.destroy();
            return Err(DeviceError::Validation {
                label,
                message: error.to_string(),
            });
        }

        Ok(GpuTexture::from_wgpu(texture))
    }

    fn destroy_texture(&self, texture: &GpuTexture) {
        if let Some(texture) = texture.wgpu() {
            texture.destroy();
        }
    }
}
