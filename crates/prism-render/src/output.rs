//! Presentation output configuration.

/// The shape of the presentation surface: what every intermediate target must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    pub color_format: wgpu::TextureFormat,
    /// `None` when the output has no depth/stencil buffer.
    pub depth_stencil_format: Option<wgpu::TextureFormat>,
}

impl OutputConfig {
    pub fn new(width: u32, height: u32, color_format: wgpu::TextureFormat) -> Self {
        Self {
            width,
            height,
            color_format,
            depth_stencil_format: None,
        }
    }

    /// Set the depth/stencil format.
    pub fn with_depth_stencil(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_stencil_format = Some(format);
        self
    }

    /// Build from a configured window surface.
    pub fn from_surface_config(
        config: &wgpu::SurfaceConfiguration,
        depth_stencil_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        Self {
            width: config.width,
            height: config.height,
            color_format: config.format,
            depth_stencil_format,
        }
    }

    /// Get the output size as (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    /// Check if either dimension is zero (e.g. a minimized window).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_depth_stencil() {
        let config = OutputConfig::new(800, 600, wgpu::TextureFormat::Bgra8UnormSrgb)
            .with_depth_stencil(wgpu::TextureFormat::Depth24PlusStencil8);
        assert_eq!(config.size(), (800, 600));
        assert_eq!(
            config.depth_stencil_format,
            Some(wgpu::TextureFormat::Depth24PlusStencil8)
        );
        assert_eq!(config.extent().depth_or_array_layers, 1);
    }

    #[test]
    fn test_is_empty() {
        assert!(OutputConfig::new(0, 600, wgpu::TextureFormat::Rgba8Unorm).is_empty());
        assert!(OutputConfig::new(800, 0, wgpu::TextureFormat::Rgba8Unorm).is_empty());
        assert!(!OutputConfig::new(1, 1, wgpu::TextureFormat::Rgba8Unorm).is_empty());
    }
}
