//! Mock implementation of GraphicsDevice for testing.
//!
//! Records every allocation and release without touching a GPU.

use crate::{
    device::{DeviceError, GraphicsDevice},
    gpu_types::GpuTexture,
};
use parking_lot::Mutex;
use wgpu::*;

/// Records a device call for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    CreateTexture {
        id: usize,
        label: Option<String>,
        width: u32,
        height: u32,
        format: TextureFormat,
    },
    /// A create request that was rejected by an injected failure.
    FailedCreateTexture {
        label: Option<String>,
    },
    DestroyTexture {
        id: usize,
    },
}

/// Mock textures stored in the device.
#[derive(Debug, Clone)]
struct MockTexture {
    id: usize,
    live: bool,
}

/// Mock implementation of [`GraphicsDevice`] for testing.
///
/// Methods take `&self`, so recorded state sits behind `parking_lot::Mutex`
/// (the trait requires `Send + Sync`).
///
/// # Example
///
/// ```rust
/// use prism_test_utils::{GraphicsDevice, MockGraphicsDevice};
/// use wgpu::*;
///
/// let mock = MockGraphicsDevice::new();
/// mock.fail_texture_creates(1);
///
/// let desc = TextureDescriptor {
///     label: None,
///     size: Extent3d { width: 4, height: 4, depth_or_array_layers: 1 },
///     mip_level_count: 1,
///     sample_count: 1,
///     dimension: TextureDimension::D2,
///     format: TextureFormat::Rgba8Unorm,
///     usage: TextureUsages::RENDER_ATTACHMENT,
///     view_formats: &[],
/// };
///
/// assert!(mock.create_texture(&desc).is_err());
/// assert!(mock.create_texture(&desc).is_ok());
/// ```
pub struct MockGraphicsDevice {
    /// Recorded calls for verification
    calls: Mutex<Vec<DeviceCall>>,

    textures: Mutex<Vec<MockTexture>>,

    /// Number of upcoming texture creates that fail with `OutOfMemory`
    pending_failures: Mutex<usize>,
}

impl MockGraphicsDevice {
    /// Create a new mock device.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            textures: Mutex::new(Vec::new()),
            pending_failures: Mutex::new(0),
        }
    }

    /// Make the next `count` texture creates fail with [`DeviceError::OutOfMemory`].
    pub fn fail_texture_creates(&self, count: usize) {
        *self.pending_failures.lock() = count;
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().clone()
    }

    /// Count successful texture creates.
    pub fn count_texture_creates(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, DeviceCall::CreateTexture { .. }))
            .count()
    }

    /// Count texture destroys.
    pub fn count_texture_destroys(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, DeviceCall::DestroyTexture { .. }))
            .count()
    }

    /// Number of textures created and not yet destroyed.
    pub fn live_texture_count(&self) -> usize {
        self.textures.lock().iter().filter(|t| t.live).count()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&self, desc: &TextureDescriptor) -> Result<GpuTexture, DeviceError> {
        let label = desc.label.map(|s| s.to_string());

        {
            let mut failures = self.pending_failures.lock();
            if *failures > 0 {
                *failures -= 1;
                self.calls
                    .lock()
                    .push(DeviceCall::FailedCreateTexture { label: label.clone() });
                return Err(DeviceError::OutOfMemory {
                    label: label.unwrap_or_default(),
                });
            }
        }

        let mut textures = self.textures.lock();
        let id = textures.len();
        textures.push(MockTexture { id, live: true });

        self.calls.lock().push(DeviceCall::CreateTexture {
            id,
            label,
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
        });

        Ok(GpuTexture::mock(
            id,
            desc.size.width,
            desc.size.height,
            desc.format,
        ))
    }

    fn destroy_texture(&self, texture: &GpuTexture) {
        let Some(id) = texture.mock_id() else {
            return;
        };

        if let Some(entry) = self.textures.lock().iter_mut().find(|t| t.id == id) {
            entry.live = false;
        }
        self.calls.lock().push(DeviceCall::DestroyTexture { id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(label: &'static str) -> TextureDescriptor<'static> {
        TextureDescriptor {
            label: Some(label),
            size: Extent3d {
                width: 320,
                height: 240,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Bgra8UnormSrgb,
            usage: TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        }
    }

    #[test]
    fn test_create_texture_records_call() {
        let mock = MockGraphicsDevice::new();
        let texture = mock.create_texture(&descriptor("color")).unwrap();

        assert!(texture.is_mock());
        assert_eq!(texture.width(), 320);
        assert_eq!(texture.height(), 240);
        assert_eq!(texture.format(), TextureFormat::Bgra8UnormSrgb);
        assert_eq!(
            mock.calls(),
            vec![DeviceCall::CreateTexture {
                id: 0,
                label: Some("color".to_string()),
                width: 320,
                height: 240,
                format: TextureFormat::Bgra8UnormSrgb,
            }]
        );
    }

    #[test]
    fn test_destroy_texture_tracks_liveness() {
        let mock = MockGraphicsDevice::new();
        let first = mock.create_texture(&descriptor("a")).unwrap();
        let _second = mock.create_texture(&descriptor("b")).unwrap();
        assert_eq!(mock.live_texture_count(), 2);

        mock.destroy_texture(&first);
        assert_eq!(mock.live_texture_count(), 1);
        assert_eq!(mock.count_texture_destroys(), 1);
    }

    #[test]
    fn test_injected_failures_are_consumed() {
        let mock = MockGraphicsDevice::new();
        mock.fail_texture_creates(2);

        let err = mock.create_texture(&descriptor("color")).unwrap_err();
        assert_eq!(
            err,
            DeviceError::OutOfMemory {
                label: "color".to_string()
            }
        );
        assert!(mock.create_texture(&descriptor("color")).is_err());
        assert!(mock.create_texture(&descriptor("color")).is_ok());
        assert_eq!(mock.count_texture_creates(), 1);
        assert_eq!(mock.live_texture_count(), 1);
    }

    #[test]
    fn test_device_trait_object() {
        fn allocate(device: &dyn GraphicsDevice) -> GpuTexture {
            device.create_texture(&descriptor("dyn")).unwrap()
        }

        let mock = MockGraphicsDevice::new();
        let texture = allocate(&mock);
        assert_eq!(texture.mock_id(), Some(0));
    }

    #[test]
    fn test_error_display() {
        let err = DeviceError::Validation {
            label: "depth".to_string(),
            message: "bad format".to_string(),
        };
        let text = format!("{}", err);
        assert!(text.contains("depth"));
        assert!(text.contains("bad format"));
    }
}
