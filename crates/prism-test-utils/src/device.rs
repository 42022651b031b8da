//! Trait abstracting GPU texture allocation.
//!
//! Render-target provisioning only needs to allocate and release textures,
//! so this is the whole surface a backend has to provide.

use std::fmt;

use crate::gpu_types::GpuTexture;
use wgpu::TextureDescriptor;

/// Errors reported by a [`GraphicsDevice`] when allocating resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The device ran out of memory.
    OutOfMemory {
        /// Debug label of the resource being created.
        label: String,
    },
    /// The backend rejected the descriptor.
    Validation {
        /// Debug label of the resource being created.
        label: String,
        /// Backend description of the failure.
        message: String,
    },
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::OutOfMemory { label } => {
                write!(f, "Out of GPU memory while creating '{}'", label)
            }
            DeviceError::Validation { label, message } => {
                write!(f, "Invalid descriptor for '{}': {}", label, message)
            }
        }
    }
}

impl std::error::Error for DeviceError {}

/// GPU resource creation used by render-target provisioning.
///
/// Object safe, so pipelines hold `&dyn GraphicsDevice` and tests swap in
/// `MockGraphicsDevice`.
pub trait GraphicsDevice: Send + Sync {
    /// Create a texture. Allocation failures are reported, not deferred.
    fn create_texture(&self, desc: &TextureDescriptor) -> Result<GpuTexture, DeviceError>;

    /// Release a texture's GPU memory immediately.
    ///
    /// The handle must not be used for rendering afterwards.
    fn destroy_texture(&self, texture: &GpuTexture);
}
