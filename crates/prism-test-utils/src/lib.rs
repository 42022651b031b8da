//! Test utilities for the Prism renderer.
//!
//! This crate provides the seam between render-target provisioning and the GPU:
//!
//! - [`GraphicsDevice`] - Trait abstracting texture allocation and release
//! - [`GpuTexture`] - Texture wrapper that can be real or mock
//! - `MockGraphicsDevice` - Recording implementation for tests (requires `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use prism_test_utils::{GraphicsDevice, MockGraphicsDevice};
//! use wgpu::*;
//!
//! let mock = MockGraphicsDevice::new();
//!
//! let texture = mock
//!     .create_texture(&TextureDescriptor {
//!         label: Some("color"),
//!         size: Extent3d { width: 64, height: 64, depth_or_array_layers: 1 },
//!         mip_level_count: 1,
//!         sample_count: 1,
//!         dimension: TextureDimension::D2,
//!         format: TextureFormat::Rgba8Unorm,
//!         usage: TextureUsages::RENDER_ATTACHMENT,
//!         view_formats: &[],
//!     })
//!     .unwrap();
//!
//! assert_eq!(mock.count_texture_creates(), 1);
//! assert!(texture.is_mock());
//! # }
//! ```

pub mod device;
pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_device;

pub use device::*;
pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_device::*;
