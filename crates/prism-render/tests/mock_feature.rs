//! Mock device reached through `prism-render` itself.
//!
//! Run with: cargo test -p prism-render --features mock --test mock_feature

#![cfg(feature = "mock")]

use prism_render::{DeviceCall, IntermediateTargets, MockGraphicsDevice, OutputConfig, wgpu};

#[test]
fn test_mock_device_provisions_through_reexport() {
    let device = MockGraphicsDevice::new();
    let mut targets = IntermediateTargets::new("Mock");
    let output = OutputConfig::new(8, 8, wgpu::TextureFormat::Rgba8Unorm);

    let provisioned = targets.provision(&device, &output).unwrap();

    assert!(provisioned.reallocated);
    assert!(provisioned.primary.color_view().is_none());
    assert!(matches!(device.calls()[0], DeviceCall::CreateTexture { width: 8, height: 8, .. }));
}
