//! Core GPU context and device management.
//!
//! This module provides [`GpuContext`], the struct that holds the wgpu device
//! and queue used by GPU skinning. Skinning is compute-only, so the context is
//! headless: no window, no surface, no swapchain. Engines that already own a
//! wgpu device can wrap it with [`GpuContext::from_raw`] instead.
//!
//! # Example
//!
//! ```no_run
//! use armature::GpuContext;
//!
//! let gpu = GpuContext::new();
//!
//! // Access device for creating resources
//! let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
//!     label: Some("My Buffer"),
//!     size: 1024,
//!     usage: wgpu::BufferUsages::UNIFORM,
//!     mapped_at_creation: false,
//! });
//!
//! // Submit work via the queue
//! gpu.queue.write_buffer(&buffer, 0, &[0u8; 1024]);
//! ```

/// GPU context holding the wgpu resources compute skinning needs.
///
/// Both fields are public to allow direct access to wgpu APIs when needed.
/// The context is typically created once at startup and passed by reference
/// to every dispatch.
pub struct GpuContext {
    /// The logical GPU device for creating resources and pipelines.
    pub device: wgpu::Device,
    /// The command queue for submitting work to the GPU.
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Create a new headless GPU context.
    ///
    /// This performs all wgpu initialization:
    /// 1. Creates a wgpu instance with primary backends (Vulkan, Metal, DX12)
    /// 2. Requests a suitable GPU adapter, no surface required
    /// 3. Creates the logical device and command queue
    ///
    /// # Panics
    ///
    /// Panics if no suitable GPU adapter is found or device creation fails.
    pub fn new() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .expect("Failed to find a suitable GPU adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Armature Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: Default::default(),
            experimental_features: Default::default(),
        }))
        .expect("Failed to create device");

        Self { device, queue }
    }

    /// Wrap a device and queue the host engine already owns.
    ///
    /// Skinning then shares the engine's GPU and submission timeline instead
    /// of bringing up a second device.
    pub fn from_raw(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }
}

impl Default for GpuContext {
    fn default() -> Self {
        Self::new()
    }
}
