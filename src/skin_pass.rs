//! GPU compute skinning.
//!
//! This module provides [`SkinPass`], a compute pass that runs the generated
//! WGSL skinning kernel over a vertex buffer and reads the deformed vertices
//! back. It exists for two jobs:
//!
//! - Skinning heavy meshes where the CPU evaluator becomes the frame budget
//! - Checking that the emitted kernel and the CPU evaluator agree, since both
//!   implement the same weight policy
//!
//! The pass validates joint references on the CPU before anything is
//! uploaded, so a bad batch is rejected with the same [`SkinError`] the CPU
//! path returns and the GPU never sees it.
//!
//! # Example
//!
//! ```no_run
//! use armature::{GpuContext, Mat4, SkinPass, SkinPalette, SkinnedVertex};
//!
//! let gpu = GpuContext::new();
//! let pass = SkinPass::new(&gpu);
//!
//! let palette = SkinPalette::identity(2);
//! let vertices = vec![
//!     SkinnedVertex::rigid([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0, 1.0], 1),
//! ];
//!
//! let skinned = pass.skin(&gpu, &vertices, &palette, 0).unwrap();
//! assert_eq!(skinned.len(), vertices.len());
//! ```

use wgpu::util::DeviceExt;

use crate::gpu::GpuContext;
use crate::palette::SkinPalette;
use crate::shader::{ShaderDialect, SkinKernel};
use crate::skinning::{SkinBatch, SkinError};
use crate::vertex::SkinnedVertex;

/// Per-dispatch parameters, bound at `@group(0) @binding(3)`.
///
/// Matches the WGSL `SkinParams` struct; the tail padding keeps the uniform
/// buffer at a 16-byte size.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SkinParams {
    /// Number of vertices to skin; extra invocations in the last workgroup
    /// bail out against this.
    vertex_count: u32,
    /// Added to every joint index before the palette lookup.
    joint_offset: u32,
    /// Padding for 16-byte alignment.
    _pad: [u32; 2],
}

/// A compute pass that skins vertex buffers on the GPU.
///
/// The pipeline is built once from the full-precision WGSL kernel emitted by
/// [`SkinKernel`]; each [`skin`](Self::skin) call uploads its inputs, runs
/// one invocation per vertex, and maps the results back. Create one pass and
/// reuse it across dispatches.
pub struct SkinPass {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl SkinPass {
    /// Create the skinning pipeline on the given context.
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let source = SkinKernel::new(ShaderDialect::Wgsl).source();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skin Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Skin Bind Group Layout"),
            entries: &[
                // Palette matrices
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Input vertices
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Output vertices
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Dispatch parameters
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Skin Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Skin Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some(SkinKernel::ENTRY_POINT),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
        }
    }

    /// Skin a vertex buffer on the GPU and read the results back.
    ///
    /// Semantics match [`SkinBatch::run`] with the same `joint_offset`: the
    /// kernel applies the same renormalization tolerance, zero-sum
    /// passthrough, and lane skipping, so the two paths agree to within
    /// normal float scheduling noise.
    ///
    /// This call blocks until the GPU finishes. For engine integration where
    /// results stay on-device, build your own dispatch from
    /// [`SkinKernel::source`] instead of round-tripping through here.
    ///
    /// # Errors
    ///
    /// Exactly the validation errors of the CPU path; nothing is uploaded
    /// when validation fails.
    ///
    /// # Panics
    ///
    /// Panics if the device is lost or the readback mapping fails.
    pub fn skin(
        &self,
        gpu: &GpuContext,
        vertices: &[SkinnedVertex],
        palette: &SkinPalette,
        joint_offset: u32,
    ) -> Result<Vec<SkinnedVertex>, SkinError> {
        SkinBatch::new(vertices, palette)
            .joint_offset(joint_offset)
            .validate()?;

        if vertices.is_empty() {
            return Ok(Vec::new());
        }
        if palette.is_empty() {
            // Validation passed, so every lane is unweighted: pure
            // passthrough, and no zero-size buffer to bind.
            return Ok(vertices.to_vec());
        }

        let device = &gpu.device;
        let output_size = std::mem::size_of_val(vertices) as u64;

        // glam matrices are not Pod; ship them as plain column arrays.
        let matrix_data: Vec<[[f32; 4]; 4]> = palette
            .matrices()
            .iter()
            .map(|m| m.to_cols_array_2d())
            .collect();

        let matrix_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skin Matrices"),
            contents: bytemuck::cast_slice(&matrix_data),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let input_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skin Input Vertices"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Skin Output Vertices"),
            size: output_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let params = SkinParams {
            vertex_count: vertices.len() as u32,
            joint_offset,
            _pad: [0; 2],
        };
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skin Params"),
            contents: bytemuck::cast_slice(&[params]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Skin Staging"),
            size: output_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skin Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: matrix_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: input_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: output_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Skin Encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Skin Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let workgroups = (vertices.len() as u32).div_ceil(SkinKernel::WORKGROUP_SIZE);
            pass.dispatch_workgroups(workgroups, 1, 1);
        }
        encoder.copy_buffer_to_buffer(&output_buffer, 0, &staging_buffer, 0, output_size);
        gpu.queue.submit(Some(encoder.finish()));

        let slice = staging_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).unwrap();
        });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .expect("Failed to poll device");
        receiver
            .recv()
            .expect("Readback channel closed")
            .expect("Failed to map staging buffer");

        let skinned = {
            let data = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, SkinnedVertex>(&data).to_vec()
        };
        staging_buffer.unmap();

        Ok(skinned)
    }
}
