//! # Armature
//!
//! **Linear blend skinning that gets out of your way.**
//!
//! Blend vertices by bone weights on the CPU, generate the matching WGSL or
//! HLSL kernel for your renderer, or dispatch the whole thing as a wgpu
//! compute pass. Same weight policy everywhere, so your mesh lands in the
//! same place no matter which path deformed it.
//!
//! ## Quick Start
//!
//! ```
//! use armature::*;
//!
//! // Two joints: a fixed root and a bent tip.
//! let palette = SkinPalette::from_matrices(vec![
//!     Mat4::IDENTITY,
//!     Mat4::from_rotation_z(0.5),
//! ]);
//!
//! // A vertex halfway between them.
//! let vertices = vec![SkinnedVertex::new(
//!     [0.0, 2.0, 0.0],
//!     [0.0, 0.0, 1.0],
//!     [1.0, 0.0, 0.0, 1.0],
//!     [0, 1, 0, 0],
//!     [0.5, 0.5, 0.0, 0.0],
//! )];
//!
//! let skinned = SkinBatch::new(&vertices, &palette).run().unwrap();
//! assert_ne!(skinned[0].position, vertices[0].position);
//!
//! // The same deformation as shader source:
//! let wgsl = SkinKernel::new(ShaderDialect::Wgsl).source();
//! assert!(wgsl.contains("armature_linear_blend_skinning_f32"));
//! ```
//!
//! ## Philosophy
//!
//! - **One policy, three backends** — CPU evaluator, emitted shader source,
//!   and wgpu compute dispatch share every branch of the weight handling.
//! - **Fail fast on rig bugs** — An out-of-range joint rejects the whole
//!   batch before anything is written; silent clamping hides exporter bugs.
//! - **Forgive drifted weights** — Sums off by more than `1e-4` renormalize
//!   instead of scaling the mesh; all-zero weights pass through untouched.
//! - **Escape hatches everywhere** — Start with [`SkinBatch`], drop to
//!   [`SkinKernel`] source or raw wgpu when your engine needs to own the
//!   dispatch.

mod gpu;
mod palette;
mod shader;
mod skin_pass;
mod skinning;
mod vertex;

pub use gpu::GpuContext;
pub use palette::{PaletteError, SkinPalette};
pub use shader::{CodeWriter, Precision, ShaderDialect, ShaderStage, SkinKernel};
pub use skin_pass::SkinPass;
pub use skinning::{SkinBatch, SkinError, WEIGHT_SUM_TOLERANCE, skin_vertex};
pub use vertex::SkinnedVertex;

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
