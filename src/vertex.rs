//! The skinned vertex format shared by the CPU and GPU paths.
//!
//! [`SkinnedVertex`] carries everything linear blend skinning needs for one
//! vertex: an object-space position, normal, and tangent, plus four joint
//! indices and four blend weights. The same struct is used for input and
//! output — skinning transforms position/normal/tangent and carries the
//! joint/weight lanes through unchanged, so a skinned buffer has the exact
//! layout of its source buffer.
//!
//! # Vertex Layout
//!
//! The struct uses the following GPU layout (72 bytes per vertex):
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//! | tangent   | Float32x4 | 24     | 2               |
//! | joints    | Uint32x4  | 40     | 3               |
//! | weights   | Float32x4 | 56     | 4               |
//!
//! This layout is exposed via [`SkinnedVertex::LAYOUT`] for pipelines that
//! read skinned output as a vertex buffer, and it matches the storage-buffer
//! struct emitted by [`SkinKernel`](crate::SkinKernel) byte for byte.

/// A vertex with skinning attributes: position, normal, tangent, and four
/// weighted joint references.
///
/// The struct is `#[repr(C)]` with a predictable 72-byte layout and derives
/// [`bytemuck::Pod`] and [`bytemuck::Zeroable`] for safe casting to byte
/// slices on GPU upload.
///
/// # Weight conventions
///
/// - Weights should sum to 1, but un-normalized weights are tolerated: the
///   evaluator renormalizes when the sum strays beyond
///   [`WEIGHT_SUM_TOLERANCE`](crate::WEIGHT_SUM_TOLERANCE).
/// - A lane with weight `0.0` contributes nothing, and its joint index is
///   allowed to be garbage — rig exporters commonly leave arbitrary values
///   in padded lanes.
/// - All four weights at `0.0` marks the vertex as rigidly unskinned: the
///   evaluator passes it through untouched.
///
/// # Example
///
/// ```
/// use armature::SkinnedVertex;
///
/// // A vertex influenced half by joint 0 and half by joint 2
/// let vertex = SkinnedVertex::new(
///     [0.0, 1.0, 0.0],       // position
///     [0.0, 1.0, 0.0],       // normal
///     [1.0, 0.0, 0.0, 1.0],  // tangent (w = handedness)
///     [0, 2, 0, 0],          // joint indices
///     [0.5, 0.5, 0.0, 0.0],  // blend weights
/// );
/// assert_eq!(vertex.weight_sum(), 1.0);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinnedVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space surface normal.
    pub normal: [f32; 3],
    /// Object-space tangent; `w` holds the bitangent handedness (±1) and is
    /// never transformed.
    pub tangent: [f32; 4],
    /// Indices into the bone pose table, one per influence lane.
    pub joints: [u32; 4],
    /// Blend weight per influence lane.
    pub weights: [f32; 4],
}

impl SkinnedVertex {
    /// The wgpu vertex buffer layout descriptor for this vertex type.
    ///
    /// Use this when a render pipeline consumes skinned output directly as
    /// a vertex buffer:
    ///
    /// ```ignore
    /// let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
    ///     vertex: wgpu::VertexState {
    ///         module: &shader,
    ///         entry_point: Some("vs_main"),
    ///         buffers: &[SkinnedVertex::LAYOUT],
    ///         ..Default::default()
    ///     },
    ///     // ...
    /// });
    /// ```
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SkinnedVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // tangent
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
            // joints
            wgpu::VertexAttribute {
                offset: 40,
                shader_location: 3,
                format: wgpu::VertexFormat::Uint32x4,
            },
            // weights
            wgpu::VertexAttribute {
                offset: 56,
                shader_location: 4,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    /// Creates a vertex with the given attributes and influence lanes.
    pub fn new(
        position: [f32; 3],
        normal: [f32; 3],
        tangent: [f32; 4],
        joints: [u32; 4],
        weights: [f32; 4],
    ) -> Self {
        Self {
            position,
            normal,
            tangent,
            joints,
            weights,
        }
    }

    /// Creates a vertex rigidly bound to a single joint (weight 1.0).
    ///
    /// # Example
    ///
    /// ```
    /// use armature::SkinnedVertex;
    ///
    /// let vertex = SkinnedVertex::rigid([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0, 1.0], 3);
    /// assert_eq!(vertex.joints[0], 3);
    /// assert_eq!(vertex.weights, [1.0, 0.0, 0.0, 0.0]);
    /// ```
    pub fn rigid(position: [f32; 3], normal: [f32; 3], tangent: [f32; 4], joint: u32) -> Self {
        Self::new(position, normal, tangent, [joint, 0, 0, 0], [1.0, 0.0, 0.0, 0.0])
    }

    /// Creates a vertex with no joint influences at all.
    ///
    /// The evaluator passes such vertices through untouched, which is handy
    /// for mixing rigid geometry into a skinned buffer.
    pub fn unweighted(position: [f32; 3], normal: [f32; 3], tangent: [f32; 4]) -> Self {
        Self::new(position, normal, tangent, [0; 4], [0.0; 4])
    }

    /// Returns the sum of the four blend weights.
    pub fn weight_sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_declared_offsets() {
        // The WGSL struct emitted by SkinKernel assumes this exact packing.
        assert_eq!(std::mem::size_of::<SkinnedVertex>(), 72);
        assert_eq!(SkinnedVertex::LAYOUT.array_stride, 72);

        let offsets: Vec<u64> = SkinnedVertex::LAYOUT
            .attributes
            .iter()
            .map(|a| a.offset)
            .collect();
        assert_eq!(offsets, vec![0, 12, 24, 40, 56]);
    }

    #[test]
    fn weight_sum_adds_all_lanes() {
        let vertex = SkinnedVertex::new(
            [0.0; 3],
            [0.0; 3],
            [0.0; 4],
            [0, 1, 2, 3],
            [0.1, 0.2, 0.3, 0.4],
        );
        assert!((vertex.weight_sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rigid_binds_one_lane() {
        let vertex = SkinnedVertex::rigid([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0, -1.0], 7);
        assert_eq!(vertex.joints, [7, 0, 0, 0]);
        assert_eq!(vertex.weight_sum(), 1.0);
    }
}
