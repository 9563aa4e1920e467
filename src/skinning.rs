//! Linear blend skinning on the CPU.
//!
//! This module is the heart of the crate: it blends each vertex by up to four
//! bone pose matrices, weighted per vertex, producing the deformed position,
//! normal, and tangent. It provides:
//!
//! - [`skin_vertex`] — Skin a single vertex against a palette
//! - [`SkinBatch`] — Fluent runner for whole vertex buffers, sequentially,
//!   into a caller-owned buffer, or data-parallel across all cores
//! - [`SkinError`] — What went wrong, down to the vertex and lane
//!
//! # Quick Start
//!
//! ```
//! use armature::{Mat4, Vec3, SkinBatch, SkinPalette, SkinnedVertex};
//!
//! let palette = SkinPalette::from_matrices(vec![
//!     Mat4::IDENTITY,
//!     Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2),
//! ]);
//!
//! // One vertex split evenly between the two joints.
//! let vertices = [SkinnedVertex::new(
//!     [1.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0],
//!     [1.0, 0.0, 0.0, 1.0],
//!     [0, 1, 0, 0],
//!     [0.5, 0.5, 0.0, 0.0],
//! )];
//!
//! let skinned = SkinBatch::new(&vertices, &palette).run().unwrap();
//! let halfway = Vec3::from_array(skinned[0].position);
//! assert!((halfway - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-5);
//! ```
//!
//! # Weight policy
//!
//! Weights are treated as authoring data that may have drifted:
//!
//! - A weight sum within [`WEIGHT_SUM_TOLERANCE`] of 1.0 is used as supplied.
//! - A sum further out is renormalized by dividing every weight by the sum,
//!   so sloppy exports deform slightly off rather than exploding.
//! - A sum of exactly zero means "not skinned": the vertex passes through
//!   untouched instead of collapsing to the origin (or worse, NaN).
//!
//! Zero-weight lanes are skipped entirely, and their joint indices are never
//! validated; exporters routinely pad unused lanes with garbage.
//!
//! Blended normals and tangents are the raw weighted sums, not re-normalized
//! to unit length. Renormalize downstream if your shading needs it; keeping
//! the evaluator a pure weighted blend keeps it in lockstep with the shader
//! kernels, which emit the same sum.

use glam::{Mat4, Vec3, Vec4};
use rayon::prelude::*;

use crate::palette::SkinPalette;
use crate::vertex::SkinnedVertex;

/// How far a vertex's weight sum may drift from 1.0 before the evaluator
/// renormalizes it.
///
/// The same constant is baked into the generated shader kernels, so CPU and
/// GPU runs make the same call on every vertex.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-4;

/// Errors that can occur while skinning a vertex buffer.
#[derive(Debug, PartialEq, Eq)]
pub enum SkinError {
    /// A vertex references a joint the palette does not have.
    ///
    /// `joint` is the palette index actually looked up, i.e. the vertex's
    /// lane value plus the batch joint offset. Only lanes with a non-zero
    /// weight are ever reported.
    JointOutOfRange {
        /// Index of the offending vertex in the input buffer.
        vertex: usize,
        /// Which of the vertex's four influence lanes (0..4).
        lane: usize,
        /// The out-of-range palette index, offset already applied.
        joint: u64,
        /// Number of joints the palette actually holds.
        joint_count: usize,
    },
    /// `run_into` was handed an output buffer of the wrong length.
    OutputLengthMismatch {
        /// Length of the input vertex buffer.
        expected: usize,
        /// Length of the output buffer supplied.
        actual: usize,
    },
}

impl std::fmt::Display for SkinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkinError::JointOutOfRange {
                vertex,
                lane,
                joint,
                joint_count,
            } => write!(
                f,
                "vertex {} lane {} references joint {}, but the palette has {} joints",
                vertex, lane, joint, joint_count
            ),
            SkinError::OutputLengthMismatch { expected, actual } => write!(
                f,
                "output buffer holds {} vertices, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for SkinError {}

/// Skins a single vertex against a palette.
///
/// Validates the vertex's joint references first; a weighted lane pointing
/// past the end of the palette is a rig configuration bug and fails fast.
/// For whole buffers prefer [`SkinBatch`], which validates everything up
/// front and can fan out across cores.
///
/// # Example
///
/// ```
/// use armature::{skin_vertex, Mat4, SkinPalette, SkinnedVertex, Vec3};
///
/// let palette = SkinPalette::from_matrices(vec![
///     Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)),
/// ]);
/// let vertex = SkinnedVertex::rigid([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0, 1.0], 0);
///
/// let skinned = skin_vertex(&vertex, &palette).unwrap();
/// assert_eq!(skinned.position, [1.0, 5.0, 0.0]);
/// // Translation moves positions, never directions.
/// assert_eq!(skinned.normal, [0.0, 1.0, 0.0]);
/// ```
pub fn skin_vertex(
    vertex: &SkinnedVertex,
    palette: &SkinPalette,
) -> Result<SkinnedVertex, SkinError> {
    validate_vertex(0, vertex, palette.len(), 0)?;
    Ok(blend(vertex, palette.matrices(), 0))
}

/// Checks one vertex's weighted joint references against the palette size.
///
/// Index math runs in u64 so `joint + offset` cannot wrap for any u32 pair.
fn validate_vertex(
    index: usize,
    vertex: &SkinnedVertex,
    joint_count: usize,
    joint_offset: u32,
) -> Result<(), SkinError> {
    for lane in 0..4 {
        if vertex.weights[lane] == 0.0 {
            continue;
        }
        let joint = u64::from(vertex.joints[lane]) + u64::from(joint_offset);
        if joint >= joint_count as u64 {
            return Err(SkinError::JointOutOfRange {
                vertex: index,
                lane,
                joint,
                joint_count,
            });
        }
    }
    Ok(())
}

/// The blend itself. Callers must have validated the vertex already.
fn blend(vertex: &SkinnedVertex, matrices: &[Mat4], joint_offset: u32) -> SkinnedVertex {
    let weight_sum = vertex.weight_sum();
    if weight_sum == 0.0 {
        // Unskinned vertex: pass it through untouched.
        return *vertex;
    }

    let scale = if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        1.0 / weight_sum
    } else {
        1.0
    };

    let position = Vec3::from_array(vertex.position);
    let normal = Vec3::from_array(vertex.normal);
    let tangent = Vec4::from_array(vertex.tangent).truncate();

    let mut out_position = Vec3::ZERO;
    let mut out_normal = Vec3::ZERO;
    let mut out_tangent = Vec3::ZERO;

    for lane in 0..4 {
        let raw_weight = vertex.weights[lane];
        if raw_weight == 0.0 {
            continue;
        }
        let weight = raw_weight * scale;
        let matrix = &matrices[(u64::from(vertex.joints[lane]) + u64::from(joint_offset)) as usize];

        // Positions take the full affine transform; normals and tangents
        // only the linear part, so joint translation never bends them.
        out_position += matrix.transform_point3(position) * weight;
        out_normal += matrix.transform_vector3(normal) * weight;
        out_tangent += matrix.transform_vector3(tangent) * weight;
    }

    SkinnedVertex {
        position: out_position.to_array(),
        normal: out_normal.to_array(),
        tangent: [
            out_tangent.x,
            out_tangent.y,
            out_tangent.z,
            // Handedness rides along unchanged.
            vertex.tangent[3],
        ],
        joints: vertex.joints,
        weights: vertex.weights,
    }
}

/// Fluent runner for skinning a whole vertex buffer against one palette.
///
/// Borrowing keeps the phases honest: the batch holds shared references for
/// its whole life, so nothing can repose the palette while vertices are in
/// flight, and no vertex run can see another's output.
///
/// Every run variant validates all joint references and buffer lengths
/// before touching a single vertex, so a failed run writes nothing.
///
/// # Example
///
/// ```
/// use armature::{Mat4, SkinBatch, SkinPalette, SkinnedVertex};
///
/// let palette = SkinPalette::identity(4);
/// let vertices = vec![
///     SkinnedVertex::rigid([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0, 1.0], 2),
/// ];
///
/// let skinned = SkinBatch::new(&vertices, &palette).run().unwrap();
/// assert_eq!(skinned[0].position, vertices[0].position);
/// ```
pub struct SkinBatch<'a> {
    vertices: &'a [SkinnedVertex],
    palette: &'a SkinPalette,
    joint_offset: u32,
}

impl<'a> SkinBatch<'a> {
    /// Pairs a vertex buffer with the palette it will be skinned against.
    pub fn new(vertices: &'a [SkinnedVertex], palette: &'a SkinPalette) -> Self {
        Self {
            vertices,
            palette,
            joint_offset: 0,
        }
    }

    /// Adds `offset` to every joint index before the palette lookup.
    ///
    /// This lets many instances share one concatenated palette: each
    /// instance keeps its local joint numbering and supplies the offset of
    /// its slice.
    ///
    /// # Example
    ///
    /// ```
    /// use armature::{Mat4, SkinBatch, SkinPalette, SkinnedVertex, Vec3};
    ///
    /// // Instance B's 2 joints live at palette slots 2..4.
    /// let palette = SkinPalette::from_matrices(vec![
    ///     Mat4::IDENTITY,
    ///     Mat4::IDENTITY,
    ///     Mat4::from_translation(Vec3::X),
    ///     Mat4::from_translation(Vec3::Y),
    /// ]);
    /// let vertices = [SkinnedVertex::rigid([0.0; 3], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0, 1.0], 1)];
    ///
    /// let skinned = SkinBatch::new(&vertices, &palette)
    ///     .joint_offset(2)
    ///     .run()
    ///     .unwrap();
    /// assert_eq!(skinned[0].position, [0.0, 1.0, 0.0]);
    /// ```
    pub fn joint_offset(mut self, offset: u32) -> Self {
        self.joint_offset = offset;
        self
    }

    /// Checks every weighted joint reference against the palette without
    /// transforming anything.
    ///
    /// The run methods call this internally; it is public so GPU dispatch
    /// can reject bad batches before uploading buffers.
    pub fn validate(&self) -> Result<(), SkinError> {
        let joint_count = self.palette.len();
        for (index, vertex) in self.vertices.iter().enumerate() {
            validate_vertex(index, vertex, joint_count, self.joint_offset)?;
        }
        Ok(())
    }

    /// Skins every vertex sequentially into a fresh buffer.
    pub fn run(self) -> Result<Vec<SkinnedVertex>, SkinError> {
        self.validate()?;
        let matrices = self.palette.matrices();
        Ok(self
            .vertices
            .iter()
            .map(|vertex| blend(vertex, matrices, self.joint_offset))
            .collect())
    }

    /// Skins every vertex into a caller-owned buffer of the same length.
    ///
    /// Useful for per-frame skinning without reallocating. The buffer is
    /// untouched if validation fails.
    ///
    /// # Errors
    ///
    /// [`SkinError::OutputLengthMismatch`] if `output.len()` differs from
    /// the input length, plus everything [`SkinBatch::run`] can return.
    pub fn run_into(self, output: &mut [SkinnedVertex]) -> Result<(), SkinError> {
        if output.len() != self.vertices.len() {
            return Err(SkinError::OutputLengthMismatch {
                expected: self.vertices.len(),
                actual: output.len(),
            });
        }
        self.validate()?;
        let matrices = self.palette.matrices();
        for (out, vertex) in output.iter_mut().zip(self.vertices) {
            *out = blend(vertex, matrices, self.joint_offset);
        }
        Ok(())
    }

    /// Skins every vertex across all cores.
    ///
    /// Vertices never read each other's output, so the blend fans out
    /// cleanly. Each vertex goes through exactly the same float operations
    /// as in [`SkinBatch::run`], so the two produce identical buffers.
    pub fn run_parallel(self) -> Result<Vec<SkinnedVertex>, SkinError> {
        self.validate()?;
        let matrices = self.palette.matrices();
        Ok(self
            .vertices
            .par_iter()
            .map(|vertex| blend(vertex, matrices, self.joint_offset))
            .collect())
    }
}
