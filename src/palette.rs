//! The bone pose table read by the skinning evaluator.
//!
//! A [`SkinPalette`] holds one matrix per joint: the joint's current-frame
//! world transform multiplied by its inverse bind matrix, the classic
//! "matrix palette" of palette skinning. The host animation system rebuilds
//! or updates the palette once per frame; the evaluator only ever reads it.
//!
//! # Update/evaluate phases
//!
//! Skinning requires the palette to be stable while vertices are in flight.
//! That phase separation falls out of the borrow checker here: every update
//! method takes `&mut SkinPalette`, every evaluation borrows `&SkinPalette`,
//! so an overlapping update does not compile.
//!
//! ```
//! use armature::{Mat4, SkinPalette, SkinnedVertex, SkinBatch};
//!
//! let mut palette = SkinPalette::identity(2);
//!
//! // Update phase: the animation system poses the joints.
//! palette.set(1, Mat4::from_translation(armature::Vec3::new(0.0, 2.0, 0.0)));
//!
//! // Evaluate phase: the palette is now read-only.
//! let vertices = [SkinnedVertex::rigid([0.0; 3], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0, 1.0], 1)];
//! let skinned = SkinBatch::new(&vertices, &palette).run().unwrap();
//! assert_eq!(skinned[0].position, [0.0, 2.0, 0.0]);
//! ```

use glam::Mat4;

/// Errors that can occur when building a palette.
#[derive(Debug)]
pub enum PaletteError {
    /// `from_pose` was given joint world transforms and inverse bind
    /// matrices of different lengths.
    PoseLengthMismatch {
        /// Number of joint world transforms supplied.
        world: usize,
        /// Number of inverse bind matrices supplied.
        inverse_bind: usize,
    },
}

impl std::fmt::Display for PaletteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteError::PoseLengthMismatch {
                world,
                inverse_bind,
            } => write!(
                f,
                "joint pose table mismatch: {} world transforms vs {} inverse bind matrices",
                world, inverse_bind
            ),
        }
    }
}

impl std::error::Error for PaletteError {}

/// The matrix palette: one bone pose matrix per joint.
///
/// Each entry maps bind-pose object space to current-pose object space for
/// one joint. Vertices index into the palette through their
/// [`joints`](crate::SkinnedVertex::joints) lanes, optionally shifted by a
/// batch-wide joint offset so several instances can share a concatenated
/// palette.
///
/// # Example
///
/// ```
/// use armature::{Mat4, SkinPalette};
///
/// // Two joints, posed directly from matrices
/// let palette = SkinPalette::from_matrices(vec![
///     Mat4::IDENTITY,
///     Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2),
/// ]);
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct SkinPalette {
    matrices: Vec<Mat4>,
}

impl SkinPalette {
    /// Creates a palette of `joint_count` identity poses.
    ///
    /// An identity palette leaves every vertex exactly where it was bound,
    /// which makes it a useful rest-pose default.
    pub fn identity(joint_count: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; joint_count],
        }
    }

    /// Creates a palette from precomputed bone pose matrices.
    pub fn from_matrices(matrices: Vec<Mat4>) -> Self {
        Self { matrices }
    }

    /// Builds the palette from per-joint world transforms and inverse bind
    /// matrices, computing `world[i] * inverse_bind[i]` for each joint.
    ///
    /// This is the usual hand-off point from a scene graph: the animation
    /// system owns world transforms, the skin asset owns inverse binds.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::PoseLengthMismatch`] when the two slices have
    /// different lengths.
    ///
    /// # Example
    ///
    /// ```
    /// use armature::{Mat4, SkinPalette, Vec3};
    ///
    /// let world = [Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))];
    /// let inverse_bind = [Mat4::IDENTITY];
    /// let palette = SkinPalette::from_pose(&world, &inverse_bind).unwrap();
    /// assert_eq!(palette.len(), 1);
    /// ```
    pub fn from_pose(world: &[Mat4], inverse_bind: &[Mat4]) -> Result<Self, PaletteError> {
        if world.len() != inverse_bind.len() {
            return Err(PaletteError::PoseLengthMismatch {
                world: world.len(),
                inverse_bind: inverse_bind.len(),
            });
        }

        let matrices = world
            .iter()
            .zip(inverse_bind)
            .map(|(world, inverse_bind)| *world * *inverse_bind)
            .collect();

        Ok(Self { matrices })
    }

    /// Returns the number of joints in the palette.
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Returns `true` if the palette holds no joints.
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Returns the bone pose matrices as a slice.
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Replaces the pose of one joint. Update phase only.
    ///
    /// # Panics
    ///
    /// Panics if `joint` is out of range; palette sizing is a rig-load-time
    /// decision, not per-frame input.
    pub fn set(&mut self, joint: usize, matrix: Mat4) {
        self.matrices[joint] = matrix;
    }

    /// Recomputes every pose from new world transforms, resizing the
    /// palette to the new tables' joint count. Update phase only.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::PoseLengthMismatch`] when the slice lengths
    /// differ from each other (the palette is resized to match them when
    /// they agree).
    pub fn repose(&mut self, world: &[Mat4], inverse_bind: &[Mat4]) -> Result<(), PaletteError> {
        if world.len() != inverse_bind.len() {
            return Err(PaletteError::PoseLengthMismatch {
                world: world.len(),
                inverse_bind: inverse_bind.len(),
            });
        }

        self.matrices.clear();
        self.matrices.extend(
            world
                .iter()
                .zip(inverse_bind)
                .map(|(world, inverse_bind)| *world * *inverse_bind),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn from_pose_multiplies_world_by_inverse_bind() {
        // Joint bound 1 unit up, now posed 3 units up: net translation +2.
        let bind = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let world = Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0));

        let palette = SkinPalette::from_pose(&[world], &[bind.inverse()]).unwrap();
        let moved = palette.matrices()[0].transform_point3(Vec3::new(0.0, 1.0, 0.0));
        assert!((moved - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn from_pose_rejects_mismatched_tables() {
        let err = SkinPalette::from_pose(&[Mat4::IDENTITY; 3], &[Mat4::IDENTITY; 2]).unwrap_err();
        match err {
            PaletteError::PoseLengthMismatch {
                world,
                inverse_bind,
            } => {
                assert_eq!(world, 3);
                assert_eq!(inverse_bind, 2);
            }
        }
    }

    #[test]
    fn repose_replaces_all_joints() {
        let mut palette = SkinPalette::identity(1);
        assert_eq!(palette.len(), 1);

        let world = [Mat4::from_translation(Vec3::X), Mat4::from_translation(Vec3::Y)];
        palette.repose(&world, &[Mat4::IDENTITY; 2]).unwrap();

        // The palette grows to the new tables' joint count.
        assert_eq!(palette.len(), 2);
        assert!(
            (palette.matrices()[1].transform_point3(Vec3::ZERO) - Vec3::Y).length() < 1e-6
        );
    }
}
