use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rigid transform in the shared world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` with no rotation.
    pub fn from_translation(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Build a pose from a column-major 4x4 transform, as delivered by AR
    /// trackers. Translation is read from column 3; any scale is discarded.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (_scale, orientation, position) = matrix.to_scale_rotation_translation();
        Self::new(position, orientation)
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    /// Apply `other` after `self`, i.e. `other * self` in matrix terms.
    pub fn transformed_by(&self, other: &Pose) -> Pose {
        Pose {
            position: other.orientation * self.position + other.position,
            orientation: (other.orientation * self.orientation).normalize(),
        }
    }

    pub fn distance_to(&self, other: &Pose) -> f32 {
        self.position.distance(other.position)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
