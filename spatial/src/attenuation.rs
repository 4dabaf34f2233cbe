use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What to do when a source sits exactly on the listener.
///
/// The inverse-square law has no answer at zero distance. `PassThrough`
/// keeps the raw arithmetic and yields `+inf`; `Clamp` floors every
/// distance at `min_distance` before squaring; `Reject` refuses the update.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CoincidentPolicy {
    #[default]
    PassThrough,
    Clamp {
        min_distance: f32,
    },
    Reject,
}

/// Inverse-square distance falloff: `gain = 1 / distance²`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InverseSquare {
    policy: CoincidentPolicy,
}

impl InverseSquare {
    pub fn new(policy: CoincidentPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CoincidentPolicy {
        self.policy
    }

    /// Gain for a source `distance` world units from the listener.
    ///
    /// Returns `None` only under [`CoincidentPolicy::Reject`] at zero distance.
    pub fn gain_at(&self, distance: f32) -> Option<f64> {
        let distance = match self.policy {
            // NaN compares false and is kept as NaN
            CoincidentPolicy::Clamp { min_distance } if distance < min_distance => min_distance,
            CoincidentPolicy::Reject if distance == 0.0 => return None,
            _ => distance,
        };
        Some(f64::from(1.0 / distance.powi(2)))
    }

    pub fn gain_between(&self, source: Vec3, listener: Vec3) -> Option<f64> {
        self.gain_at(source.distance(listener))
    }
}
