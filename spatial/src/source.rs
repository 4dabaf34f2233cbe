use scene_core::{Pose, SourceId};

/// How a source takes part in attenuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Fixed-gain bed attached at startup, never attenuated
    Ambient,
    /// Placed at a world position, attenuated on every listener update
    Anchored,
}

/// A sound source in the scene.
///
/// Only the gain changes after creation, and only through the scene's
/// attenuation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundSource {
    id: SourceId,
    pose: Pose,
    gain: f64,
    asset: String,
    kind: SourceKind,
}

impl SoundSource {
    pub(crate) fn new(pose: Pose, asset: String, gain: f64, kind: SourceKind) -> Self {
        Self {
            id: SourceId::new(),
            pose,
            gain,
            asset,
            kind,
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Linear amplitude multiplier
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Identifier of the sound asset this source plays
    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub(crate) fn set_gain(&mut self, gain: f64) {
        self.gain = gain;
    }
}
