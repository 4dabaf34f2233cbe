use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier tying a source/listener pair to a mixer definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MixerId(Uuid);

impl MixerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MixerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MixerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Room reverb presets understood by the rendering engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReverbPreset {
    None,
    SmallRoom,
    #[default]
    MediumRoom,
    LargeRoom,
    MediumHall,
    LargeHall,
    Cathedral,
}

/// Which propagation paths the engine renders for a source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialPipeline {
    pub direct_path_transmission: bool,
    pub early_reflections: bool,
    pub late_reverb: bool,
    /// Linear send into the late-reverb bus, 0.0-1.0
    pub late_reverb_send_level: f32,
}

impl Default for SpatialPipeline {
    fn default() -> Self {
        Self {
            direct_path_transmission: true,
            early_reflections: false,
            late_reverb: true,
            late_reverb_send_level: 0.1,
        }
    }
}

impl SpatialPipeline {
    /// Send level the engine will actually apply
    pub fn effective_send_level(&self) -> f32 {
        if self.late_reverb {
            self.late_reverb_send_level.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// A spatial mixer: one pipeline, referenced by sound events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerDefinition {
    id: MixerId,
    pipeline: SpatialPipeline,
}

impl MixerDefinition {
    pub fn new(pipeline: SpatialPipeline) -> Self {
        Self {
            id: MixerId::new(),
            pipeline,
        }
    }

    pub fn id(&self) -> MixerId {
        self.id
    }

    pub fn pipeline(&self) -> &SpatialPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_matches_nature_mix() {
        let pipeline = SpatialPipeline::default();
        assert!(pipeline.direct_path_transmission);
        assert!(pipeline.late_reverb);
        assert!((pipeline.effective_send_level() - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn send_level_ignored_without_late_reverb() {
        let pipeline = SpatialPipeline {
            late_reverb: false,
            ..SpatialPipeline::default()
        };
        assert_eq!(pipeline.effective_send_level(), 0.0);
    }

    #[test]
    fn each_definition_gets_its_own_id() {
        let a = MixerDefinition::new(SpatialPipeline::default());
        let b = MixerDefinition::new(SpatialPipeline::default());
        assert_ne!(a.id(), b.id());
    }
}
