use spatial::MixerDefinition;

/// Whether a sampler stops at the end of its asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    OneShot,
    Looping,
}

/// Output level calibration for a sampler
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationMode {
    /// Level in dB relative to the asset's own loudness
    RelativeSpl { level_db: f32 },
}

impl Default for CalibrationMode {
    fn default() -> Self {
        CalibrationMode::RelativeSpl { level_db: 0.0 }
    }
}

/// Plays one sound asset through a spatial mixer
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerNodeDefinition {
    sound_asset: String,
    mixer: MixerDefinition,
    playback_mode: PlaybackMode,
    calibration: CalibrationMode,
}

impl SamplerNodeDefinition {
    pub fn new(sound_asset: impl Into<String>, mixer: MixerDefinition) -> Self {
        Self {
            sound_asset: sound_asset.into(),
            mixer,
            playback_mode: PlaybackMode::OneShot,
            calibration: CalibrationMode::default(),
        }
    }

    pub fn with_playback_mode(mut self, playback_mode: PlaybackMode) -> Self {
        self.playback_mode = playback_mode;
        self
    }

    pub fn with_calibration(mut self, calibration: CalibrationMode) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn sound_asset(&self) -> &str {
        &self.sound_asset
    }

    pub fn mixer(&self) -> &MixerDefinition {
        &self.mixer
    }

    pub fn playback_mode(&self) -> PlaybackMode {
        self.playback_mode
    }

    pub fn calibration(&self) -> CalibrationMode {
        self.calibration
    }
}

/// A registered sound event: a named sampler graph
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEventAsset {
    identifier: String,
    root: SamplerNodeDefinition,
}

impl SoundEventAsset {
    pub(crate) fn new(identifier: String, root: SamplerNodeDefinition) -> Self {
        Self { identifier, root }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn root(&self) -> &SamplerNodeDefinition {
        &self.root
    }
}
