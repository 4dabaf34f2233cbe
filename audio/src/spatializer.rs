use crate::{EventId, SpatialEngine};
use audio_io::{
    AssetRegistry, CalibrationMode, NormalizationMode, PlaybackMode, SamplerNodeDefinition,
};
use log::{debug, info, warn};
use scene_core::{Error, Pose, SourceId};
use settings_manager::Settings;
use spatial::{
    CoincidentPolicy, InverseSquare, MixerDefinition, ReverbPreset, SourceKind, SpatialPipeline,
    SpatialScene,
};
use std::collections::HashMap;

/// Identifier of the looping ambient bed event
pub const AMBIENT_EVENT: &str = "nature_event";

/// Parameters fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct SpatializerConfig {
    pub ambient_asset: String,
    pub ambient_gain: f64,
    pub pipeline: SpatialPipeline,
    pub reverb_preset: ReverbPreset,
    pub calibration_db: f32,
    pub source_radius: f32,
    pub attenuation: CoincidentPolicy,
}

impl From<&Settings> for SpatializerConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            ambient_asset: settings.ambient.asset.clone(),
            ambient_gain: settings.ambient.gain,
            pipeline: settings.mixer.pipeline,
            reverb_preset: settings.mixer.reverb_preset,
            calibration_db: settings.mixer.calibration_db,
            source_radius: settings.mixer.source_radius,
            attenuation: settings.attenuation,
        }
    }
}

/// Register every recording in the asset table.
///
/// With `skip_missing`, entries whose file is absent are logged and
/// returned instead of failing the whole load.
pub fn register_configured_assets(
    registry: &mut AssetRegistry,
    settings: &Settings,
    skip_missing: bool,
) -> Result<Vec<String>, Error> {
    let mut skipped = Vec::new();
    for entry in &settings.assets {
        let path = settings.asset_path(entry);
        match registry.register_sound_asset(
            &path,
            entry.identifier.as_str(),
            entry.asset_type(),
            NormalizationMode::Dynamic,
        ) {
            Ok(_) => {}
            Err(Error::NotFound(reason)) if skip_missing => {
                warn!("Skipping asset '{}': {}", entry.identifier, reason);
                skipped.push(entry.identifier.clone());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(skipped)
}

/// Owns the rendering engine and the scene mirrored into it.
///
/// Construction runs the full startup sequence and leaves the engine
/// running with the ambient bed playing. The engine is stopped by
/// [`Spatializer::shutdown`] or when the spatializer is dropped.
pub struct Spatializer<E: SpatialEngine> {
    engine: E,
    registry: AssetRegistry,
    scene: SpatialScene,
    pipeline: SpatialPipeline,
    calibration: CalibrationMode,
    source_radius: f32,
    ambient_source: SourceId,
    /// Event identifier and handle per anchored source
    events: HashMap<SourceId, (String, EventId)>,
    next_event_index: usize,
}

impl<E: SpatialEngine> Spatializer<E> {
    pub fn new(
        mut engine: E,
        mut registry: AssetRegistry,
        config: &SpatializerConfig,
    ) -> Result<Self, Error> {
        let mut scene = SpatialScene::new(InverseSquare::new(config.attenuation));

        engine.attach_listener(scene.listener().pose())?;

        let ambient_source =
            scene.add_ambient_source(Pose::IDENTITY, config.ambient_asset.as_str(), config.ambient_gain);
        if let Some(source) = scene.source(ambient_source) {
            engine.attach_source(source, config.source_radius)?;
        }

        engine.set_default_reverb(config.reverb_preset);
        let calibration = CalibrationMode::RelativeSpl {
            level_db: config.calibration_db,
        };

        let sampler = SamplerNodeDefinition::new(
            config.ambient_asset.as_str(),
            MixerDefinition::new(config.pipeline),
        )
        .with_playback_mode(PlaybackMode::Looping)
        .with_calibration(calibration);
        registry.register_sound_event_asset(sampler, AMBIENT_EVENT)?;

        engine.start()?;

        let mut spatializer = Self {
            engine,
            registry,
            scene,
            pipeline: config.pipeline,
            calibration,
            source_radius: config.source_radius,
            ambient_source,
            events: HashMap::new(),
            next_event_index: 1,
        };
        let event_id = spatializer.start_event(AMBIENT_EVENT, ambient_source)?;
        spatializer
            .events
            .insert(ambient_source, (AMBIENT_EVENT.to_string(), event_id));

        info!(
            "Spatializer started with ambient '{}' at gain {}",
            config.ambient_asset, config.ambient_gain
        );
        Ok(spatializer)
    }

    /// Anchor a one-shot sound at `pose` and start playing it.
    ///
    /// The new source plays at unity gain until the next listener update.
    pub fn add_source(&mut self, pose: Pose, identifier: &str) -> Result<SourceId, Error> {
        if !self.registry.contains_sound_asset(identifier) {
            return Err(Error::NotFound(format!("Unknown sound asset '{}'", identifier)));
        }

        let source_id = self.scene.add_source(pose, identifier);
        if let Err(e) = self.attach_and_play(source_id, identifier) {
            self.engine.detach_source(source_id);
            self.scene.remove_source(source_id);
            return Err(e);
        }

        info!("Added source {} ({}) at {}", source_id, identifier, pose.position);
        Ok(source_id)
    }

    fn attach_and_play(&mut self, source_id: SourceId, identifier: &str) -> Result<(), Error> {
        if let Some(source) = self.scene.source(source_id) {
            self.engine.attach_source(source, self.source_radius)?;
        }

        let event_identifier = format!("{}{}", AMBIENT_EVENT, self.next_event_index);
        let sampler = SamplerNodeDefinition::new(identifier, MixerDefinition::new(self.pipeline))
            .with_playback_mode(PlaybackMode::OneShot)
            .with_calibration(self.calibration);
        self.registry
            .register_sound_event_asset(sampler, event_identifier.as_str())?;
        self.next_event_index += 1;

        let event_id = match self.start_event(&event_identifier, source_id) {
            Ok(id) => id,
            Err(e) => {
                self.registry.unregister_sound_event_asset(&event_identifier);
                return Err(e);
            }
        };
        self.events.insert(source_id, (event_identifier, event_id));
        Ok(())
    }

    fn start_event(&mut self, event_identifier: &str, source_id: SourceId) -> Result<EventId, Error> {
        let event = self
            .registry
            .event_asset(event_identifier)
            .ok_or_else(|| Error::NotFound(format!("Sound event '{}'", event_identifier)))?;
        let asset = self
            .registry
            .sound_asset(event.root().sound_asset())
            .ok_or_else(|| Error::NotFound(format!("Sound asset '{}'", event.root().sound_asset())))?;
        self.engine.start_event(event, asset, source_id)
    }

    /// Detach an anchored source and stop its sound
    pub fn remove_source(&mut self, source_id: SourceId) -> Result<(), Error> {
        match self.scene.source(source_id).map(|s| s.kind()) {
            None => return Err(Error::NotFound(format!("Source {}", source_id))),
            Some(SourceKind::Ambient) => {
                return Err(Error::InvalidState(
                    "The ambient source cannot be removed".to_string(),
                ))
            }
            Some(SourceKind::Anchored) => {}
        }

        if let Some((event_identifier, event_id)) = self.events.remove(&source_id) {
            self.engine.stop_event(event_id);
            self.registry.unregister_sound_event_asset(&event_identifier);
        }
        self.engine.detach_source(source_id);
        self.scene.remove_source(source_id);
        debug!("Removed source {}", source_id);
        Ok(())
    }

    /// Push a new listener pose and re-attenuate every anchored source
    pub fn update_listener_transform(&mut self, pose: Pose) -> Result<(), Error> {
        self.engine.set_listener_pose(&pose);
        self.scene.update_listener_transform(pose)?;
        for (source_id, gain) in self.scene.gains() {
            self.engine.set_source_gain(source_id, gain);
        }
        Ok(())
    }

    pub fn scene(&self) -> &SpatialScene {
        &self.scene
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn ambient_source(&self) -> SourceId {
        self.ambient_source
    }

    /// Sound event identifier started for `source_id`
    pub fn event_identifier(&self, source_id: SourceId) -> Option<&str> {
        self.events.get(&source_id).map(|(name, _)| name.as_str())
    }

    /// Stop the engine and release the scene
    pub fn shutdown(mut self) {
        self.engine.stop();
        info!("Spatializer shut down");
    }
}

impl<E: SpatialEngine> Drop for Spatializer<E> {
    fn drop(&mut self) {
        if self.engine.is_running() {
            self.engine.stop();
        }
    }
}
