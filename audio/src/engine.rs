use audio_io::{PlaybackMode, SoundAsset, SoundEventAsset};
use log::{debug, info};
use scene_core::{Error, Pose, SourceId};
use spatial::{ReverbPreset, SoundSource};
use std::collections::HashMap;

/// Handle to a sound event started on the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(u64);

impl EventId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

/// The rendering engine the scene is mirrored into.
///
/// Implementations own the audio device, the spatial mixer and reverb.
/// The scene only pushes transforms, gains and sound events through here.
pub trait SpatialEngine: Send {
    fn start(&mut self) -> Result<(), Error>;
    fn stop(&mut self);
    fn is_running(&self) -> bool;

    fn set_default_reverb(&mut self, preset: ReverbPreset);

    fn attach_listener(&mut self, pose: &Pose) -> Result<(), Error>;
    fn set_listener_pose(&mut self, pose: &Pose);

    /// Attach `source` as a sphere of `radius` metres around its pose
    fn attach_source(&mut self, source: &SoundSource, radius: f32) -> Result<(), Error>;
    fn detach_source(&mut self, source_id: SourceId);
    fn set_source_gain(&mut self, source_id: SourceId, gain: f64);

    /// Start `event` (playing `asset`) on an attached source
    fn start_event(
        &mut self,
        event: &SoundEventAsset,
        asset: &SoundAsset,
        source_id: SourceId,
    ) -> Result<EventId, Error>;
    fn stop_event(&mut self, event_id: EventId);
}

/// A source as the headless engine sees it
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSource {
    pub pose: Pose,
    pub gain: f64,
    pub radius: f32,
}

/// A sound event the headless engine is playing
#[derive(Debug, Clone, PartialEq)]
pub struct PlayingEvent {
    pub identifier: String,
    pub asset: String,
    pub source_id: SourceId,
    pub playback_mode: PlaybackMode,
    pub reverb_send: f32,
}

/// Engine that keeps the scene graph in memory without producing sound.
///
/// Used by the demo binary when no output device is wired up, and by tests
/// to observe what the scene pushed.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    running: bool,
    reverb: ReverbPreset,
    listener: Option<Pose>,
    sources: HashMap<SourceId, EngineSource>,
    events: HashMap<EventId, PlayingEvent>,
    next_event: u64,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reverb_preset(&self) -> ReverbPreset {
        self.reverb
    }

    pub fn listener_pose(&self) -> Option<&Pose> {
        self.listener.as_ref()
    }

    pub fn source(&self, source_id: SourceId) -> Option<&EngineSource> {
        self.sources.get(&source_id)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn event(&self, event_id: EventId) -> Option<&PlayingEvent> {
        self.events.get(&event_id)
    }

    /// Playing events sorted by identifier
    pub fn playing_events(&self) -> Vec<&PlayingEvent> {
        let mut events: Vec<&PlayingEvent> = self.events.values().collect();
        events.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        events
    }
}

impl SpatialEngine for HeadlessEngine {
    fn start(&mut self) -> Result<(), Error> {
        if self.running {
            return Err(Error::Engine("Engine already running".to_string()));
        }
        self.running = true;
        info!("Headless engine started");
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.events.clear();
            info!("Headless engine stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_default_reverb(&mut self, preset: ReverbPreset) {
        debug!("Default reverb set to {:?}", preset);
        self.reverb = preset;
    }

    fn attach_listener(&mut self, pose: &Pose) -> Result<(), Error> {
        if self.listener.is_some() {
            return Err(Error::InvalidState("Listener already attached".to_string()));
        }
        self.listener = Some(*pose);
        Ok(())
    }

    fn set_listener_pose(&mut self, pose: &Pose) {
        self.listener = Some(*pose);
    }

    fn attach_source(&mut self, source: &SoundSource, radius: f32) -> Result<(), Error> {
        if self.sources.contains_key(&source.id()) {
            return Err(Error::InvalidState(format!(
                "Source {} already attached",
                source.id()
            )));
        }
        self.sources.insert(
            source.id(),
            EngineSource {
                pose: *source.pose(),
                gain: source.gain(),
                radius,
            },
        );
        Ok(())
    }

    fn detach_source(&mut self, source_id: SourceId) {
        self.sources.remove(&source_id);
        self.events.retain(|_, e| e.source_id != source_id);
    }

    fn set_source_gain(&mut self, source_id: SourceId, gain: f64) {
        if let Some(source) = self.sources.get_mut(&source_id) {
            source.gain = gain;
        }
    }

    fn start_event(
        &mut self,
        event: &SoundEventAsset,
        asset: &SoundAsset,
        source_id: SourceId,
    ) -> Result<EventId, Error> {
        if !self.running {
            return Err(Error::Engine(format!(
                "Cannot start '{}' before the engine is running",
                event.identifier()
            )));
        }
        if !self.sources.contains_key(&source_id) {
            return Err(Error::NotFound(format!("Source {} is not attached", source_id)));
        }

        self.next_event += 1;
        let id = EventId(self.next_event);
        let root = event.root();
        self.events.insert(
            id,
            PlayingEvent {
                identifier: event.identifier().to_string(),
                asset: asset.identifier().to_string(),
                source_id,
                playback_mode: root.playback_mode(),
                reverb_send: root.mixer().pipeline().effective_send_level(),
            },
        );
        debug!("Started {} ({}) on source {}", event.identifier(), id, source_id);
        Ok(id)
    }

    fn stop_event(&mut self, event_id: EventId) {
        self.events.remove(&event_id);
    }
}
