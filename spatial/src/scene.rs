use crate::{InverseSquare, Listener, SoundSource, SourceKind};
use log::{debug, warn};
use scene_core::{Error, Pose, SourceId};

/// Listener plus every source in the scene.
///
/// Not synchronised: callers deliver listener updates one at a time.
#[derive(Debug, Clone, Default)]
pub struct SpatialScene {
    listener: Listener,
    sources: Vec<SoundSource>,
    attenuation: InverseSquare,
}

impl SpatialScene {
    /// Empty scene with the listener at the reference frame
    pub fn new(attenuation: InverseSquare) -> Self {
        Self {
            listener: Listener::new(Pose::IDENTITY),
            sources: Vec::new(),
            attenuation,
        }
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    pub fn attenuation(&self) -> &InverseSquare {
        &self.attenuation
    }

    /// Add a fixed-gain source that the attenuation pass never touches
    pub fn add_ambient_source(&mut self, pose: Pose, asset: impl Into<String>, gain: f64) -> SourceId {
        let source = SoundSource::new(pose, asset.into(), gain, SourceKind::Ambient);
        let id = source.id();
        debug!("Ambient source {} at {} (gain {})", id, pose.position, gain);
        self.sources.push(source);
        id
    }

    /// Anchor a source at `pose`. Its gain starts at unity and is first
    /// attenuated on the next listener update.
    pub fn add_source(&mut self, pose: Pose, asset: impl Into<String>) -> SourceId {
        let source = SoundSource::new(pose, asset.into(), 1.0, SourceKind::Anchored);
        let id = source.id();
        debug!("Anchored source {} ({}) at {}", id, source.asset(), pose.position);
        self.sources.push(source);
        id
    }

    pub fn remove_source(&mut self, id: SourceId) -> Option<SoundSource> {
        let index = self.sources.iter().position(|s| s.id() == id)?;
        Some(self.sources.remove(index))
    }

    pub fn source(&self, id: SourceId) -> Option<&SoundSource> {
        self.sources.iter().find(|s| s.id() == id)
    }

    pub fn sources(&self) -> &[SoundSource] {
        &self.sources
    }

    pub fn anchored_sources(&self) -> impl Iterator<Item = &SoundSource> {
        self.sources
            .iter()
            .filter(|s| s.kind() == SourceKind::Anchored)
    }

    pub fn anchored_count(&self) -> usize {
        self.anchored_sources().count()
    }

    /// Current gain of every anchored source, in insertion order
    pub fn gains(&self) -> Vec<(SourceId, f64)> {
        self.anchored_sources().map(|s| (s.id(), s.gain())).collect()
    }

    /// Store the new listener pose and recompute every anchored gain as
    /// `1 / distance²`.
    ///
    /// Under [`crate::CoincidentPolicy::Reject`] a source on top of the
    /// listener fails the whole pass: the pose is stored but no gain changes.
    pub fn update_listener_transform(&mut self, pose: Pose) -> Result<(), Error> {
        self.listener.set_pose(pose);

        let listener = pose.position;
        let mut gains = Vec::with_capacity(self.sources.len());
        for source in self.anchored_sources() {
            match self.attenuation.gain_between(source.pose().position, listener) {
                Some(gain) => gains.push(gain),
                None => {
                    return Err(Error::CoincidentPosition {
                        source_id: source.id(),
                    })
                }
            }
        }

        let anchored = self
            .sources
            .iter_mut()
            .filter(|s| s.kind() == SourceKind::Anchored);
        for (source, gain) in anchored.zip(gains) {
            if !gain.is_finite() {
                warn!("Source {} has non-finite gain {}", source.id(), gain);
            }
            source.set_gain(gain);
        }

        Ok(())
    }
}
