use crate::{Pose, SourceId};

/// Commands sent to the scene handler by the tracking side or the UI
#[derive(Debug, Clone)]
pub enum SceneCommand {
    /// A new listener pose from the tracker
    UpdateListener(Pose),

    /// Anchor a new sound source in the scene
    AddSource {
        /// Where the source sits in the world frame
        pose: Pose,
        /// Identifier of a registered sound asset
        asset: String,
    },

    /// Detach an anchored source
    RemoveSource {
        /// ID of the source to remove
        source_id: SourceId,
    },

    /// Shutdown the handler
    Shutdown,
}

/// Events emitted by the scene handler
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// The listener pose was applied
    ListenerMoved(Pose),
    /// A source was anchored and its sound event started
    SourceAdded {
        source_id: SourceId,
        asset: String,
    },
    /// A source was detached
    SourceRemoved(SourceId),
    /// Gains after the latest attenuation pass
    GainsUpdated(Vec<(SourceId, f64)>),
    /// A command could not be applied
    CommandFailed { reason: String },
}

impl std::fmt::Display for SceneEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneEvent::ListenerMoved(pose) => write!(f, "Listener moved to {}", pose.position),
            SceneEvent::SourceAdded { source_id, asset } => {
                write!(f, "Source {} added ({})", source_id, asset)
            }
            SceneEvent::SourceRemoved(source_id) => write!(f, "Source {} removed", source_id),
            SceneEvent::GainsUpdated(gains) => write!(f, "Gains updated for {} sources", gains.len()),
            SceneEvent::CommandFailed { reason } => write!(f, "Command failed: {}", reason),
        }
    }
}
