use crate::{SpatialEngine, Spatializer};
use log::{debug, error, info};
use scene_core::{Error, SceneCommand, SceneEvent};
use tokio::sync::mpsc;

/// Applies scene commands one at a time.
///
/// Pose updates from the tracker arrive on a single channel, so the
/// attenuation pass never runs concurrently with itself or with source
/// changes.
pub struct SceneHandler<E: SpatialEngine> {
    /// The spatializer being driven
    spatializer: Spatializer<E>,
    /// Channel for receiving commands
    command_rx: mpsc::Receiver<SceneCommand>,
    /// Channel for reporting what happened
    event_tx: mpsc::Sender<SceneEvent>,
}

impl<E: SpatialEngine> SceneHandler<E> {
    pub fn new(
        spatializer: Spatializer<E>,
        command_rx: mpsc::Receiver<SceneCommand>,
        event_tx: mpsc::Sender<SceneEvent>,
    ) -> Self {
        Self {
            spatializer,
            command_rx,
            event_tx,
        }
    }

    /// Run until a shutdown command arrives or every sender is dropped
    pub async fn run(&mut self) -> Result<(), Error> {
        while let Some(command) = self.command_rx.recv().await {
            if let SceneCommand::Shutdown = command {
                info!("Received shutdown command, exiting handler");
                break;
            }

            if let Err(e) = self.handle_command(command).await {
                error!("Error handling scene command: {}", e);
                self.emit_event(SceneEvent::CommandFailed {
                    reason: e.to_string(),
                })
                .await?;
            }
        }

        Ok(())
    }

    async fn handle_command(&mut self, command: SceneCommand) -> Result<(), Error> {
        match command {
            SceneCommand::UpdateListener(pose) => {
                self.spatializer.update_listener_transform(pose)?;
                self.emit_event(SceneEvent::ListenerMoved(pose)).await?;
                let gains = self.spatializer.scene().gains();
                self.emit_event(SceneEvent::GainsUpdated(gains)).await?;
            }

            SceneCommand::AddSource { pose, asset } => {
                let source_id = self.spatializer.add_source(pose, &asset)?;
                self.emit_event(SceneEvent::SourceAdded { source_id, asset })
                    .await?;
            }

            SceneCommand::RemoveSource { source_id } => {
                self.spatializer.remove_source(source_id)?;
                self.emit_event(SceneEvent::SourceRemoved(source_id)).await?;
            }

            SceneCommand::Shutdown => {
                // This is handled in the run method before we reach here
                unreachable!()
            }
        }

        Ok(())
    }

    async fn emit_event(&self, event: SceneEvent) -> Result<(), Error> {
        debug!("Emitting scene event: {}", event);
        self.event_tx
            .send(event)
            .await
            .map_err(|e| Error::InvalidState(format!("Failed to send scene event: {}", e)))
    }

    pub fn spatializer(&self) -> &Spatializer<E> {
        &self.spatializer
    }

    /// Hand the spatializer back, e.g. to shut it down
    pub fn into_spatializer(self) -> Spatializer<E> {
        self.spatializer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HeadlessEngine, SpatializerConfig};
    use audio_io::tone::write_pcm16_wav;
    use audio_io::{AssetRegistry, AssetType, NormalizationMode};
    use glam::Vec3;
    use scene_core::Pose;
    use settings_manager::Settings;
    use spatial::CoincidentPolicy;
    use tempfile::tempdir;

    fn spatializer(policy: CoincidentPolicy) -> (tempfile::TempDir, Spatializer<HeadlessEngine>) {
        let dir = tempdir().unwrap();
        let mut registry = AssetRegistry::new();
        for name in ["forest", "rain"] {
            let path = dir.path().join(format!("{}.wav", name));
            write_pcm16_wav(&path, 8_000, 1, &[0, 2_000, -2_000]).unwrap();
            registry
                .register_sound_asset(&path, name, AssetType::Streamed, NormalizationMode::None)
                .unwrap();
        }
        let mut config = SpatializerConfig::from(&Settings::default());
        config.attenuation = policy;
        let spatializer = Spatializer::new(HeadlessEngine::new(), registry, &config).unwrap();
        (dir, spatializer)
    }

    #[tokio::test]
    async fn commands_are_applied_in_order() {
        let (_dir, spatializer) = spatializer(CoincidentPolicy::PassThrough);
        let (command_tx, command_rx) = mpsc::channel(16);
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let mut handler = SceneHandler::new(spatializer, command_rx, event_tx);

        command_tx
            .send(SceneCommand::AddSource {
                pose: Pose::from_translation(Vec3::new(0.0, 0.0, 2.0)),
                asset: "rain".to_string(),
            })
            .await
            .unwrap();
        command_tx
            .send(SceneCommand::UpdateListener(Pose::IDENTITY))
            .await
            .unwrap();
        command_tx.send(SceneCommand::Shutdown).await.unwrap();

        tokio_test::assert_ok!(handler.run().await);

        let source_id = match event_rx.recv().await.unwrap() {
            SceneEvent::SourceAdded { source_id, asset } => {
                assert_eq!(asset, "rain");
                source_id
            }
            other => panic!("unexpected event {:?}", other),
        };
        assert_eq!(
            event_rx.recv().await.unwrap(),
            SceneEvent::ListenerMoved(Pose::IDENTITY)
        );
        match event_rx.recv().await.unwrap() {
            SceneEvent::GainsUpdated(gains) => {
                assert_eq!(gains.len(), 1);
                assert_eq!(gains[0].0, source_id);
                assert!((gains[0].1 - 0.25).abs() < 1e-6);
            }
            other => panic!("unexpected event {:?}", other),
        }

        let gain = handler.spatializer().engine().source(source_id).unwrap().gain;
        assert!((gain - 0.25).abs() < 1e-6);
    }

    #[tokio::test]
    async fn failures_are_reported_and_handler_keeps_going() {
        let (_dir, spatializer) = spatializer(CoincidentPolicy::Reject);
        let (command_tx, command_rx) = mpsc::channel(16);
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let mut handler = SceneHandler::new(spatializer, command_rx, event_tx);

        command_tx
            .send(SceneCommand::AddSource {
                pose: Pose::IDENTITY,
                asset: "waterfall".to_string(),
            })
            .await
            .unwrap();
        command_tx
            .send(SceneCommand::AddSource {
                pose: Pose::IDENTITY,
                asset: "rain".to_string(),
            })
            .await
            .unwrap();
        // Listener lands right on the rain source
        command_tx
            .send(SceneCommand::UpdateListener(Pose::IDENTITY))
            .await
            .unwrap();
        drop(command_tx);

        handler.run().await.unwrap();

        assert!(matches!(
            event_rx.recv().await.unwrap(),
            SceneEvent::CommandFailed { .. }
        ));
        assert!(matches!(
            event_rx.recv().await.unwrap(),
            SceneEvent::SourceAdded { .. }
        ));
        match event_rx.recv().await.unwrap() {
            SceneEvent::CommandFailed { reason } => assert!(reason.contains("coincides")),
            other => panic!("unexpected event {:?}", other),
        }

        handler.into_spatializer().shutdown();
    }
}
