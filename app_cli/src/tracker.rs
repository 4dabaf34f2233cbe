//! Simulated head tracking
//!
//! Stands in for the AR tracker: walks the listener around a circle,
//! always facing its centre, and feeds the poses to the scene handler.

use glam::{Quat, Vec3};
use log::debug;
use scene_core::{Pose, SceneCommand};
use std::time::Duration;
use tokio::sync::mpsc;

/// Listener walking a horizontal circle
#[derive(Debug, Clone)]
pub struct WalkingTracker {
    center: Vec3,
    radius: f32,
    /// Angle advanced per frame, radians
    step: f32,
    angle: f32,
}

impl WalkingTracker {
    /// One lap every `frames_per_lap` frames
    pub fn new(center: Vec3, radius: f32, frames_per_lap: u32) -> Self {
        Self {
            center,
            radius,
            step: std::f32::consts::TAU / frames_per_lap.max(1) as f32,
            angle: 0.0,
        }
    }

    fn pose_at(&self, angle: f32) -> Pose {
        let position = self.center + Vec3::new(angle.cos(), 0.0, angle.sin()) * self.radius;
        // Rotate -Z (forward) onto the direction of the centre
        let orientation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2 - angle);
        Pose::new(position, orientation)
    }
}

impl Iterator for WalkingTracker {
    type Item = Pose;

    fn next(&mut self) -> Option<Pose> {
        let pose = self.pose_at(self.angle);
        self.angle = (self.angle + self.step) % std::f32::consts::TAU;
        Some(pose)
    }
}

/// Send `frames` listener poses, one per `interval`, then ask the handler
/// to shut down.
pub async fn run_tracker(
    tracker: WalkingTracker,
    frames: usize,
    interval: Duration,
    command_tx: mpsc::Sender<SceneCommand>,
) {
    let mut ticker = tokio::time::interval(interval);
    for pose in tracker.take(frames) {
        ticker.tick().await;
        if command_tx
            .send(SceneCommand::UpdateListener(pose))
            .await
            .is_err()
        {
            debug!("Scene handler gone, stopping tracker");
            return;
        }
    }
    let _ = command_tx.send(SceneCommand::Shutdown).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_on_the_circle_facing_the_centre() {
        let center = Vec3::new(1.0, 1.6, -1.0);
        let tracker = WalkingTracker::new(center, 3.0, 12);

        for pose in tracker.take(12) {
            assert!((pose.position.distance(center) - 3.0).abs() < 1e-4);
            let forward = pose.orientation * Vec3::NEG_Z;
            let to_center = (center - pose.position).normalize();
            assert!(forward.abs_diff_eq(to_center, 1e-4));
        }
    }

    #[test]
    fn a_lap_returns_to_the_start() {
        let mut tracker = WalkingTracker::new(Vec3::ZERO, 2.0, 8);
        let first = tracker.next().unwrap();
        let lapped = tracker.nth(7).unwrap();
        assert!(first.position.abs_diff_eq(lapped.position, 1e-4));
    }

    #[tokio::test]
    async fn tracker_ends_with_shutdown() {
        let (tx, mut rx) = mpsc::channel(8);
        let tracker = WalkingTracker::new(Vec3::ZERO, 1.0, 4);
        run_tracker(tracker, 3, Duration::from_millis(1), tx).await;

        let mut updates = 0;
        while let Some(command) = rx.recv().await {
            match command {
                SceneCommand::UpdateListener(_) => updates += 1,
                SceneCommand::Shutdown => break,
                other => panic!("unexpected command {:?}", other),
            }
        }
        assert_eq!(updates, 3);
    }
}
