use scene_core::Pose;

/// Point of audition. Its pose is replaced on every tracking frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Listener {
    pose: Pose,
}

impl Listener {
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub(crate) fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }
}
