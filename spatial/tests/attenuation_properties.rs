//! Property tests for the inverse-square attenuation pass
//!
//! Gains must only depend on the relative distance between a source and
//! the listener.

use glam::{Quat, Vec3};
use proptest::prelude::*;
use scene_core::Pose;
use spatial::{InverseSquare, SpatialScene};

fn coord() -> impl Strategy<Value = f32> {
    -50.0f32..50.0
}

fn point() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn rotation() -> impl Strategy<Value = Quat> {
    (-3.1f32..3.1, -3.1f32..3.1, -3.1f32..3.1)
        .prop_map(|(a, b, c)| Quat::from_rotation_x(a) * Quat::from_rotation_y(b) * Quat::from_rotation_z(c))
}

fn relative_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-3 * a.abs().max(b.abs())
}

proptest! {
    /// Property: gain equals 1 / |P - L|² for distinct points
    #[test]
    fn gain_is_inverse_square(source in point(), listener in point()) {
        let distance = source.distance(listener);
        prop_assume!(distance > 0.01);

        let mut scene = SpatialScene::default();
        let id = scene.add_source(Pose::from_translation(source), "rain");
        scene.update_listener_transform(Pose::from_translation(listener)).unwrap();

        let expected = 1.0 / f64::from(distance).powi(2);
        prop_assert!(relative_eq(scene.source(id).unwrap().gain(), expected));
    }

    /// Property: a rigid transform applied to both ends leaves gain unchanged
    #[test]
    fn gain_survives_rigid_transform(
        source in point(),
        listener in point(),
        offset in point(),
        rot in rotation(),
    ) {
        prop_assume!(source.distance(listener) > 1.0);
        let falloff = InverseSquare::default();
        let moved = Pose::new(offset, rot);

        let plain = falloff.gain_between(source, listener).unwrap();
        let source_moved = Pose::from_translation(source).transformed_by(&moved);
        let listener_moved = Pose::from_translation(listener).transformed_by(&moved);
        let transformed = falloff
            .gain_between(source_moved.position, listener_moved.position)
            .unwrap();

        prop_assert!(relative_eq(plain, transformed));
    }

    /// Property: doubling the separation divides gain by four
    #[test]
    fn doubling_distance_quarters_gain(listener in point(), dir in point()) {
        prop_assume!(dir.length() > 1.0);
        let falloff = InverseSquare::default();
        let near = falloff.gain_between(listener + dir, listener).unwrap();
        let far = falloff.gain_between(listener + dir * 2.0, listener).unwrap();
        prop_assert!(relative_eq(near, far * 4.0));
    }
}
