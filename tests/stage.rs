use std::rc::Rc;

use memphis3d::animation::{AnimationLoop, Motion};
use memphis3d::interaction::PointerState;
use memphis3d::light::LightCollection;
use memphis3d::prelude::*;
use memphis3d::scene::DrawItem;
use rstest::rstest;

fn stage() -> (GeometryManager, MaterialManager, Stage) {
    let geometries = GeometryManager::new();
    let materials = MaterialManager::new();
    let stage = typography::assemble(&geometries, &materials, &PalmParams::default());
    (geometries, materials, stage)
}

fn columns(letter: &SceneNode3d) -> Vec<SceneNode3d> {
    letter
        .data()
        .children()
        .iter()
        .filter(|c| c.data().name() == Some("column"))
        .cloned()
        .collect()
}

#[test]
fn the_columns_of_m_are_independent_instances() {
    let (_, _, stage) = stage();
    let m = stage.root.find("letter_m").unwrap();
    let mut legs = columns(&m);
    assert_eq!(legs.len(), 2);

    let before = legs[1].position();
    let _ = legs[0].translate(Vec3::new(0.0, 5.0, 0.0));
    assert_eq!(legs[1].position(), before);

    let geometry = |leg: &SceneNode3d| {
        leg.data().children()[1]
            .data()
            .object()
            .map(|o| o.geometry().clone())
            .unwrap()
    };
    assert!(Rc::ptr_eq(&geometry(&legs[0]), &geometry(&legs[1])));
}

#[test]
fn every_sphere_shares_one_geometry() {
    let (geometries, _, stage) = stage();
    let sphere = geometries.get(Shape::Sphere);

    let mut spheres = 0;
    stage.root.apply_to_objects(&mut |o| {
        if o.geometry().shape() == Shape::Sphere {
            assert!(Rc::ptr_eq(o.geometry(), &sphere));
            spheres += 1;
        }
    });

    assert!(spheres > 5);
    // The catalog and every use site.
    assert_eq!(Rc::strong_count(&sphere), spheres + 2);
}

#[test]
fn every_mesh_is_drawn_and_every_light_collected() {
    let (_, _, mut stage) = stage();
    let (_, meshes) = stage.summary();

    let mut draws: Vec<DrawItem> = Vec::new();
    let mut lights = LightCollection::new();
    stage.root.prepare(&mut draws, &mut lights);

    assert_eq!(draws.len(), meshes);
    assert_eq!(lights.len(), 2);
    assert!(lights.hemisphere.is_some());
    assert!(draws.iter().all(|d| d.model.is_finite()));
}

#[rstest]
#[case(PointerState::new(1.0, 1.0))]
#[case(PointerState::new(-1.0, 0.5))]
#[case(PointerState::new(0.25, -1.0))]
fn the_stage_settles_on_the_pointer_and_returns_to_rest(#[case] pointer: PointerState) {
    let (_, _, stage) = stage();
    let rest: Vec<Vec3> = stage.letters.iter().map(|l| l.position()).collect();

    let mut animation = AnimationLoop::new(Motion::default());
    for (node, weight) in stage.animated_groups() {
        animation.add_group(node, weight);
    }

    for _ in 0..600 {
        let _ = animation.step(pointer, 1.0 / 60.0);
    }
    let settled = animation.offset();
    let target = memphis3d::animation::MotionOffset::target(pointer, animation.motion());
    assert!((settled.yaw - target.yaw).abs() < 1.0e-3);
    assert!((settled.pitch - target.pitch).abs() < 1.0e-3);
    assert!(stage
        .letters
        .iter()
        .zip(rest.iter())
        .any(|(l, r)| l.position().distance(*r) > 1.0e-3));

    for _ in 0..600 {
        let _ = animation.step(PointerState::CENTER, 1.0 / 60.0);
    }
    for (letter, rest) in stage.letters.iter().zip(rest.iter()) {
        assert!(letter.position().distance(*rest) < 1.0e-3);
    }
}

#[test]
fn a_stopped_stage_keeps_its_pose() {
    let (_, _, stage) = stage();
    let mut animation = AnimationLoop::new(Motion::default());
    for (node, weight) in stage.animated_groups() {
        animation.add_group(node, weight);
    }

    let _ = animation.step(PointerState::new(1.0, 1.0), 1.0 / 60.0);
    let frozen = stage.palm.position();
    animation.stop();

    assert!(!animation.step(PointerState::new(-1.0, -1.0), 1.0 / 60.0));
    assert_eq!(stage.palm.position(), frozen);
}

#[test]
fn no_group_of_the_stage_moves_past_the_motion_maxima() {
    let (_, _, stage) = stage();
    let motion = Motion::default().with_smoothing(1.0);
    let corner = PointerState::new(1.0, 1.0);

    let mut animation = AnimationLoop::new(motion);
    for (node, weight) in stage.animated_groups() {
        animation.add_group(node, weight);
    }
    assert!(animation.step(corner, 1.0 / 60.0));

    let max_angle = memphis3d::animation::MotionOffset::target(corner, &motion)
        .rotation()
        .angle_between(Quat::IDENTITY);

    for group in animation.groups() {
        let node = group.node();
        let shift = node.position() - group.rest().translation;
        assert!(shift.x <= motion.max_shift.x + 1.0e-5);
        assert!(shift.y <= motion.max_shift.y + 1.0e-5);

        let turn = node.rotation() * group.rest().rotation.inverse();
        assert!(turn.angle_between(Quat::IDENTITY) <= max_angle + 1.0e-5);
    }

    // The last letter responds fully: the corner is reached, not exceeded.
    let last = &animation.groups()[stage.letters.len() - 1];
    let shift = last.node().position() - last.rest().translation;
    assert!((shift.x - motion.max_shift.x).abs() < 1.0e-5);
}
