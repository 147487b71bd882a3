//! Procedural palm tree.

use super::Parts;
use crate::resource::{Finish, Shape};
use crate::scene::SceneNode3d;
use glamx::{Quat, Vec3};
use std::f32::consts::TAU;

/// Height of one `palm_trunk` segment before stretching.
const TRUNK_PIECE_HEIGHT: f32 = 0.55;
/// Length of one `palm_leaf` segment before scaling.
const LEAF_PIECE_LENGTH: f32 = 1.1;

/// Parameters of the palm generator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PalmParams {
    /// Total height of the trunk.
    pub trunk_height: f32,
    /// Number of stacked trunk segments.
    pub trunk_segments: usize,
    /// Tilt between two consecutive trunk segments, in radians.
    pub trunk_lean: f32,
    /// Number of fronds, evenly spaced around the crown.
    pub frond_count: usize,
    /// Downward bend between two consecutive leaf segments, in radians.
    pub frond_curvature: f32,
    /// Number of leaf segments per frond.
    pub frond_segments: usize,
}

impl Default for PalmParams {
    fn default() -> Self {
        PalmParams {
            trunk_height: 5.5,
            trunk_segments: 10,
            trunk_lean: 0.035,
            frond_count: 7,
            frond_curvature: 0.32,
            frond_segments: 5,
        }
    }
}

impl PalmParams {
    /// Sets the trunk height and segment count.
    pub fn with_trunk(mut self, height: f32, segments: usize) -> Self {
        self.trunk_height = height;
        self.trunk_segments = segments;
        self
    }

    /// Sets the frond count.
    pub fn with_frond_count(mut self, count: usize) -> Self {
        self.frond_count = count;
        self
    }

    /// Sets the frond curvature.
    pub fn with_frond_curvature(mut self, curvature: f32) -> Self {
        self.frond_curvature = curvature;
        self
    }

    /// Sets the number of leaf segments per frond.
    pub fn with_frond_segments(mut self, segments: usize) -> Self {
        self.frond_segments = segments;
        self
    }
}

/// Generates an unrooted palm group, standing on the `y = 0` plane.
///
/// The trunk is a chain of nested segments, each tilted by `trunk_lean` relative to the
/// one below, so the whole trunk bends. The crown sits on top of the last segment. Each
/// frond is a chain of leaf segments, each bent down by `frond_curvature` relative to its
/// parent and slightly shorter.
pub fn generate(params: &PalmParams, parts: &Parts) -> SceneNode3d {
    let mut palm = SceneNode3d::named("palm");

    let segments = params.trunk_segments.max(1);
    let step = params.trunk_height.max(0.0) / segments as f32;
    let stretch = step / TRUNK_PIECE_HEIGHT;

    let mut joint = palm.add_group("trunk");
    for i in 0..segments {
        let taper = 1.0 - 0.4 * i as f32 / segments as f32;
        let finish = if i % 2 == 0 { Finish::Pink } else { Finish::White };
        let _ = parts
            .add(&mut joint, Shape::PalmTrunk, finish)
            .set_local_scale(taper, stretch, taper);

        let mut next = joint.add_group("trunk_joint");
        let _ = next
            .set_position(Vec3::new(0.0, step, 0.0))
            .set_rotation(Quat::from_rotation_z(params.trunk_lean));
        joint = next;
    }

    let mut crown = joint;
    let _ = crown.set_name("crown");

    for k in 0..3 {
        let angle = TAU * k as f32 / 3.0;
        let _ = parts
            .add(&mut crown, Shape::Sphere, Finish::Black)
            .set_local_scale(0.3, 0.3, 0.3)
            .set_position(Vec3::new(0.3 * angle.cos(), -0.1, 0.3 * angle.sin()));
    }

    for k in 0..params.frond_count {
        let heading = TAU * k as f32 / params.frond_count as f32;
        let mut leaf = crown.add_group("frond");
        let _ = leaf.set_rotation(Quat::from_rotation_y(heading) * Quat::from_rotation_z(0.45));
        let mut length = 1.0;

        for j in 0..params.frond_segments {
            let finish = if j % 2 == 0 { Finish::Green } else { Finish::Blue };
            let _ = parts
                .add(&mut leaf, Shape::PalmLeaf, finish)
                .set_local_scale(length, 1.0, length);

            let mut next = leaf.add_group("leaf_joint");
            let _ = next
                .set_position(Vec3::new(LEAF_PIECE_LENGTH * length * 0.92, 0.0, 0.0))
                .set_rotation(Quat::from_rotation_z(-params.frond_curvature));
            leaf = next;
            length *= 0.88;
        }
    }

    palm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightCollection;
    use crate::resource::{GeometryManager, MaterialManager};

    fn build(params: &PalmParams) -> (SceneNode3d, usize) {
        let geometries = GeometryManager::new();
        let materials = MaterialManager::new();
        let palm = generate(params, &Parts::new(&geometries, &materials));
        let mut meshes = 0;
        palm.apply_to_objects(&mut |_| meshes += 1);
        (palm, meshes)
    }

    #[test]
    fn mesh_count_follows_the_parameters() {
        let params = PalmParams::default()
            .with_trunk(4.0, 6)
            .with_frond_count(5)
            .with_frond_segments(3);
        let (_, meshes) = build(&params);
        assert_eq!(meshes, 6 + 3 + 5 * 3);
    }

    #[test]
    fn fronds_are_evenly_spread() {
        let params = PalmParams::default().with_frond_count(4);
        let (palm, _) = build(&params);
        let crown = palm.find("crown").unwrap();
        let fronds: Vec<_> = crown
            .data()
            .children()
            .iter()
            .filter(|c| c.data().name() == Some("frond"))
            .cloned()
            .collect();
        assert_eq!(fronds.len(), 4);

        let dirs: Vec<_> = fronds
            .iter()
            .map(|f| f.rotation() * Vec3::X)
            .map(|d| Vec3::new(d.x, 0.0, d.z).normalize())
            .collect();
        for i in 0..4 {
            let dot = dirs[i].dot(dirs[(i + 1) % 4]);
            assert!(dot.abs() < 1.0e-5);
        }
    }

    #[test]
    fn straight_trunk_reaches_its_height() {
        let params = PalmParams {
            trunk_lean: 0.0,
            ..PalmParams::default()
        }
        .with_trunk(3.0, 4);
        let (palm, _) = build(&params);
        let crown = palm.find("crown").unwrap();
        let top = crown.world_transformation().w_axis;
        assert!((top.y - 3.0).abs() < 1.0e-4);
        assert!(top.x.abs() < 1.0e-6);
    }

    #[test]
    fn fronds_bend_down() {
        let (mut palm, _) = build(&PalmParams::default());
        let mut draws = Vec::new();
        palm.prepare(&mut draws, &mut LightCollection::new());

        let crown_y = palm.find("crown").unwrap().world_transformation().w_axis.y;
        let tips = draws
            .iter()
            .filter(|d| d.geometry.shape() == Shape::PalmLeaf)
            .map(|d| d.model.transform_point3(Vec3::new(1.1, 0.0, 0.0)).y);
        assert!(tips.fold(f32::MAX, f32::min) < crown_y);
    }
}
