//! The letters of MEMPHIS.
//!
//! Every letter is built in its own frame: centered on `x = 0`, standing between
//! `y = -1.25` and `y = 4`, facing `+z`.

use super::Parts;
use crate::resource::{Finish, Shape};
use crate::scene::SceneNode3d;
use glamx::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

/// Lowest point of a letter, in the letter frame.
pub const BASELINE: f32 = -1.25;
/// Highest point of a letter, in the letter frame.
pub const CAP_HEIGHT: f32 = 4.0;

const STEM_CENTER: f32 = (BASELINE + CAP_HEIGHT) / 2.0;
const STEM_STRETCH: f32 = (CAP_HEIGHT - BASELINE) / 3.0;

/// A letter design.
///
/// The two M of the word are drawn differently, hence two glyphs.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Glyph {
    /// Two columns joined by a hanging gold cone.
    M,
    /// A spine with three different bars.
    E,
    /// Two stems with a mirrored diagonal.
    M2,
    /// A stem and a gold ring.
    P,
    /// A stem, a crossbar and a stack of marshmallows.
    H,
    /// One column.
    I,
    /// Two half rings, one mirrored.
    S,
}

impl Glyph {
    /// The letter this glyph draws.
    pub fn letter(self) -> char {
        match self {
            Glyph::M | Glyph::M2 => 'M',
            Glyph::E => 'E',
            Glyph::P => 'P',
            Glyph::H => 'H',
            Glyph::I => 'I',
            Glyph::S => 'S',
        }
    }

    /// The name of the group holding this glyph.
    pub fn name(self) -> &'static str {
        match self {
            Glyph::M => "letter_m",
            Glyph::E => "letter_e",
            Glyph::M2 => "letter_m2",
            Glyph::P => "letter_p",
            Glyph::H => "letter_h",
            Glyph::I => "letter_i",
            Glyph::S => "letter_s",
        }
    }

    /// Horizontal room taken by the glyph, in the letter frame.
    pub fn width(self) -> f32 {
        match self {
            Glyph::M => 5.5,
            Glyph::E => 3.4,
            Glyph::M2 => 4.8,
            Glyph::P => 3.0,
            Glyph::H => 4.0,
            Glyph::I => 1.5,
            Glyph::S => 3.2,
        }
    }

    /// Builds an unrooted group displaying this glyph.
    pub fn build(self, parts: &Parts) -> SceneNode3d {
        let mut group = SceneNode3d::named(self.name());

        match self {
            Glyph::M => build_m(parts, &mut group),
            Glyph::E => build_e(parts, &mut group),
            Glyph::M2 => build_m2(parts, &mut group),
            Glyph::P => build_p(parts, &mut group),
            Glyph::H => build_h(parts, &mut group),
            Glyph::I => group.add_child(column(parts)),
            Glyph::S => build_s(parts, &mut group),
        }

        group
    }
}

/// The column of M and I: a pixel cylinder between a black dome and a stack of a black
/// disc, a blue ball and a gold disc.
pub fn column(parts: &Parts) -> SceneNode3d {
    let mut column = SceneNode3d::named("column");

    let _ = parts
        .add(&mut column, Shape::HalfSphere, Finish::Black)
        .set_position(Vec3::new(0.0, 3.25, 0.0))
        .set_rotation(Quat::from_rotation_x(-FRAC_PI_2));
    let _ = parts
        .add(&mut column, Shape::Cylinder, Finish::Pixel)
        .set_position(Vec3::new(0.0, 1.75, 0.0));
    let _ = parts.add(&mut column, Shape::Disc, Finish::Black);
    let _ = parts
        .add(&mut column, Shape::Disc, Finish::Gold)
        .set_position(Vec3::new(0.0, -1.25, 0.0));
    let _ = parts
        .add(&mut column, Shape::Sphere, Finish::Blue)
        .set_position(Vec3::new(0.0, -0.5, 0.0));

    column
}

fn build_m(parts: &Parts, group: &mut SceneNode3d) {
    let mut left = column(parts);
    let _ = left.set_position(Vec3::new(-2.0, 0.0, 0.0));
    let mut right = left.instantiate();
    let _ = right.set_position(Vec3::new(2.0, 0.0, 0.0));

    group.add_child(left);
    let _ = parts
        .add(group, Shape::Cone, Finish::Gold)
        .set_rotation(Quat::from_rotation_x(PI))
        .set_position(Vec3::new(0.0, 3.25, 0.0));
    group.add_child(right);
}

/// A thin stem spanning the full letter height.
fn stem(parts: &Parts, parent: &mut SceneNode3d, x: f32, finish: Finish) -> SceneNode3d {
    parts
        .add(parent, Shape::CylinderThin, finish)
        .set_local_scale(1.0, STEM_STRETCH, 1.0)
        .set_position(Vec3::new(x, STEM_CENTER, 0.0))
}

/// A thin bar along `+x`, `length` long, starting at `x0`.
fn bar(parts: &Parts, parent: &mut SceneNode3d, x0: f32, y: f32, length: f32, finish: Finish) {
    let _ = parts
        .add(parent, Shape::CylinderThin, finish)
        .set_local_scale(1.0, length / 3.0, 1.0)
        .set_rotation(Quat::from_rotation_z(-FRAC_PI_2))
        .set_position(Vec3::new(x0 + length / 2.0, y, 0.0));
}

fn build_e(parts: &Parts, group: &mut SceneNode3d) {
    let _ = stem(parts, group, -1.2, Finish::White);
    bar(parts, group, -1.2, CAP_HEIGHT - 0.35, 2.9, Finish::Pink);
    let _ = parts
        .add(group, Shape::CylinderWide, Finish::Green)
        .set_rotation(Quat::from_rotation_z(-FRAC_PI_2))
        .set_position(Vec3::new(-0.85, STEM_CENTER, 0.0));
    let _ = parts
        .add(group, Shape::Sphere, Finish::Blue)
        .set_local_scale(0.6, 0.6, 0.6)
        .set_position(Vec3::new(0.6, STEM_CENTER, 0.0));
    bar(parts, group, -1.2, BASELINE + 0.35, 2.9, Finish::Black);
}

fn build_m2(parts: &Parts, group: &mut SceneNode3d) {
    // Left half; the right half is the same subtree seen in a mirror.
    let mut half = SceneNode3d::named("half");
    let _ = stem(parts, &mut half, -2.0, Finish::White);

    let (top, bottom) = (Vec3::new(-2.0, CAP_HEIGHT - 0.4, 0.0), Vec3::new(0.0, 1.0, 0.0));
    let diagonal = top - bottom;
    let _ = parts
        .add(&mut half, Shape::CylinderThin, Finish::Black)
        .set_local_scale(1.0, diagonal.length() / 3.0, 1.0)
        .set_rotation(Quat::from_rotation_arc(Vec3::Y, diagonal.normalize()))
        .set_position((top + bottom) / 2.0);
    let _ = parts
        .add(&mut half, Shape::Sphere, Finish::Blue)
        .set_local_scale(0.7, 0.7, 0.7)
        .set_position(top);

    let mut mirrored = half.instantiate();
    let _ = mirrored.set_local_scale(-1.0, 1.0, 1.0);

    group.add_child(half);
    group.add_child(mirrored);
    let _ = parts
        .add(group, Shape::Sphere, Finish::Pink)
        .set_local_scale(0.8, 0.8, 0.8)
        .set_position(bottom);
}

fn build_p(parts: &Parts, group: &mut SceneNode3d) {
    let _ = stem(parts, group, -1.25, Finish::Black);
    let center = Vec3::new(0.0, CAP_HEIGHT - 1.5, 0.0);
    let _ = parts
        .add(group, Shape::Torus, Finish::Gold)
        .set_position(center);
    let _ = parts
        .add(group, Shape::Sphere, Finish::Blue)
        .set_local_scale(0.9, 0.9, 0.9)
        .set_position(center);
    let _ = parts
        .add(group, Shape::BoxFlat, Finish::Green)
        .set_rotation(Quat::from_rotation_y(PI / 4.0))
        .set_position(Vec3::new(-1.25, BASELINE, 0.0));
}

fn build_h(parts: &Parts, group: &mut SceneNode3d) {
    let _ = stem(parts, group, -1.4, Finish::Black);
    bar(parts, group, -1.4, STEM_CENTER, 2.8, Finish::Blue);

    // Seven wide cylinders fill the letter height exactly.
    let mut stack = group.add_group("marshmallows");
    let _ = stack.set_position(Vec3::new(1.4, BASELINE + 0.375, 0.0));
    for i in 0..7 {
        let finish = if i % 2 == 0 { Finish::Pink } else { Finish::White };
        let _ = parts
            .add(&mut stack, Shape::CylinderWide, finish)
            .set_rotation(Quat::from_rotation_y(i as f32 * 0.3))
            .set_position(Vec3::new(0.0, i as f32 * 0.75, 0.0));
    }
}

fn build_s(parts: &Parts, group: &mut SceneNode3d) {
    let upper = Vec3::new(0.0, 2.6, 0.0);
    let lower = Vec3::new(0.0, 0.1, 0.0);

    // The upper ring opens to the right; the lower one is the same arch flipped upside
    // down before the quarter turn, so it opens to the left.
    let _ = parts
        .add(group, Shape::HalfTorus, Finish::Pink)
        .set_rotation(Quat::from_rotation_z(FRAC_PI_2))
        .set_position(upper);
    let _ = parts
        .add(group, Shape::HalfTorus, Finish::Gold)
        .set_local_scale(1.0, -1.0, 1.0)
        .set_rotation(Quat::from_rotation_z(FRAC_PI_2))
        .set_position(lower);

    let _ = parts
        .add(group, Shape::Disc, Finish::Black)
        .set_local_scale(0.6, 1.0, 0.6)
        .set_rotation(Quat::from_rotation_z(-FRAC_PI_2))
        .set_position(upper + Vec3::new(0.0, 1.25, 0.0));
    let _ = parts
        .add(group, Shape::Sphere, Finish::Blue)
        .set_local_scale(0.5, 0.5, 0.5)
        .set_position(lower - Vec3::new(0.0, 1.25, 0.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{GeometryManager, MaterialManager};
    use rstest::rstest;
    use std::rc::Rc;

    fn meshes(node: &SceneNode3d) -> usize {
        let mut count = 0;
        node.apply_to_objects(&mut |_| count += 1);
        count
    }

    #[rstest]
    #[case(Glyph::M, 11)]
    #[case(Glyph::E, 5)]
    #[case(Glyph::M2, 7)]
    #[case(Glyph::P, 4)]
    #[case(Glyph::H, 9)]
    #[case(Glyph::I, 5)]
    #[case(Glyph::S, 4)]
    fn glyph_mesh_counts(#[case] glyph: Glyph, #[case] expected: usize) {
        let geometries = GeometryManager::new();
        let materials = MaterialManager::new();
        let parts = Parts::new(&geometries, &materials);

        let letter = glyph.build(&parts);
        assert_eq!(meshes(&letter), expected);
        assert_eq!(letter.data().name(), Some(glyph.name()));
    }

    #[test]
    fn m_columns_are_independent_instances() {
        let geometries = GeometryManager::new();
        let materials = MaterialManager::new();
        let letter = Glyph::M.build(&Parts::new(&geometries, &materials));

        let data = letter.data();
        let (left, right) = (&data.children()[0], &data.children()[2]);
        assert_eq!(left.position().x, -2.0);
        assert_eq!(right.position().x, 2.0);
        assert!(!left.ptr_eq(right));

        let left_cap = left.data().children()[0].clone();
        let right_cap = right.data().children()[0].clone();
        assert!(!left_cap.ptr_eq(&right_cap));
        let (l, r) = (left_cap.data(), right_cap.data());
        assert!(Rc::ptr_eq(
            l.object().unwrap().geometry(),
            r.object().unwrap().geometry()
        ));
    }

    #[test]
    fn s_mirrors_one_geometry() {
        let geometries = GeometryManager::new();
        let materials = MaterialManager::new();
        let letter = Glyph::S.build(&Parts::new(&geometries, &materials));

        let (upper, lower) = {
            let data = letter.data();
            (data.children()[0].clone(), data.children()[1].clone())
        };
        assert_eq!(lower.local_scale().y, -1.0);
        assert!(Rc::ptr_eq(
            upper.data().object().unwrap().geometry(),
            lower.data().object().unwrap().geometry()
        ));
        assert!(lower.world_transformation().determinant() < 0.0);
    }

    #[test]
    fn letters_stay_within_the_cap_height() {
        let geometries = GeometryManager::new();
        let materials = MaterialManager::new();
        let parts = Parts::new(&geometries, &materials);

        for glyph in [Glyph::M, Glyph::I, Glyph::H] {
            let letter = glyph.build(&parts);
            let (mut lo, mut hi) = (f32::MAX, f32::MIN);
            let mut draws = Vec::new();
            let mut lights = crate::light::LightCollection::new();
            let mut root = letter.clone();
            root.prepare(&mut draws, &mut lights);

            for draw in draws.iter() {
                for p in draw.geometry.mesh().coords.iter() {
                    let y = draw.model.transform_point3(*p).y;
                    lo = lo.min(y);
                    hi = hi.max(y);
                }
            }

            assert!(lo >= BASELINE - 1.0e-3, "{:?} goes down to {}", glyph, lo);
            assert!(hi <= CAP_HEIGHT + 1.0e-3, "{:?} goes up to {}", glyph, hi);
        }
    }
}
