//! Pointer-driven easing of the top-level groups.

use crate::interaction::PointerState;
use crate::scene::SceneNode3d;
use glamx::{Pose3, Quat, Vec2, Vec3};

/// How strongly the stage responds to the pointer.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Motion {
    /// Rotation about `+y` when the pointer is on the right edge, in radians.
    pub max_yaw: f32,
    /// Rotation about `+x` when the pointer is on the bottom edge, in radians.
    pub max_pitch: f32,
    /// Translation when the pointer is in the top-right corner.
    pub max_shift: Vec2,
    /// Fraction of the remaining distance covered per 60Hz frame, in `(0, 1]`.
    ///
    /// `1` snaps to the target immediately.
    pub smoothing: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Motion {
            max_yaw: 0.35,
            max_pitch: 0.2,
            max_shift: Vec2::new(0.6, 0.3),
            smoothing: 0.06,
        }
    }
}

impl Motion {
    /// Sets the maximum yaw and pitch.
    pub fn with_rotation(mut self, max_yaw: f32, max_pitch: f32) -> Self {
        self.max_yaw = max_yaw;
        self.max_pitch = max_pitch;
        self
    }

    /// Sets the maximum translation.
    pub fn with_shift(mut self, max_shift: Vec2) -> Self {
        self.max_shift = max_shift;
        self
    }

    /// Sets the smoothing factor, clamped to `[0, 1]`.
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    /// The interpolation factor of a frame lasting `dt` seconds.
    ///
    /// Independent of the frame rate: two frames of `dt / 2` ease as far as one of `dt`.
    pub fn easing_factor(&self, dt: f32) -> f32 {
        let s = if self.smoothing.is_finite() {
            self.smoothing.clamp(0.0, 1.0)
        } else {
            1.0
        };

        if !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }

        if s >= 1.0 {
            return 1.0;
        }

        (1.0 - (1.0 - s).powf(dt * 60.0)).clamp(0.0, 1.0)
    }
}

/// An offset from a group's rest pose.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionOffset {
    /// Rotation about `+y`, in radians.
    pub yaw: f32,
    /// Rotation about `+x`, in radians.
    pub pitch: f32,
    /// Translation on the `xy` plane.
    pub shift: Vec2,
}

impl MotionOffset {
    /// No offset: the rest pose.
    pub const ZERO: MotionOffset = MotionOffset {
        yaw: 0.0,
        pitch: 0.0,
        shift: Vec2::ZERO,
    };

    /// The offset the stage eases toward for a given pointer.
    ///
    /// A linear function of the pointer: `(0, 0)` maps to [`MotionOffset::ZERO`] and the
    /// corners map to the maxima of `motion`.
    pub fn target(pointer: PointerState, motion: &Motion) -> MotionOffset {
        let p = PointerState::new(pointer.x, pointer.y);

        MotionOffset {
            yaw: p.x * motion.max_yaw,
            pitch: -p.y * motion.max_pitch,
            shift: Vec2::new(p.x * motion.max_shift.x, p.y * motion.max_shift.y),
        }
    }

    /// Linear interpolation toward `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, other: &MotionOffset, t: f32) -> MotionOffset {
        let t = t.clamp(0.0, 1.0);

        MotionOffset {
            yaw: self.yaw + (other.yaw - self.yaw) * t,
            pitch: self.pitch + (other.pitch - self.pitch) * t,
            shift: self.shift + (other.shift - self.shift) * t,
        }
    }

    /// This offset multiplied by `weight`.
    pub fn scaled(&self, weight: f32) -> MotionOffset {
        MotionOffset {
            yaw: self.yaw * weight,
            pitch: self.pitch * weight,
            shift: self.shift * weight,
        }
    }

    /// The rotation part of this offset.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Applies this offset to a rest pose.
    ///
    /// The group turns in place and then shifts: the rest position stays the pivot.
    pub fn apply_to(&self, rest: Pose3) -> Pose3 {
        let mut pose = rest;
        pose.rotation = self.rotation() * rest.rotation;
        pose.translation = rest.translation + Vec3::new(self.shift.x, self.shift.y, 0.0);
        pose
    }
}

/// A top-level group driven by the animation.
#[derive(Clone)]
pub struct AnimatedGroup {
    node: SceneNode3d,
    rest: Pose3,
    weight: f32,
}

impl AnimatedGroup {
    /// Registers `node` with its current local pose as rest pose.
    ///
    /// `weight` scales the offsets applied to this group. It is clamped to `[0, 1]`, so no
    /// group turns or shifts past the maxima of the [`Motion`]; non-finite weights freeze
    /// the group.
    pub fn new(node: SceneNode3d, weight: f32) -> AnimatedGroup {
        let rest = node.local_transformation();
        let weight = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        AnimatedGroup { node, rest, weight }
    }

    /// The animated node.
    #[inline]
    pub fn node(&self) -> &SceneNode3d {
        &self.node
    }

    /// The pose of the node when the offset is zero.
    #[inline]
    pub fn rest(&self) -> Pose3 {
        self.rest
    }

    /// The response weight.
    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }
}

/// State of the animation loop.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoopState {
    /// Frames move the groups.
    Running,
    /// Frames leave the groups where they are.
    Stopped,
}

/// Eases the animated groups toward the pose selected by the pointer.
pub struct AnimationLoop {
    state: LoopState,
    motion: Motion,
    current: MotionOffset,
    groups: Vec<AnimatedGroup>,
    frames: u64,
}

impl AnimationLoop {
    /// Creates a running loop without groups.
    pub fn new(motion: Motion) -> AnimationLoop {
        AnimationLoop {
            state: LoopState::Running,
            motion,
            current: MotionOffset::ZERO,
            groups: Vec::new(),
            frames: 0,
        }
    }

    /// Adds a group to animate; see [`AnimatedGroup::new`].
    pub fn add_group(&mut self, node: SceneNode3d, weight: f32) {
        self.groups.push(AnimatedGroup::new(node, weight))
    }

    /// The animated groups.
    #[inline]
    pub fn groups(&self) -> &[AnimatedGroup] {
        &self.groups
    }

    /// The motion response.
    #[inline]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// The offset applied by the last frame, before per-group weighting.
    #[inline]
    pub fn offset(&self) -> MotionOffset {
        self.current
    }

    /// The current state.
    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether frames move the groups.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// The number of frames applied so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Resumes the animation from the current offset.
    pub fn start(&mut self) {
        if self.state != LoopState::Running {
            log::debug!("Animation started.");
            self.state = LoopState::Running;
        }
    }

    /// Freezes the groups in their current pose.
    pub fn stop(&mut self) {
        if self.state != LoopState::Stopped {
            log::debug!("Animation stopped after {} frames.", self.frames);
            self.state = LoopState::Stopped;
        }
    }

    /// Starts the animation if it is stopped, stops it otherwise.
    pub fn toggle(&mut self) {
        match self.state {
            LoopState::Running => self.stop(),
            LoopState::Stopped => self.start(),
        }
    }

    /// Advances the animation by one frame lasting `dt` seconds.
    ///
    /// Returns `false` without touching the groups if the loop is stopped.
    pub fn step(&mut self, pointer: PointerState, dt: f32) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }

        let target = MotionOffset::target(pointer, &self.motion);
        self.current = self
            .current
            .lerp(&target, self.motion.easing_factor(dt));

        for group in self.groups.iter_mut() {
            let pose = self.current.scaled(group.weight).apply_to(group.rest);
            let _ = group.node.set_pose(pose);
        }

        self.frames += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn stage() -> (AnimationLoop, SceneNode3d) {
        let mut node = SceneNode3d::named("letter");
        let _ = node.set_position(Vec3::new(3.0, 1.0, 0.0));
        let mut anim = AnimationLoop::new(Motion::default().with_smoothing(1.0));
        anim.add_group(node.clone(), 1.0);
        (anim, node)
    }

    #[test]
    fn centered_pointer_is_the_rest_pose() {
        let (mut anim, node) = stage();
        assert!(anim.step(PointerState::CENTER, 1.0 / 60.0));
        assert_eq!(anim.offset(), MotionOffset::ZERO);
        assert_eq!(node.position(), Vec3::new(3.0, 1.0, 0.0));
        assert!(node.rotation().abs_diff_eq(Quat::IDENTITY, 1.0e-6));
    }

    #[rstest]
    #[case(1.0, 1.0)]
    #[case(5.0, 5.0)]
    #[case(-3.0, -1.0)]
    fn corner_pointer_reaches_the_maximum(#[case] x: f32, #[case] y: f32) {
        let motion = Motion::default();
        let offset = MotionOffset::target(PointerState { x, y }, &motion);
        assert_eq!(offset.yaw.abs(), motion.max_yaw);
        assert_eq!(offset.pitch.abs(), motion.max_pitch);
        assert_eq!(offset.shift.abs(), motion.max_shift);
    }

    #[test]
    fn constant_pointer_converges() {
        let mut anim = AnimationLoop::new(Motion::default().with_smoothing(0.1));
        let pointer = PointerState::new(0.4, -0.7);
        let target = MotionOffset::target(pointer, anim.motion());

        let mut previous = f32::MAX;
        for _ in 0..600 {
            assert!(anim.step(pointer, 1.0 / 60.0));
            let err = (anim.offset().yaw - target.yaw).abs();
            assert!(err <= previous);
            assert!(anim.offset().yaw.abs() <= anim.motion().max_yaw);
            previous = err;
        }

        assert!(previous < 1.0e-6);
    }

    #[test]
    fn easing_is_frame_rate_independent() {
        let motion = Motion::default().with_smoothing(0.2);
        let one = motion.easing_factor(1.0 / 30.0);
        let half = motion.easing_factor(1.0 / 60.0);
        let two_halves = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((one - two_halves).abs() < 1.0e-5);
        assert_eq!(motion.easing_factor(0.0), 0.0);
        assert_eq!(motion.easing_factor(f32::NAN), 0.0);
    }

    #[test]
    fn stopped_loop_leaves_groups_alone() {
        let (mut anim, node) = stage();
        anim.stop();
        assert!(!anim.step(PointerState::new(1.0, 1.0), 1.0 / 60.0));
        assert_eq!(node.position(), Vec3::new(3.0, 1.0, 0.0));
        assert_eq!(anim.frames(), 0);

        anim.toggle();
        assert!(anim.is_running());
        assert!(anim.step(PointerState::new(1.0, 1.0), 1.0 / 60.0));
        let shift = Motion::default().max_shift;
        assert_eq!(node.position(), Vec3::new(3.0 + shift.x, 1.0 + shift.y, 0.0));
    }

    #[test]
    fn weights_scale_the_offset() {
        let mut anim = AnimationLoop::new(Motion::default().with_smoothing(1.0));
        let light = SceneNode3d::named("light");
        let heavy = SceneNode3d::named("heavy");
        anim.add_group(light.clone(), 0.5);
        anim.add_group(heavy.clone(), 1.0);

        anim.step(PointerState::new(1.0, 0.0), 1.0 / 60.0);
        assert!((light.position().x * 2.0 - heavy.position().x).abs() < 1.0e-6);
    }

    #[rstest]
    #[case(1.2, 1.0)]
    #[case(-0.5, 0.0)]
    #[case(f32::NAN, 0.0)]
    #[case(0.75, 0.75)]
    fn weights_never_amplify_the_offset(#[case] weight: f32, #[case] expected: f32) {
        let group = AnimatedGroup::new(SceneNode3d::named("letter"), weight);
        assert_eq!(group.weight(), expected);
    }

    #[test]
    fn applied_pose_stays_within_the_maxima() {
        let motion = Motion::default().with_smoothing(1.0);
        let mut anim = AnimationLoop::new(motion);
        for weight in [0.5, 1.0, 1.5] {
            let mut node = SceneNode3d::named("letter");
            let _ = node.set_position(Vec3::new(weight, 0.0, 0.0));
            anim.add_group(node, weight);
        }

        assert!(anim.step(PointerState::new(1.0, 1.0), 1.0 / 60.0));
        let max_angle = MotionOffset::target(PointerState::new(1.0, 1.0), &motion)
            .rotation()
            .angle_between(Quat::IDENTITY);

        for group in anim.groups() {
            let node = group.node();
            let shift = node.position() - group.rest().translation;
            assert!(shift.x <= motion.max_shift.x + 1.0e-5);
            assert!(shift.y <= motion.max_shift.y + 1.0e-5);

            let turn = node.rotation() * group.rest().rotation.inverse();
            assert!(turn.angle_between(Quat::IDENTITY) <= max_angle + 1.0e-5);
        }
    }
}
