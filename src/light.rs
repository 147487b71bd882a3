//! Lighting configuration.
//!
//! Lights live in the scene tree like any other node: their position comes from the
//! node's world transform. The scene is lit by a hemisphere light (a sky/ground
//! gradient) and a couple of directional lights.

use crate::color::{self, hex, Color};
use glamx::Vec3;

/// Maximum number of directional lights supported in a scene.
pub const MAX_LIGHTS: usize = 4;

/// The type of light source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightType {
    /// A sky/ground gradient.
    ///
    /// Surfaces facing the node position (seen from the origin) receive the light color,
    /// surfaces facing away receive `ground`.
    Hemisphere {
        /// The color received by surfaces facing away from the sky.
        ground: Color,
    },

    /// A directional light with parallel rays, shining from the node position toward `target`.
    Directional {
        /// The point, in world space, the light is aimed at.
        target: Vec3,
    },
}

/// A light source that can be attached to a scene node.
///
/// # Examples
/// ```
/// # use memphis3d::light::Light;
/// # use memphis3d::color;
/// # use glamx::Vec3;
/// let sun = Light::directional(Vec3::ZERO)
///     .with_color(color::from_hex(0xfff2cc))
///     .with_intensity(2.0);
/// assert!(sun.enabled);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Light {
    /// The type of light.
    pub light_type: LightType,
    /// The color of the light, in linear space.
    pub color: Color,
    /// The intensity multiplier for the light.
    pub intensity: f32,
    /// Whether the light is enabled.
    pub enabled: bool,
}

impl Light {
    /// Creates a white hemisphere light with the given ground color.
    pub fn hemisphere(ground: Color) -> Self {
        Self {
            light_type: LightType::Hemisphere { ground },
            color: color::WHITE,
            intensity: 1.0,
            enabled: true,
        }
    }

    /// Creates a white directional light aimed at `target`.
    pub fn directional(target: Vec3) -> Self {
        Self {
            light_type: LightType::Directional { target },
            color: color::WHITE,
            intensity: 1.0,
            enabled: true,
        }
    }

    /// Sets the light color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the light intensity.
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Sets whether the light is enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// The lights of the stage, with the position of the node each one is attached to.
///
/// A cool sky/dark ground hemisphere, a white key light from the upper left and a strong
/// red accent from the right.
pub fn stage_lights() -> [(Vec3, Light); 3] {
    [
        (
            Vec3::new(-10.0, 200.0, -1000.0),
            Light::hemisphere(color::from_hex(hex::GROUND))
                .with_color(color::from_hex(hex::SKY))
                .with_intensity(2.25),
        ),
        (
            Vec3::new(-50.0, 100.0, 10.0),
            Light::directional(Vec3::ZERO).with_intensity(1.0),
        ),
        (
            Vec3::new(50.0, 10.0, 10.0),
            Light::directional(Vec3::ZERO)
                .with_color(color::from_hex(hex::ACCENT_RED))
                .with_intensity(8.0),
        ),
    ]
}

/// A light that has been collected from the scene tree with its world-space transform.
#[derive(Clone, Debug)]
pub struct CollectedLight {
    /// The light color, premultiplied by its intensity.
    pub radiance: Vec3,
    /// World-space position of the light.
    pub world_position: Vec3,
    /// Unit vector from the lit surface toward the light (directional lights) or toward
    /// the sky (hemisphere lights).
    pub world_direction: Vec3,
}

/// A collection of lights gathered from the scene tree before rendering.
#[derive(Clone, Debug)]
pub struct LightCollection {
    /// The directional lights.
    pub lights: Vec<CollectedLight>,
    /// The hemisphere light: sky radiance, ground radiance and sky direction.
    pub hemisphere: Option<(Vec3, Vec3, Vec3)>,
}

impl Default for LightCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl LightCollection {
    /// Creates a new empty light collection.
    pub fn new() -> Self {
        Self {
            lights: Vec::with_capacity(MAX_LIGHTS),
            hemisphere: None,
        }
    }

    /// Adds a light placed at `world_position` to the collection.
    ///
    /// Returns `false` if the light is disabled, if the directional slots are full, or if
    /// a hemisphere light was already collected. Only one hemisphere light is kept.
    pub fn add(&mut self, light: &Light, world_position: Vec3) -> bool {
        if !light.enabled {
            return false;
        }

        let radiance = Vec3::new(light.color.r, light.color.g, light.color.b) * light.intensity;

        match light.light_type {
            LightType::Hemisphere { ground } => {
                if self.hemisphere.is_some() {
                    return false;
                }

                let ground = Vec3::new(ground.r, ground.g, ground.b) * light.intensity;
                let up = world_position.normalize_or(Vec3::Y);
                self.hemisphere = Some((radiance, ground, up));
                true
            }
            LightType::Directional { target } => {
                if self.is_full() {
                    return false;
                }

                self.lights.push(CollectedLight {
                    radiance,
                    world_position,
                    world_direction: (world_position - target).normalize_or(Vec3::Y),
                });
                true
            }
        }
    }

    /// Returns `true` if every directional slot is taken.
    pub fn is_full(&self) -> bool {
        self.lights.len() >= MAX_LIGHTS
    }

    /// Returns the number of directional lights in the collection.
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Returns `true` if no light has been collected.
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty() && self.hemisphere.is_none()
    }

    /// Clears all lights from the collection.
    pub fn clear(&mut self) {
        self.lights.clear();
        self.hemisphere = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_has_one_hemisphere_and_two_directionals() {
        let mut lights = LightCollection::new();
        for (position, light) in stage_lights().iter() {
            assert!(lights.add(light, *position));
        }

        assert_eq!(lights.len(), 2);
        let (sky, ground, up) = lights.hemisphere.unwrap();
        assert!(sky.x > ground.x);
        assert!((up.length() - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn directional_lights_point_toward_their_position() {
        let mut lights = LightCollection::new();
        lights.add(&Light::directional(Vec3::ZERO), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(lights.lights[0].world_direction, Vec3::Y);
    }

    #[test]
    fn disabled_and_extra_lights_are_dropped() {
        let mut lights = LightCollection::new();
        assert!(!lights.add(&Light::directional(Vec3::ZERO).with_enabled(false), Vec3::X));

        for _ in 0..MAX_LIGHTS {
            assert!(lights.add(&Light::directional(Vec3::ZERO), Vec3::X));
        }
        assert!(!lights.add(&Light::directional(Vec3::ZERO), Vec3::X));

        assert!(lights.add(&Light::hemisphere(color::BLACK), Vec3::Y));
        assert!(!lights.add(&Light::hemisphere(color::BLACK), Vec3::Y));
    }
}
