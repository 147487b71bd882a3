//! Colors and the Memphis palette.
//!
//! Palette entries are authored as sRGB hex values, the way a designer picks
//! them. Lighting is computed in linear space, so every color that reaches a
//! material or a light goes through [`from_hex`] (or [`srgb_to_linear`]) first.
//! The renderer re-encodes the final pixel to sRGB.
//!
//! # Example
//! ```
//! # use memphis3d::color;
//! let blue = color::from_hex(color::hex::BLUE);
//! assert!(blue.r < blue.b);
//! ```

pub use rgb::Rgba;

/// The color type used throughout the crate. RGBA with f32 components in [0.0, 1.0].
pub type Color = Rgba<f32>;

/// Opaque black.
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// Opaque white.
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// sRGB hex codes of the palette.
pub mod hex {
    /// Pure white.
    pub const WHITE: u32 = 0xffffff;
    /// Pure black.
    pub const BLACK: u32 = 0x000000;
    /// Powder blue.
    pub const BLUE: u32 = 0x8fcbea;
    /// Bubblegum pink.
    pub const PINK: u32 = 0xffc0dd;
    /// Mint green.
    pub const MINT: u32 = 0xbffbcb;
    /// Matcap gold, used by the procedural fallback matcap.
    pub const GOLD: u32 = 0xd4a545;
    /// Sky tint of the hemisphere light.
    pub const SKY: u32 = 0xddeeff;
    /// Ground tint of the hemisphere light.
    pub const GROUND: u32 = 0x202020;
    /// Red of the accent directional light.
    pub const ACCENT_RED: u32 = 0xff002d;
    /// Warm yellow, used by the pixel pattern.
    pub const YELLOW: u32 = 0xffd23f;
    /// Default clear color.
    pub const BACKGROUND: u32 = 0xf6efe6;
}

/// Colors painted, in order, on the faces of the "pixel" cylinder.
pub const PIXEL_PATTERN: [u32; 6] = [
    hex::WHITE,
    hex::PINK,
    hex::BLUE,
    hex::WHITE,
    hex::YELLOW,
    hex::MINT,
];

/// Converts one sRGB-encoded channel in [0, 1] to linear light.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Converts one linear channel in [0, 1] to its sRGB encoding.
#[inline]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Builds an opaque linear color from an sRGB hex code such as `0x8fcbea`.
pub fn from_hex(hex: u32) -> Color {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Color::new(channel(16), channel(8), channel(0), 1.0)
}

/// Builds an opaque color from an sRGB hex code without linearizing it.
///
/// Used where the value is written straight into an sRGB image.
pub fn from_hex_srgb(hex: u32) -> Color {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Color::new(channel(16), channel(8), channel(0), 1.0)
}

/// Converts a color to the `[r, g, b, a]` array layout of uniform buffers.
#[inline]
pub fn to_array(c: Color) -> [f32; 4] {
    [c.r, c.g, c.b, c.a]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_are_preserved() {
        assert_eq!(from_hex(hex::WHITE), WHITE);
        assert_eq!(from_hex(hex::BLACK), BLACK);
    }

    #[test]
    fn mid_grey_is_darker_in_linear_space() {
        let grey = from_hex(0x808080);
        assert!((grey.r - 0.2158605).abs() < 1.0e-5);
        assert_eq!(grey.r, grey.g);
        assert_eq!(grey.g, grey.b);
    }

    #[test]
    fn transfer_functions_invert_each_other() {
        for i in 0..=20 {
            let c = i as f32 / 20.0;
            assert!((linear_to_srgb(srgb_to_linear(c)) - c).abs() < 1.0e-5);
        }
    }

    #[test]
    fn channels_are_read_in_rgb_order() {
        let c = from_hex_srgb(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1.0e-6);
        assert_eq!(c.b, 0.0);
    }
}
