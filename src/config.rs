//! Application settings.

use crate::animation::Motion;
use crate::color::{self, hex, Color};
use crate::resource::MatcapSource;
use crate::typography::PalmParams;

/// Environment variable holding the path or the URL of the matcap image.
pub const MATCAP_ENV_VAR: &str = "MEMPHIS_MATCAP";

/// Everything the application can be configured with.
///
/// Built with [`Settings::default`] and the `with_*` methods:
///
/// ```no_run
/// # use memphis3d::config::Settings;
/// let settings = Settings::default()
///     .with_title("Memphis")
///     .with_size(1280, 720)
///     .with_matcap("https://example.com/matcap_gold.jpg");
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    /// Window title.
    pub title: String,
    /// Initial window width, in logical pixels.
    pub width: u32,
    /// Initial window height, in logical pixels.
    pub height: u32,
    /// Whether presentation waits for the vertical blank.
    pub vsync: bool,
    /// Clear color, linear.
    pub background: Color,
    /// Image for the gold matcap; the procedural fallback is used if `None` or unreadable.
    pub matcap: Option<MatcapSource>,
    /// Response of the stage to the pointer.
    pub motion: Motion,
    /// Shape of the palm.
    pub palm: PalmParams,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            title: "MEMPHIS".to_string(),
            width: 1280,
            height: 800,
            vsync: true,
            background: color::from_hex(hex::BACKGROUND),
            matcap: None,
            motion: Motion::default(),
            palm: PalmParams::default(),
        }
    }
}

impl Settings {
    /// Default settings, with the matcap taken from [`MATCAP_ENV_VAR`] if it is set.
    pub fn from_env() -> Self {
        Settings::default().with_matcap_var(std::env::var_os(MATCAP_ENV_VAR))
    }

    fn with_matcap_var(self, value: Option<std::ffi::OsString>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.with_matcap(std::path::PathBuf::from(value)),
            _ => self,
        }
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Sets the initial window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enables or disables vsync.
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Sets the clear color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Sets the matcap image: a file path, or an http(s) URL.
    pub fn with_matcap(mut self, source: impl Into<MatcapSource>) -> Self {
        self.matcap = Some(source.into());
        self
    }

    /// Sets the pointer response.
    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    /// Sets the palm parameters.
    pub fn with_palm(mut self, palm: PalmParams) -> Self {
        self.palm = palm;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let settings = Settings::default()
            .with_size(640, 480)
            .with_vsync(false)
            .with_matcap("gold.png")
            .with_palm(PalmParams::default().with_frond_count(3));

        assert_eq!((settings.width, settings.height), (640, 480));
        assert!(!settings.vsync);
        assert_eq!(
            settings.matcap,
            Some(MatcapSource::Path(std::path::PathBuf::from("gold.png")))
        );
        assert_eq!(settings.palm.frond_count, 3);
        assert_eq!(settings.title, Settings::default().title);
    }

    #[test]
    fn the_matcap_variable_takes_paths_and_urls() {
        let url = Settings::default().with_matcap_var(Some("https://example.com/gold.jpg".into()));
        assert_eq!(
            url.matcap,
            Some(MatcapSource::Url("https://example.com/gold.jpg".to_string()))
        );

        let path = Settings::default().with_matcap_var(Some("assets/gold.jpg".into()));
        assert!(matches!(path.matcap, Some(MatcapSource::Path(_))));

        assert_eq!(Settings::default().with_matcap_var(Some("".into())).matcap, None);
        assert_eq!(Settings::default().with_matcap_var(None).matcap, None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn settings_survive_a_json_round_trip() {
        let settings = Settings::default()
            .with_title("Memphis")
            .with_size(640, 480)
            .with_matcap("https://example.com/gold.jpg")
            .with_motion(Motion::default().with_smoothing(0.2))
            .with_palm(PalmParams::default().with_frond_count(5));

        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
