use crate::camera::Camera3d;
use crate::event::WindowEvent;
use glamx::{Mat4, Pose3, Vec3};

/// Distance of the camera from the stage on landscape viewports.
pub const BASE_DISTANCE: f32 = 21.0;

/// The aspect-ratio bands the camera distance is picked from.
///
/// The bands cover the whole aspect axis: every aspect ratio belongs to exactly one band.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewportBand {
    /// `aspect < 0.75`: phones held upright.
    NarrowPortrait,
    /// `0.75 <= aspect < 1`: tablets held upright, square-ish windows.
    Portrait,
    /// `aspect >= 1`.
    Landscape,
}

impl ViewportBand {
    /// The band of a `width / height` aspect ratio.
    ///
    /// Degenerate ratios (not finite, zero or negative) fall back to `Landscape`.
    pub fn from_aspect(aspect: f32) -> ViewportBand {
        if !aspect.is_finite() || aspect <= 0.0 {
            ViewportBand::Landscape
        } else if aspect < 0.75 {
            ViewportBand::NarrowPortrait
        } else if aspect < 1.0 {
            ViewportBand::Portrait
        } else {
            ViewportBand::Landscape
        }
    }

    /// How much farther than [`BASE_DISTANCE`] the camera stands in this band, so that the
    /// whole word fits horizontally.
    pub fn distance_factor(self) -> f32 {
        match self {
            ViewportBand::NarrowPortrait => 2.4,
            ViewportBand::Portrait => 1.5,
            ViewportBand::Landscape => 1.0,
        }
    }

    /// The camera distance for this band.
    pub fn camera_distance(self) -> f32 {
        BASE_DISTANCE * self.distance_factor()
    }
}

/// The camera of the stage: a fixed perspective camera looking slightly down at the
/// letters, pulled back on narrow viewports.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageCamera3d {
    fov: f32,
    znear: f32,
    zfar: f32,
    height: f32,
    at: Vec3,
    aspect: f32,
    band: ViewportBand,
    eye: Vec3,
    proj: Mat4,
}

impl Default for StageCamera3d {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl StageCamera3d {
    /// Creates the stage camera for a framebuffer of the given size.
    pub fn new(width: u32, height: u32) -> StageCamera3d {
        let mut res = StageCamera3d {
            fov: 45.0f32.to_radians(),
            znear: 0.1,
            zfar: 100.0,
            height: 2.0,
            at: Vec3::new(0.0, 0.25, 0.0),
            aspect: 1.0,
            band: ViewportBand::Landscape,
            eye: Vec3::ZERO,
            proj: Mat4::IDENTITY,
        };
        res.resize(width, height);
        res
    }

    /// Refits the camera to a framebuffer of the given size.
    ///
    /// Recomputes the aspect ratio, the band, the camera distance and the projection.
    /// A zero-sized framebuffer (minimized window) leaves the camera unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let aspect = width as f32 / height as f32;
        let band = ViewportBand::from_aspect(aspect);

        if band != self.band {
            log::info!(
                "Viewport {}x{} (aspect {:.3}) moved the camera to {:?}",
                width,
                height,
                aspect,
                band
            );
        }

        self.aspect = aspect;
        self.band = band;
        self.eye = Vec3::new(0.0, self.height, band.camera_distance());
        self.proj = Mat4::perspective_rh(self.fov, aspect, self.znear, self.zfar);
    }

    /// The current aspect-ratio band.
    #[inline]
    pub fn band(&self) -> ViewportBand {
        self.band
    }

    /// The current `width / height` aspect ratio.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// The point the camera looks at.
    #[inline]
    pub fn at(&self) -> Vec3 {
        self.at
    }
}

impl Camera3d for StageCamera3d {
    fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::FramebufferSize(w, h) = *event {
            self.resize(w, h);
        }
    }

    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn view_transform(&self) -> Pose3 {
        Pose3::look_at_rh(self.eye, self.at, Vec3::Y)
    }

    fn projection(&self) -> Mat4 {
        self.proj
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.3, ViewportBand::NarrowPortrait)]
    #[case(0.749, ViewportBand::NarrowPortrait)]
    #[case(0.75, ViewportBand::Portrait)]
    #[case(0.9, ViewportBand::Portrait)]
    #[case(1.0, ViewportBand::Landscape)]
    #[case(1.78, ViewportBand::Landscape)]
    #[case(0.0, ViewportBand::Landscape)]
    #[case(f32::NAN, ViewportBand::Landscape)]
    fn aspect_bands(#[case] aspect: f32, #[case] band: ViewportBand) {
        assert_eq!(ViewportBand::from_aspect(aspect), band);
    }

    #[rstest]
    #[case(1920, 1080, 21.0)]
    #[case(900, 1000, 31.5)]
    #[case(390, 844, 50.4)]
    fn camera_distance_follows_the_viewport(
        #[case] width: u32,
        #[case] height: u32,
        #[case] distance: f32,
    ) {
        let camera = StageCamera3d::new(width, height);
        assert!((camera.eye().z - distance).abs() < 1.0e-4);
        assert_eq!(camera.eye().y, 2.0);
    }

    #[test]
    fn resizing_moves_the_camera() {
        let mut camera = StageCamera3d::new(1500, 1000);
        assert!((camera.eye().z - 21.0).abs() < 1.0e-4);

        camera.handle_event(&WindowEvent::FramebufferSize(600, 1000));
        assert_eq!(camera.band(), ViewportBand::NarrowPortrait);
        assert!((camera.eye().z - 50.4).abs() < 1.0e-4);

        camera.handle_event(&WindowEvent::FramebufferSize(0, 0));
        assert!((camera.eye().z - 50.4).abs() < 1.0e-4);
    }

    #[test]
    fn target_projects_to_the_center() {
        let camera = StageCamera3d::new(1280, 720);
        let clip = camera.transformation() * camera.at().extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1.0e-4 && ndc.y.abs() < 1.0e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
