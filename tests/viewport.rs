use memphis3d::camera::{Camera3d, StageCamera3d, ViewportBand, BASE_DISTANCE};
use memphis3d::event::{TouchAction, WindowEvent};
use memphis3d::interaction::{Interaction, PointerState, Viewport};
use rstest::rstest;

#[rstest]
#[case(1920, 1080, ViewportBand::Landscape, BASE_DISTANCE)]
#[case(1000, 1000, ViewportBand::Landscape, BASE_DISTANCE)]
#[case(900, 1000, ViewportBand::Portrait, BASE_DISTANCE * 1.5)]
#[case(750, 1000, ViewportBand::Portrait, BASE_DISTANCE * 1.5)]
#[case(749, 1000, ViewportBand::NarrowPortrait, BASE_DISTANCE * 2.4)]
#[case(390, 844, ViewportBand::NarrowPortrait, BASE_DISTANCE * 2.4)]
fn camera_distance_follows_the_aspect_band(
    #[case] width: u32,
    #[case] height: u32,
    #[case] band: ViewportBand,
    #[case] distance: f32,
) {
    let camera = StageCamera3d::new(width, height);
    assert_eq!(camera.band(), band);
    assert!((camera.eye().z - distance).abs() < 1.0e-4);
}

#[test]
fn rotating_a_tablet_moves_the_camera_back() {
    let mut camera = StageCamera3d::new(1500, 1000);
    assert!((camera.eye().z - 21.0).abs() < 1.0e-4);

    camera.handle_event(&WindowEvent::FramebufferSize(600, 1000));
    assert_eq!(camera.band(), ViewportBand::NarrowPortrait);
    assert!((camera.eye().z - 50.4).abs() < 1.0e-4);
    assert!((camera.aspect() - 0.6).abs() < 1.0e-6);

    // A minimized window keeps the last framing.
    camera.handle_event(&WindowEvent::FramebufferSize(0, 0));
    assert!((camera.eye().z - 50.4).abs() < 1.0e-4);
}

#[test]
fn pointer_and_touch_share_one_normalized_state() {
    let mut interaction = Interaction::new(Viewport::new(800, 600));
    assert_eq!(interaction.pointer(), PointerState::CENTER);

    assert!(interaction.handle_event(&WindowEvent::CursorPos(800.0, 0.0)));
    assert_eq!(interaction.pointer(), PointerState::new(1.0, 1.0));

    assert!(interaction.handle_event(&WindowEvent::Touch(3, 0.0, 600.0, TouchAction::Start)));
    assert_eq!(interaction.pointer(), PointerState::new(-1.0, -1.0));

    // Lifting the finger leaves the pointer where it was.
    assert!(!interaction.handle_event(&WindowEvent::Touch(3, 400.0, 300.0, TouchAction::End)));
    assert_eq!(interaction.pointer(), PointerState::new(-1.0, -1.0));
}

#[test]
fn positions_outside_the_window_are_clamped() {
    let mut interaction = Interaction::new(Viewport::new(800, 600));
    let _ = interaction.handle_event(&WindowEvent::CursorPos(-200.0, 900.0));

    let pointer = interaction.pointer();
    assert_eq!((pointer.x, pointer.y), (-1.0, -1.0));
}
