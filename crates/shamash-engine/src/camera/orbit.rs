use glam::Vec3;

use crate::input::{InputFrame, InputState, MouseButton};

use super::Camera;

/// Orbit controller: left-drag to orbit around a fixed target, wheel to dolly.
///
/// Angles follow the spherical convention used across the renderer:
/// yaw around +Y, pitch up from the horizon, both in radians. The eye sits at
/// `target + dir(yaw, pitch) * distance`.
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,

    pub min_distance: f32,
    pub max_distance: f32,

    /// Radians per logical pixel of drag.
    pub rotate_speed: f32,
    /// Distance multiplier per wheel line (applied as `factor^lines`).
    pub dolly_factor: f32,
}

/// Pitch stops short of the poles so the view matrix `up` never degenerates.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

impl OrbitController {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance: distance.max(0.01),
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 0.3,
            min_distance: 0.5,
            max_distance: 100.0,
            rotate_speed: 0.008,
            dolly_factor: 0.90,
        }
    }

    /// Consumes this frame's input deltas and writes the resulting eye/target
    /// into `camera`.
    pub fn update(&mut self, camera: &mut Camera, state: &InputState, frame: &InputFrame) {
        if state.button_down(MouseButton::Left) {
            let (dx, dy) = frame.pointer_delta;
            self.yaw -= dx * self.rotate_speed;
            self.pitch = (self.pitch + dy * self.rotate_speed).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        if frame.wheel_lines != 0.0 {
            self.distance = (self.distance * self.dolly_factor.powf(frame.wheel_lines))
                .clamp(self.min_distance, self.max_distance);
        }

        self.apply(camera);
    }

    /// Writes the current orbit state into `camera` without consuming input.
    pub fn apply(&self, camera: &mut Camera) {
        camera.eye = self.target + self.offset();
        camera.target = self.target;
    }

    fn offset(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cy * cp, sp, sy * cp) * self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_sits_on_the_orbit_sphere() {
        let orbit = OrbitController::new(Vec3::new(2.0, 0.0, -4.0), 6.0);
        let mut cam = Camera::new();
        orbit.apply(&mut cam);
        assert!((cam.eye.distance(orbit.target) - 6.0).abs() < 1e-4);
        assert_eq!(cam.target, orbit.target);
    }

    #[test]
    fn zero_pitch_zero_yaw_points_along_x() {
        let mut orbit = OrbitController::new(Vec3::ZERO, 2.0);
        orbit.yaw = 0.0;
        orbit.pitch = 0.0;
        let mut cam = Camera::new();
        orbit.apply(&mut cam);
        assert!((cam.eye - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut orbit = OrbitController::new(Vec3::ZERO, 5.0);
        let mut cam = Camera::new();

        // Simulate a huge upward drag with the button held.
        let mut state = InputState::default();
        state.buttons_down.insert(MouseButton::Left);
        let mut frame = InputFrame::default();
        frame.pointer_delta = (0.0, 1e6);

        orbit.update(&mut cam, &state, &frame);
        assert!(orbit.pitch <= PITCH_LIMIT);
        assert!(cam.eye.is_finite());
    }

    #[test]
    fn dolly_clamps_to_distance_range() {
        let mut orbit = OrbitController::new(Vec3::ZERO, 5.0);
        let mut cam = Camera::new();
        let state = InputState::default();

        let mut frame = InputFrame::default();
        frame.wheel_lines = 1e4;
        orbit.update(&mut cam, &state, &frame);
        assert_eq!(orbit.distance, orbit.min_distance);

        frame.wheel_lines = -1e4;
        orbit.update(&mut cam, &state, &frame);
        assert_eq!(orbit.distance, orbit.max_distance);
    }

    #[test]
    fn drag_without_button_is_ignored() {
        let mut orbit = OrbitController::new(Vec3::ZERO, 5.0);
        let before = (orbit.yaw, orbit.pitch);
        let mut cam = Camera::new();

        let mut frame = InputFrame::default();
        frame.pointer_delta = (50.0, 50.0);
        orbit.update(&mut cam, &InputState::default(), &frame);
        assert_eq!((orbit.yaw, orbit.pitch), before);
    }
}
