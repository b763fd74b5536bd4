//! Perspective camera + orbit control.
//!
//! The camera carries photometric exposure settings alongside the projection:
//! light intensities in the scene are physical (lux), so the renderer needs an
//! exposure value to bring radiometric output into display range.

mod orbit;

pub use orbit::OrbitController;

use glam::{Mat4, Vec3};

/// Perspective camera.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,

    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,

    /// Aperture in f-stops.
    pub aperture: f32,
    /// Shutter speed in seconds.
    pub shutter_speed: f32,
    /// Sensitivity in ISO.
    pub sensitivity: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.5, 4.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45f32.to_radians(),
            near: 0.1,
            far: 100.0,
            // Sunny-day exposure defaults (f/16, 1/125 s, ISO 100).
            aperture: 16.0,
            shutter_speed: 1.0 / 125.0,
            sensitivity: 100.0,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection with reversed-nothing, 0..1 depth (wgpu convention).
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-3), self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// Exposure value at ISO 100 for the current aperture/shutter/sensitivity.
    pub fn ev100(&self) -> f32 {
        (self.aperture * self.aperture / self.shutter_speed * 100.0 / self.sensitivity).log2()
    }

    /// Photometric exposure: scales scene luminance so that the maximum
    /// luminance without clipping (`1.2 * 2^EV100`) maps to 1.0.
    pub fn exposure(&self) -> f32 {
        1.0 / (1.2 * 2f32.powf(self.ev100()))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn view_looks_down_negative_z_from_eye() {
        let mut cam = Camera::new();
        cam.eye = Vec3::new(0.0, 0.0, 5.0);
        cam.target = Vec3::ZERO;

        let v = cam.view();
        // The eye maps to the view-space origin.
        let origin = v.transform_point3(cam.eye);
        assert!(origin.length() < 1e-5);
        // The target sits in front of the camera (negative view-space z).
        let t = v.transform_point3(cam.target);
        assert!(t.z < 0.0);
    }

    #[test]
    fn projection_maps_near_plane_to_zero_depth() {
        let cam = Camera::new();
        let p = cam.projection(16.0 / 9.0);
        let on_near = p.project_point3(Vec3::new(0.0, 0.0, -cam.near));
        assert!(on_near.z.abs() < 1e-5, "near depth {}", on_near.z);
        let on_far = p.project_point3(Vec3::new(0.0, 0.0, -cam.far));
        assert!((on_far.z - 1.0).abs() < 1e-4, "far depth {}", on_far.z);
    }

    #[test]
    fn degenerate_aspect_stays_finite() {
        let cam = Camera::new();
        let vp = cam.view_projection(0.0);
        assert!(vp.is_finite());
    }

    // ── exposure ──────────────────────────────────────────────────────────

    #[test]
    fn sunny_day_defaults_give_ev_near_15() {
        let cam = Camera::new();
        assert!((cam.ev100() - 14.966).abs() < 1e-2, "ev100 {}", cam.ev100());
    }

    #[test]
    fn exposure_matches_ev100() {
        let cam = Camera::new();
        let expected = 1.0 / (1.2 * 2f32.powf(cam.ev100()));
        assert!((cam.exposure() - expected).abs() < 1e-12);
        // A 110 000 lx sun on a white diffuse surface lands near display range.
        let l_out = 110_000.0 / std::f32::consts::PI * cam.exposure();
        assert!(l_out > 0.5 && l_out < 1.5, "exposed luminance {l_out}");
    }
}
