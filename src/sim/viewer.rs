//! Viewer projection used to decide which projectiles are on screen

use glam::{Mat4, Vec3};

use crate::tuning::Tuning;

/// Perspective camera looking down -Z at the origin
#[derive(Debug, Clone)]
pub struct Viewer {
    view_proj: Mat4,
}

impl Viewer {
    pub fn new(eye: Vec3, target: Vec3, fov_y_radians: f32, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(fov_y_radians, aspect, 0.1, 1000.0);
        Self {
            view_proj: proj * view,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(
            Vec3::new(0.0, 0.0, tuning.camera_distance),
            Vec3::ZERO,
            tuning.fov_y_degrees.to_radians(),
            tuning.aspect_ratio,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.view_proj
    }

    /// Normalized device coordinates, or `None` behind the camera
    pub fn project(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_proj * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// Inside the clip volume grown by `tolerance` on every side
    pub fn is_visible(&self, world: Vec3, tolerance: f32) -> bool {
        let Some(ndc) = self.project(world) else {
            return false;
        };
        let edge = 1.0 + tolerance;
        ndc.x.abs() <= edge && ndc.y.abs() <= edge && ndc.z >= -tolerance && ndc.z <= edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_center() {
        let viewer = Viewer::from_tuning(&Tuning::default());
        let ndc = viewer.project(Vec3::ZERO).expect("in front");
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(viewer.is_visible(Vec3::ZERO, 0.0));
    }

    #[test]
    fn far_above_is_not_visible() {
        let tuning = Tuning::default();
        let viewer = Viewer::from_tuning(&tuning);
        assert!(!viewer.is_visible(Vec3::new(0.0, tuning.ceiling + 10.0, 0.0), 0.1));
    }

    #[test]
    fn behind_camera_is_not_visible() {
        let tuning = Tuning::default();
        let viewer = Viewer::from_tuning(&tuning);
        let behind = Vec3::new(0.0, 0.0, tuning.camera_distance + 5.0);
        assert!(viewer.project(behind).is_none());
        assert!(!viewer.is_visible(behind, 0.5));
    }

    #[test]
    fn tolerance_widens_the_edge() {
        let tuning = Tuning::default();
        let viewer = Viewer::from_tuning(&tuning);
        // Half-height of the view at z = 0 is distance * tan(fov / 2)
        let half = tuning.camera_distance * (tuning.fov_y_degrees.to_radians() / 2.0).tan();
        let just_outside = Vec3::new(0.0, half * 1.05, 0.0);
        assert!(!viewer.is_visible(just_outside, 0.0));
        assert!(viewer.is_visible(just_outside, 0.1));
    }
}
