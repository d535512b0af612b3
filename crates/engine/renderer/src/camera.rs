//! Orbit camera shared by both viewports

use glam::{Mat4, Vec3};

const MIN_DISTANCE: f32 = 5.0;
const MAX_DISTANCE: f32 = 60.0;
const MAX_PITCH: f32 = 89.0;
const DRAG_SENSITIVITY: f32 = 0.4;
const SCROLL_STEP: f32 = 1.5;

/// Orbit camera around the lattice origin.
///
/// Angles are in degrees; pitch is clamped short of the poles to avoid
/// gimbal flip and distance is clamped to a fixed range.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    /// Pitch around the X axis, degrees
    pub angle_x: f32,
    /// Yaw around the Y axis, degrees
    pub angle_y: f32,
    /// Eye distance from the origin
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            angle_x: 25.0,
            angle_y: -30.0,
            distance: 20.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_mouse_drag(&mut self, delta_x: f32, delta_y: f32) {
        self.angle_y += delta_x * DRAG_SENSITIVITY;
        self.angle_x = (self.angle_x + delta_y * DRAG_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn handle_scroll(&mut self, delta: f32) {
        self.distance = (self.distance - delta * SCROLL_STEP).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// View matrix: dolly back along Z, then pitch, then yaw
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, self.distance), Vec3::ZERO, Vec3::Y)
            * Mat4::from_rotation_x(self.angle_x.to_radians())
            * Mat4::from_rotation_y(self.angle_y.to_radians())
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(45.0_f32.to_radians(), aspect.max(0.001), 0.1, 1000.0)
    }

    /// Unit direction from the origin toward the eye, in world space
    pub fn eye_direction(&self) -> Vec3 {
        let rad_x = self.angle_x.to_radians();
        let rad_y = self.angle_y.to_radians();
        Vec3::new(
            -rad_y.sin() * rad_x.cos(),
            rad_x.sin(),
            rad_y.cos() * rad_x.cos(),
        )
    }
}
