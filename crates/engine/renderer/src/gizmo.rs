//! Lattice frame, axis lines and coordinate label anchors

use glam::{Mat4, Vec3};
use glow::{Context, HasContext};
use lattice::{CELL_SIZE, HALF};

use crate::camera::OrbitCamera;
use crate::shader_utils::create_program;

const GIZMO_VS: &str = r#"#version 300 es
precision highp float;
layout(location = 0) in vec3 aPosition;
layout(location = 1) in vec3 aColor;
uniform mat4 uMVP;
out vec3 vColor;
void main() {
    vColor = aColor;
    gl_Position = uMVP * vec4(aPosition, 1.0);
}
"#;

const GIZMO_FS: &str = r#"#version 300 es
precision mediump float;
in vec3 vColor;
out vec4 fragColor;
void main() {
    fragColor = vec4(vColor, 1.0);
}
"#;

// Slack around the lattice so frame and axes clear the outermost voxels.
const SPACING: f32 = CELL_SIZE + 0.18;

const FRAME_COLOR: Vec3 = Vec3::new(0.8, 0.8, 0.8);
const X_AXIS_COLOR: Vec3 = Vec3::new(1.0, 0.2, 0.2);
const Y_AXIS_COLOR: Vec3 = Vec3::new(0.2, 1.0, 0.2);
const Z_AXIS_COLOR: Vec3 = Vec3::new(0.2, 0.6, 1.0);

fn frame_extent() -> f32 {
    (HALF as f32 + 0.5) * SPACING
}

fn axis_extent() -> f32 {
    (HALF as f32 + 1.0) * SPACING
}

fn push_line(data: &mut Vec<f32>, from: Vec3, to: Vec3, color: Vec3) {
    data.extend_from_slice(&[from.x, from.y, from.z, color.x, color.y, color.z]);
    data.extend_from_slice(&[to.x, to.y, to.z, color.x, color.y, color.z]);
}

fn frame_vertices() -> Vec<f32> {
    let s = frame_extent();
    let corners = |x: f32, y: f32, z: f32| Vec3::new(x * s, y * s, z * s);
    let mut data = Vec::new();
    // Four edges along each axis.
    for &(a, b) in &[(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
        push_line(&mut data, corners(-1.0, a, b), corners(1.0, a, b), FRAME_COLOR);
        push_line(&mut data, corners(a, -1.0, b), corners(a, 1.0, b), FRAME_COLOR);
        push_line(&mut data, corners(a, b, -1.0), corners(a, b, 1.0), FRAME_COLOR);
    }
    data
}

fn axis_vertices() -> Vec<f32> {
    let s = axis_extent();
    let head = 0.3 * SPACING;
    let mut data = Vec::new();
    for (dir, color) in [
        (Vec3::X, X_AXIS_COLOR),
        (Vec3::Y, Y_AXIS_COLOR),
        (Vec3::Z, Z_AXIS_COLOR),
    ] {
        push_line(&mut data, dir * -s, dir * s, color);
        // Simple two-stroke arrowhead at the positive end.
        let tip = dir * s;
        let side = if dir == Vec3::Y { Vec3::X } else { Vec3::Y };
        push_line(&mut data, tip, tip - dir * head + side * head, color);
        push_line(&mut data, tip, tip - dir * head - side * head, color);
    }
    data
}

/// GL resources for the frame box and axis lines
pub struct GizmoRenderer {
    program: Option<glow::Program>,
    vao: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
    frame_vertex_count: i32,
    axis_vertex_count: i32,
}

impl Default for GizmoRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GizmoRenderer {
    pub fn new() -> Self {
        Self {
            program: None,
            vao: None,
            vbo: None,
            frame_vertex_count: 0,
            axis_vertex_count: 0,
        }
    }

    /// Build the static line buffers.
    ///
    /// # Safety
    /// Requires an active OpenGL context
    pub unsafe fn init_gl(&mut self, gl: &Context) -> Result<(), String> {
        unsafe {
            let program = create_program(gl, GIZMO_VS, GIZMO_FS)?;

            let mut data = frame_vertices();
            self.frame_vertex_count = (data.len() / 6) as i32;
            let axes = axis_vertices();
            self.axis_vertex_count = (axes.len() / 6) as i32;
            data.extend_from_slice(&axes);

            let vao = gl.create_vertex_array().map_err(|e| e.to_string())?;
            let vbo = gl.create_buffer().map_err(|e| e.to_string())?;
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&data),
                glow::STATIC_DRAW,
            );

            let stride = 6 * std::mem::size_of::<f32>() as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 12);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            self.program = Some(program);
            self.vao = Some(vao);
            self.vbo = Some(vbo);
            Ok(())
        }
    }

    /// Draw frame then axes with the given model-view-projection.
    ///
    /// # Safety
    /// Requires an active OpenGL context; `init_gl` must have succeeded
    pub unsafe fn render(&self, gl: &Context, mvp: &Mat4) {
        unsafe {
            let (Some(program), Some(vao)) = (self.program, self.vao) else {
                return;
            };
            gl.use_program(Some(program));
            if let Some(loc) = gl.get_uniform_location(program, "uMVP") {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, &mvp.to_cols_array());
            }
            gl.bind_vertex_array(Some(vao));

            gl.line_width(2.0);
            gl.draw_arrays(glow::LINES, 0, self.frame_vertex_count);
            gl.line_width(3.5);
            gl.draw_arrays(glow::LINES, self.frame_vertex_count, self.axis_vertex_count);
            gl.line_width(1.0);

            gl.bind_vertex_array(None);
        }
    }

    /// Release GL resources.
    ///
    /// # Safety
    /// Requires an active OpenGL context
    pub unsafe fn destroy_gl(&mut self, gl: &Context) {
        unsafe {
            if let Some(program) = self.program.take() {
                gl.delete_program(program);
            }
            if let Some(vao) = self.vao.take() {
                gl.delete_vertex_array(vao);
            }
            if let Some(vbo) = self.vbo.take() {
                gl.delete_buffer(vbo);
            }
        }
    }
}

/// A coordinate label anchored in world space, drawn by the UI layer
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub position: Vec3,
    pub text: String,
    pub color: Vec3,
}

/// Compute the coordinate labels for the current camera.
///
/// Labels sit on the lattice faces turned toward the eye, and the axis most
/// aligned with the view direction is skipped since its labels would stack
/// on top of each other.
pub fn axis_labels(camera: &OrbitCamera) -> Vec<AxisLabel> {
    let eye = camera.eye_direction();
    let fx = if eye.x >= 0.0 { 1.0 } else { -1.0 };
    let fy = if eye.y >= 0.0 { 1.0 } else { -1.0 };
    let fz = if eye.z >= 0.0 { 1.0 } else { -1.0 };

    let abs = eye.abs();
    let hide_x = abs.x >= abs.y && abs.x >= abs.z;
    let hide_y = !hide_x && abs.y >= abs.z;
    let hide_z = !hide_x && !hide_y;

    let s_num = (HALF as f32 + 1.2) * SPACING;
    let s_name = (HALF as f32 + 2.2) * SPACING;

    let x_color = Vec3::new(1.0, 0.4, 0.4);
    let y_color = Vec3::new(0.4, 1.0, 0.4);
    let z_color = Vec3::new(0.4, 0.7, 1.0);

    let mut labels = Vec::new();
    if !hide_x {
        for i in -HALF..=HALF {
            if i == 0 {
                continue;
            }
            labels.push(AxisLabel {
                position: Vec3::new(i as f32 - 0.3, s_num * fy, s_num * fz),
                text: i.to_string(),
                color: x_color,
            });
        }
        labels.push(AxisLabel {
            position: Vec3::new(s_name, s_num * fy, s_num * fz),
            text: "X".into(),
            color: x_color,
        });
    }
    if !hide_y {
        for i in -HALF..=HALF {
            if i == 0 {
                continue;
            }
            labels.push(AxisLabel {
                position: Vec3::new(s_num * fx, i as f32 - 0.3, s_num * fz),
                text: i.to_string(),
                color: y_color,
            });
        }
        labels.push(AxisLabel {
            position: Vec3::new(s_num * fx, s_name, s_num * fz),
            text: "Y".into(),
            color: y_color,
        });
    }
    if !hide_z {
        for i in -HALF..=HALF {
            if i == 0 {
                continue;
            }
            labels.push(AxisLabel {
                position: Vec3::new(s_num * fx, s_num * fy, i as f32 - 0.3),
                text: i.to_string(),
                color: z_color,
            });
        }
        labels.push(AxisLabel {
            position: Vec3::new(s_num * fx, s_num * fy, s_name),
            text: "Z".into(),
            color: z_color,
        });
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_has_twelve_edges() {
        assert_eq!(frame_vertices().len(), 12 * 2 * 6);
    }

    #[test]
    fn test_axes_have_arrowheads() {
        // Three lines per axis: shaft plus two arrowhead strokes.
        assert_eq!(axis_vertices().len(), 3 * 3 * 2 * 6);
    }

    #[test]
    fn test_labels_skip_view_aligned_axis() {
        // Default camera looks mostly down the Z axis, so Z labels are
        // hidden and X and Y each contribute six numbers plus a name.
        let camera = OrbitCamera::new();
        let labels = axis_labels(&camera);
        assert_eq!(labels.len(), 2 * (2 * HALF as usize + 1));
        assert!(labels.iter().all(|l| l.text != "Z"));
        assert!(labels.iter().any(|l| l.text == "X"));
        assert!(labels.iter().any(|l| l.text == "Y"));
    }

    #[test]
    fn test_labels_skip_zero() {
        let labels = axis_labels(&OrbitCamera::new());
        assert!(labels.iter().all(|l| l.text != "0"));
    }

    #[test]
    fn test_labels_follow_eye_side() {
        let mut camera = OrbitCamera::new();
        camera.angle_x = 45.0;
        let above = axis_labels(&camera);
        camera.angle_x = -45.0;
        let below = axis_labels(&camera);
        let x_above = above.iter().find(|l| l.text == "X").unwrap();
        let x_below = below.iter().find(|l| l.text == "X").unwrap();
        assert!(x_above.position.y > 0.0);
        assert!(x_below.position.y < 0.0);
    }
}
