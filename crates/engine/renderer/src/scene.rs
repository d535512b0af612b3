//! Scene view: one viewport's voxel store, animation and GL state
//!
//! Both viewports run the same type; the target preview is constructed
//! non-interactive, which pins its animation state to `Idle` so it renders
//! fully revealed and ignores celebration requests.

use glam::{Mat4, Vec3};
use glow::{Context, HasContext};
use lattice::{manhattan, VoxelMap, VoxelStore};
use rand::Rng;
use tracing::debug;

use crate::animation::{AnimationMode, AnimationState};
use crate::camera::OrbitCamera;
use crate::gizmo::GizmoRenderer;
use crate::mesh::{
    build_vertex_data, fill_indices, line_indices, LINE_INDICES_PER_VOXEL, TRI_INDICES_PER_VOXEL,
};
use crate::shader_utils::create_program;
use crate::slicing::SlicingConfig;

/// Ambient light term
pub const AMBIENT: f32 = 0.4;

/// Diffuse light strength
pub const DIFFUSE_STRENGTH: f32 = 1.0;

/// Normalized directional light, toward the upper front-right corner
pub const LIGHT_DIR: Vec3 = Vec3::new(0.577, 0.577, 0.577);

/// Clear color behind the lattice
pub const BACKGROUND_COLOR: [f32; 4] = [0.1, 0.12, 0.15, 1.0];

const PARTICLE_HALF: f32 = 0.1;

const LIT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 aPosition;
layout(location = 1) in vec3 aNormal;
layout(location = 2) in vec3 aColor;

uniform mat4 uMVP;
uniform mat4 uModel;

out vec3 vNormal;
out vec3 vColor;

void main() {
    gl_Position = uMVP * vec4(aPosition, 1.0);
    vNormal = mat3(uModel) * aNormal;
    vColor = aColor;
}
"#;

const LIT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 vNormal;
in vec3 vColor;

uniform vec3 uLightDir;
uniform float uAmbient;
uniform float uDiffuseStrength;

out vec4 FragColor;

void main() {
    vec3 normal = normalize(vNormal);
    float diffuse = max(dot(normal, uLightDir), 0.0);
    vec3 lighting = vColor * (uAmbient + diffuse * uDiffuseStrength);
    FragColor = vec4(lighting, 1.0);
}
"#;

const FLAT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 aPosition;

uniform mat4 uMVP;

void main() {
    gl_Position = uMVP * vec4(aPosition, 1.0);
}
"#;

const FLAT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform vec3 uColor;

out vec4 FragColor;

void main() {
    FragColor = vec4(uColor, 1.0);
}
"#;

/// Pixel rectangle a view renders into, origin at the window's bottom left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        if self.height <= 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Voxel scene with two-pass drawing and per-view animation
pub struct SceneView {
    store: VoxelStore,
    animation: AnimationState,
    dirty: bool,
    drawn_voxels: usize,

    lit_program: Option<glow::Program>,
    flat_program: Option<glow::Program>,
    vao: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
    ebo_fill: Option<glow::Buffer>,
    ebo_line: Option<glow::Buffer>,
    particle_vao: Option<glow::VertexArray>,
    particle_vbo: Option<glow::Buffer>,
    particle_ebo: Option<glow::Buffer>,
    gizmo: GizmoRenderer,
}

impl SceneView {
    /// `interactive` views animate; non-interactive ones render static
    pub fn new(interactive: bool) -> Self {
        Self {
            store: VoxelStore::new(),
            animation: if interactive {
                AnimationState::interactive()
            } else {
                AnimationState::idle()
            },
            dirty: false,
            drawn_voxels: 0,
            lit_program: None,
            flat_program: None,
            vao: None,
            vbo: None,
            ebo_fill: None,
            ebo_line: None,
            particle_vao: None,
            particle_vbo: None,
            particle_ebo: None,
            gizmo: GizmoRenderer::new(),
        }
    }

    /// Swap in a new voxel map and restart the build reveal
    pub fn replace_map(&mut self, map: VoxelMap) {
        self.store.replace(map);
        self.animation.reset_build();
        self.dirty = true;
        debug!(voxels = self.store.len(), "scene voxels replaced");
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.animation.reset_build();
        self.dirty = true;
    }

    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    /// Voxels drawn in the last frame, after reveal and slicing filters
    pub fn drawn_voxels(&self) -> usize {
        self.drawn_voxels
    }

    pub fn tick(&mut self) {
        self.animation.tick();
    }

    pub fn celebrate(&mut self, rng: &mut impl Rng) {
        let centroid = self.store.centroid();
        self.animation.start_celebration(centroid, rng);
    }

    /// Create programs and buffers.
    ///
    /// # Safety
    /// Requires an active OpenGL context
    pub unsafe fn init_gl(&mut self, gl: &Context) -> Result<(), String> {
        unsafe {
            self.lit_program = Some(create_program(gl, LIT_VERTEX_SHADER, LIT_FRAGMENT_SHADER)?);
            self.flat_program = Some(create_program(gl, FLAT_VERTEX_SHADER, FLAT_FRAGMENT_SHADER)?);

            let vao = gl.create_vertex_array().map_err(|e| e.to_string())?;
            let vbo = gl.create_buffer().map_err(|e| e.to_string())?;
            let ebo_fill = gl.create_buffer().map_err(|e| e.to_string())?;
            let ebo_line = gl.create_buffer().map_err(|e| e.to_string())?;
            self.vao = Some(vao);
            self.vbo = Some(vbo);
            self.ebo_fill = Some(ebo_fill);
            self.ebo_line = Some(ebo_line);

            self.init_particle_mesh(gl)?;
            self.gizmo.init_gl(gl)?;
            self.dirty = true;
            Ok(())
        }
    }

    /// Static unit cube for confetti particles, positions only
    unsafe fn init_particle_mesh(&mut self, gl: &Context) -> Result<(), String> {
        unsafe {
            let h = PARTICLE_HALF;
            #[rustfmt::skip]
            let vertices: [f32; 24] = [
                -h, -h, -h,  h, -h, -h,  h,  h, -h,  -h,  h, -h,
                -h, -h,  h,  h, -h,  h,  h,  h,  h,  -h,  h,  h,
            ];
            #[rustfmt::skip]
            let indices: [u32; 36] = [
                0, 2, 1,  0, 3, 2,  4, 5, 6,  4, 6, 7,
                0, 1, 5,  0, 5, 4,  3, 7, 6,  3, 6, 2,
                0, 4, 7,  0, 7, 3,  1, 2, 6,  1, 6, 5,
            ];

            let vao = gl.create_vertex_array().map_err(|e| e.to_string())?;
            let vbo = gl.create_buffer().map_err(|e| e.to_string())?;
            let ebo = gl.create_buffer().map_err(|e| e.to_string())?;
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&vertices),
                glow::STATIC_DRAW,
            );
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 12, 0);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&indices),
                glow::STATIC_DRAW,
            );
            gl.bind_vertex_array(None);

            self.particle_vao = Some(vao);
            self.particle_vbo = Some(vbo);
            self.particle_ebo = Some(ebo);
            Ok(())
        }
    }

    /// Rebuild the voxel vertex and index buffers from the store
    unsafe fn upload(&mut self, gl: &Context) {
        unsafe {
            let (Some(vao), Some(vbo), Some(ebo_fill), Some(ebo_line)) =
                (self.vao, self.vbo, self.ebo_fill, self.ebo_line)
            else {
                return;
            };
            let data = build_vertex_data(&self.store);
            let count = self.store.len();

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&data),
                glow::STATIC_DRAW,
            );

            let stride = 9 * std::mem::size_of::<f32>() as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 12);
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 24);

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo_fill));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&fill_indices(count)),
                glow::STATIC_DRAW,
            );
            gl.bind_vertex_array(None);

            // The line index buffer lives outside the VAO; the line pass
            // binds it explicitly over the same vertex layout.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo_line));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&line_indices(count)),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            self.dirty = false;
        }
    }

    /// Draw the scene into the viewport: gizmo, wireframe pass, fill pass,
    /// then particles when celebrating.
    ///
    /// # Safety
    /// Requires an active OpenGL context; `init_gl` must have succeeded
    pub unsafe fn render(
        &mut self,
        gl: &Context,
        camera: &OrbitCamera,
        slicing: &SlicingConfig,
        viewport: Viewport,
    ) {
        unsafe {
            if self.dirty {
                self.upload(gl);
            }
            let (Some(lit_program), Some(flat_program), Some(vao)) =
                (self.lit_program, self.flat_program, self.vao)
            else {
                return;
            };

            gl.enable(glow::SCISSOR_TEST);
            gl.scissor(viewport.x, viewport.y, viewport.width, viewport.height);
            gl.viewport(viewport.x, viewport.y, viewport.width, viewport.height);
            gl.clear_color(
                BACKGROUND_COLOR[0],
                BACKGROUND_COLOR[1],
                BACKGROUND_COLOR[2],
                BACKGROUND_COLOR[3],
            );
            gl.enable(glow::DEPTH_TEST);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            let view = camera.view_matrix();
            let projection = camera.projection_matrix(viewport.aspect());
            let mvp = projection * view;

            self.gizmo.render(gl, &mvp);

            let reveal = self.animation.reveal_radius();
            let visible =
                |index: usize| voxel_pass(self.store.draw_order()[index], reveal, slicing);

            gl.bind_vertex_array(Some(vao));

            // Wireframe pass first, matching the draw order of the fill so
            // edges of hidden voxels never bleed through.
            gl.use_program(Some(flat_program));
            if let Some(loc) = gl.get_uniform_location(flat_program, "uMVP") {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, &mvp.to_cols_array());
            }
            if let Some(loc) = gl.get_uniform_location(flat_program, "uColor") {
                gl.uniform_3_f32(Some(&loc), 0.0, 0.0, 0.0);
            }
            gl.line_width(1.5);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, self.ebo_line);
            for index in 0..self.store.len() {
                match visible(index) {
                    VoxelPass::Stop => break,
                    VoxelPass::Skip => continue,
                    VoxelPass::Draw => {}
                }
                gl.draw_elements(
                    glow::LINES,
                    LINE_INDICES_PER_VOXEL as i32,
                    glow::UNSIGNED_INT,
                    (index * LINE_INDICES_PER_VOXEL * std::mem::size_of::<u32>()) as i32,
                );
            }
            gl.line_width(1.0);

            // Fill pass, pushed back slightly so the wireframe stays crisp.
            gl.use_program(Some(lit_program));
            if let Some(loc) = gl.get_uniform_location(lit_program, "uMVP") {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, &mvp.to_cols_array());
            }
            if let Some(loc) = gl.get_uniform_location(lit_program, "uModel") {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, &Mat4::IDENTITY.to_cols_array());
            }
            if let Some(loc) = gl.get_uniform_location(lit_program, "uLightDir") {
                gl.uniform_3_f32(Some(&loc), LIGHT_DIR.x, LIGHT_DIR.y, LIGHT_DIR.z);
            }
            if let Some(loc) = gl.get_uniform_location(lit_program, "uAmbient") {
                gl.uniform_1_f32(Some(&loc), AMBIENT);
            }
            if let Some(loc) = gl.get_uniform_location(lit_program, "uDiffuseStrength") {
                gl.uniform_1_f32(Some(&loc), DIFFUSE_STRENGTH);
            }
            gl.enable(glow::POLYGON_OFFSET_FILL);
            gl.polygon_offset(1.0, 1.0);
            gl.enable(glow::CULL_FACE);
            gl.cull_face(glow::BACK);

            let mut drawn = 0usize;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, self.ebo_fill);
            for index in 0..self.store.len() {
                match visible(index) {
                    VoxelPass::Stop => break,
                    VoxelPass::Skip => continue,
                    VoxelPass::Draw => {}
                }
                gl.draw_elements(
                    glow::TRIANGLES,
                    TRI_INDICES_PER_VOXEL as i32,
                    glow::UNSIGNED_INT,
                    (index * TRI_INDICES_PER_VOXEL * std::mem::size_of::<u32>()) as i32,
                );
                drawn += 1;
            }
            self.drawn_voxels = drawn;

            gl.disable(glow::CULL_FACE);
            gl.disable(glow::POLYGON_OFFSET_FILL);
            gl.bind_vertex_array(None);

            if self.animation.mode() == AnimationMode::Celebrate {
                self.render_particles(gl, &view, &projection);
            }

            gl.disable(glow::SCISSOR_TEST);
        }
    }

    unsafe fn render_particles(&self, gl: &Context, view: &Mat4, projection: &Mat4) {
        unsafe {
            let (Some(flat_program), Some(vao)) = (self.flat_program, self.particle_vao) else {
                return;
            };
            gl.use_program(Some(flat_program));
            gl.bind_vertex_array(Some(vao));
            let mvp_loc = gl.get_uniform_location(flat_program, "uMVP");
            let color_loc = gl.get_uniform_location(flat_program, "uColor");
            for particle in self.animation.particles() {
                let mvp = *projection * *view * Mat4::from_translation(particle.position);
                if let Some(loc) = &mvp_loc {
                    gl.uniform_matrix_4_f32_slice(Some(loc), false, &mvp.to_cols_array());
                }
                if let Some(loc) = &color_loc {
                    gl.uniform_3_f32(
                        Some(loc),
                        particle.color.x,
                        particle.color.y,
                        particle.color.z,
                    );
                }
                gl.draw_elements(glow::TRIANGLES, 36, glow::UNSIGNED_INT, 0);
            }
            gl.bind_vertex_array(None);
        }
    }

    /// Release GL resources.
    ///
    /// # Safety
    /// Requires an active OpenGL context
    pub unsafe fn destroy_gl(&mut self, gl: &Context) {
        unsafe {
            if let Some(program) = self.lit_program.take() {
                gl.delete_program(program);
            }
            if let Some(program) = self.flat_program.take() {
                gl.delete_program(program);
            }
            if let Some(vao) = self.vao.take() {
                gl.delete_vertex_array(vao);
            }
            for buffer in [
                self.vbo.take(),
                self.ebo_fill.take(),
                self.ebo_line.take(),
                self.particle_vbo.take(),
                self.particle_ebo.take(),
            ]
            .into_iter()
            .flatten()
            {
                gl.delete_buffer(buffer);
            }
            if let Some(vao) = self.particle_vao.take() {
                gl.delete_vertex_array(vao);
            }
            self.gizmo.destroy_gl(gl);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VoxelPass {
    Draw,
    Skip,
    Stop,
}

/// Per-voxel draw decision, shared by the line and fill passes.
///
/// A preview view has no reveal front (`reveal` is `None`); the slicing
/// filter applies to every view that receives the same config.
fn voxel_pass(cell: glam::IVec3, reveal: Option<i32>, slicing: &SlicingConfig) -> VoxelPass {
    if let Some(radius) = reveal {
        // Draw order is sorted by Manhattan distance, so the first cell
        // past the reveal front ends the frame.
        if manhattan(cell) > radius {
            return VoxelPass::Stop;
        }
    }
    if slicing.admits(cell) {
        VoxelPass::Draw
    } else {
        VoxelPass::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn map_with(cells: &[(IVec3, u8)]) -> VoxelMap {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_replace_restarts_build() {
        let mut view = SceneView::new(true);
        for _ in 0..10 {
            view.tick();
        }
        view.replace_map(map_with(&[(IVec3::ZERO, 1)]));
        assert_eq!(view.animation().reveal_radius(), Some(0));
        assert_eq!(view.store().len(), 1);
    }

    #[test]
    fn test_preview_never_celebrates() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut view = SceneView::new(false);
        view.replace_map(map_with(&[(IVec3::ZERO, 1)]));
        view.celebrate(&mut rng);
        assert_eq!(view.animation().mode(), AnimationMode::Idle);
        assert!(view.animation().particles().is_empty());
    }

    #[test]
    fn test_interactive_celebration() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut view = SceneView::new(true);
        view.replace_map(map_with(&[(IVec3::ZERO, 1), (IVec3::new(1, 0, 0), 2)]));
        view.celebrate(&mut rng);
        assert_eq!(view.animation().mode(), AnimationMode::Celebrate);
        assert!(!view.animation().particles().is_empty());
    }

    #[test]
    fn test_slicing_filters_preview_and_live_alike() {
        let mut slicing = SlicingConfig::default();
        slicing.x.enabled = true;
        slicing.x.cutoff = 0;
        let hidden = IVec3::new(2, 0, 0);
        let shown = IVec3::new(-1, 0, 0);
        // The preview has no reveal front; a fully revealed live view must
        // apply the same cutoffs.
        for reveal in [None, Some(crate::animation::BUILD_TERMINAL_TICK)] {
            assert_eq!(voxel_pass(hidden, reveal, &slicing), VoxelPass::Skip);
            assert_eq!(voxel_pass(shown, reveal, &slicing), VoxelPass::Draw);
        }
        let unsliced = SlicingConfig::default();
        assert_eq!(voxel_pass(hidden, None, &unsliced), VoxelPass::Draw);
    }

    #[test]
    fn test_reveal_front_stops_draw_order() {
        let slicing = SlicingConfig::default();
        assert_eq!(
            voxel_pass(IVec3::new(2, 1, 0), Some(1), &slicing),
            VoxelPass::Stop
        );
        assert_eq!(
            voxel_pass(IVec3::new(1, 0, 0), Some(1), &slicing),
            VoxelPass::Draw
        );
    }

    #[test]
    fn test_viewport_aspect() {
        let viewport = Viewport {
            x: 0,
            y: 0,
            width: 800,
            height: 400,
        };
        assert_eq!(viewport.aspect(), 2.0);
        let degenerate = Viewport {
            x: 0,
            y: 0,
            width: 800,
            height: 0,
        };
        assert_eq!(degenerate.aspect(), 1.0);
    }
}
