use glow::Context;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use lattice::{
    evaluate, is_complete, score, CompletionOutcome, ProgressStore, Settings, ZeroRule,
};
use renderer::{
    axis_labels, OrbitCamera, SceneView, SlicingConfig, Viewport, TICK_INTERVAL_MS,
};
use scripting::LuaRule;
use tracing::{error, info, warn};

use crate::levels::LevelManager;
use crate::ui::{control_panel, StatusLine, UiState};

/// Pause after the last keystroke before the rule is recompiled
const EDIT_DEBOUNCE: Duration = Duration::from_millis(500);

const WINDOW_WIDTH: f32 = 1280.0;
const WINDOW_HEIGHT: f32 = 800.0;
const PANEL_WIDTH_PTS: f32 = 340.0;

pub struct GameApp {
    // Window and GL state
    window: Option<Window>,
    gl_context: Option<glutin::context::PossiblyCurrentContext>,
    gl_surface: Option<glutin::surface::Surface<WindowSurface>>,
    gl: Option<Arc<Context>>,

    // egui state
    egui_ctx: Option<egui::Context>,
    egui_state: Option<egui_winit::State>,
    painter: Option<egui_glow::Painter>,

    // Scene state
    live_view: SceneView,
    target_view: SceneView,
    camera: OrbitCamera,
    slicing: SlicingConfig,

    // Game state
    levels: LevelManager,
    progress: ProgressStore,
    settings: Settings,
    levels_dir: PathBuf,
    code: String,
    status: StatusLine,
    was_complete: bool,

    // Input state
    dragging: bool,
    last_mouse_pos: Option<(f64, f64)>,

    // Timing
    last_frame: Instant,
    tick_accumulator: Duration,
    code_dirty_at: Option<Instant>,

    // Layout, left edge of the scene area in egui points from last frame
    scene_left_pts: f32,
}

impl GameApp {
    pub fn new(levels_dir: PathBuf, progress_file: PathBuf, settings_file: PathBuf) -> Self {
        let settings = Settings::load(&settings_file);
        let progress = ProgressStore::load(progress_file);
        let levels = LevelManager::new(&levels_dir);
        if levels.is_empty() {
            warn!("no levels found in {}", levels_dir.display());
        }
        let code = levels.starter_code(&progress);

        Self {
            window: None,
            gl_context: None,
            gl_surface: None,
            gl: None,
            egui_ctx: None,
            egui_state: None,
            painter: None,
            live_view: SceneView::new(true),
            target_view: SceneView::new(false),
            camera: OrbitCamera::new(),
            slicing: SlicingConfig::default(),
            levels,
            progress,
            settings,
            levels_dir,
            code,
            status: StatusLine::default(),
            was_complete: false,
            dragging: false,
            last_mouse_pos: None,
            last_frame: Instant::now(),
            tick_accumulator: Duration::ZERO,
            code_dirty_at: None,
            scene_left_pts: PANEL_WIDTH_PTS,
        }
    }

    /// Recompile the editor contents and refresh the live scene.
    ///
    /// A rule that fails to compile or smoke-test clears the scene and reports
    /// the error; it never counts as a completion.
    fn update_scene(&mut self) {
        let rule = match LuaRule::compile(&self.code) {
            Ok(rule) => rule,
            Err(e) => {
                // The broken rule stays in the editor; the scene falls back
                // to the constant-zero rule until the next successful compile.
                let first_line = e.to_string().lines().next().unwrap_or_default().to_string();
                self.status = StatusLine::error(first_line);
                self.live_view.replace_map(evaluate(&ZeroRule));
                self.was_complete = false;
                return;
            }
        };

        let map = evaluate(&rule);
        let voxels = map.len();

        let complete = self
            .levels
            .current()
            .map(|level| is_complete(&map, &level.target))
            .unwrap_or(false);

        self.live_view.replace_map(map);

        if complete {
            let level_id = self.levels.current().map(|l| l.id.clone()).unwrap_or_default();
            let points = score(&self.code);
            match self.progress.record(&level_id, points, &self.code) {
                Ok(CompletionOutcome::NewBest { score }) => {
                    self.status =
                        StatusLine::success(format!("Level complete! Score {score}, new best"));
                }
                Ok(CompletionOutcome::Repeat { score }) => {
                    let best = self.progress.best_score(&level_id);
                    self.status = StatusLine::success(format!(
                        "Level complete! Score {score}, best {best}"
                    ));
                }
                Err(e) => {
                    error!("cannot save progress: {}", e);
                    self.status = StatusLine::error(format!("progress not saved: {e}"));
                }
            }
            if !self.was_complete {
                self.live_view.celebrate(&mut rand::rng());
            }
            self.was_complete = true;
        } else {
            self.status = StatusLine::info(format!("{voxels} voxels"));
            self.was_complete = false;
        }
    }

    /// Switch levels: reload the editor and both scenes
    fn open_level(&mut self, index: usize) {
        self.levels.select(index);
        self.code = self.levels.starter_code(&self.progress);
        self.code_dirty_at = None;
        self.was_complete = false;
        if let Some(level) = self.levels.current() {
            info!(level = %level.name, "opening level");
            self.target_view.replace_map(level.target.clone());
        } else {
            self.target_view.clear();
        }
        self.update_scene();
    }

    fn save_scene_as_level(&mut self) {
        let voxels = self.live_view.store().voxels().clone();
        match lattice::save_custom_level(&self.levels_dir, "Custom", &voxels) {
            Ok(path) => {
                self.status = StatusLine::info(format!("saved {}", path.display()));
                // Reload so the new file shows up, keeping the selection.
                let current = self.levels.current().map(|l| l.id.clone());
                self.levels = LevelManager::new(&self.levels_dir);
                if let Some(index) = current.and_then(|id| self.levels.index_of(&id)) {
                    self.levels.select(index);
                }
            }
            Err(e) => self.status = StatusLine::error(format!("save failed: {e}")),
        }
    }

    fn egui_wants_pointer(&self) -> bool {
        self.egui_ctx
            .as_ref()
            .map(|ctx| ctx.wants_pointer_input())
            .unwrap_or(false)
    }

    /// Viewports for the target preview (top) and live scene (bottom),
    /// in physical pixels with a GL bottom-left origin
    fn scene_viewports(&self, width: u32, height: u32, ppp: f32) -> (Viewport, Viewport) {
        let left = (self.scene_left_pts * ppp) as i32;
        let scene_width = (width as i32 - left).max(1);
        let half = (height as i32 / 2).max(1);
        let target = Viewport {
            x: left,
            y: half,
            width: scene_width,
            height: height as i32 - half,
        };
        let live = Viewport {
            x: left,
            y: 0,
            width: scene_width,
            height: half,
        };
        (target, live)
    }

    fn render(&mut self, _event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            return;
        }

        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        self.tick_accumulator += delta;
        let tick = Duration::from_millis(TICK_INTERVAL_MS);
        while self.tick_accumulator >= tick {
            self.live_view.tick();
            self.target_view.tick();
            self.tick_accumulator -= tick;
        }

        if let Some(dirty_at) = self.code_dirty_at {
            if dirty_at.elapsed() >= EDIT_DEBOUNCE {
                self.code_dirty_at = None;
                self.update_scene();
            }
        }

        let window = self.window.as_ref().unwrap();
        let size = window.inner_size();
        let egui_ctx = self.egui_ctx.as_ref().unwrap().clone();
        let ppp = egui_ctx.pixels_per_point();
        let (target_viewport, live_viewport) = self.scene_viewports(size.width, size.height, ppp);

        {
            let gl = self.gl.as_ref().unwrap().clone();
            unsafe {
                use glow::HasContext;
                gl.viewport(0, 0, size.width as i32, size.height as i32);
                gl.clear_color(0.0, 0.0, 0.0, 1.0);
                gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
                // Both viewports share the camera and the slicing config so
                // the player can compare interiors against the target.
                self.target_view
                    .render(&gl, &self.camera, &self.slicing, target_viewport);
                self.live_view
                    .render(&gl, &self.camera, &self.slicing, live_viewport);
            }
        }

        // Coordinate labels are screen-space text, drawn by egui on top of
        // the GL scene.
        let mut labels = Vec::new();
        for viewport in [target_viewport, live_viewport] {
            labels.extend(self.project_labels(viewport, size.height as f32, ppp));
        }

        let mut ui_state = UiState::new();
        ui_state.level_names = self.levels.names();
        ui_state.current_level = self.levels.current_index();
        ui_state.code = self.code.clone();
        ui_state.status = self.status.clone();
        ui_state.slicing = self.slicing;
        ui_state.developer_mode = self.settings.developer_mode;
        ui_state.has_next = self.levels.has_next();
        ui_state.voxel_count = self.live_view.store().len();
        ui_state.drawn_voxels = self.live_view.drawn_voxels();
        if let Some(level) = self.levels.current() {
            ui_state.best_score = self.progress.best_score(&level.id);
            ui_state.completed = self.progress.is_completed(&level.id);
        }

        let egui_state = self.egui_state.as_mut().unwrap();
        let raw_input = egui_state.take_egui_input(window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            control_panel(ctx, &mut ui_state);
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Background,
                egui::Id::new("axis_labels"),
            ));
            for (pos, text, color) in &labels {
                painter.text(
                    *pos,
                    egui::Align2::CENTER_CENTER,
                    text,
                    egui::FontId::proportional(13.0),
                    *color,
                );
            }
        });
        egui_state.handle_platform_output(window, full_output.platform_output);
        self.scene_left_pts = egui_ctx.available_rect().left();

        // Apply panel actions after the frame.
        self.slicing = ui_state.slicing;
        if ui_state.code_edited {
            self.code = ui_state.code.clone();
            self.code_dirty_at = Some(Instant::now());
        }
        if ui_state.run_requested {
            self.code = ui_state.code.clone();
            self.code_dirty_at = None;
            self.update_scene();
        }
        if let Some(index) = ui_state.selected_level {
            self.open_level(index);
        }
        if ui_state.next_requested && self.levels.advance() {
            self.open_level(self.levels.current_index());
        }
        if ui_state.save_requested {
            self.save_scene_as_level();
        }

        let clipped_primitives =
            egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let painter = self.painter.as_mut().unwrap();
        painter.paint_and_update_textures(
            [size.width, size.height],
            full_output.pixels_per_point,
            &clipped_primitives,
            &full_output.textures_delta,
        );

        let window = self.window.as_ref().unwrap();
        let gl_surface = self.gl_surface.as_ref().unwrap();
        let gl_context = self.gl_context.as_ref().unwrap();
        if let Err(e) = gl_surface.swap_buffers(gl_context) {
            error!("swap_buffers failed: {}", e);
        }

        window.request_redraw();
    }

    /// Project the gizmo labels of one viewport into egui screen points
    fn project_labels(
        &self,
        viewport: Viewport,
        window_height: f32,
        ppp: f32,
    ) -> Vec<(egui::Pos2, String, egui::Color32)> {
        let mvp = self.camera.projection_matrix(viewport.aspect()) * self.camera.view_matrix();
        axis_labels(&self.camera)
            .into_iter()
            .filter_map(|label| {
                let clip = mvp * label.position.extend(1.0);
                if clip.w <= 0.0 {
                    return None;
                }
                let ndc = clip.truncate() / clip.w;
                if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
                    return None;
                }
                let px = viewport.x as f32 + (ndc.x * 0.5 + 0.5) * viewport.width as f32;
                let py = viewport.y as f32 + (ndc.y * 0.5 + 0.5) * viewport.height as f32;
                let pos = egui::pos2(px / ppp, (window_height - py) / ppp);
                let color = egui::Color32::from_rgb(
                    (label.color.x * 255.0) as u8,
                    (label.color.y * 255.0) as u8,
                    (label.color.z * 255.0) as u8,
                );
                Some((pos, label.text, color))
            })
            .collect()
    }

    fn cleanup(&mut self) {
        if let Some(mut painter) = self.painter.take() {
            if self.gl.is_some() {
                painter.destroy();
            }
        }
        self.egui_state = None;
        self.egui_ctx = None;

        if let Some(gl) = &self.gl {
            unsafe {
                self.live_view.destroy_gl(gl);
                self.target_view.destroy_gl(gl);
            }
        }

        // Surface must be released before the context.
        self.gl = None;
        self.gl_surface = None;
        self.gl_context = None;
        self.window = None;
    }
}

impl ApplicationHandler for GameApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("Voxel Rules")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_transparency(false);

        let display_builder =
            DisplayBuilder::new().with_window_attributes(Some(window_attributes));

        let (window, gl_config) = match display_builder.build(event_loop, template, |configs| {
            configs
                .reduce(|accum, config| {
                    if config.num_samples() > accum.num_samples() {
                        config
                    } else {
                        accum
                    }
                })
                .unwrap()
        }) {
            Ok(built) => built,
            Err(e) => {
                error!("cannot create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let Some(window) = window else {
            error!("display builder returned no window");
            event_loop.exit();
            return;
        };

        let window_handle = window.window_handle().ok().map(|h| h.as_raw());
        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(3, 0))))
            .build(window_handle);

        let gl_context = match unsafe { gl_display.create_context(&gl_config, &context_attributes) }
        {
            Ok(ctx) => ctx,
            Err(e) => {
                error!("cannot create GL context: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            window_handle.unwrap(),
            NonZeroU32::new(size.width.max(1)).unwrap(),
            NonZeroU32::new(size.height.max(1)).unwrap(),
        );

        let gl_surface = match unsafe { gl_display.create_window_surface(&gl_config, &attrs) } {
            Ok(surface) => surface,
            Err(e) => {
                error!("cannot create GL surface: {}", e);
                event_loop.exit();
                return;
            }
        };

        let gl_context = match gl_context.make_current(&gl_surface) {
            Ok(ctx) => ctx,
            Err(e) => {
                error!("cannot make GL context current: {}", e);
                event_loop.exit();
                return;
            }
        };

        let gl = Arc::new(unsafe {
            Context::from_loader_function_cstr(|s| gl_display.get_proc_address(s))
        });

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let painter = match egui_glow::Painter::new(gl.clone(), "", None, false) {
            Ok(painter) => painter,
            Err(e) => {
                error!("cannot create egui painter: {}", e);
                event_loop.exit();
                return;
            }
        };

        unsafe {
            if let Err(e) = self.live_view.init_gl(&gl) {
                error!("scene init failed: {}", e);
                event_loop.exit();
                return;
            }
            if let Err(e) = self.target_view.init_gl(&gl) {
                error!("target preview init failed: {}", e);
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
        self.gl_context = Some(gl_context);
        self.gl_surface = Some(gl_surface);
        self.gl = Some(gl);
        self.egui_ctx = Some(egui_ctx);
        self.egui_state = Some(egui_state);
        self.painter = Some(painter);

        self.open_level(self.levels.current_index());
        info!("game initialized");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let _ = egui_state.on_window_event(window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.cleanup();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let (Some(gl_surface), Some(gl_context)) =
                    (self.gl_surface.as_ref(), self.gl_context.as_ref())
                {
                    if let (Some(w), Some(h)) =
                        (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                    {
                        gl_surface.resize(gl_context, w, h);
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    let pressed = state == ElementState::Pressed;
                    self.dragging = pressed && !self.egui_wants_pointer();
                    if !pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.dragging {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let delta_x = (position.x - last_x) as f32;
                        let delta_y = (position.y - last_y) as f32;
                        self.camera.handle_mouse_drag(delta_x, delta_y);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if !self.egui_wants_pointer() {
                    let scroll = match delta {
                        MouseScrollDelta::LineDelta(_x, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                    };
                    self.camera.handle_scroll(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render(event_loop);
            }
            _ => {}
        }
    }
}
