//! egui control panel: level picker, code editor, slicing and status

use egui::Color32;
use lattice::HALF;
use renderer::SlicingConfig;

/// Severity of the status line under the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Message shown under the code editor
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub severity: Severity,
    pub message: String,
}

impl StatusLine {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn color(&self) -> Color32 {
        match self.severity {
            Severity::Info => Color32::LIGHT_BLUE,
            Severity::Success => Color32::from_rgb(80, 220, 80),
            Severity::Error => Color32::from_rgb(255, 90, 90),
        }
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::info("")
    }
}

/// Panel state captured from the app, plus the actions the user requested
pub struct UiState {
    pub level_names: Vec<String>,
    pub current_level: usize,
    pub code: String,
    pub status: StatusLine,
    pub best_score: u32,
    pub completed: bool,
    pub voxel_count: usize,
    pub drawn_voxels: usize,
    pub slicing: SlicingConfig,
    pub developer_mode: bool,
    pub has_next: bool,

    // Actions, read back by the app after the frame
    pub selected_level: Option<usize>,
    pub code_edited: bool,
    pub run_requested: bool,
    pub next_requested: bool,
    pub save_requested: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            level_names: Vec::new(),
            current_level: 0,
            code: String::new(),
            status: StatusLine::default(),
            best_score: 0,
            completed: false,
            voxel_count: 0,
            drawn_voxels: 0,
            slicing: SlicingConfig::default(),
            developer_mode: false,
            has_next: false,
            selected_level: None,
            code_edited: false,
            run_requested: false,
            next_requested: false,
            save_requested: false,
        }
    }
}

/// Render the left control panel
pub fn control_panel(ctx: &egui::Context, state: &mut UiState) {
    egui::SidePanel::left("controls")
        .default_width(340.0)
        .show(ctx, |ui| {
            ui.heading("Voxel Rules");

            ui.separator();
            if !state.level_names.is_empty() {
                let mut selected = state.current_level;
                egui::ComboBox::from_label("Level").show_index(
                    ui,
                    &mut selected,
                    state.level_names.len(),
                    |i| state.level_names[i].clone(),
                );
                if selected != state.current_level {
                    state.selected_level = Some(selected);
                }
            } else {
                ui.label("No levels found");
            }

            if state.completed {
                ui.label(
                    egui::RichText::new(format!("Solved, best score {}", state.best_score))
                        .color(Color32::from_rgb(80, 220, 80)),
                );
            } else if state.best_score > 0 {
                ui.label(format!("Best score {}", state.best_score));
            }

            ui.separator();
            ui.label("rule(x, y, z):");
            let editor = ui.add(
                egui::TextEdit::multiline(&mut state.code)
                    .code_editor()
                    .font(egui::TextStyle::Monospace)
                    .desired_rows(14)
                    .desired_width(f32::INFINITY),
            );
            if editor.changed() {
                state.code_edited = true;
            }

            ui.horizontal(|ui| {
                if ui.button("Run").clicked() {
                    state.run_requested = true;
                }
                if state.completed && state.has_next && ui.button("Next level").clicked() {
                    state.next_requested = true;
                }
            });
            if state.completed && !state.has_next {
                ui.label(
                    egui::RichText::new("All levels finished!")
                        .color(Color32::from_rgb(80, 220, 80)),
                );
            }

            if !state.status.message.is_empty() {
                ui.label(egui::RichText::new(&state.status.message).color(state.status.color()));
            }

            ui.separator();
            ui.label(format!(
                "Voxels: {} ({} drawn)",
                state.voxel_count, state.drawn_voxels
            ));

            ui.separator();
            ui.heading("Slicing");
            axis_slice_row(ui, "X", &mut state.slicing.x);
            axis_slice_row(ui, "Y", &mut state.slicing.y);
            axis_slice_row(ui, "Z", &mut state.slicing.z);

            if state.developer_mode {
                ui.separator();
                ui.heading("Developer");
                if ui.button("Save scene as level").clicked() {
                    state.save_requested = true;
                }
            }

            ui.separator();
            ui.label("Left-drag in the scene to rotate, scroll to zoom.");
        });
}

fn axis_slice_row(ui: &mut egui::Ui, label: &str, slice: &mut renderer::AxisSlice) {
    ui.horizontal(|ui| {
        ui.checkbox(&mut slice.enabled, label);
        ui.add_enabled(
            slice.enabled,
            egui::Slider::new(&mut slice.cutoff, -HALF..=HALF),
        );
    });
}
