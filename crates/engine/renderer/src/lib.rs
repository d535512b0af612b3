//! Voxel scene rendering for the puzzle game
//!
//! This crate provides:
//! - **Mesh builder**: flat interleaved vertex records (24 vertices per
//!   voxel, position/normal/color) built from a [`lattice::VoxelStore`]
//! - **SceneView**: one viewport's worth of state (voxel store, animation,
//!   GL buffers), parameterized by an `interactive` flag instead of a
//!   widget subclass
//! - **Two-pass drawing**: a black wireframe pass and a lit fill pass over
//!   the same vertex buffer, filtered per voxel by slicing and build reveal
//! - **Animation controller**: Build / Celebrate / Idle state machine
//!   advanced once per fixed tick
//! - **Orbit camera** and the **gizmo** frame/axes/label anchors
//!
//! All GL entry points follow the `unsafe fn` + active-context convention;
//! everything else is plain testable data.

mod animation;
mod camera;
mod gizmo;
mod mesh;
mod scene;
mod shader_utils;
mod slicing;

pub use animation::{
    AnimationMode, AnimationState, Particle, BUILD_TERMINAL_TICK, CELEBRATE_PARTICLES,
    PARTICLE_LIFE, TICK_INTERVAL_MS,
};
pub use camera::OrbitCamera;
pub use gizmo::{axis_labels, AxisLabel, GizmoRenderer};
pub use mesh::{
    build_vertex_data, fill_indices, line_indices, FLOATS_PER_VERTEX, FLOATS_PER_VOXEL,
    LINE_INDICES_PER_VOXEL, TRI_INDICES_PER_VOXEL, VERTS_PER_VOXEL,
};
pub use scene::{SceneView, Viewport, AMBIENT, BACKGROUND_COLOR, DIFFUSE_STRENGTH, LIGHT_DIR};
pub use slicing::{AxisSlice, SlicingConfig};
