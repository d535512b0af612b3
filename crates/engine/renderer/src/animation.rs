//! Build and celebration animations, advanced on a fixed tick

use glam::Vec3;
use lattice::{palette_color, ColorId, MAX_RADIUS, PALETTE_LEN};
use rand::Rng;

/// Milliseconds between animation ticks
pub const TICK_INTERVAL_MS: u64 = 30;

/// Particles spawned per celebration
pub const CELEBRATE_PARTICLES: usize = 200;

/// Ticks a particle stays alive
pub const PARTICLE_LIFE: u32 = 100;

/// Tick at which the build reveal covers the whole lattice, plus slack
pub const BUILD_TERMINAL_TICK: i32 = MAX_RADIUS + 3;

const PARTICLE_STEP: f32 = 0.1;
const PARTICLE_GRAVITY: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationMode {
    /// Reveal voxels shell by shell, by Manhattan distance
    Build,
    /// Confetti burst after a completed level
    Celebrate,
    /// Nothing animates; used by the target preview
    Idle,
}

/// One confetti particle
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub life: u32,
    pub color: Vec3,
}

/// Per-view animation state machine.
///
/// An idle state never leaves `Idle`; reset and celebration requests are
/// ignored so the target preview stays static.
pub struct AnimationState {
    mode: AnimationMode,
    tick: i32,
    particles: Vec<Particle>,
}

impl AnimationState {
    /// State for the editable scene, starting mid-build
    pub fn interactive() -> Self {
        Self {
            mode: AnimationMode::Build,
            tick: 0,
            particles: Vec::new(),
        }
    }

    /// State for the read-only preview; all transitions are no-ops
    pub fn idle() -> Self {
        Self {
            mode: AnimationMode::Idle,
            tick: BUILD_TERMINAL_TICK,
            particles: Vec::new(),
        }
    }

    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Current reveal radius, present only while building.
    ///
    /// Voxels whose Manhattan distance exceeds this are not drawn yet.
    pub fn reveal_radius(&self) -> Option<i32> {
        match self.mode {
            AnimationMode::Build => Some(self.tick),
            _ => None,
        }
    }

    /// Restart the build reveal from the center
    pub fn reset_build(&mut self) {
        if self.mode == AnimationMode::Idle {
            return;
        }
        self.mode = AnimationMode::Build;
        self.tick = 0;
        self.particles.clear();
    }

    /// Burst confetti out of the scene centroid
    pub fn start_celebration(&mut self, centroid: Vec3, rng: &mut impl Rng) {
        if self.mode == AnimationMode::Idle {
            return;
        }
        self.mode = AnimationMode::Celebrate;
        self.particles.clear();
        for _ in 0..CELEBRATE_PARTICLES {
            let id = rng.random_range(1..=PALETTE_LEN as ColorId);
            self.particles.push(Particle {
                position: centroid,
                velocity: Vec3::new(
                    rng.random_range(-1.5..1.5),
                    rng.random_range(2.0..4.0),
                    rng.random_range(-1.5..1.5),
                ),
                life: PARTICLE_LIFE,
                color: palette_color(id).unwrap_or(Vec3::ONE),
            });
        }
    }

    /// Advance one tick
    pub fn tick(&mut self) {
        match self.mode {
            AnimationMode::Build => {
                if self.tick < BUILD_TERMINAL_TICK {
                    self.tick += 1;
                }
            }
            AnimationMode::Celebrate => {
                for p in &mut self.particles {
                    p.position += p.velocity * PARTICLE_STEP;
                    p.velocity.y -= PARTICLE_GRAVITY;
                    p.life -= 1;
                }
                self.particles.retain(|p| p.life > 0);
            }
            AnimationMode::Idle => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_build_reveal_grows_then_saturates() {
        let mut anim = AnimationState::interactive();
        assert_eq!(anim.reveal_radius(), Some(0));
        for _ in 0..5 {
            anim.tick();
        }
        assert_eq!(anim.reveal_radius(), Some(5));
        for _ in 0..100 {
            anim.tick();
        }
        assert_eq!(anim.reveal_radius(), Some(BUILD_TERMINAL_TICK));
    }

    #[test]
    fn test_celebration_spawns_and_decays() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut anim = AnimationState::interactive();
        anim.start_celebration(Vec3::ZERO, &mut rng);
        assert_eq!(anim.mode(), AnimationMode::Celebrate);
        assert_eq!(anim.particles().len(), CELEBRATE_PARTICLES);
        assert!(anim
            .particles()
            .iter()
            .all(|p| p.velocity.y >= 2.0 && p.velocity.y < 4.0));

        for _ in 0..PARTICLE_LIFE {
            anim.tick();
        }
        assert!(anim.particles().is_empty());
    }

    #[test]
    fn test_gravity_pulls_particles_down() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut anim = AnimationState::interactive();
        anim.start_celebration(Vec3::ZERO, &mut rng);
        let vy_before = anim.particles()[0].velocity.y;
        anim.tick();
        assert!(anim.particles()[0].velocity.y < vy_before);
    }

    #[test]
    fn test_reset_returns_to_build() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut anim = AnimationState::interactive();
        anim.start_celebration(Vec3::ZERO, &mut rng);
        anim.reset_build();
        assert_eq!(anim.mode(), AnimationMode::Build);
        assert_eq!(anim.reveal_radius(), Some(0));
        assert!(anim.particles().is_empty());
    }

    #[test]
    fn test_idle_ignores_transitions() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut anim = AnimationState::idle();
        anim.reset_build();
        assert_eq!(anim.mode(), AnimationMode::Idle);
        assert_eq!(anim.reveal_radius(), None);
        anim.start_celebration(Vec3::ZERO, &mut rng);
        assert_eq!(anim.mode(), AnimationMode::Idle);
        assert!(anim.particles().is_empty());
        anim.tick();
        assert_eq!(anim.mode(), AnimationMode::Idle);
    }
}
