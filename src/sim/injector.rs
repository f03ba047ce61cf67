//! Injection controller
//!
//! Simulates continuous spawning by teleporting a random pooled body to the
//! gesture point every other frame. Bodies are never created or destroyed.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::gate::FrameGate;
use super::viewport::Viewport;
use super::world::PhysicsWorld;
use crate::consts::INJECT_MAX_HEIGHT;
use crate::input::PointerState;

/// A relocation performed this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Injection {
    pub slot: usize,
    pub position: Vec3,
}

/// Frame gate plus random slot/height selection
#[derive(Debug, Clone)]
pub struct Injector {
    gate: FrameGate,
    rng: Pcg32,
}

impl Injector {
    pub fn new(seed: u64) -> Self {
        Self {
            gate: FrameGate::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn gate(&self) -> &FrameGate {
        &self.gate
    }

    /// Run once per simulation frame.
    ///
    /// The gate always advances. On eligible frames with an active gesture a
    /// uniformly chosen body is moved to the gesture point at a random height
    /// in `[0, INJECT_MAX_HEIGHT)`. Selection is memoryless, so a body moved
    /// on a recent frame may be picked again.
    pub fn on_frame<W: PhysicsWorld + ?Sized>(
        &mut self,
        pointer: &PointerState,
        viewport: &Viewport,
        world: &mut W,
    ) -> Option<Injection> {
        if !self.gate.advance() {
            return None;
        }
        let screen = pointer.active_position()?;
        let count = world.body_count();
        if count == 0 {
            return None;
        }

        let sim = viewport.screen_to_sim(screen);
        let slot = self.rng.random_range(0..count);
        let height = self.rng.random_range(0.0..INJECT_MAX_HEIGHT);
        let position = Vec3::new(sim.x, height, sim.y);

        world.relocate(slot, position);
        Some(Injection { slot, position })
    }
}
