//! Screen to simulation space mapping
//!
//! The arena floor is square. On landscape viewports the playable horizontal
//! span is letterboxed to the central square; on portrait viewports it is
//! narrowed by `width_rate` so the floor keeps its aspect.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::INJECT_HALF_EXTENT;
use crate::input::ScreenPoint;
use crate::map_range;

/// Viewport size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// `min(W / H, 1)`
    #[inline]
    pub fn width_rate(&self) -> f32 {
        (self.width / self.height).min(1.0)
    }

    /// Horizontal letterbox margin on each side (0 on portrait viewports)
    #[inline]
    pub fn margin(&self) -> f32 {
        ((self.width - self.height) / 2.0).max(0.0)
    }

    fn sim_half_width(&self) -> f32 {
        INJECT_HALF_EXTENT * self.width_rate()
    }

    /// Map a screen point to simulation `(x, z)`, returned as `Vec2 { x, y: z }`.
    ///
    /// No clamping: points in the letterbox margins extrapolate past the floor.
    pub fn screen_to_sim(&self, point: ScreenPoint) -> Vec2 {
        let margin = self.margin();
        let half = self.sim_half_width();
        let x = map_range(point.x, margin, self.width - margin, -half, half);
        let z = map_range(
            point.y,
            0.0,
            self.height,
            -INJECT_HALF_EXTENT,
            INJECT_HALF_EXTENT,
        );
        Vec2::new(x, z)
    }

    /// Inverse of [`Viewport::screen_to_sim`]
    pub fn sim_to_screen(&self, sim: Vec2) -> ScreenPoint {
        let margin = self.margin();
        let half = self.sim_half_width();
        ScreenPoint {
            x: map_range(sim.x, -half, half, margin, self.width - margin),
            y: map_range(
                sim.y,
                -INJECT_HALF_EXTENT,
                INJECT_HALF_EXTENT,
                0.0,
                self.height,
            ),
        }
    }

    /// Screen pixels per simulation unit along x (for sizing sprites)
    pub fn pixels_per_unit(&self) -> f32 {
        (self.width - 2.0 * self.margin()) / (2.0 * self.sim_half_width())
    }
}
