//! Top-down 2D canvas renderer
//!
//! Bodies are drawn in ascending height so the ones on top of the pile (and
//! freshly injected ones) cover the rest. Higher bodies are drawn lighter.

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{INJECT_MAX_HEIGHT, WALL_OFFSET};
use crate::input::PointerState;
use crate::sim::{Body, PitWorld, ShapeKind, Viewport};

const BACKGROUND: &str = "lightblue";
const FLOOR: &str = "#b8dce8";
const WALL: &str = "#8cc4d8";
const CURSOR: &str = "rgba(255, 255, 255, 0.6)";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Scratch list of body indices sorted by height
    order: Vec<usize>,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas,
            ctx,
            order: Vec::new(),
        })
    }

    /// Match the backing store to the viewport
    pub fn resize(&self, viewport: &Viewport) {
        self.canvas.set_width(viewport.width.max(1.0) as u32);
        self.canvas.set_height(viewport.height.max(1.0) as u32);
    }

    pub fn render(&mut self, world: &PitWorld, viewport: &Viewport, pointer: &PointerState) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);

        let ppu = viewport.pixels_per_unit();

        // Walls, then the floor inside them
        let wall = viewport.sim_to_screen(Vec2::splat(-WALL_OFFSET));
        let wall_size = 2.0 * WALL_OFFSET * ppu;
        ctx.set_fill_style_str(WALL);
        ctx.fill_rect(
            wall.x as f64,
            wall.y as f64,
            wall_size as f64,
            wall_size as f64,
        );
        let inset = 0.05 * ppu;
        ctx.set_fill_style_str(FLOOR);
        ctx.fill_rect(
            (wall.x + inset) as f64,
            (wall.y + inset) as f64,
            (wall_size - 2.0 * inset) as f64,
            (wall_size - 2.0 * inset) as f64,
        );

        let bodies = world.bodies();
        self.order.clear();
        self.order.extend(0..bodies.len());
        self.order
            .sort_by(|&a, &b| bodies[a].pos.y.total_cmp(&bodies[b].pos.y));

        let size = world.size() * ppu;
        for &i in &self.order {
            draw_body(ctx, &bodies[i], world.shape(), size, viewport);
        }

        if let Some(at) = pointer.active_position() {
            ctx.set_fill_style_str(CURSOR);
            ctx.begin_path();
            let _ = ctx.arc(
                at.x as f64,
                at.y as f64,
                (size * 1.5) as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
    }
}

fn draw_body(
    ctx: &CanvasRenderingContext2d,
    body: &Body,
    shape: ShapeKind,
    size: f32,
    viewport: &Viewport,
) {
    let at = viewport.sim_to_screen(Vec2::new(body.pos.x, body.pos.z));
    // 40% lightness on the floor, up to 85% at the injection ceiling
    let lift = (body.pos.y / INJECT_MAX_HEIGHT).clamp(0.0, 1.0);
    let color = format!("hsl(200, 30%, {:.0}%)", 40.0 + lift * 45.0);
    ctx.set_fill_style_str(&color);

    match shape {
        ShapeKind::Sphere => {
            ctx.begin_path();
            let _ = ctx.arc(
                at.x as f64,
                at.y as f64,
                size as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
        ShapeKind::Box => {
            ctx.fill_rect(
                (at.x - size) as f64,
                (at.y - size) as f64,
                (2.0 * size) as f64,
                (2.0 * size) as f64,
            );
        }
    }
}
