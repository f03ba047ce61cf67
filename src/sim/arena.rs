//! Reference physics world: a walled pit of equal-mass bodies
//!
//! Just enough physics to drive the pit: gravity, a floor, four walls and
//! body-body contacts, each reported with its closing speed. Boxes collide
//! as their circumscribed sphere.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::world::{CollisionEvent, PhysicsWorld, ShapeKind};
use crate::consts::{GRAVITY, RESTITUTION, WALL_OFFSET};

/// Tangential velocity kept per step while touching the floor
const FLOOR_FRICTION: f32 = 0.98;

/// A pooled body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec3,
    pub vel: Vec3,
}

/// Walled pit with a fixed pool of bodies
#[derive(Debug, Clone)]
pub struct PitWorld {
    bodies: Vec<Body>,
    shape: ShapeKind,
    /// Visual size: sphere radius or box half side
    size: f32,
    /// Collision radius derived from shape and size
    radius: f32,
    wall: f32,
}

impl PitWorld {
    /// Create `count` bodies scattered in `[-0.5, 0.5) x [0, 2) x [-0.5, 0.5)`
    pub fn new(count: usize, size: f32, shape: ShapeKind, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bodies = (0..count)
            .map(|_| Body {
                pos: Vec3::new(
                    rng.random::<f32>() - 0.5,
                    rng.random::<f32>() * 2.0,
                    rng.random::<f32>() - 0.5,
                ),
                vel: Vec3::ZERO,
            })
            .collect();

        let radius = match shape {
            ShapeKind::Sphere => size,
            ShapeKind::Box => size * 3.0f32.sqrt(),
        };

        Self {
            bodies,
            shape,
            size,
            radius,
            wall: WALL_OFFSET,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    fn integrate(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.vel.y -= GRAVITY * dt;
            body.pos += body.vel * dt;
        }
    }

    /// Resolve body-body overlaps, reporting one event per body
    fn resolve_pairs(&mut self, on_contact: &mut dyn FnMut(CollisionEvent)) {
        let r = self.radius;
        let min_dist = 2.0 * r;
        let n = self.bodies.len();

        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (self.bodies[i], self.bodies[j]);
                let delta = b.pos - a.pos;
                let dist_sq = delta.length_squared();
                if dist_sq >= min_dist * min_dist {
                    continue;
                }

                let dist = dist_sq.sqrt();
                // Coincident centers: separate vertically
                let normal = if dist > 1e-6 { delta / dist } else { Vec3::Y };
                let correction = normal * ((min_dist - dist) * 0.5);

                let vn = (b.vel - a.vel).dot(normal);
                let (mut va, mut vb) = (a.vel, b.vel);
                if vn < 0.0 {
                    // Equal masses share the impulse
                    let j_imp = -(1.0 + RESTITUTION) * vn * 0.5;
                    va -= normal * j_imp;
                    vb += normal * j_imp;
                }

                self.bodies[i] = Body {
                    pos: a.pos - correction,
                    vel: va,
                };
                self.bodies[j] = Body {
                    pos: b.pos + correction,
                    vel: vb,
                };

                let closing = -vn;
                let point = a.pos + normal * (dist * 0.5);
                on_contact(CollisionEvent::new(i, closing, point));
                on_contact(CollisionEvent::new(j, closing, point));
            }
        }
    }

    /// Clamp bodies to the floor and walls, reporting each boundary contact
    fn resolve_bounds(&mut self, on_contact: &mut dyn FnMut(CollisionEvent)) {
        let r = self.radius;
        let limit = self.wall - r;

        for (slot, body) in self.bodies.iter_mut().enumerate() {
            if body.pos.y < r {
                body.pos.y = r;
                let closing = -body.vel.y;
                if body.vel.y < 0.0 {
                    body.vel.y = -body.vel.y * RESTITUTION;
                }
                body.vel.x *= FLOOR_FRICTION;
                body.vel.z *= FLOOR_FRICTION;
                let point = Vec3::new(body.pos.x, 0.0, body.pos.z);
                on_contact(CollisionEvent::new(slot, closing, point));
            }

            for axis in [0usize, 2] {
                let p = body.pos[axis];
                if p.abs() <= limit {
                    continue;
                }
                let side = p.signum();
                body.pos[axis] = side * limit;
                let closing = body.vel[axis] * side;
                if closing > 0.0 {
                    body.vel[axis] = -body.vel[axis] * RESTITUTION;
                }
                let mut point = body.pos;
                point[axis] = side * self.wall;
                on_contact(CollisionEvent::new(slot, closing, point));
            }
        }
    }
}

impl PhysicsWorld for PitWorld {
    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn position(&self, slot: usize) -> Option<Vec3> {
        self.bodies.get(slot).map(|b| b.pos)
    }

    fn relocate(&mut self, slot: usize, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(slot) {
            body.pos = position;
            body.vel = Vec3::ZERO;
        }
    }

    fn step(&mut self, dt: f32, on_contact: &mut dyn FnMut(CollisionEvent)) {
        self.integrate(dt);
        self.resolve_pairs(on_contact);
        self.resolve_bounds(on_contact);
    }
}
