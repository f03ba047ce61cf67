//! Physics world seam
//!
//! The pit never integrates bodies itself. It talks to a world through
//! [`PhysicsWorld`]: step it, relocate pooled bodies, and receive one
//! [`CollisionEvent`] per contact while the step runs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A contact reported by the physics world during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Pool slot of the body the contact was reported for
    pub body: usize,
    /// Closing speed along the contact normal (>= 0)
    pub impact_velocity: f32,
    /// World-space contact point
    pub contact_point: Vec3,
}

impl CollisionEvent {
    /// Build an event, clamping malformed (negative or NaN) velocities to 0
    pub fn new(body: usize, impact_velocity: f32, contact_point: Vec3) -> Self {
        Self {
            body,
            impact_velocity: impact_velocity.max(0.0),
            contact_point,
        }
    }
}

/// What a contact on a body of some shape should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactResponse {
    /// Ignore the contact
    Silent,
    /// Route the contact through the bubble voicer
    Bubble,
}

/// Pooled body geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Sphere,
    Box,
}

impl ShapeKind {
    pub fn contact_response(&self) -> ContactResponse {
        match self {
            ShapeKind::Sphere => ContactResponse::Bubble,
            ShapeKind::Box => ContactResponse::Silent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Box => "box",
        }
    }
}

/// The physics collaborator driven by the pit
pub trait PhysicsWorld {
    /// Number of pooled bodies (fixed for the session)
    fn body_count(&self) -> usize;

    /// Current position of a pooled body
    fn position(&self, slot: usize) -> Option<Vec3>;

    /// Overwrite a pooled body's position. Out-of-range slots are ignored.
    fn relocate(&mut self, slot: usize, position: Vec3);

    /// Advance by `dt` seconds, calling `on_contact` synchronously for every contact
    fn step(&mut self, dt: f32, on_contact: &mut dyn FnMut(CollisionEvent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_clamps_negative_velocity() {
        let ev = CollisionEvent::new(3, -2.5, Vec3::ZERO);
        assert_eq!(ev.impact_velocity, 0.0);
        assert_eq!(ev.body, 3);

        let nan = CollisionEvent::new(0, f32::NAN, Vec3::ZERO);
        assert_eq!(nan.impact_velocity, 0.0);
    }

    #[test]
    fn test_only_spheres_bubble() {
        assert_eq!(ShapeKind::Sphere.contact_response(), ContactResponse::Bubble);
        assert_eq!(ShapeKind::Box.contact_response(), ContactResponse::Silent);
    }
}
