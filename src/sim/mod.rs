//! Simulation side of the pit
//!
//! Everything here runs synchronously inside one frame:
//! - Viewport mapping from screen pixels to the arena floor
//! - Frame gate and injection (pooled bodies are relocated, never spawned)
//! - The physics world seam and a reference walled world
//! - The per-frame driver tying input, physics and sound together

pub mod arena;
pub mod gate;
pub mod injector;
pub mod pit;
pub mod viewport;
pub mod world;

pub use arena::{Body, PitWorld};
pub use gate::FrameGate;
pub use injector::{Injection, Injector};
pub use pit::{FrameReport, Pit, PitStats};
pub use viewport::Viewport;
pub use world::{CollisionEvent, ContactResponse, PhysicsWorld, ShapeKind};
