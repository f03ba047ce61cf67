//! Collision-driven bubble sounds
//!
//! Nothing here synthesizes audio. Collisions become [`SynthCommand`]s that a
//! [`CommandSink`] forwards to the synth engine:
//! - `bubble`: velocity and random draws to bubble parameters
//! - `voice`: cyclic voice ids
//! - `command`: the command values, their text form, and in-crate sinks
//! - `script`: browser sink that runs each command as a script (wasm32 only)

pub mod bubble;
pub mod command;
#[cfg(target_arch = "wasm32")]
pub mod script;
pub mod voice;

pub use bubble::{BubbleParams, BubbleVoicer, FloorCheck};
pub use command::{BubbleCommand, CommandSink, LogSink, QueueSink, SynthCommand};
#[cfg(target_arch = "wasm32")]
pub use script::ScriptSink;
pub use voice::VoiceAllocator;
