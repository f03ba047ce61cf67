//! Bubble Pit - an interactive particle pit that sounds like bubbles
//!
//! Core modules:
//! - `sim`: Frame gate, injection, viewport mapping and the physics world seam
//! - `audio`: Collision-to-sound mapping, voice ids and synthesis commands
//! - `input`: Pointer/touch gesture state
//! - `renderer`: Top-down 2D canvas view (wasm32 only)
//! - `settings`: Data-driven session configuration

pub mod audio;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Tuning constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one injection decision per step)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Half extent of the square floor reachable by injection
    pub const INJECT_HALF_EXTENT: f32 = 1.8;
    /// Injected bodies start at a random height in [0, INJECT_MAX_HEIGHT)
    pub const INJECT_MAX_HEIGHT: f32 = 2.0;
    /// Frame counter wraps back to 0 when it reaches this
    pub const FRAME_WINDOW: u32 = 60;

    /// Default pool capacity
    pub const POOL_SIZE: usize = 150;
    /// Largest pool a settings file may ask for
    pub const MAX_POOL_SIZE: usize = 1000;
    /// Default body radius (sphere radius, half side of a box)
    pub const BODY_RADIUS: f32 = 0.1;

    /// Arena walls sit at ±WALL_OFFSET on x and z
    pub const WALL_OFFSET: f32 = 2.5;
    /// Gravity along -y (units/s²)
    pub const GRAVITY: f32 = 9.82;
    /// Normal restitution for every contact
    pub const RESTITUTION: f32 = 0.3;

    /// Contacts slower than this are silent
    pub const VELOCITY_MIN_THRESHOLD: f32 = 0.3;
    /// Contacts at or above this are not attenuated
    pub const VELOCITY_TH: f32 = 30.0;
    /// Smallest bubble size (highest pitch bound)
    pub const SIZE_MIN: f32 = 18.0;
    /// Largest bubble size (lowest pitch bound)
    pub const SIZE_MAX: f32 = 100.0;
    /// Fixed low-pass cutoff in Hz
    pub const LOWPASS_HZ: f32 = 10_000.0;
    /// Events quieter than this are dropped
    pub const AMPLITUDE_FLOOR: f32 = 0.01;
    /// Final gain applied to every emitted amplitude
    pub const OUTPUT_GAIN: f32 = 0.3;
    /// Voice ids cycle through 1..=MAX_VOICE_ID
    pub const MAX_VOICE_ID: u32 = 3000;
}

/// Affine remap of `value` from `[from_min, from_max]` to `[to_min, to_max]`.
///
/// Values outside the source range extrapolate linearly. The source range
/// must not be empty (`from_min != from_max`).
#[inline]
pub fn map_range(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    let ratio = (to_max - to_min) / (from_max - from_min);
    (value - from_min) * ratio + to_min
}
