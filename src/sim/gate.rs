//! Frame gate: halves the injection rate relative to the simulation rate

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_WINDOW;

/// Rolling frame counter in `[0, FRAME_WINDOW)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGate {
    counter: u32,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counter value
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Advance one frame. Returns true if this frame may inject (odd counts only).
    pub fn advance(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= FRAME_WINDOW {
            self.counter = 0;
        }
        self.counter % 2 == 1
    }
}
