//! Cyclic voice id allocation
//!
//! The synth engine reuses voice slots by id. Ids run 1..=MAX_VOICE_ID and
//! wrap, which bounds the number of voices it ever has to track.

use crate::consts::MAX_VOICE_ID;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceAllocator {
    next: u32,
}

impl Default for VoiceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the current id and advance, wrapping past MAX_VOICE_ID to 1
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        if self.next > MAX_VOICE_ID {
            self.next = 1;
        }
        id
    }

    /// The id the next allocation will return
    pub fn peek(&self) -> u32 {
        self.next
    }
}
