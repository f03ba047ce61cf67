//! Synthesis commands and the sinks that carry them
//!
//! Commands are structured values inside the crate. They become the synth
//! engine's function-call text only when a sink formats them.

use std::fmt;

/// Parameters of one bubble voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleCommand {
    /// Output amplitude (already scaled by the output gain)
    pub amplitude: f32,
    /// Sustain time in seconds
    pub sustain: f32,
    /// Start delay in seconds (always 0 for collisions)
    pub delay: f32,
    /// Base frequency in Hz
    pub frequency: f32,
    /// Pitch glide rate
    pub accelerate: f32,
    /// Low-pass cutoff in Hz
    pub lowpass: f32,
    /// Voice slot id in 1..=MAX_VOICE_ID
    pub voice_id: u32,
}

/// A command for the external synth engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthCommand {
    /// Session init: bring up the bubble synth
    Init,
    /// Session init: master gain
    MasterGain(f32),
    /// Play one bubble
    Bubble(BubbleCommand),
}

impl fmt::Display for SynthCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthCommand::Init => write!(f, "initBubbleSynth()"),
            SynthCommand::MasterGain(gain) => write!(f, "setBubbleGain({gain})"),
            SynthCommand::Bubble(b) => write!(
                f,
                "playBubble({}, {}, {}, {}, {}, {}, {})",
                b.amplitude, b.sustain, b.delay, b.frequency, b.accelerate, b.lowpass, b.voice_id
            ),
        }
    }
}

/// Receiver of synth commands. Dispatch is fire-and-forget.
pub trait CommandSink {
    fn dispatch(&mut self, command: SynthCommand);
}

impl<F: FnMut(SynthCommand)> CommandSink for F {
    fn dispatch(&mut self, command: SynthCommand) {
        self(command)
    }
}

/// Keeps every command in memory (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct QueueSink {
    pub commands: Vec<SynthCommand>,
}

impl QueueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bubble commands only
    pub fn bubbles(&self) -> impl Iterator<Item = &BubbleCommand> {
        self.commands.iter().filter_map(|c| match c {
            SynthCommand::Bubble(b) => Some(b),
            _ => None,
        })
    }

    /// Take everything queued so far
    pub fn drain(&mut self) -> Vec<SynthCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl CommandSink for QueueSink {
    fn dispatch(&mut self, command: SynthCommand) {
        self.commands.push(command);
    }
}

/// Writes each command's text to the log and counts them
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    pub dispatched: u64,
}

impl CommandSink for LogSink {
    fn dispatch(&mut self, command: SynthCommand) {
        self.dispatched += 1;
        match command {
            SynthCommand::Bubble(_) => log::debug!("{command}"),
            _ => log::info!("{command}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_text() {
        assert_eq!(SynthCommand::Init.to_string(), "initBubbleSynth()");
        assert_eq!(SynthCommand::MasterGain(0.5).to_string(), "setBubbleGain(0.5)");

        let cmd = SynthCommand::Bubble(BubbleCommand {
            amplitude: 0.25,
            sustain: 0.5,
            delay: 0.0,
            frequency: 440.0,
            accelerate: 2.0,
            lowpass: 10_000.0,
            voice_id: 12,
        });
        assert_eq!(cmd.to_string(), "playBubble(0.25, 0.5, 0, 440, 2, 10000, 12)");
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |c: SynthCommand| seen.push(c);
            sink.dispatch(SynthCommand::Init);
        }
        assert_eq!(seen, vec![SynthCommand::Init]);
    }

    #[test]
    fn test_queue_sink_filters_bubbles() {
        let mut q = QueueSink::new();
        q.dispatch(SynthCommand::Init);
        q.dispatch(SynthCommand::MasterGain(1.0));
        assert_eq!(q.bubbles().count(), 0);
        assert_eq!(q.drain().len(), 2);
        assert!(q.commands.is_empty());
    }
}
