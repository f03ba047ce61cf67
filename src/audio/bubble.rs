//! Collision-to-bubble mapping
//!
//! One uniform draw `r` picks the bubble size: small bubbles are short, high
//! and glide fast, large ones are longer and lower. A second draw `r2`
//! squares the loudness down so most contacts are quiet. Impact velocity only
//! scales loudness, and only below `VELOCITY_TH`.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::command::{BubbleCommand, CommandSink, SynthCommand};
use super::voice::VoiceAllocator;
use crate::consts::*;
use crate::map_range;
use crate::sim::world::CollisionEvent;

/// Where the inaudible-amplitude floor is tested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloorCheck {
    /// Test the raw amplitude, then attenuate by velocity. Soft contacts can
    /// end up below the floor and still sound.
    #[default]
    BeforeAttenuation,
    /// Test the final, velocity-attenuated amplitude
    AfterAttenuation,
}

/// Timbre of one bubble, before velocity and output gain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleParams {
    pub amplitude: f32,
    pub sustain: f32,
    pub frequency: f32,
    pub accelerate: f32,
    pub lowpass: f32,
}

impl BubbleParams {
    /// Derive parameters from the size draw `r` and loudness draw `r2`, both in [0, 1)
    pub fn from_draws(r: f32, r2: f32) -> Self {
        let sustain = map_range(r, 0.0, 1.0, 1.0 / SIZE_MAX, (1.0 / SIZE_MIN).min(0.08)) * 1.2;
        let frequency = map_range(r.sqrt(), 0.0, 1.0, SIZE_MAX * SIZE_MAX, SIZE_MIN * SIZE_MIN);
        let accelerate = map_range(
            r,
            0.0,
            1.0,
            (300.0 / SIZE_MAX).sqrt(),
            (300.0 / SIZE_MIN).sqrt(),
        );
        let amplitude =
            map_range(r * r, 0.0, 1.0, 0.1, 1.0) * map_range(r2 * r2, 0.0, 1.0, 0.0, 1.0);

        Self {
            amplitude,
            sustain,
            frequency,
            accelerate,
            lowpass: LOWPASS_HZ,
        }
    }
}

/// Loudness factor for an impact: `min(v / VELOCITY_TH, 1)^0.8` below the
/// threshold, 1 at or above it
#[inline]
pub fn velocity_gain(velocity: f32) -> f32 {
    if velocity < VELOCITY_TH {
        (velocity / VELOCITY_TH).min(1.0).powf(0.8)
    } else {
        1.0
    }
}

/// Final amplitude for an impact, or `None` if the event is inaudible
pub fn attenuate(raw_amplitude: f32, velocity: f32, floor: FloorCheck) -> Option<f32> {
    match floor {
        FloorCheck::BeforeAttenuation => {
            if raw_amplitude < AMPLITUDE_FLOOR {
                return None;
            }
            Some(raw_amplitude * velocity_gain(velocity))
        }
        FloorCheck::AfterAttenuation => {
            let amplitude = raw_amplitude * velocity_gain(velocity);
            (amplitude >= AMPLITUDE_FLOOR).then_some(amplitude)
        }
    }
}

/// Turns collision events into bubble commands
#[derive(Debug, Clone)]
pub struct BubbleVoicer {
    rng: Pcg32,
    voices: VoiceAllocator,
    floor: FloorCheck,
    muted: bool,
}

impl BubbleVoicer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            voices: VoiceAllocator::new(),
            floor: FloorCheck::default(),
            muted: false,
        }
    }

    pub fn with_floor_check(mut self, floor: FloorCheck) -> Self {
        self.floor = floor;
        self
    }

    /// Muted voicers drop every event without consuming voice ids
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn voices(&self) -> &VoiceAllocator {
        &self.voices
    }

    /// Map an event to a command using caller-supplied draws.
    ///
    /// Consumes a voice id only when a command is produced.
    pub fn voice_with_draws(
        &mut self,
        event: &CollisionEvent,
        r: f32,
        r2: f32,
    ) -> Option<BubbleCommand> {
        let velocity = event.impact_velocity.max(0.0);
        if velocity < VELOCITY_MIN_THRESHOLD || self.muted {
            return None;
        }

        let params = BubbleParams::from_draws(r, r2);
        let amplitude = attenuate(params.amplitude, velocity, self.floor)?;

        Some(BubbleCommand {
            amplitude: amplitude * OUTPUT_GAIN,
            sustain: params.sustain,
            delay: 0.0,
            frequency: params.frequency,
            accelerate: params.accelerate,
            lowpass: params.lowpass,
            voice_id: self.voices.next_id(),
        })
    }

    /// Map an event to a command, drawing from the voicer's own RNG
    pub fn voice(&mut self, event: &CollisionEvent) -> Option<BubbleCommand> {
        // Sub-threshold contacts are the bulk of all events; skip the draws
        if event.impact_velocity < VELOCITY_MIN_THRESHOLD || self.muted {
            return None;
        }
        let r: f32 = self.rng.random();
        let r2: f32 = self.rng.random();
        self.voice_with_draws(event, r, r2)
    }

    /// Voice an event and hand the command to `sink`. Returns true if something was sent.
    pub fn on_collision<S: CommandSink + ?Sized>(
        &mut self,
        event: &CollisionEvent,
        sink: &mut S,
    ) -> bool {
        match self.voice(event) {
            Some(cmd) => {
                log::trace!(
                    "Bubble {} for body {} at {:.2} u/s",
                    cmd.voice_id,
                    event.body,
                    event.impact_velocity
                );
                sink.dispatch(SynthCommand::Bubble(cmd));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::command::QueueSink;
    use glam::Vec3;
    use proptest::prelude::*;

    fn hit(v: f32) -> CollisionEvent {
        CollisionEvent::new(0, v, Vec3::ZERO)
    }

    #[test]
    fn test_params_at_draw_extremes() {
        let small = BubbleParams::from_draws(0.0, 1.0);
        assert!((small.sustain - 0.012).abs() < 1e-6);
        assert!((small.frequency - 10_000.0).abs() < 1e-2);
        assert!((small.accelerate - 3.0f32.sqrt()).abs() < 1e-5);
        assert!((small.amplitude - 0.1).abs() < 1e-6);

        // r -> 1: sustain bound is min(1/18, 0.08) = 1/18
        let large = BubbleParams::from_draws(1.0, 1.0);
        assert!((large.sustain - 1.2 / 18.0).abs() < 1e-6);
        assert!((large.frequency - 324.0).abs() < 1e-2);
        assert!((large.accelerate - (300.0f32 / 18.0).sqrt()).abs() < 1e-4);
        assert!((large.amplitude - 1.0).abs() < 1e-6);
        assert_eq!(large.lowpass, 10_000.0);
    }

    #[test]
    fn test_second_draw_dampens() {
        assert_eq!(BubbleParams::from_draws(0.9, 0.0).amplitude, 0.0);
        let half = BubbleParams::from_draws(1.0, 0.5).amplitude;
        assert!((half - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_gain() {
        assert_eq!(velocity_gain(30.0), 1.0);
        assert_eq!(velocity_gain(40.0), 1.0);
        assert!((velocity_gain(15.0) - 0.5f32.powf(0.8)).abs() < 1e-6);
        assert_eq!(velocity_gain(0.0), 0.0);
    }

    #[test]
    fn test_sub_threshold_is_silent() {
        let mut voicer = BubbleVoicer::new(1);
        assert!(voicer.voice_with_draws(&hit(0.29), 0.8, 0.9).is_none());
        assert!(voicer.voice(&hit(0.29)).is_none());
        assert_eq!(voicer.voices().peek(), 1);
    }

    #[test]
    fn test_slow_impact_is_quieter_than_threshold_impact() {
        let mut voicer = BubbleVoicer::new(1);
        let slow = voicer.voice_with_draws(&hit(5.0), 0.8, 0.9).unwrap();
        let loud = voicer.voice_with_draws(&hit(30.0), 0.8, 0.9).unwrap();
        assert!(slow.amplitude < loud.amplitude);
        // Timbre depends only on the draw
        assert_eq!(slow.frequency, loud.frequency);
        assert_eq!(slow.sustain, loud.sustain);
    }

    #[test]
    fn test_fast_impact_is_not_attenuated() {
        let mut voicer = BubbleVoicer::new(1);
        let cmd = voicer.voice_with_draws(&hit(40.0), 0.8, 0.9).unwrap();
        let raw = BubbleParams::from_draws(0.8, 0.9).amplitude;
        assert!((cmd.amplitude - raw * OUTPUT_GAIN).abs() < 1e-6);
        assert_eq!(cmd.delay, 0.0);
        assert_eq!(cmd.lowpass, 10_000.0);
    }

    #[test]
    fn test_quiet_draw_is_dropped_without_consuming_voice() {
        let mut voicer = BubbleVoicer::new(1);
        // r2 = 0.05 -> raw amplitude <= 0.0025
        assert!(voicer.voice_with_draws(&hit(40.0), 0.5, 0.05).is_none());
        assert_eq!(voicer.voices().peek(), 1);
    }

    #[test]
    fn test_floor_before_attenuation_lets_soft_hits_through() {
        // raw = map(0.25, 0..1, 0.1..1) * 0.04 = 0.325 * 0.04 = 0.013 (above floor)
        // gain at v = 1 is (1/30)^0.8 ~ 0.066, final ~ 0.00086 (below floor)
        let (r, r2, v) = (0.5, 0.2, 1.0);
        let raw = BubbleParams::from_draws(r, r2).amplitude;
        assert!(raw >= AMPLITUDE_FLOOR);
        assert!(raw * velocity_gain(v) < AMPLITUDE_FLOOR);

        let mut before = BubbleVoicer::new(1).with_floor_check(FloorCheck::BeforeAttenuation);
        let cmd = before.voice_with_draws(&hit(v), r, r2).unwrap();
        assert!(cmd.amplitude < AMPLITUDE_FLOOR * OUTPUT_GAIN);

        let mut after = BubbleVoicer::new(1).with_floor_check(FloorCheck::AfterAttenuation);
        assert!(after.voice_with_draws(&hit(v), r, r2).is_none());
        assert_eq!(after.voices().peek(), 1);
    }

    #[test]
    fn test_floor_orderings_agree_on_loud_hits() {
        for floor in [FloorCheck::BeforeAttenuation, FloorCheck::AfterAttenuation] {
            let mut voicer = BubbleVoicer::new(1).with_floor_check(floor);
            let cmd = voicer.voice_with_draws(&hit(35.0), 0.7, 0.7).unwrap();
            assert_eq!(cmd.voice_id, 1);
        }
    }

    #[test]
    fn test_one_voice_per_command() {
        let mut voicer = BubbleVoicer::new(1);
        let mut sink = QueueSink::new();
        for _ in 0..5 {
            if let Some(c) = voicer.voice_with_draws(&hit(40.0), 0.6, 0.95) {
                sink.dispatch(SynthCommand::Bubble(c));
            }
        }
        let ids: Vec<u32> = sink.bubbles().map(|b| b.voice_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_muted_drops_everything() {
        let mut voicer = BubbleVoicer::new(1);
        voicer.set_muted(true);
        let mut sink = QueueSink::new();
        for _ in 0..50 {
            assert!(!voicer.on_collision(&hit(50.0), &mut sink));
        }
        assert!(sink.commands.is_empty());
        assert_eq!(voicer.voices().peek(), 1);
    }

    #[test]
    fn test_loudest_bubble_gets_only_output_gain() {
        let mut voicer = BubbleVoicer::new(1);
        let cmd = voicer.voice_with_draws(&hit(40.0), 1.0, 1.0).unwrap();
        assert!((cmd.amplitude - OUTPUT_GAIN).abs() < 1e-6);
    }

    #[test]
    fn test_random_voicing_stays_in_bounds() {
        let mut voicer = BubbleVoicer::new(2024);
        let mut sink = QueueSink::new();
        for i in 0..5000 {
            voicer.on_collision(&hit(0.3 + (i % 60) as f32), &mut sink);
        }
        assert!(sink.bubbles().count() > 0);
        for b in sink.bubbles() {
            assert!(b.amplitude >= 0.0 && b.amplitude <= OUTPUT_GAIN);
            assert!(b.frequency >= 324.0 - 1e-2 && b.frequency <= 10_000.0 + 1e-2);
            assert!(b.sustain > 0.0 && b.sustain <= 1.2 / 18.0 + 1e-6);
            assert!((1..=MAX_VOICE_ID).contains(&b.voice_id));
        }
    }

    proptest! {
        #[test]
        fn params_stay_in_range(r in 0.0f32..1.0, r2 in 0.0f32..1.0) {
            let p = BubbleParams::from_draws(r, r2);
            prop_assert!(p.amplitude >= 0.0 && p.amplitude <= 1.0 + 1e-6);
            prop_assert!(p.frequency >= 324.0 - 1e-2 && p.frequency <= 10_000.0 + 1e-2);
            prop_assert!(p.accelerate >= 3.0f32.sqrt() - 1e-4);
            prop_assert!(p.accelerate <= (300.0f32 / 18.0).sqrt() + 1e-4);
            prop_assert!(p.sustain >= 0.012 - 1e-6 && p.sustain <= 1.2 / 18.0 + 1e-6);
            prop_assert_eq!(p.lowpass, LOWPASS_HZ);
        }

        #[test]
        fn attenuation_never_amplifies(raw in 0.0f32..1.0, v in 0.3f32..60.0) {
            for floor in [FloorCheck::BeforeAttenuation, FloorCheck::AfterAttenuation] {
                if let Some(amp) = attenuate(raw, v, floor) {
                    prop_assert!(amp <= raw + 1e-6);
                    prop_assert!(amp >= 0.0);
                }
            }
        }
    }
}
