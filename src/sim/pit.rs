//! Per-frame driver for the pit
//!
//! Owns the gesture, viewport, injector, bubble voicer, physics world and
//! command sink. The platform loop calls [`Pit::frame`] once per simulation
//! step; everything inside runs synchronously.

use super::injector::{Injection, Injector};
use super::viewport::Viewport;
use super::world::{CollisionEvent, ContactResponse, PhysicsWorld, ShapeKind};
use crate::audio::{BubbleVoicer, CommandSink, SynthCommand};
use crate::input::{PointerState, ScreenPoint};
use crate::settings::Settings;

/// Running counters for the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PitStats {
    pub frames: u64,
    pub injections: u64,
    pub contacts: u64,
    pub sounds: u64,
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub injection: Option<Injection>,
    pub contacts: u32,
    pub sounds: u32,
}

pub struct Pit<W: PhysicsWorld, S: CommandSink> {
    world: W,
    sink: S,
    shape: ShapeKind,
    viewport: Viewport,
    pointer: PointerState,
    injector: Injector,
    voicer: BubbleVoicer,
    /// Sent to the synth once at start; bubble amplitudes never carry it
    volume: f32,
    started: bool,
    stats: PitStats,
}

impl<W: PhysicsWorld, S: CommandSink> Pit<W, S> {
    /// Build a pit around `world`; the injector and voicer derive their RNG streams from `seed`
    pub fn new(
        world: W,
        sink: S,
        shape: ShapeKind,
        viewport: Viewport,
        settings: &Settings,
        seed: u64,
    ) -> Self {
        let mut voicer =
            BubbleVoicer::new(seed.wrapping_add(1)).with_floor_check(settings.floor_check);
        voicer.set_muted(settings.muted);

        Self {
            world,
            sink,
            shape,
            viewport,
            pointer: PointerState::new(),
            injector: Injector::new(seed),
            voicer,
            volume: settings.master_volume.clamp(0.0, 1.0),
            started: false,
            stats: PitStats::default(),
        }
    }

    /// Replace the bubble voicer (custom seed or floor check)
    pub fn with_voicer(mut self, voicer: BubbleVoicer) -> Self {
        self.voicer = voicer;
        self
    }

    /// Send the two session-initialization commands. Later calls do nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.sink.dispatch(SynthCommand::Init);
        self.sink.dispatch(SynthCommand::MasterGain(self.volume));
        log::info!(
            "Pit started: {} {}s, volume {:.2}",
            self.world.body_count(),
            self.shape.as_str(),
            self.volume
        );
    }

    /// Run one simulation frame: maybe inject, then step physics and voice its contacts
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        let injection = self
            .injector
            .on_frame(&self.pointer, &self.viewport, &mut self.world);

        let mut contacts = 0u32;
        let mut sounds = 0u32;
        {
            let voicer = &mut self.voicer;
            let sink = &mut self.sink;
            let response = self.shape.contact_response();
            self.world.step(dt, &mut |event: CollisionEvent| {
                contacts += 1;
                if response == ContactResponse::Bubble && voicer.on_collision(&event, &mut *sink) {
                    sounds += 1;
                }
            });
        }

        self.stats.frames += 1;
        self.stats.injections += u64::from(injection.is_some());
        self.stats.contacts += u64::from(contacts);
        self.stats.sounds += u64::from(sounds);

        if let Some(inj) = injection {
            log::trace!("Injected body {} at {:?}", inj.slot, inj.position);
        }

        FrameReport {
            injection,
            contacts,
            sounds,
        }
    }

    // === Gestures ===

    pub fn gesture_start(&mut self, at: ScreenPoint) {
        self.pointer.start(at);
    }

    pub fn gesture_move(&mut self, to: ScreenPoint) {
        self.pointer.moved(to);
    }

    pub fn gesture_end(&mut self) {
        self.pointer.end();
    }

    // === Accessors ===

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn stats(&self) -> PitStats {
        self.stats
    }
}
