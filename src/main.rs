//! Bubble Pit entry point
//!
//! The browser build wires canvas, input and the script sink to a pit and
//! runs it from `requestAnimationFrame`. The native build runs a scripted
//! headless session and logs every synth command.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use bubble_pit::Settings;
    use bubble_pit::audio::ScriptSink;
    use bubble_pit::consts::*;
    use bubble_pit::input::{InputMode, ScreenPoint, is_touch_primary};
    use bubble_pit::renderer::CanvasRenderer;
    use bubble_pit::sim::{Pit, PitWorld, Viewport};

    /// Game instance holding all state
    struct Game {
        pit: Pit<PitWorld, ScriptSink>,
        renderer: Option<CanvasRenderer>,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(settings: &Settings, viewport: Viewport) -> Self {
            let seed = settings.seed_or(js_sys::Date::now() as u64);
            let world = PitWorld::new(
                settings.pool_size,
                settings.body_radius,
                settings.shape,
                seed.wrapping_add(2),
            );
            log::info!("Pit initialized with seed: {}", seed);
            Self {
                pit: Pit::new(
                    world,
                    ScriptSink::new(),
                    settings.shape,
                    viewport,
                    settings,
                    seed,
                ),
                renderer: None,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run simulation frames
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.pit.frame(SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            // Drop the backlog instead of spiralling
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }
        }

        fn render(&mut self) {
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.render(self.pit.world(), self.pit.viewport(), self.pit.pointer());
            }
        }

        /// Gesture began: the first one also brings up the synth
        fn gesture_start(&mut self, at: ScreenPoint) {
            self.pit.start();
            self.pit.gesture_start(at);
        }
    }

    fn window_viewport() -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::new(1.0, 1.0);
        };
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        Viewport::new(w.max(1.0) as f32, h.max(1.0) as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bubble Pit starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        let viewport = window_viewport();
        let game = Rc::new(RefCell::new(Game::new(&settings, viewport)));

        match CanvasRenderer::new(canvas.clone()) {
            Some(renderer) => {
                renderer.resize(&viewport);
                game.borrow_mut().renderer = Some(renderer);
            }
            None => log::error!("2D canvas context unavailable - rendering disabled"),
        }

        // One modality per session
        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let mode = InputMode::from_touch_primary(is_touch_primary(&user_agent));
        log::info!("Input mode: {}", mode.as_str());

        match mode {
            InputMode::Mouse => setup_mouse_handlers(&canvas, game.clone()),
            InputMode::Touch => setup_touch_handlers(&canvas, game.clone()),
        }
        setup_resize_handler(game.clone());

        request_animation_frame(game);

        log::info!("Bubble Pit running!");
    }

    fn setup_mouse_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - start injecting
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let at = ScreenPoint::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().gesture_start(at);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let at = ScreenPoint::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().pit.gesture_move(at);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up / leave - stop injecting
        for name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().pit.gesture_end();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn first_touch(event: &TouchEvent) -> Option<ScreenPoint> {
        let touch = event.touches().get(0)?;
        Some(ScreenPoint::new(
            touch.client_x() as f32,
            touch.client_y() as f32,
        ))
    }

    fn setup_touch_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(at) = first_touch(&event) {
                    game.borrow_mut().gesture_start(at);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(at) = first_touch(&event) {
                    game.borrow_mut().pit.gesture_move(at);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().pit.gesture_end();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let viewport = window_viewport();
            let mut g = game.borrow_mut();
            g.pit.resize(viewport);
            if let Some(renderer) = g.renderer.as_ref() {
                renderer.resize(&viewport);
            }
            log::info!("Viewport resized to {}x{}", viewport.width, viewport.height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Length of the scripted native session (10 s at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_FRAMES: u32 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bubble_pit::Settings;
    use bubble_pit::audio::LogSink;
    use bubble_pit::consts::SIM_DT;
    use bubble_pit::input::ScreenPoint;
    use bubble_pit::sim::{Pit, PitWorld, Viewport};

    env_logger::init();
    log::info!("Bubble Pit (native) starting...");

    let settings = Settings::load();
    log::debug!("Settings: {}", settings.to_json().unwrap_or_default());
    let clock = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let seed = settings.seed_or(clock);

    let viewport = Viewport::new(1280.0, 720.0);
    let world = PitWorld::new(
        settings.pool_size,
        settings.body_radius,
        settings.shape,
        seed.wrapping_add(2),
    );
    let mut pit = Pit::new(
        world,
        LogSink::default(),
        settings.shape,
        viewport,
        &settings,
        seed,
    );
    log::info!("Seed: {}", seed);

    pit.start();

    // Circle the pointer around the floor for the first 80% of the session
    let center = ScreenPoint::new(viewport.width / 2.0, viewport.height / 2.0);
    let orbit = viewport.height * 0.35;
    let gesture_frames = DEMO_FRAMES * 4 / 5;
    for frame in 0..DEMO_FRAMES {
        let angle = frame as f32 * 0.02;
        let at = ScreenPoint::new(
            center.x + orbit * angle.cos(),
            center.y + orbit * angle.sin(),
        );
        if frame == 0 {
            pit.gesture_start(at);
        } else if frame < gesture_frames {
            pit.gesture_move(at);
        } else if frame == gesture_frames {
            pit.gesture_end();
        }
        pit.frame(SIM_DT);
    }

    let stats = pit.stats();
    log::info!(
        "Session done: {} frames, {} injections, {} contacts, {} bubbles",
        stats.frames,
        stats.injections,
        stats.contacts,
        stats.sounds
    );
    println!(
        "frames={} injections={} contacts={} bubbles={} commands={}",
        stats.frames,
        stats.injections,
        stats.contacts,
        stats.sounds,
        pit.sink().dispatched
    );
}
