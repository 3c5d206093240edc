//! Falling Squares entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent};

    use falling_squares::audio::{AudioManager, cues_for_frame, cues_for_phase};
    use falling_squares::game::LoopControl;
    use falling_squares::persistence::LocalStore;
    use falling_squares::platform::{Clock, FrameLoop, FrameScheduler, PerformanceClock};
    use falling_squares::sim::{GamePhase, PlayArea};
    use falling_squares::ui::GameView;
    use falling_squares::{Game, Settings, Tuning};

    type Shared = Rc<RefCell<App>>;

    /// Everything the page needs, behind one `RefCell`
    struct App {
        game: Game<LocalStore>,
        settings: Settings,
        frames: FrameLoop<i32>,
        clock: PerformanceClock,
        audio: AudioManager,
        renderer: DomRenderer,
        last_phase: GamePhase,
    }

    impl App {
        /// React to a phase change: audio, overlay, and frame cancellation
        fn sync_phase(&mut self, app: &Shared) {
            let phase = self.game.phase();
            if phase == self.last_phase {
                return;
            }
            for cue in cues_for_phase(phase) {
                self.audio.play(*cue);
            }
            if phase != GamePhase::Playing {
                self.frames.cancel(&mut AnimationFrames { app: app.clone() });
            }
            self.last_phase = phase;
        }

        fn start(&mut self, app: &Shared) {
            let now = self.clock.now_ms();
            let area = self.renderer.play_area();
            if !self.game.start(now, area) {
                return;
            }
            self.sync_phase(app);
            self.frames.schedule(&mut AnimationFrames { app: app.clone() });
            self.renderer.render(&self.game.view());
        }
    }

    /// `requestAnimationFrame` as a [`FrameScheduler`]
    struct AnimationFrames {
        app: Shared,
    }

    impl FrameScheduler for AnimationFrames {
        type Handle = i32;

        fn request_frame(&mut self) -> Option<i32> {
            let window = web_sys::window()?;
            let app = self.app.clone();
            let closure = Closure::once(move |time: f64| {
                game_loop(app, time);
            });
            let handle = window
                .request_animation_frame(closure.as_ref().unchecked_ref())
                .ok()?;
            closure.forget();
            Some(handle)
        }

        fn cancel_frame(&mut self, handle: i32) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    fn game_loop(app: Shared, time: f64) {
        let mut guard = app.borrow_mut();
        let a = &mut *guard;
        a.frames.fired();

        let area = a.renderer.play_area();
        let report = a.game.frame(time, area);
        for cue in cues_for_frame(&report) {
            a.audio.play(cue);
        }
        a.sync_phase(&app);
        a.renderer.render(&a.game.view());

        if report.control == LoopControl::Continue {
            a.frames.schedule(&mut AnimationFrames { app: app.clone() });
        }
    }

    /// Positions absolutely-placed DOM elements inside the play area
    struct DomRenderer {
        document: Document,
        area: Option<HtmlElement>,
        player: Option<HtmlElement>,
        sprites: HashMap<u64, HtmlElement>,
    }

    impl DomRenderer {
        fn new(document: Document) -> Self {
            let area = html_element(&document, "game-area");
            if area.is_none() {
                log::error!("#game-area not found - nothing will be drawn");
            }
            let player = html_element(&document, "player");
            Self {
                document,
                area,
                player,
                sprites: HashMap::new(),
            }
        }

        /// Current size of the play area; zero if it's missing
        fn play_area(&self) -> PlayArea {
            match &self.area {
                Some(el) => {
                    let rect = el.get_bounding_client_rect();
                    PlayArea::new(rect.width() as f32, rect.height() as f32)
                }
                None => PlayArea::default(),
            }
        }

        fn render(&mut self, view: &GameView) {
            self.set_text("hud-score", &view.score.to_string());
            self.set_text("hud-high-score", &view.high_score.to_string());
            self.render_modal(view);

            let visible = view.shows_playfield();
            if let Some(player) = &self.player {
                place(player, view.player.x, view.player.y, view.player_size, visible);
            }

            // Drop sprites whose objects are gone
            self.sprites.retain(|id, el| {
                let alive = visible && view.objects.iter().any(|o| o.id == *id);
                if !alive {
                    el.remove();
                }
                alive
            });
            if !visible {
                return;
            }

            for object in &view.objects {
                if !self.sprites.contains_key(&object.id) {
                    let Some(el) = self.create_sprite(object.kind.as_str()) else {
                        continue;
                    };
                    self.sprites.insert(object.id, el);
                }
                if let Some(el) = self.sprites.get(&object.id) {
                    place(el, object.x, object.y, view.object_size, true);
                }
            }
        }

        fn create_sprite(&self, kind: &str) -> Option<HtmlElement> {
            let area = self.area.as_ref()?;
            let el = self
                .document
                .create_element("div")
                .ok()?
                .dyn_into::<HtmlElement>()
                .ok()?;
            let _ = el.set_attribute("class", &format!("falling-object {}", kind));
            area.append_child(&el).ok()?;
            Some(el)
        }

        fn render_modal(&self, view: &GameView) {
            let Some(modal_el) = self.document.get_element_by_id("modal") else {
                return;
            };
            let Some(modal) = view.modal() else {
                let _ = modal_el.set_attribute("class", "hidden");
                return;
            };
            let _ = modal_el.set_attribute("class", "");

            self.set_text("modal-title", modal.title);
            self.set_text("start-btn", modal.button);
            self.set_text("modal-high-score", &format!("High Score: {}", modal.high_score));
            match modal.final_score {
                Some(score) => {
                    self.set_text("modal-final-score", &format!("Your Score: {}", score))
                }
                None => self.set_text("modal-final-score", ""),
            }
            self.set_text("modal-hint", modal.hint.unwrap_or(""));
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn place(el: &HtmlElement, x: f32, y: f32, size: f32, visible: bool) {
        let style = el.style();
        let _ = style.set_property("display", if visible { "block" } else { "none" });
        let _ = style.set_property("left", &format!("{}px", x));
        let _ = style.set_property("top", &format!("{}px", y));
        let _ = style.set_property("width", &format!("{}px", size));
        let _ = style.set_property("height", &format!("{}px", size));
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Falling Squares starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        let store = LocalStore::open();
        let settings = Settings::load(&store);
        let game = Game::new(Tuning::default(), store);
        log::info!("High score: {}", game.high_score());

        let app = Rc::new(RefCell::new(App {
            audio: AudioManager::new(&settings),
            settings,
            frames: FrameLoop::new(),
            clock: PerformanceClock::new(),
            renderer: DomRenderer::new(document),
            last_phase: game.phase(),
            game,
        }));

        {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            a.renderer.render(&a.game.view());
        }

        setup_start_button(app.clone());
        setup_keyboard(app.clone());
        setup_focus_handlers(app);

        log::info!("Falling Squares ready!");
    }

    fn setup_start_button(app: Shared) {
        let Some(btn) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("start-btn"))
        else {
            log::warn!("#start-btn not found");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            app.borrow_mut().start(&app);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(app: Shared) {
        let Some(window) = web_sys::window() else { return };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut guard = app.borrow_mut();
                let a = &mut *guard;
                match event.key().as_str() {
                    "i" | "I" => {
                        let enabled = !a.game.autopilot();
                        a.game.set_autopilot(enabled);
                        log::info!("Idle mode: {}", enabled);
                    }
                    "m" | "M" => {
                        a.settings.toggle_mute();
                        a.settings.save(a.game.store_mut());
                        a.audio.apply_settings(&a.settings);
                        log::info!("Muted: {}", a.settings.muted);
                    }
                    key => {
                        if a.game.input_mut().key_down(key) {
                            // Keep arrow keys from scrolling the page
                            event.prevent_default();
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.input_mut().key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(app: Shared) {
        let Some(window) = web_sys::window() else { return };

        // Window blur (click outside): key-ups will never arrive
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut guard = app.borrow_mut();
                guard.game.input_mut().release_all();
                if guard.settings.mute_on_blur {
                    guard.audio.set_suspended(true);
                }
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow().audio.set_suspended(false);
            });
            let _ = window
                .add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, Result};

    use falling_squares::game::LoopControl;
    use falling_squares::persistence::MemoryStore;
    use falling_squares::platform::{Clock, FrameLoop, ManualClock, ManualScheduler};
    use falling_squares::sim::PlayArea;
    use falling_squares::{Game, Tuning};

    /// 60 Hz display refresh
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Ten minutes of frames
    const DEFAULT_FRAMES: u64 = 36_000;

    pub fn load_tuning() -> Result<Tuning> {
        match std::env::var("FALLING_SQUARES_TUNING") {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading tuning file {}", path))?;
                let tuning = Tuning::from_json(&json)
                    .with_context(|| format!("parsing tuning file {}", path))?;
                log::info!("Loaded tuning from {}", path);
                Ok(tuning)
            }
            Err(_) => Ok(Tuning::default()),
        }
    }

    pub fn frame_budget() -> Result<u64> {
        match std::env::var("FALLING_SQUARES_FRAMES") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("FALLING_SQUARES_FRAMES is not a number: {}", raw)),
            Err(_) => Ok(DEFAULT_FRAMES),
        }
    }

    /// Autopilot plays against a simulated 60 Hz clock, restarting after each death
    pub fn run(tuning: Tuning, budget: u64) {
        let area = PlayArea::new(800.0, 600.0);
        let clock = ManualClock::new(0.0);
        let mut scheduler = ManualScheduler::new();
        let mut frames = FrameLoop::new();
        let mut game = Game::new(tuning, MemoryStore::new());
        game.set_autopilot(true);

        game.start(clock.now_ms(), area);
        frames.schedule(&mut scheduler);

        let mut runs = 0u32;
        let mut total_score = 0u64;
        for _ in 0..budget {
            let now = clock.advance(FRAME_MS);
            if scheduler.fire().is_none() {
                // Nothing pending means the last run ended; press restart
                game.start(now, area);
                frames.schedule(&mut scheduler);
                continue;
            }
            frames.fired();

            let report = game.frame(now, area);
            match report.control {
                LoopControl::Continue => {
                    frames.schedule(&mut scheduler);
                }
                LoopControl::Stop => {
                    frames.cancel(&mut scheduler);
                    runs += 1;
                    total_score += game.state().score;
                    log::info!(
                        "Run {} ended: score {}, speed {:.2}, spawn interval {:.0}ms{}",
                        runs,
                        game.state().score,
                        game.context().difficulty.object_speed,
                        game.context().difficulty.spawn_interval_ms,
                        if report.new_record { " (new record)" } else { "" }
                    );
                }
            }
        }

        let average = if runs > 0 {
            total_score as f64 / runs as f64
        } else {
            0.0
        };
        log::info!(
            "{} frames, {} finished runs, average score {:.1}, high score {}",
            budget,
            runs,
            average,
            game.high_score()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Falling Squares (native) starting...");
    log::info!(
        "Native mode runs the idle autopilot headless - run with `trunk serve` for the web version"
    );

    let tuning = headless::load_tuning()?;
    let budget = headless::frame_budget()?;
    headless::run(tuning, budget);
    Ok(())
}
