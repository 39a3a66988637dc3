//! Retro Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlSelectElement, KeyboardEvent};

    use retro_dodge::audio::WebAudio;
    use retro_dodge::driver::{FrameScheduler, LoopDriver};
    use retro_dodge::input::Direction;
    use retro_dodge::renderer::{RenderState, compose};
    use retro_dodge::sim::TickOutcome;
    use retro_dodge::{
        Background, GameConfig, Pattern, Preferences, Session, SessionPhase, SpeedTier, Sprite,
    };

    /// Game instance holding all state
    struct Game {
        session: Session<WebAudio>,
        driver: LoopDriver<i32>,
        render_state: Option<RenderState>,
        prefs: Preferences,
    }

    /// `requestAnimationFrame` as a frame scheduler
    struct BrowserFrames {
        game: Rc<RefCell<Game>>,
    }

    impl FrameScheduler for BrowserFrames {
        type Handle = i32;

        fn request_frame(&mut self) -> i32 {
            let Some(window) = web_sys::window() else {
                return 0;
            };
            let game = self.game.clone();
            let closure = Closure::once(move |_time: f64| {
                game_loop(game);
            });
            let id = window
                .request_animation_frame(closure.as_ref().unchecked_ref())
                .unwrap_or(0);
            closure.forget();
            id
        }

        fn cancel_frame(&mut self, handle: i32) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    impl Game {
        /// Draw the current state; silently skipped without a surface
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let scene = compose(
                self.session.game(),
                self.session.config(),
                &mut rand::rng(),
            );
            match render_state.render(&scene) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Show the panel that matches the session phase
        fn update_overlays(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.session.phase();

            set_visible(&document, "config-panel", phase == SessionPhase::Configuring);
            set_visible(&document, "game-over", phase == SessionPhase::GameOver);
            set_visible(&document, "pause-banner", self.driver.is_paused());

            if phase == SessionPhase::GameOver {
                if let (Some(el), Some(game)) =
                    (document.get_element_by_id("final-score"), self.session.game())
                {
                    el.set_text_content(Some(&game.seconds().to_string()));
                }
            }

            if let Some(btn) = document.get_element_by_id("music-btn") {
                let label = if self.prefs.music { "Music On" } else { "Music Off" };
                btn.set_text_content(Some(label));
            }
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn select(document: &web_sys::Document, id: &str) -> Option<HtmlSelectElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Read the configuration form, keeping `current` for anything unreadable
    fn read_config_form(current: GameConfig) -> GameConfig {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return current;
        };
        let value = |id: &str| select(&document, id).map(|s| s.value()).unwrap_or_default();

        GameConfig {
            sprite: Sprite::from_str(&value("sprite-select")).unwrap_or(current.sprite),
            background: Background::from_str(&value("bg-select")).unwrap_or(current.background),
            pattern: Pattern::from_str(&value("pattern-select")).unwrap_or(current.pattern),
            speed: SpeedTier::from_str(&value("speed-select")).unwrap_or(current.speed),
        }
    }

    /// Fill the option lists of the configuration selects
    fn populate_config_form(document: &web_sys::Document) {
        fn options(items: impl IntoIterator<Item = (&'static str, &'static str)>) -> String {
            items
                .into_iter()
                .map(|(value, label)| format!("<option value=\"{value}\">{label}</option>"))
                .collect()
        }

        let lists = [
            ("sprite-select", options(Sprite::ALL.map(|s| (s.as_str(), s.label())))),
            ("bg-select", options(Background::ALL.map(|b| (b.as_str(), b.label())))),
            ("pattern-select", options(Pattern::ALL.map(|p| (p.as_str(), p.label())))),
            ("speed-select", options(SpeedTier::ALL.map(|t| (t.as_str(), t.label())))),
        ];
        for (id, html) in lists {
            if let Some(el) = document.get_element_by_id(id) {
                el.set_inner_html(&html);
            }
        }
    }

    fn write_config_form(config: &GameConfig) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let fields = [
            ("sprite-select", config.sprite.as_str()),
            ("bg-select", config.background.as_str()),
            ("pattern-select", config.pattern.as_str()),
            ("speed-select", config.speed.as_str()),
        ];
        for (id, value) in fields {
            if let Some(el) = select(&document, id) {
                el.set_value(value);
            }
        }
    }

    /// Reflect the config in the address bar so the link can be shared
    fn publish_config(config: &GameConfig) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Ok(history) = window.history() {
            let url = format!("?{}", config.to_query());
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&url));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Retro Dodge starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Shared link overrides the defaults field by field
        let search = window.location().search().unwrap_or_default();
        let config = GameConfig::default().merge_query(&search);
        populate_config_form(&document);
        write_config_form(&config);

        let prefs = Preferences::load();
        let mut session = Session::new(config, WebAudio::new());
        session.set_music(prefs.music);

        let game = Rc::new(RefCell::new(Game {
            session,
            driver: LoopDriver::new(),
            render_state: None,
            prefs,
        }));

        match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            Some(canvas) => {
                let dpr = window.device_pixel_ratio();
                let width = (800.0 * dpr) as u32;
                let height = (600.0 * dpr) as u32;
                canvas.set_width(width);
                canvas.set_height(height);
                game.borrow_mut().render_state = init_gpu(canvas, width, height).await;
            }
            None => log::warn!("No canvas element - rendering disabled"),
        }

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_config_form(game.clone());
        setup_auto_pause(game.clone());

        {
            let mut g = game.borrow_mut();
            g.update_overlays();
            g.render();
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        log::info!("Retro Dodge ready");
    }

    async fn init_gpu(canvas: HtmlCanvasElement, width: u32, height: u32) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas)) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(state) => Some(state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let mut frames = BrowserFrames { game: game.clone() };
        let mut guard = game.borrow_mut();
        let g = &mut *guard;

        let outcome = g.driver.on_frame(&mut g.session, &mut frames);
        g.render();
        if outcome == TickOutcome::Collided {
            g.update_overlays();
        }
    }

    /// Run `f` on the game, then re-sync the frame loop and redraw
    fn with_game(game: &Rc<RefCell<Game>>, f: impl FnOnce(&mut Game)) {
        let mut frames = BrowserFrames { game: game.clone() };
        let mut guard = game.borrow_mut();
        let g = &mut *guard;
        f(g);
        g.driver.sync(g.session.phase(), &mut frames);
        g.update_overlays();
        g.render();
    }

    fn set_paused(game: &Rc<RefCell<Game>>, paused: bool) {
        let mut frames = BrowserFrames { game: game.clone() };
        let mut guard = game.borrow_mut();
        let g = &mut *guard;
        let phase = g.session.phase();
        g.driver.set_paused(paused, phase, &mut frames);
        g.update_overlays();
    }

    fn on_click(document: &web_sys::Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{id}");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        {
            let game = game.clone();
            on_click(&document, "start-btn", move || {
                with_game(&game, |g| {
                    let config = read_config_form(*g.session.config());
                    if g.session.set_config(config) {
                        publish_config(&config);
                    }
                    g.session.start();
                });
            });
        }

        {
            let game = game.clone();
            on_click(&document, "restart-btn", move || {
                with_game(&game, |g| {
                    g.session.restart();
                });
            });
        }

        {
            let game = game.clone();
            on_click(&document, "reconfigure-btn", move || {
                with_game(&game, |g| {
                    g.session.reconfigure();
                });
            });
        }

        on_click(&document, "music-btn", move || {
            with_game(&game, |g| {
                g.prefs.music = !g.prefs.music;
                g.prefs.save();
                g.session.set_music(g.prefs.music);
            });
        });
    }

    /// Live preview of the background while configuring
    fn setup_config_form(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["sprite-select", "bg-select", "pattern-select", "speed-select"] {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                with_game(&game, |g| {
                    let config = read_config_form(*g.session.config());
                    g.session.set_config(config);
                });
            });
            let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if Direction::from_key(&key).is_some() {
                    event.prevent_default();
                    game.borrow_mut().session.key_down(&key);
                } else if key == "Escape" {
                    let (phase, paused) = {
                        let g = game.borrow();
                        (g.session.phase(), g.driver.is_paused())
                    };
                    if phase == SessionPhase::Playing {
                        set_paused(&game, !paused);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().session.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().session.release_keys();
                    if game.borrow().session.phase() == SessionPhase::Playing {
                        set_paused(&game, true);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside); keyup never arrives for held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.release_keys();
                if game.borrow().session.phase() == SessionPhase::Playing {
                    set_paused(&game, true);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless run: plays one unattended session and reports the result.
///
/// Usage: `retro-dodge [query]`, e.g. `retro-dodge "pattern=walls&speed=fast"`.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use retro_dodge::consts::TICKS_PER_SECOND;
    use retro_dodge::driver::{FrameScheduler, LoopDriver};
    use retro_dodge::{GameConfig, Session, SessionPhase, SilentAudio};

    /// Frames fire as fast as the loop asks for them
    struct Immediate;

    impl FrameScheduler for Immediate {
        type Handle = ();

        fn request_frame(&mut self) {}

        fn cancel_frame(&mut self, _handle: ()) {}
    }

    /// Give up after ten minutes of simulated play
    const TICK_LIMIT: u64 = 10 * 60 * TICKS_PER_SECOND;

    env_logger::init();

    let query = std::env::args().nth(1).unwrap_or_default();
    let config = GameConfig::default().merge_query(&query);
    log::info!("Retro Dodge (native) starting with {}", config.to_query());

    let mut session = Session::new(config, SilentAudio);
    let mut frames = Immediate;
    let mut driver = LoopDriver::new();

    session.start();
    driver.sync(session.phase(), &mut frames);

    let mut ticks = 0;
    while driver.is_scheduled() && ticks < TICK_LIMIT {
        autopilot::steer(&mut session);
        driver.on_frame(&mut session, &mut frames);
        ticks += 1;
    }

    let seconds = session.game().map(|g| g.seconds()).unwrap_or(0);
    match session.phase() {
        SessionPhase::GameOver => println!("Game over after {seconds} seconds"),
        _ => println!("Still alive after {seconds} seconds, stopping"),
    }
}

/// Naive dodger for headless runs
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use retro_dodge::consts::FIELD_WIDTH;
    use retro_dodge::{AudioCues, Session};

    /// How far above the player obstacles are considered a threat
    const LOOKAHEAD: f32 = 160.0;

    pub fn steer<A: AudioCues>(session: &mut Session<A>) {
        let Some(game) = session.game() else {
            return;
        };
        let player = game.player.rect();

        // Nearest obstacle falling into the player's column
        let threat = game
            .obstacles
            .iter()
            .map(|o| o.rect())
            .filter(|r| r.right() > player.left() - 8.0 && r.left() < player.right() + 8.0)
            .filter(|r| r.bottom() > player.top() - LOOKAHEAD && r.top() < player.bottom())
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()));

        // Head for the wider gap beside the threat
        let go_left = threat.map(|t| t.left() > FIELD_WIDTH - t.right());

        session.key_up("ArrowLeft");
        session.key_up("ArrowRight");
        match go_left {
            Some(true) => session.key_down("ArrowLeft"),
            Some(false) => session.key_down("ArrowRight"),
            None => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
