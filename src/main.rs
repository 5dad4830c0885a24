//! Brick Bounce entry point
//!
//! The browser build drives the round from `requestAnimationFrame`; the
//! native build runs a headless round from the command line.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent};

    use brick_bounce::audio::{AudioManager, SoundEffect};
    use brick_bounce::consts::FRAME_MS;
    use brick_bounce::hud::Hud;
    use brick_bounce::renderer::{RenderState, build_scene, viewport_to_arena};
    use brick_bounce::sim::{GameState, TickInput, tick};
    use brick_bounce::{GameConfig, Millis};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        input: TickInput,
        /// Clock reading of the last simulated frame
        last_tick: Option<f64>,
        arena: Vec2,
        last_hud: Hud,
    }

    impl Game {
        fn new(state: GameState) -> Self {
            let config = state.config();
            let arena = Vec2::new(config.arena_width, config.arena_height);
            Self {
                state,
                render_state: None,
                audio: AudioManager::new(),
                input: TickInput::default(),
                last_tick: None,
                arena,
                last_hud: Hud::default(),
            }
        }

        /// Run at most one simulation step per 16 ms of clock time
        fn update(&mut self, time: f64) {
            if let Some(last) = self.last_tick {
                if time - last < FRAME_MS as f64 {
                    return;
                }
            }
            self.last_tick = Some(time);

            let now = time as Millis;
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, now);

            for event in self.state.take_events() {
                log::debug!("{:?}", event);
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        fn render(&mut self, time: f64) {
            let vertices = build_scene(&self.state, time as Millis);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
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
        }

        fn update_hud(&mut self, document: &Document, time: f64) {
            let hud = Hud::from_state(&self.state, time as Millis);
            if hud != self.last_hud {
                set_line(document, "start-prompt", hud.start_prompt);
                set_line(document, "dev-mode", hud.dev_mode.as_deref());
                set_line(document, "bricks-remaining", hud.bricks_remaining.as_deref());
                set_line(document, "elapsed", hud.elapsed.as_deref());
                set_line(document, "end-title", hud.end_screen.as_ref().map(|(t, _)| *t));
                set_line(
                    document,
                    "end-score",
                    hud.end_screen.as_ref().map(|(_, s)| s.as_str()),
                );
                self.last_hud = hud;
            }

            let bubble = self
                .state
                .active_bubbles(time as Millis)
                .last()
                .map(|b| b.text.as_str());
            set_line(document, "score-bubble", bubble);
        }

        /// Click: start the round, or begin a new one from the end screen
        fn on_click(&mut self, time: f64) {
            self.audio.resume();
            if self.state.end_screen_ready(time as Millis) {
                let seed = js_sys::Date::now() as u64;
                self.state.restart(seed);
                self.input = TickInput::default();
                log::info!("Round restarted with seed: {}", seed);
            } else {
                self.input.primary = true;
            }
        }
    }

    /// Show `text` in the element, or hide it
    fn set_line(document: &Document, id: &str, text: Option<&str>) {
        let Some(el) = document.get_element_by_id(id) else {
            return;
        };
        match text {
            Some(text) => {
                el.set_text_content(Some(text));
                let _ = el.set_attribute("class", "");
            }
            None => {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Brick Bounce starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let config = GameConfig::load();
        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(config, seed).map_err(js_err)?;
        let game = Rc::new(RefCell::new(Game::new(state)));

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let arena = game.borrow().arena;
        let render_state = RenderState::new(surface, &adapter, width, height, arena)
            .await
            .map_err(js_err)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        request_animation_frame(game);

        log::info!("Brick Bounce running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer position, mapped through the letterbox into arena pixels
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let viewport = Vec2::new(
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                let point = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                let arena = g.arena;
                g.input.pointer_x = Some(viewport_to_arena(point, arena, viewport).x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let now = web_sys::window()
                    .and_then(|w| w.performance())
                    .map(|p| p.now())
                    .unwrap_or_default();
                game.borrow_mut().on_click(now);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document, time);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use brick_bounce::consts::FRAME_MS;
    use brick_bounce::hud::{end_message, format_elapsed};
    use brick_bounce::sim::{GameState, TickInput, tick};
    use brick_bounce::{ConfigError, DevMode, GameConfig, Millis};

    #[derive(Parser)]
    #[command(name = "brick-bounce")]
    #[command(about = "Play a headless Brick Bounce round on a simulated 16 ms clock")]
    pub struct Args {
        /// Development preset: 1, 2 or 3
        #[arg(long, default_value = "3", value_parser = parse_preset)]
        preset: DevMode,
        /// JSON config file (replaces the preset)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Stop after this many frames
        #[arg(long, default_value_t = 200_000)]
        max_ticks: u64,
        /// Keep the pointer under the ball (pointer-controlled presets)
        #[arg(long)]
        follow: bool,
    }

    fn parse_preset(s: &str) -> Result<DevMode, String> {
        DevMode::from_str(s).ok_or_else(|| format!("unknown preset '{s}' (expected 1, 2 or 3)"))
    }

    pub fn run(args: &Args) -> Result<(), ConfigError> {
        let config = match &args.config {
            Some(path) => GameConfig::load_from_path(path)?,
            None => GameConfig::from_preset(args.preset),
        };
        let mut state = GameState::new(config, args.seed)?;

        // The first frame carries the start click
        let mut input = TickInput {
            primary: true,
            ..Default::default()
        };
        let mut now: Millis = 0;
        let mut ticks = 0;

        while ticks < args.max_ticks && !state.end_screen_ready(now) {
            if args.follow {
                input.pointer_x = Some(state.ball.pos.x);
            }
            tick(&mut state, &input, now);
            for event in state.take_events() {
                log::debug!("[{:>8}ms] {:?}", now, event);
            }
            input = TickInput::default();
            now += FRAME_MS;
            ticks += 1;
        }

        match state.outcome() {
            Some(outcome) => println!("{}", end_message(outcome)),
            None => println!("Round unfinished after {} frames", ticks),
        }
        println!("  Score:            {}", state.score);
        println!("  Bricks remaining: {}", state.bricks_remaining());
        if let Some(ms) = state.elapsed_ms(now) {
            println!("  Time elapsed:     {}", format_elapsed(ms));
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::init();
    let args = headless::Args::parse();
    match headless::run(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}
