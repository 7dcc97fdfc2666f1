//! Snake King entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement};

    use snake_king::audio::{AudioManager, SoundEffect};
    use snake_king::consts::*;
    use snake_king::highscores::{Leaderboard, LocalLeaderboard, PersonalBests, format_date};
    use snake_king::platform::{Command, LocalStorage, clock_seed, command_for_key, now_ms};
    use snake_king::renderer::{CanvasRenderer, Palette, format_time};
    use snake_king::sim::{GameEvent, GameState, diff, suggest_direction, tick};
    use snake_king::{Difficulty, Settings};

    /// Entries shown on the game over screen
    const LEADERBOARD_ROWS: usize = 10;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        /// Snapshot the last batch of events was derived from
        prev: GameState,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        settings: Settings,
        store: Option<LocalStorage>,
        bests: PersonalBests,
        leaderboard: Option<LocalLeaderboard<LocalStorage>>,
        accumulator: f64,
        last_time: f64,
        /// Autopilot steers while set
        idle_mode: bool,
        /// Rank the final score would take, while it has not been sent yet
        pending_rank: Option<usize>,
        new_best: bool,
    }

    impl Game {
        fn new(store: Option<LocalStorage>) -> Self {
            let settings = store.as_ref().map(Settings::load).unwrap_or_default();
            let bests = store.as_ref().map(PersonalBests::load).unwrap_or_default();
            let leaderboard = store.clone().map(LocalLeaderboard::new);

            let audio = AudioManager::init(settings.effective_volume());

            let seed = clock_seed();
            let state = GameState::new(settings.difficulty, seed);
            log::info!("Game initialized ({}) with seed: {}", settings.difficulty, seed);

            Self {
                prev: state.clone(),
                state,
                renderer: None,
                audio,
                settings,
                store,
                bests,
                leaderboard,
                accumulator: 0.0,
                last_time: 0.0,
                idle_mode: false,
                pending_rank: None,
                new_best: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f64) {
            if !self.state.is_running() {
                self.accumulator = 0.0;
                return;
            }

            let step = self.state.params.tick_interval_ms as f64;
            self.accumulator += dt_ms.min(250.0);

            let mut substeps = 0;
            while self.accumulator >= step && substeps < MAX_SUBSTEPS {
                if self.idle_mode {
                    if let Some(direction) = suggest_direction(&self.state) {
                        self.state.request_direction(direction);
                    }
                }
                tick(&mut self.state);
                self.accumulator -= step;
                substeps += 1;
                self.publish_events();
            }

            // Drop any backlog the substep cap left behind
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(step);
            }
        }

        /// Diff against the previous snapshot and react to what changed
        fn publish_events(&mut self) {
            let events = diff(&self.prev, &self.state);
            for &event in &events {
                log::debug!("{:?}", event);
                if let Some(effect) = SoundEffect::for_event(event, self.settings.move_sounds) {
                    self.audio.play(effect);
                }
            }
            if events.contains(&GameEvent::GameOver) {
                self.finish_run();
            }
            self.prev = self.state.snapshot();
        }

        fn finish_run(&mut self) {
            let (difficulty, score) = (self.state.difficulty, self.state.score);
            log::info!("Game over on {} with score {}", difficulty, score);

            self.new_best = self.bests.record(difficulty, score);
            if self.new_best {
                self.audio.play(SoundEffect::HighScore);
                if let Some(store) = self.store.as_mut() {
                    if let Err(e) = self.bests.save(store) {
                        log::warn!("Could not save personal best: {}", e);
                    }
                }
            }
            self.pending_rank = match self.leaderboard.as_ref().map(|b| b.potential_rank(score)) {
                Some(Ok(rank)) => rank,
                Some(Err(e)) => {
                    log::warn!("Could not rank score: {}", e);
                    None
                }
                None => None,
            };
            if let Some(rank) = self.pending_rank {
                set_text("submit-status", &format!("Enter your name to place #{}", rank));
            } else {
                set_text("submit-status", "");
            }
            self.show_leaderboard();
        }

        fn command(&mut self, command: Command) {
            match command {
                Command::Turn(direction) => {
                    if self.idle_mode {
                        self.idle_mode = false;
                        log::info!("Idle mode: off");
                    }
                    self.state.request_direction(direction);
                }
                Command::TogglePause => {
                    self.audio.resume();
                    self.state.toggle_pause();
                }
                Command::Restart => {
                    if self.state.is_over() {
                        self.state.request_restart();
                        self.reset_run();
                        log::info!("Game restarted with seed: {}", self.state.seed);
                    }
                }
                Command::ToggleIdle => {
                    self.idle_mode = !self.idle_mode;
                    log::info!("Idle mode: {}", if self.idle_mode { "on" } else { "off" });
                }
                Command::ToggleMute => {
                    self.settings.muted = !self.settings.muted;
                    self.audio.set_volume(self.settings.effective_volume());
                    self.save_settings();
                    log::info!("Sound: {}", if self.settings.muted { "off" } else { "on" });
                }
                Command::NewGame(difficulty) => self.new_game(difficulty),
            }
            self.publish_events();
        }

        /// Abandon the current run and start at `difficulty`
        fn new_game(&mut self, difficulty: Difficulty) {
            if self.settings.difficulty != difficulty {
                self.settings.difficulty = difficulty;
                self.save_settings();
            }
            let seed = clock_seed();
            self.state = GameState::new(difficulty, seed);
            self.prev = self.state.snapshot();
            self.reset_run();
            log::info!("Started new {} game with seed: {}", difficulty, seed);
        }

        fn reset_run(&mut self) {
            self.accumulator = 0.0;
            self.pending_rank = None;
            self.new_best = false;
        }

        fn save_settings(&mut self) {
            if let Some(store) = self.store.as_mut() {
                if let Err(e) = self.settings.save(store) {
                    log::warn!("Could not save settings: {}", e);
                }
            }
        }

        /// Hand the final score to the leaderboard
        fn submit_score(&mut self, name: &str) {
            if self.pending_rank.is_none() || !self.state.is_over() {
                return;
            }
            let Some(board) = self.leaderboard.as_mut() else {
                set_text("submit-status", "Leaderboard unavailable");
                return;
            };
            match board.submit(name, self.state.score) {
                Ok(Some(rank)) => {
                    self.pending_rank = None;
                    set_text("submit-status", &format!("You placed #{}!", rank));
                }
                Ok(None) => {
                    self.pending_rank = None;
                    set_text("submit-status", "Not quite a top score");
                }
                Err(e) => {
                    log::warn!("Score submission failed: {}", e);
                    set_text("submit-status", &e.to_string());
                }
            }
            self.show_leaderboard();
        }

        fn show_leaderboard(&self) {
            let Some(board) = self.leaderboard.as_ref() else {
                return;
            };
            let text = match board.top_entries(LEADERBOARD_ROWS) {
                Ok(entries) if entries.is_empty() => "No scores yet".to_string(),
                Ok(entries) => {
                    let now = now_ms();
                    entries
                        .iter()
                        .enumerate()
                        .map(|(i, e)| {
                            format!(
                                "{:>2}. {:<20} {:>5}  {}",
                                i + 1,
                                e.player_name,
                                e.score,
                                format_date(e.timestamp, now)
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                }
                Err(e) => {
                    log::warn!("Could not load leaderboard: {}", e);
                    "Leaderboard unavailable".to_string()
                }
            };
            set_text("leaderboard-list", &text);
        }

        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                let palette = Palette::for_settings(self.settings.high_contrast);
                renderer.render(&self.state, &palette, self.settings.show_grid);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let best = self.bests.best(self.state.difficulty).max(self.state.score);
            let hud = [
                ("#hud-score .hud-value", self.state.score.to_string()),
                ("#hud-lives .hud-value", self.state.lives.to_string()),
                ("#hud-time .hud-value", format_time(self.state.time_left_secs())),
                ("#hud-best .hud-value", best.to_string()),
                ("#hud-difficulty .hud-value", self.state.difficulty.to_string()),
            ];
            for (selector, text) in hud {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    if el.text_content().as_deref() != Some(text.as_str()) {
                        el.set_text_content(Some(&text));
                    }
                }
            }

            set_visible(document, "idle-badge", self.idle_mode);

            let over = self.state.is_over();
            set_visible(document, "game-over", over);
            if over {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
                set_visible(document, "new-best", self.new_best);
                set_visible(document, "name-entry", self.pending_rank.is_some());
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Snake King starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Square backing store at device resolution
        let dpr = window.device_pixel_ratio();
        let side = canvas.client_width().min(canvas.client_height()).max(1);
        let px = (side as f64 * dpr) as u32;
        canvas.set_width(px);
        canvas.set_height(px);

        let store = match LocalStorage::open() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("{} - settings and scores will not persist", e);
                None
            }
        };

        let game = Rc::new(RefCell::new(Game::new(store)));
        {
            let mut g = game.borrow_mut();
            g.renderer = Some(CanvasRenderer::new(&canvas, g.state.grid_size)?);
            g.show_leaderboard();
        }

        setup_keyboard(game.clone())?;
        setup_buttons(game.clone(), &document);
        setup_auto_pause(game.clone(), &document)?;
        setup_dispose(game.clone())?;

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Snake King running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            // Typing a name must not steer the snake
            let typing = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .is_some();
            if typing {
                return;
            }
            if let Some(command) = command_for_key(&event.key()) {
                event.prevent_default();
                game.borrow_mut().command(command);
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(game: Rc<RefCell<Game>>, document: &Document) {
        // Restart button
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().command(Command::Restart);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Submit score button
        if let Some(btn) = document.get_element_by_id("submit-score-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let name = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("player-name"))
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                game.borrow_mut().submit_score(&name);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Difficulty buttons
        for difficulty in Difficulty::ALL {
            let id = format!("difficulty-{}", difficulty.as_str().to_lowercase());
            if let Some(btn) = document.get_element_by_id(&id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().command(Command::NewGame(difficulty));
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
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

            let dt = if g.last_time > 0.0 { time - g.last_time } else { 0.0 };
            g.last_time = time;

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>, document: &Document) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.is_running() {
                        g.state.request_pause();
                        g.publish_events();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.is_running() {
                    g.state.request_pause();
                    g.publish_events();
                    log::info!("Auto-paused (window blur)");
                }
                if g.settings.mute_on_blur {
                    g.audio.suspend();
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Focus regained: audio back, game stays paused until the player resumes
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow().audio.resume();
            });
            window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Release the audio context when the page goes away
    fn setup_dispose(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().audio.dispose();
        });
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Headless autopilot run: `snake-king [difficulty] [seed]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use snake_king::highscores::{Leaderboard, LocalLeaderboard};
    use snake_king::platform::{MemoryStore, clock_seed};
    use snake_king::sim::{GameState, diff, suggest_direction, tick};
    use snake_king::{Difficulty, PersonalBests};

    /// Stop runs that would otherwise never end
    const MAX_TICKS: u64 = 50_000;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(name) => match Difficulty::from_str(&name) {
            Some(d) => d,
            None => {
                log::warn!("Unknown difficulty {:?}, using {}", name, Difficulty::default());
                Difficulty::default()
            }
        },
        None => Difficulty::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(clock_seed);

    log::info!("Snake King (native) starting: {} with seed {}", difficulty, seed);

    let mut state = GameState::new(difficulty, seed);
    let mut prev = state.snapshot();
    while !state.is_over() && state.time_ticks < MAX_TICKS {
        if let Some(direction) = suggest_direction(&state) {
            state.request_direction(direction);
        }
        tick(&mut state);
        for event in diff(&prev, &state) {
            log::debug!("tick {}: {:?}", state.time_ticks, event);
        }
        prev = state.snapshot();
    }

    let mut store = MemoryStore::new();
    let mut bests = PersonalBests::load(&store);
    if bests.record(difficulty, state.score) {
        if let Err(e) = bests.save(&mut store) {
            log::warn!("Could not save personal best: {}", e);
        }
    }
    let mut board = LocalLeaderboard::new(store);
    match board.submit("autopilot", state.score) {
        Ok(rank) => log::info!("Leaderboard rank: {:?}", rank),
        Err(e) => log::warn!("Score submission failed: {}", e),
    }

    println!(
        "{}: score {} in {} ticks ({} obstacles, {} lives left, length {})",
        difficulty,
        state.score,
        state.time_ticks,
        state.obstacles.len(),
        state.lives,
        state.snake.len()
    );
}
