//! Duck Collector entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::{Mat4, Vec2, Vec3};
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use duck_collector::Settings;
    use duck_collector::consts::*;
    use duck_collector::sim::{Command, Direction, GameState, apply, initial};
    use duck_collector::view::{Camera, Sprite, draw_order, duck_yaw, pick, project, screen_ray};

    /// Game instance holding the single live state
    struct Game {
        state: GameState,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        /// requestAnimationFrame timestamp of the first frame
        start_time: Option<f64>,
    }

    impl Game {
        /// Apply one input event, replacing the state wholesale
        fn handle(&mut self, command: Command) {
            // Moving is a Playing-only affordance
            if matches!(command, Command::Move(_)) && self.state.completed() {
                return;
            }
            self.state = apply(&self.state, &command);
        }

        /// Viewport in CSS pixels (what mouse events report)
        fn client_viewport(&self) -> Vec2 {
            Vec2::new(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            )
        }

        /// Keep the backing store at client size * device pixel ratio so
        /// drawing and clicks share one aspect ratio after a resize
        fn sync_canvas_size(&self) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            if self.canvas.width() != width || self.canvas.height() != height {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
            }
        }

        /// Turn a canvas click into a collect command
        fn click(&mut self, x: f32, y: f32) {
            let viewport = self.client_viewport();
            if viewport.x <= 0.0 || viewport.y <= 0.0 {
                return;
            }
            let view_proj =
                Camera::follow(self.state.player.pos).view_proj(viewport.x / viewport.y);
            let ray = screen_ray(view_proj, Vec2::new(x, y), viewport);
            if let Some(id) = pick(&ray, &self.state.collectibles, DUCK_PICK_RADIUS) {
                self.handle(Command::Collect(id));
            }
        }

        /// Draw the current frame
        fn render(&self, elapsed_secs: f32) {
            let viewport = Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32);
            if viewport.x <= 0.0 || viewport.y <= 0.0 {
                return;
            }
            let ctx = &self.ctx;
            let camera = Camera::follow(self.state.player.pos);
            let view_proj = camera.view_proj(viewport.x / viewport.y);

            // Sky
            ctx.set_fill_style_str("#9fd3f0");
            ctx.fill_rect(0.0, 0.0, viewport.x as f64, viewport.y as f64);

            // Ground, clipped to the part in front of the camera
            let near_z = (camera.eye.z - 1.0).min(GROUND_HALF_EXTENT);
            let g = GROUND_HALF_EXTENT;
            let ground = [
                Vec3::new(-g, 0.0, -g),
                Vec3::new(g, 0.0, -g),
                Vec3::new(g, 0.0, near_z),
                Vec3::new(-g, 0.0, near_z),
            ];
            if near_z > -g {
                fill_polygon(ctx, view_proj, &ground, viewport, "#3c8d2f");
            }

            // Arena bounds
            let b = self.state.settings.bounds;
            let arena = [
                Vec3::new(-b, 0.0, -b),
                Vec3::new(b, 0.0, -b),
                Vec3::new(b, 0.0, b),
                Vec3::new(-b, 0.0, b),
            ];
            stroke_polygon(ctx, view_proj, &arena, viewport, "#2a6b20");

            let yaw = duck_yaw(elapsed_secs);
            let sprites = draw_order(view_proj, self.state.player.pos, &self.state.collectibles);

            for (sprite, pos) in sprites {
                let Some(center) = project(view_proj, pos, viewport) else {
                    continue;
                };
                match sprite {
                    Sprite::Player => {
                        let r = screen_radius(view_proj, pos, PLAYER_RADIUS, viewport);
                        fill_circle(ctx, center, r, "hotpink");
                    }
                    Sprite::Duck(_) => {
                        let r = screen_radius(view_proj, pos, DUCK_PICK_RADIUS, viewport);
                        fill_circle(ctx, center, r, "#f5d142");

                        // Beak shows the spin
                        let beak = pos + Vec3::new(yaw.cos(), 0.0, yaw.sin()) * DUCK_PICK_RADIUS;
                        if let Some(tip) = project(view_proj, beak, viewport) {
                            fill_circle(ctx, tip, r * 0.35, "#f08a24");
                        }
                    }
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-target .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.settings.target.to_string()));
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                let class = if self.state.completed() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    /// On-screen radius of a sphere
    fn screen_radius(view_proj: Mat4, pos: Vec3, radius: f32, viewport: Vec2) -> f32 {
        match (
            project(view_proj, pos, viewport),
            project(view_proj, pos + Vec3::Y * radius, viewport),
        ) {
            (Some(a), Some(b)) => a.distance(b).max(1.0),
            _ => 1.0,
        }
    }

    fn fill_circle(ctx: &CanvasRenderingContext2d, center: Vec2, r: f32, color: &str) {
        ctx.begin_path();
        let _ = ctx.arc(
            center.x as f64,
            center.y as f64,
            r as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.set_fill_style_str(color);
        ctx.fill();
    }

    /// Trace a world-space polygon; false if any corner is behind the camera
    fn trace_polygon(
        ctx: &CanvasRenderingContext2d,
        view_proj: Mat4,
        corners: &[Vec3],
        viewport: Vec2,
    ) -> bool {
        let points: Option<Vec<Vec2>> = corners
            .iter()
            .map(|c| project(view_proj, *c, viewport))
            .collect();
        let Some(points) = points else {
            return false;
        };

        ctx.begin_path();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                ctx.move_to(p.x as f64, p.y as f64);
            } else {
                ctx.line_to(p.x as f64, p.y as f64);
            }
        }
        ctx.close_path();
        true
    }

    fn fill_polygon(
        ctx: &CanvasRenderingContext2d,
        view_proj: Mat4,
        corners: &[Vec3],
        viewport: Vec2,
        color: &str,
    ) {
        if trace_polygon(ctx, view_proj, corners, viewport) {
            ctx.set_fill_style_str(color);
            ctx.fill();
        }
    }

    fn stroke_polygon(
        ctx: &CanvasRenderingContext2d,
        view_proj: Mat4,
        corners: &[Vec3],
        viewport: Vec2,
        color: &str,
    ) {
        if trace_polygon(ctx, view_proj, corners, viewport) {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(2.0);
            ctx.stroke();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Duck Collector starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let ctx = match canvas.get_context("2d") {
            Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => ctx,
                Err(_) => {
                    log::error!("Context is not a 2D context");
                    return;
                }
            },
            _ => {
                log::error!("2D canvas context unavailable");
                return;
            }
        };

        let query = window.location().search().unwrap_or_default();
        let settings = Settings::from_query(&query);
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let game = Rc::new(RefCell::new(Game {
            state: initial(settings, seed),
            canvas: canvas.clone(),
            ctx,
            start_time: None,
        }));

        log::info!(
            "Game initialized with seed: {} ({} ducks, bounds {})",
            seed,
            settings.target,
            settings.bounds
        );

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_canvas_click(&canvas, game.clone());
        setup_move_buttons(&document, game.clone());
        setup_keyboard(&window, game.clone());
        setup_restart_button(&document, game.clone());

        request_animation_frame(game);

        log::info!("Duck Collector running!");
    }

    fn setup_canvas_click(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            game.borrow_mut()
                .click(event.offset_x() as f32, event.offset_y() as f32);
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_move_buttons(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        for direction in Direction::ALL {
            let id = format!("move-{}", direction.as_str());
            let Some(btn) = document.get_element_by_id(&id) else {
                log::warn!("Missing button #{}", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().handle(Command::Move(direction));
            });
            let _ = btn
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            let key = event.key();
            if let Some(direction) = Direction::from_str(&key) {
                event.prevent_default();
                g.handle(Command::Move(direction));
            } else if key == "Enter" && g.state.completed() {
                g.handle(Command::Restart);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().handle(Command::Restart);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
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
            let start = *g.start_time.get_or_insert(time);
            let elapsed_secs = ((time - start) / 1000.0) as f32;

            g.sync_canvas_size();
            g.render(elapsed_secs);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Duck Collector (native) starting...");
    log::info!("Native mode has no renderer - run with `trunk serve` for the web version");

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring non-numeric seed {:?}", arg);
            clock_seed()
        }),
        None => clock_seed(),
    };

    println!("\nRunning scripted session (seed {})...", seed);
    play_scripted_session(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Walk around, collect every duck (plus one stale click) and restart
#[cfg(not(target_arch = "wasm32"))]
fn play_scripted_session(seed: u64) {
    use duck_collector::Settings;
    use duck_collector::sim::{Command, Direction, apply, initial};

    let mut state = initial(Settings::default(), seed);
    for duck in &state.collectibles {
        println!("  duck {} at ({:.2}, {:.2})", duck.id, duck.pos.x, duck.pos.z);
    }

    for direction in Direction::ALL {
        state = apply(&state, &Command::Move(direction));
        log::info!("Moved {}: player at {}", direction.as_str(), state.player.pos);
    }

    let ids: Vec<u32> = state.collectibles.iter().map(|d| d.id).collect();
    for id in ids {
        state = apply(&state, &Command::Collect(id));
        println!("  collected duck {} -> score {}", id, state.score);
    }
    // Stale click on an already-collected duck
    let before = state.score;
    state = apply(&state, &Command::Collect(0));
    assert_eq!(state.score, before, "stale collect must not score");

    println!("✓ Completed: {}", state.completed());

    state = apply(&state, &Command::Restart);
    println!(
        "✓ Restarted: score {}, {} ducks in play",
        state.score,
        state.remaining()
    );
}
