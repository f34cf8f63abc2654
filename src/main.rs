//! Swarm Survivor entry point
//!
//! Web: Canvas2D front-end driving the simulation from requestAnimationFrame.
//! Native: headless run that exercises the simulation and prints the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent};

    use swarm_survivor::platform::input::JOYSTICK_RADIUS;
    use swarm_survivor::platform::{InputMailbox, Joystick, KeyState, combined_intent};
    use swarm_survivor::sim::{Color, GameEvent, Snapshot, Visible};
    use swarm_survivor::{Driver, Settings, Tuning};

    const GRID_SIZE: f64 = 50.0;

    /// Game instance holding all state
    struct Game {
        driver: Driver,
        mailbox: InputMailbox,
        settings: Settings,
        joystick: Joystick,
        keys: KeyState,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        hud: HudElements,
        /// Smoothed frames per second, for the optional counter
        fps: f64,
        last_time: Option<f64>,
    }

    /// DOM nodes the HUD writes into
    struct HudElements {
        score: Option<HtmlElement>,
        health: Option<HtmlElement>,
        game_over: Option<HtmlElement>,
        final_score: Option<HtmlElement>,
        flash: Option<HtmlElement>,
    }

    impl HudElements {
        fn find(document: &web_sys::Document) -> Self {
            let get = |id: &str| {
                document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            };
            Self {
                score: get("score"),
                health: get("health"),
                game_over: get("gameOverScreen"),
                final_score: get("finalScore"),
                flash: get("screenFlash"),
            }
        }
    }

    fn set_style(el: &Option<HtmlElement>, prop: &str, value: &str) {
        if let Some(el) = el {
            let _ = el.style().set_property(prop, value);
        }
    }

    fn set_text(el: &Option<HtmlElement>, text: &str) {
        if let Some(el) = el {
            el.set_text_content(Some(text));
        }
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            if let Some(last) = self.last_time.filter(|&last| time > last) {
                self.fps = self.fps * 0.9 + (1000.0 / (time - last)) * 0.1;
            }
            self.last_time = Some(time);

            self.mailbox.publish_intent(combined_intent(&self.joystick, &self.keys));
            self.driver.frame(time);

            for event in self.driver.events() {
                match event {
                    GameEvent::GameOver { final_score } => {
                        log::info!("Game over with {} points", final_score);
                        self.joystick.release();
                        self.keys.clear();
                    }
                    GameEvent::Restarted => self.joystick.release(),
                    _ => {}
                }
            }

            let snapshot = self.driver.state().snapshot();
            render(&self.ctx, &self.canvas, &snapshot, &self.settings);
            if self.joystick.is_active() {
                draw_joystick(&self.ctx, &self.joystick);
            }
            if self.settings.show_fps {
                self.ctx.set_fill_style_str("rgba(255, 255, 255, 0.7)");
                self.ctx.set_font("12px monospace");
                let _ = self.ctx.fill_text(&format!("{:.0} FPS", self.fps), 8.0, 16.0);
            }
            self.update_hud(&snapshot);
        }

        fn update_hud(&self, snapshot: &Snapshot<'_>) {
            let hud = snapshot.hud;
            set_text(&self.hud.score, &hud.score.to_string());
            set_text(&self.hud.health, &hud.health.to_string());
            set_style(&self.hud.health, "color", &Color::health(snapshot.player.health_ratio()).css());

            let flash = if self.settings.effective_screen_flash() { hud.flash } else { 0.0 };
            set_style(&self.hud.flash, "opacity", &format!("{:.3}", flash));

            if hud.ended {
                set_text(&self.hud.final_score, &hud.final_score.unwrap_or(hud.score).to_string());
                set_style(&self.hud.game_over, "display", "flex");
            } else {
                set_style(&self.hud.game_over, "display", "none");
            }
        }
    }

    fn circle(ctx: &CanvasRenderingContext2d, center: Vec2, radius: f32) {
        ctx.begin_path();
        let _ = ctx.arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
    }

    fn health_bar(ctx: &CanvasRenderingContext2d, screen: Vec2, radius: f32, ratio: f32) {
        let width = radius as f64 * 1.8;
        let x = screen.x as f64 - width / 2.0;
        let y = screen.y as f64 - radius as f64 - 12.0;
        ctx.set_fill_style_str("rgba(50, 50, 50, 0.7)");
        ctx.fill_rect(x, y, width, 6.0);
        ctx.set_stroke_style_str("rgba(0, 0, 0, 0.8)");
        ctx.set_line_width(1.0);
        ctx.stroke_rect(x, y, width, 6.0);
        ctx.set_fill_style_str(&Color::health(ratio).css());
        ctx.fill_rect(x, y, width * ratio.clamp(0.0, 1.0) as f64, 6.0);
    }

    fn render(ctx: &CanvasRenderingContext2d, canvas: &HtmlCanvasElement, snap: &Snapshot<'_>, settings: &Settings) {
        let cam = snap.camera;
        let (w, h) = (canvas.width() as f64, canvas.height() as f64);
        ctx.set_fill_style_str("#0a0a0a");
        ctx.fill_rect(0.0, 0.0, w, h);

        // Grid
        if settings.quality.grid_enabled() {
            ctx.set_stroke_style_str("rgba(255, 255, 255, 0.08)");
            ctx.set_line_width(1.0);
            let (cx, cy) = (cam.pos.x as f64, cam.pos.y as f64);
            let mut wx = (cx / GRID_SIZE).floor() * GRID_SIZE;
            while wx <= cx + w {
                ctx.begin_path();
                ctx.move_to(wx - cx, 0.0);
                ctx.line_to(wx - cx, h);
                ctx.stroke();
                wx += GRID_SIZE;
            }
            let mut wy = (cy / GRID_SIZE).floor() * GRID_SIZE;
            while wy <= cy + h {
                ctx.begin_path();
                ctx.move_to(0.0, wy - cy);
                ctx.line_to(w, wy - cy);
                ctx.stroke();
                wy += GRID_SIZE;
            }
        }

        // World border
        let origin = cam.world_to_viewport(Vec2::ZERO);
        let world = snap.world;
        ctx.set_stroke_style_str("rgba(255, 100, 100, 0.3)");
        ctx.set_line_width(4.0);
        ctx.stroke_rect(origin.x as f64, origin.y as f64, world.x as f64, world.y as f64);

        // Entities, back to front
        let target = snap.player.body.pos;
        for entity in snap.visible_entities() {
            let body = entity.body();
            let screen = cam.world_to_viewport(body.pos);
            match entity {
                Visible::Star(_) => {
                    let alpha = if settings.effective_twinkle() { 0.5 + js_sys::Math::random() * 0.5 } else { 0.8 };
                    ctx.set_global_alpha(alpha);
                    ctx.set_fill_style_str("#ffffff");
                    circle(ctx, screen, body.radius);
                    ctx.fill();
                }
                Visible::Particle(p) => {
                    ctx.set_global_alpha(p.fade() as f64);
                    ctx.set_fill_style_str(&p.color.css());
                    circle(ctx, screen, body.radius);
                    ctx.fill();
                }
                Visible::Enemy(e) => {
                    let (fill, outline) = if e.is_flashing() {
                        (Color::WHITE.css(), "#FF8888")
                    } else {
                        (e.color.css(), "rgba(0, 0, 0, 0.5)")
                    };
                    ctx.set_fill_style_str(&fill);
                    ctx.set_stroke_style_str(outline);
                    ctx.set_line_width((body.radius as f64 * 0.1).clamp(1.0, 2.0));
                    circle(ctx, screen, body.radius);
                    ctx.fill();
                    ctx.stroke();
                    if !e.is_flashing() {
                        let eye = screen + e.facing(target) * body.radius * 0.4;
                        ctx.set_fill_style_str("rgba(0, 0, 0, 0.8)");
                        circle(ctx, eye, body.radius * 0.25);
                        ctx.fill();
                    }
                    health_bar(ctx, screen, body.radius, e.health_ratio());
                }
                Visible::Projectile(p) => {
                    ctx.set_shadow_color(&p.color.css());
                    ctx.set_shadow_blur(8.0);
                    ctx.set_fill_style_str(&p.color.css());
                    circle(ctx, screen, body.radius);
                    ctx.fill();
                    ctx.set_shadow_blur(0.0);
                }
                Visible::Player(player) => {
                    let (fill, outline) = if player.is_invincible() {
                        (Color::WHITE.css(), "red")
                    } else {
                        (player.color.css(), "rgba(255, 255, 255, 0.5)")
                    };
                    ctx.set_fill_style_str(&fill);
                    ctx.set_stroke_style_str(outline);
                    ctx.set_line_width(1.5);
                    circle(ctx, screen, body.radius);
                    ctx.fill();
                    ctx.stroke();
                    health_bar(ctx, screen, body.radius, player.health_ratio());
                }
            }
            ctx.set_global_alpha(1.0);
        }
    }

    fn draw_joystick(ctx: &CanvasRenderingContext2d, stick: &Joystick) {
        ctx.set_fill_style_str("rgba(255, 255, 255, 0.12)");
        circle(ctx, stick.base(), JOYSTICK_RADIUS);
        ctx.fill();
        ctx.set_fill_style_str("rgba(255, 255, 255, 0.45)");
        circle(ctx, stick.base() + stick.handle(), JOYSTICK_RADIUS * 0.45);
        ctx.fill();
    }

    /// Match the canvas backing store to the window
    fn fit_canvas(canvas: &HtmlCanvasElement) -> Vec2 {
        let Some(window) = web_sys::window() else {
            return Vec2::new(canvas.width() as f32, canvas.height() as f32);
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);
        Vec2::new(w as f32, h as f32)
    }

    fn touch_pos(canvas: &HtmlCanvasElement, touch: &web_sys::Touch) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            (touch.client_x() as f64 - rect.left()) as f32,
            (touch.client_y() as f64 - rect.top()) as f32,
        )
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Swarm Survivor starting...");

        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let settings = Settings::load();
        let mut tuning = Tuning::default();
        settings.apply_to(&mut tuning);

        let viewport = fit_canvas(&canvas);
        let seed = js_sys::Date::now() as u64;
        let driver = Driver::new(seed, tuning, viewport);
        let mailbox = driver.mailbox();

        let game = Rc::new(RefCell::new(Game {
            driver,
            mailbox,
            settings,
            joystick: Joystick::default(),
            keys: KeyState::default(),
            ctx,
            canvas: canvas.clone(),
            hud: HudElements::find(&document),
            fps: 60.0,
            last_time: None,
        }));

        setup_window_handlers(&canvas, game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(&document, game.clone());
        request_animation_frame(game);

        log::info!("Swarm Survivor running!");
    }

    fn setup_window_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Resize: keep the camera viewport in sync with the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let size = fit_canvas(&canvas_clone);
                game.borrow_mut().driver.set_viewport(size);
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Hidden tab: don't count the time away as one long frame
        if let Some(document) = window.document() {
            let doc_clone = document.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                if doc_clone.hidden() {
                    game.borrow_mut().driver.reset_clock();
                }
            });
            let _ =
                document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Keyboard (fallback/debug)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                if !event.repeat() && g.settings.handle_key(&event.key()) {
                    g.settings.save();
                    g.driver.apply_settings(&g.settings);
                    return;
                }
                g.keys.press(&event.key());
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.release(&event.key());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start: plant the joystick
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if g.driver.state().hud().ended {
                    return;
                }
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let pos = touch_pos(&canvas_clone, &touch);
                    let height = canvas_clone.client_height() as f32;
                    g.joystick.begin(touch.identifier(), pos, height);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move: steer with the controlling touch
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if !g.joystick.is_active() {
                    return;
                }
                event.prevent_default();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let pos = touch_pos(&canvas_clone, &touch);
                        g.joystick.drag(touch.identifier(), pos);
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end/cancel: release the joystick
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        g.joystick.end(touch.identifier());
                    }
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // No context menu on long press
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = canvas.add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("restartButton") else { return };
        for name in ["click", "touchend"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                let g = game.borrow();
                g.mailbox.request_restart();
            });
            let _ = btn.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
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
    use glam::Vec2;
    use swarm_survivor::consts::DEFAULT_VIEWPORT;
    use swarm_survivor::sim::{GameEvent, GameState};
    use swarm_survivor::{Driver, QualityPreset, Settings, Tuning};

    env_logger::init();
    log::info!("Swarm Survivor (native, headless) starting...");

    // Usage: swarm-survivor [seed] [seconds] [low|medium|high]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let seconds = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0f32);
    let settings = match args.next().as_deref().map(QualityPreset::parse) {
        Some(Some(preset)) => Settings::from_preset(preset),
        Some(None) => {
            log::warn!("Unknown quality preset, using defaults");
            Settings::load()
        }
        None => Settings::load(),
    };
    log::info!("Seed {}, {:.0}s, quality {}", seed, seconds, settings.quality.as_str());

    let mut tuning = Tuning::default();
    settings.apply_to(&mut tuning);
    let mut driver = Driver::new(seed, tuning, DEFAULT_VIEWPORT);
    let input = driver.mailbox();

    const DT: f32 = 1.0 / 60.0;
    let frames = (seconds / DT).ceil() as u32;
    let (mut kills, mut hits) = (0u32, 0u32);

    for frame in 0..frames {
        // Circle around the arena so the swarm has to chase
        let t = frame as f32 * DT;
        input.publish_intent(Vec2::from_angle(t * 0.7));
        driver.step(DT);

        for event in driver.events() {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::PlayerHit { .. } => hits += 1,
                _ => {}
            }
        }
        if driver.state().hud().ended {
            break;
        }
    }

    let state: &GameState = driver.state();
    log::info!(
        "Finished after {:.1}s: {} kills, {} hits taken, {} enemies alive",
        state.time_secs,
        kills,
        hits,
        state.enemies.len()
    );
    match serde_json::to_string_pretty(&state.hud()) {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Could not encode HUD: {}", err),
    }
}
