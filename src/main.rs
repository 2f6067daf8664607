//! Ball Drop entry point
//!
//! On the web the host page owns the three.js scene; this side runs the
//! physics and camera every animation frame and hands the transforms over.
//! Natively the scene runs headless and reports how it came to rest.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use ball_drop::{
        BallTransform, CameraTransform, Clock, FrameDriver, RenderService, SceneConfig,
    };

    // Forwards transforms to `window.ballDrop.render` when the page defines it
    #[wasm_bindgen(inline_js = "
        export function render_frame(ball_y, sx, sy, sz, cx, cy, cz, tx, ty, tz) {
            const host = window.ballDrop;
            if (host && typeof host.render === 'function') {
                host.render(
                    { y: ball_y, scale: [sx, sy, sz] },
                    { position: [cx, cy, cz], lookAt: [tx, ty, tz] },
                );
            }
        }
    ")]
    extern "C" {
        fn render_frame(
            ball_y: f64,
            sx: f64,
            sy: f64,
            sz: f64,
            cx: f64,
            cy: f64,
            cz: f64,
            tx: f64,
            ty: f64,
            tz: f64,
        );
    }

    /// Render service backed by the host page
    struct JsRenderer;

    impl RenderService for JsRenderer {
        fn render(&mut self, ball: &BallTransform, camera: &CameraTransform) {
            render_frame(
                ball.position.y,
                ball.scale.x,
                ball.scale.y,
                ball.scale.z,
                camera.position.x,
                camera.position.y,
                camera.position.z,
                camera.look_at.x,
                camera.look_at.y,
                camera.look_at.z,
            );
        }
    }

    /// `performance.now()`, monotonic milliseconds
    struct PerformanceClock {
        performance: web_sys::Performance,
    }

    impl Clock for PerformanceClock {
        fn now_ms(&self) -> f64 {
            self.performance.now()
        }
    }

    /// App instance holding all state
    struct App {
        driver: FrameDriver,
        renderer: JsRenderer,
        clock: PerformanceClock,
        /// Whether an animation frame is pending
        scheduled: bool,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ball Drop starting...");

        let window = web_sys::window().expect("no window");
        let performance = window.performance().expect("no performance");

        let config = SceneConfig::load();
        let driver = match FrameDriver::new(config) {
            Ok(driver) => driver,
            Err(e) => {
                log::warn!("Invalid config ({}), using defaults", e);
                FrameDriver::new(SceneConfig::default()).expect("default config is valid")
            }
        };
        log::info!("Scene preset: {}", driver.config().preset.as_str());
        // Persist the effective config so the page can edit it between reloads
        driver.config().save();

        let app = Rc::new(RefCell::new(App {
            driver,
            renderer: JsRenderer,
            clock: PerformanceClock { performance },
            scheduled: true,
        }));

        setup_restart_button(app.clone());

        // Start frame loop
        request_animation_frame(app);

        log::info!("Ball Drop running!");
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        let running = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            let running = a.driver.frame_with(&a.clock, &mut a.renderer);
            a.scheduled = running;
            running
        };

        if running {
            request_animation_frame(app);
        }
    }

    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let resume = {
                    let mut a = app.borrow_mut();
                    a.driver.restart();
                    // Loop stops once the scene is at rest; kick it again
                    let resume = !a.scheduled;
                    a.scheduled = true;
                    resume
                };
                if resume {
                    request_animation_frame(app.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ball Drop (native) starting...");

    if let Err(e) = run_native() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Usage: `ball-drop [<config.json>] [squash|analytic] [--realtime] [--print-config]
/// [--save-config <path>]`
///
/// A preset name given after a config file overrides only its preset fields.
#[cfg(not(target_arch = "wasm32"))]
fn run_native() -> ball_drop::Result<()> {
    use ball_drop::consts::{HEADLESS_FRAME_MS, HEADLESS_MAX_FRAMES};
    use ball_drop::{
        ConfigError, FrameDriver, LogRenderer, Preset, SceneConfig, run_headless, run_realtime,
    };

    let mut config = SceneConfig::default();
    let mut realtime = false;
    let mut print_config = false;
    let mut save_path = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--realtime" => realtime = true,
            "--print-config" => print_config = true,
            "--save-config" => match args.next() {
                Some(path) => save_path = Some(path),
                None => {
                    return Err(ConfigError::InvalidParameter(
                        "--save-config needs a path".to_string(),
                    ));
                }
            },
            other => match Preset::from_str(other) {
                Some(preset) => config.apply_preset(preset),
                None => config = SceneConfig::load_from_path(other)?,
            },
        }
    }

    if let Some(path) = save_path {
        config.validate()?;
        config.save_to_path(path)?;
    }
    if print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let mut driver = FrameDriver::new(config)?;
    let mut renderer = LogRenderer::default();
    log::info!("Scene preset: {}", driver.config().preset.as_str());

    let stats = if realtime {
        run_realtime(&mut driver, &mut renderer, HEADLESS_FRAME_MS)
    } else {
        run_headless(&mut driver, &mut renderer, HEADLESS_FRAME_MS, HEADLESS_MAX_FRAMES)
    };

    match stats.settled_at_ms {
        Some(ms) => println!(
            "Ball settled at {:.0}ms after {} bounces ({} frames rendered)",
            ms, stats.bounces, stats.frames
        ),
        None => println!(
            "Ball still moving after {} frames ({} bounces)",
            stats.frames, stats.bounces
        ),
    }
    Ok(())
}
