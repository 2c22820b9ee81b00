//! Platformer2D demo
//!
//! Runs a level from a RON file (first argument) or the embedded demo
//! level, with keyboard and gamepad input, synthesized sound cues and a
//! flat debug renderer. The simulation itself lives in the library.

mod input;
mod render;
mod sound;

use macroquad::prelude::*;
use platformer2d::game::audio::CueSink;
use platformer2d::game::{load_level, load_level_from_str, DisplayRate, LevelConfig, Simulation};
use platformer2d::VERSION;
use tracing::{info, warn};

use input::{Action, InputState};
use render::{draw_hud, draw_world, HudInfo};

const DEMO_LEVEL: &str = include_str!("../assets/levels/demo.ron");

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Platformer2D v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        #[cfg(not(target_arch = "wasm32"))]
        fullscreen: false,
        ..Default::default()
    }
}

/// Level from the command line, falling back to the embedded demo level
fn initial_level() -> LevelConfig {
    if let Some(path) = std::env::args().nth(1) {
        match load_level(&path) {
            Ok(level) => return level,
            Err(e) => warn!(path = %path, error = %e, "failed to load level, using demo level"),
        }
    }
    match load_level_from_str(DEMO_LEVEL) {
        Ok(level) => level,
        Err(e) => {
            warn!(error = %e, "embedded demo level is invalid, using defaults");
            LevelConfig::default()
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    // No wall clock on wasm32-unknown-unknown, so no fmt timestamps there
    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
    }

    let mut sim = Simulation::new(initial_level());
    let mut input = InputState::new();
    let mut bank = sound::load_bank().await;
    let mut rate = DisplayRate::default();
    let mut show_hud = true;

    info!(version = VERSION, physics_hz = sim.level().physics_hz, "platformer2d started");

    loop {
        // Track frame start time for FPS limiting
        let frame_start = get_time();

        input.poll();
        if input.action_pressed(Action::Pause) {
            sim.playing = !sim.playing;
            info!(playing = sim.playing, "pause toggled");
        }
        if input.action_pressed(Action::Reset) {
            sim.reset();
        }
        if input.action_pressed(Action::CycleDisplayRate) {
            rate = rate.next();
            info!(rate = rate.label(), "display rate changed");
        }
        if input.action_pressed(Action::ToggleHud) {
            show_hud = !show_hud;
        }

        let snapshot = input.snapshot();
        let steps = if !sim.playing && input.action_pressed(Action::StepPhysics) {
            sim.step_once();
            1
        } else {
            sim.frame(get_frame_time(), &snapshot)
        };

        if let Some(controller) = sim.world.character(sim.player()) {
            bank.set_jump_volume(controller.jump_volume());
        }
        for cue in sim.world.events.cues.drain() {
            bank.cue(cue.cue);
        }

        draw_world(&sim);
        if show_hud {
            draw_hud(
                &sim,
                &HudInfo {
                    display_rate: rate.label(),
                    steps_this_frame: steps,
                    has_gamepad: input.has_gamepad(),
                },
            );
        }

        if let Some(target_frame_time) = rate.frame_time() {
            let elapsed = get_time() - frame_start;
            let remaining = target_frame_time - elapsed;

            if remaining > 0.0 {
                // Native: use sleep for bulk, then spin-wait for precision
                #[cfg(not(target_arch = "wasm32"))]
                {
                    let spin_margin = 0.002; // 2ms
                    while get_time() - frame_start + spin_margin < target_frame_time {
                        std::thread::sleep(std::time::Duration::from_millis(1));
                    }
                    while get_time() - frame_start < target_frame_time {
                        std::hint::spin_loop();
                    }
                }
                // WASM: just spin-wait (no thread::sleep available)
                #[cfg(target_arch = "wasm32")]
                {
                    while get_time() - frame_start < target_frame_time {}
                }
            }
        }

        next_frame().await;
    }
}
