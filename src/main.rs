//! Barrage headless demo runner
//!
//! Drives the simulation without a renderer: a simple autopilot chases the
//! nearest enemy column, holds the trigger, takes the first offered upgrade,
//! and restarts after defeat. Useful for smoke-testing balance changes
//! (`RUST_LOG=info cargo run [config.json] [seconds]`).

use std::path::Path;

use barrage::sim::{FrameInput, Phase, Session, tick};
use barrage::Config;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.json".to_string());
    let seconds: u32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60);

    let config = Config::load(Path::new(&config_path));
    let fps = config.window.fps.max(1);
    let dt = 1.0 / fps as f32;
    let mut state = Session::new(config, 0xBA44A6E);

    let mut defeats = 0u32;
    let mut best_wave = 1u32;
    for _ in 0..seconds * fps {
        let input = autopilot(&state);
        if state.phase == Phase::GameOver && input.restart {
            defeats += 1;
        }
        tick(&mut state, &input, dt);
        best_wave = best_wave.max(state.wave);
    }

    log::info!(
        "Demo finished: {}s simulated, best wave {best_wave}, {defeats} defeat(s), \
         final phase {:?} on wave {}",
        seconds,
        state.phase,
        state.wave
    );
}

/// Minimal scripted player: chase the nearest enemy, always fire
fn autopilot(state: &Session) -> FrameInput {
    match state.phase {
        Phase::Playing => {
            let player_x = state.player.rect.center().x;
            let target_x = state
                .enemies
                .iter()
                .map(|e| e.rect.center().x)
                .min_by(|a, b| {
                    (a - player_x).abs().total_cmp(&(b - player_x).abs())
                })
                .unwrap_or(player_x);
            let delta = target_x - player_x;
            FrameInput {
                move_axis: if delta.abs() < 8.0 { 0.0 } else { delta.signum() },
                fire: true,
                ..Default::default()
            }
        }
        Phase::ChoosingUpgrade => FrameInput {
            select_upgrade: Some(0),
            ..Default::default()
        },
        Phase::GameOver => FrameInput {
            restart: true,
            ..Default::default()
        },
    }
}
