//! Sky Runner entry point
//!
//! The browser build is driven from JavaScript through `platform::web`.
//! Natively this runs a headless autopilot session, useful for checking
//! tuning files.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sky_runner::consts::SIM_DT;
    use sky_runner::sim::{GamePhase, Viewport};
    use sky_runner::{Game, Key, Leaderboard, Settings, Tuning};

    /// Longest autopilot run (simulated seconds)
    const MAX_RUN_SECS: f32 = 120.0;
    /// Frames between autopilot jumps
    const JUMP_EVERY: u32 = 45;

    env_logger::init();
    log::info!("Sky Runner (native autopilot) starting...");

    let tuning = Tuning::load();
    let seed = sky_runner::platform::now_ms() as u64;
    let mut game = Game::new(
        seed,
        Viewport::default(),
        tuning,
        Leaderboard::new(),
        Settings::default(),
    );

    // Wait out the title screen
    while !game.state.can_proceed() {
        game.update(SIM_DT);
    }
    game.key_down(Key::Enter);
    game.key_down(Key::Right);

    let max_frames = (MAX_RUN_SECS / SIM_DT) as u32;
    let mut jumps = 0u32;
    for frame in 0..max_frames {
        match frame % JUMP_EVERY {
            0 => game.key_down(Key::Up),
            5 => game.key_up(Key::Up),
            _ => {}
        }
        game.update(SIM_DT);
        jumps += game
            .drain_events()
            .iter()
            .filter(|e| matches!(e, sky_runner::sim::GameEvent::Jumped))
            .count() as u32;

        if game.phase() != GamePhase::Playing {
            break;
        }
    }

    let survival = game.state.survival_secs;
    log::info!(
        "Autopilot survived {} with {} jumps, x = {:.0}",
        sky_runner::renderer::format_timer(survival),
        jumps,
        game.state.player.rect.x
    );

    if game.take_leaderboard_request() {
        game.on_leaderboard_fetched(None);
        let qualified = game.phase() == GamePhase::EnteringName;
        log::info!("Qualifies for an empty leaderboard: {}", qualified);
    } else {
        log::info!("Run reached the {}s limit", MAX_RUN_SECS);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
