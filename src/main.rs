//! Wave Siege headless runner
//!
//! Plays a run on autopilot through the fixed-timestep loop and logs each
//! wave summary. Set `RUST_LOG=debug` for kills and reloads.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use wave_siege::consts::*;
use wave_siege::sim::{GameEvent, GameState, TickInput, tick};
use wave_siege::{Difficulty, Settings};

/// Frame time fed to the accumulator (a 30 Hz presentation layer)
const FRAME_DT: f32 = 1.0 / 30.0;

/// Headless autopilot run of the wave-defense simulation
#[derive(Parser, Debug)]
#[command(author, version, about = "Wave Siege headless runner", long_about = None)]
struct Args {
    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,
    /// Simulation ticks to run before stopping
    #[arg(long, value_name = "N", default_value_t = 60 * 60 * 10)]
    ticks: u64,
    /// JSON settings file
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Difficulty: normal or hard
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,
    /// Shorthand for `--difficulty hard`
    #[arg(long, conflicts_with = "difficulty")]
    hard: bool,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(value).ok_or_else(|| format!("unknown difficulty {value:?}"))
}

/// Game instance driven by a fixed-timestep accumulator
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn new(settings: &Settings) -> Self {
        Self {
            state: GameState::new(settings),
            accumulator: 0.0,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
        }
    }

    /// Run simulation ticks for one presentation frame
    fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Hand the frame's cues to the (absent) presentation layer
    fn drain_events(&mut self) {
        for event in self.state.ctx.drain_events() {
            match event {
                GameEvent::AwardUnlocked(award) => log::info!("award unlocked: {:?}", award),
                GameEvent::WaveStarted { wave } => log::info!("wave {} started", wave),
                GameEvent::EscapeWarning => {
                    let health = self.state.player.as_ref().map_or(0, |p| p.health);
                    log::warn!("an actor got through ({} health left)", health);
                }
                other => log::trace!("cue: {:?}", other),
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty;
    } else if args.hard {
        settings.difficulty = Difficulty::Hard;
    }

    log::info!("Wave Siege (headless) starting...");
    let mut game = Game::new(&settings);
    while game.state.time_ticks < args.ticks && !game.state.is_game_over() {
        game.update(FRAME_DT);
        game.drain_events();
    }

    let state = &game.state;
    for summary in &state.wave_log.entries {
        println!(
            "wave {:>2}: {:>3} kills {:>2} escapes {:>6} points \
             {:>5.1}% accuracy {:>4.2}s avg kill",
            summary.wave,
            summary.kills,
            summary.escapes,
            summary.score,
            summary.accuracy,
            summary.average_kill_time
        );
    }
    if let Some(best) = state.wave_log.best() {
        println!("best wave: {} ({} points)", best.wave, best.score);
    }
    println!(
        "{} after {} ticks: wave {}, {} points, {} currency",
        if state.is_game_over() { "game over" } else { "stopped" },
        state.time_ticks,
        state.wave,
        state.total_score(),
        state.currency()
    );
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["wave-siege"]).unwrap();
        assert_eq!(args.seed, None);
        assert_eq!(args.ticks, 36_000);
        assert!(args.settings.is_none());
        assert!(args.difficulty.is_none());
        assert!(!args.hard);
    }

    #[test]
    fn test_args_parse_values() {
        let args = Args::try_parse_from([
            "wave-siege",
            "--seed",
            "7",
            "--ticks",
            "120",
            "--difficulty",
            "HARD",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.ticks, 120);
        assert_eq!(args.difficulty, Some(Difficulty::Hard));
    }

    #[test]
    fn test_args_reject_bad_input() {
        assert!(Args::try_parse_from(["wave-siege", "--difficulty", "nightmare"]).is_err());
        assert!(Args::try_parse_from(["wave-siege", "--seed", "abc"]).is_err());
        assert!(Args::try_parse_from(["wave-siege", "--hard", "--difficulty", "normal"]).is_err());
    }
}
