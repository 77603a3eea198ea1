//! Swarm Shooter headless runner
//!
//! Plays one autopilot match at a fixed frame rate and prints the final
//! snapshot as JSON. Useful for soak tests and balance checks.
//!
//! ```text
//! swarm-shooter [--seed N] [--profile arcade|isometric] [--frames N]
//!               [--tuning overrides.json] [--assets wallet.json]
//! ```

use std::error::Error;
use std::fs;
use std::process::ExitCode;

use swarm_shooter::sim::{GameState, skins_from_json};
use swarm_shooter::{HighScores, Profile, Session, Tuning};

/// Host frame interval (~60 Hz display)
const FRAME_MS: u64 = 16;

struct Args {
    seed: u64,
    profile: Profile,
    frames: u64,
    tuning_path: Option<String>,
    assets_path: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            profile: Profile::default(),
            frames: 60 * 60,
            tuning_path: None,
            assets_path: None,
        }
    }
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .ok_or_else(|| format!("missing value for {}", flag))
        };
        match flag.as_str() {
            "--seed" => args.seed = value()?.parse()?,
            "--frames" => args.frames = value()?.parse()?,
            "--profile" => {
                let name = value()?;
                args.profile =
                    Profile::from_str(&name).ok_or_else(|| format!("unknown profile {}", name))?;
            }
            "--tuning" => args.tuning_path = Some(value()?),
            "--assets" => args.assets_path = Some(value()?),
            other => return Err(format!("unknown argument {}", other).into()),
        }
    }
    Ok(args)
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;

    let tuning = match &args.tuning_path {
        Some(path) => Tuning::from_json_over(args.profile, &fs::read_to_string(path)?)?,
        None => Tuning::for_profile(args.profile),
    };
    let skins = match &args.assets_path {
        Some(path) => skins_from_json(&fs::read_to_string(path)?),
        None => Vec::new(),
    };

    log::info!(
        "Running {} frames, profile {}, seed {}",
        args.frames,
        tuning.profile.as_str(),
        args.seed
    );

    let state = GameState::new(args.seed, tuning, skins);
    let mut session = Session::new(state, HighScores::new());
    session.set_autopilot(true);
    session.start_game();

    let mut token = session.start();
    let mut now = 0;
    for _ in 0..args.frames {
        let Some(current) = token else {
            break;
        };
        token = session.frame(current, now);
        now += FRAME_MS;
        if !session.state().is_playing() {
            break;
        }
    }
    session.stop();
    session.end_game();

    let summary = session.state().summary();
    log::info!(
        "Final score {} (level {}, {} kills, best combo {}, {:.1}s)",
        summary.final_score,
        summary.level,
        summary.kills,
        summary.max_combo,
        summary.duration_ms as f32 / 1000.0
    );
    if let Some(rank) = session.listener().last_rank {
        log::info!("Leaderboard rank #{}", rank);
    }

    println!("{}", session.snapshot().to_json()?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
