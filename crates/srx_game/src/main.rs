//! Headless runner: plays an input script against a level, then files the
//! result on the leaderboard and keeps the ghost of a record run.

use std::path::PathBuf;

use srx_game::config::{load_config_from_path, SimConfig};
use srx_game::event::GameEvent;
use srx_game::ghost::GhostPlayer;
use srx_game::level::{load_level_from_path, Level};
use srx_game::records::{record_completion, RecordStore};
use srx_game::run_state::RunState;
use srx_game::script::{load_script_from_path, run_script};
use srx_game::sim::Simulation;

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, PartialEq)]
struct Args {
    level: PathBuf,
    script: PathBuf,
    config: Option<PathBuf>,
    data_dir: PathBuf,
}

fn usage() -> String {
    "Usage: srx_game <level.json> <script.json> [--config cfg.json] [--data-dir dir]\nExample: cargo run -p srx_game -- levels/level1.json levels/level1_script.json --data-dir data".to_string()
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut data_dir = PathBuf::from(DEFAULT_DATA_DIR);

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or_else(usage)?;
                config = Some(PathBuf::from(value));
            }
            "--data-dir" => {
                let value = iter.next().ok_or_else(usage)?;
                data_dir = PathBuf::from(value);
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option '{flag}'\n{}", usage()));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let [level, script]: [PathBuf; 2] = positional.try_into().map_err(|_| usage())?;
    Ok(Args {
        level,
        script,
        config,
        data_dir,
    })
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::CountdownTick { remaining } => log::info!("{remaining}..."),
        GameEvent::RunStarted => log::info!("Go!"),
        GameEvent::LifeLost { lives } => log::info!("life lost, {lives} left"),
        GameEvent::LevelCompleted { time_ms } => log::info!("finished in {time_ms} ms"),
        GameEvent::RunFailed => log::info!("out of lives"),
        other => log::debug!("{other:?}"),
    }
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&raw)?;

    let config = match &args.config {
        Some(path) => load_config_from_path(path).map_err(|e| e.to_string())?,
        None => SimConfig::default(),
    };
    let level_file = load_level_from_path(&args.level).map_err(|e| e.to_string())?;
    let level = Level::build(&level_file, &config);
    let script = load_script_from_path(&args.script).map_err(|e| e.to_string())?;

    let store = RecordStore::in_dir(&args.data_dir);
    let ghost = GhostPlayer::load_or_inactive(&store.ghost_path(&level.level_id));
    let level_id = level.level_id.clone();

    let mut sim = Simulation::new(config, level, ghost);
    let run = run_script(&mut sim, &script);
    for event in &run.events {
        log_event(event);
    }
    let last_frame = sim.snapshot();
    log::debug!(
        "last frame: actor at {:?}, {} lives, {} enemies left, ghost {:?}",
        last_frame.actor.aabb.top_left(),
        last_frame.lives,
        last_frame.enemies.len(),
        last_frame.ghost.map(|g| (g.x, g.y))
    );

    match run.final_state {
        RunState::Completed => {
            let time_ms = sim.elapsed_ms();
            let mut leaderboard = store.load_leaderboard();
            let outcome = record_completion(
                &store,
                &mut leaderboard,
                &level_id,
                time_ms,
                sim.recorded_samples(),
            )
            .map_err(|e| e.to_string())?;
            let tag = match (outcome.new_record, outcome.ghost_saved) {
                (true, true) => "new record",
                (true, false) => "new record, ghost not saved",
                (false, _) => "no record",
            };
            println!(
                "{level_id}: completed in {time_ms} ms ({tag}, best {} ms)",
                outcome.best_ms
            );
        }
        RunState::Failed => {
            println!("{level_id}: failed after {} ms", sim.elapsed_ms());
        }
        state => {
            println!(
                "{level_id}: script ended after {} ticks with run {state:?} at {} ms",
                run.ticks,
                sim.elapsed_ms()
            );
        }
    }
    Ok(())
}
