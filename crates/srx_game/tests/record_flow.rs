use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use srx_game::config::SimConfig;
use srx_game::event::GameEvent;
use srx_game::ghost::GhostPlayer;
use srx_game::level::{load_level_from_path, Level};
use srx_game::records::{record_completion, RecordStore};
use srx_game::run_state::RunState;
use srx_game::script::{run_script, InputScript};
use srx_game::sim::Simulation;

const LEVEL: &str = r#"{
  "version": "1",
  "level_id": "flow",
  "player_start": { "x": 64, "y": 416 },
  "rows": [ { "x": 0, "y": 448, "count": 40 } ],
  "powerups": [ { "x": 480, "y": 416, "kind": "speed" } ],
  "checkpoints": [ { "x": 400, "y": 448 } ],
  "finish": { "x": 1024, "y": 448 }
}"#;

fn temp_dir(name_hint: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "srx_flow_{}_{}_{}",
        name_hint,
        std::process::id(),
        nanos
    ))
}

fn load_level(dir: &Path) -> Level {
    fs::create_dir_all(dir).expect("create temp dir");
    let path = dir.join("flow.json");
    fs::write(&path, LEVEL).expect("write level");
    let file = load_level_from_path(&path).expect("level loads");
    Level::build(&file, &SimConfig::default())
}

fn script(idle_frames: u32) -> InputScript {
    serde_json::from_str(&format!(
        r#"{{ "frames": [
            {{ "repeat": 180 }},
            {{ "repeat": {idle_frames} }},
            {{ "move": "right", "repeat": 900 }}
        ] }}"#
    ))
    .expect("script parses")
}

fn play(level: &Level, store: &RecordStore, idle_frames: u32) -> (Simulation, Vec<GameEvent>) {
    let ghost = GhostPlayer::load_or_inactive(&store.ghost_path(&level.level_id));
    let mut sim = Simulation::new(SimConfig::default(), level.clone(), ghost);
    let run = run_script(&mut sim, &script(idle_frames));
    assert_eq!(run.final_state, RunState::Completed);
    (sim, run.events)
}

#[test]
fn completed_runs_feed_leaderboard_and_ghost() {
    let dir = temp_dir("records");
    let level = load_level(&dir);
    let store = RecordStore::in_dir(&dir.join("data"));

    let (first, events) = play(&level, &store, 0);
    assert!(!first.ghost().is_active());
    assert!(events.contains(&GameEvent::RunStarted));
    assert!(events.contains(&GameEvent::CheckpointActivated { index: 0 }));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::PowerUpActivated { .. })));

    let first_ms = first.elapsed_ms();
    let mut board = store.load_leaderboard();
    let outcome = record_completion(
        &store,
        &mut board,
        &level.level_id,
        first_ms,
        first.recorded_samples(),
    )
    .expect("first record saved");
    assert!(outcome.new_record);
    assert_eq!(outcome.best_ms, first_ms);

    // Standing still for a second makes the second attempt slower.
    let (second, _) = play(&level, &store, 60);
    assert!(second.ghost().is_active());
    assert_eq!(second.ghost().samples(), first.recorded_samples());

    let second_ms = second.elapsed_ms();
    assert!(second_ms > first_ms);
    let mut board = store.load_leaderboard();
    let outcome = record_completion(
        &store,
        &mut board,
        &level.level_id,
        second_ms,
        second.recorded_samples(),
    )
    .expect("second time saved");
    assert!(!outcome.new_record);
    assert_eq!(outcome.best_ms, first_ms);

    let reloaded = store.load_leaderboard();
    assert_eq!(reloaded.times("flow"), &[first_ms, second_ms]);
    let ghost = GhostPlayer::load_or_inactive(&store.ghost_path("flow"));
    assert_eq!(ghost.samples(), first.recorded_samples());

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn identical_scripts_produce_identical_recordings() {
    let dir = temp_dir("determinism");
    let level = load_level(&dir);
    let store = RecordStore::in_dir(&dir.join("data"));

    let (a, _) = play(&level, &store, 10);
    let (b, _) = play(&level, &store, 10);
    assert_eq!(a.elapsed_ms(), b.elapsed_ms());
    assert_eq!(a.recorded_samples(), b.recorded_samples());

    let _ = fs::remove_dir_all(dir);
}
