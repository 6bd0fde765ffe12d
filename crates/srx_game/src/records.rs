//! What happens to a finished run: the ghost is kept only for a new best
//! time, and every completion lands on the leaderboard.

use std::path::{Path, PathBuf};

use crate::data::DataError;
use crate::ghost::{ghost_path, save_ghost_to_path, GhostSample};
use crate::leaderboard::Leaderboard;

/// Where run records live on disk.
#[derive(Debug, Clone)]
pub struct RecordStore {
    pub leaderboard_path: PathBuf,
    pub ghost_dir: PathBuf,
}

impl RecordStore {
    /// `leaderboard.json` and `ghost_runs/` under `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            leaderboard_path: data_dir.join("leaderboard.json"),
            ghost_dir: data_dir.join("ghost_runs"),
        }
    }

    pub fn ghost_path(&self, level_id: &str) -> PathBuf {
        ghost_path(&self.ghost_dir, level_id)
    }

    pub fn load_leaderboard(&self) -> Leaderboard {
        Leaderboard::load_or_default(&self.leaderboard_path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    pub new_record: bool,
    pub best_ms: u64,
    /// False when a new record's ghost could not be written.
    pub ghost_saved: bool,
}

/// Files a finished run. A ghost that fails to save is logged and reported
/// in the outcome; the time still goes on the leaderboard.

pub fn record_completion(
    store: &RecordStore,
    leaderboard: &mut Leaderboard,
    level_id: &str,
    time_ms: u64,
    samples: &[GhostSample],
) -> Result<RecordOutcome, DataError> {
    let new_record = leaderboard.is_new_record(level_id, time_ms);
    let mut ghost_saved = false;
    if new_record {
        log::info!("new record on '{level_id}': {time_ms} ms");
        match save_ghost_to_path(&store.ghost_path(level_id), samples) {
            Ok(()) => ghost_saved = true,
            Err(err) => log::warn!("ghost for '{level_id}' not saved: {err}"),
        }
    }
    leaderboard.add_time(level_id, time_ms);
    leaderboard.save_to_path(&store.leaderboard_path)?;

    Ok(RecordOutcome {
        new_record,
        best_ms: leaderboard.best_time(level_id).unwrap_or(time_ms),
        ghost_saved,
    })
}
