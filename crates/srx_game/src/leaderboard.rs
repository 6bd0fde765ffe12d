use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::data::{read_json, write_json, DataError};

/// Times kept per level.
pub const MAX_ENTRIES: usize = 5;

/// Best completion times per level, ascending, at most `MAX_ENTRIES` each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    levels: BTreeMap<String, Vec<u64>>,
}

/// A stored entry: a bare time, or the older `{ "time": ms, ... }` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTime {
    Plain(u64),
    Legacy { time: u64 },
}

impl StoredTime {
    fn millis(&self) -> u64 {
        match self {
            Self::Plain(ms) | Self::Legacy { time: ms } => *ms,
        }
    }
}

impl Leaderboard {
    pub fn best_time(&self, level_id: &str) -> Option<u64> {
        self.levels.get(level_id).and_then(|times| times.first().copied())
    }

    pub fn is_new_record(&self, level_id: &str, time_ms: u64) -> bool {
        self.best_time(level_id).map_or(true, |best| time_ms < best)
    }

    pub fn add_time(&mut self, level_id: &str, time_ms: u64) {
        let times = self.levels.entry(level_id.to_string()).or_default();
        times.push(time_ms);
        times.sort_unstable();
        times.truncate(MAX_ENTRIES);
    }

    pub fn times(&self, level_id: &str) -> &[u64] {
        self.levels.get(level_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Strict load: any read or parse problem is an error.
    pub fn load_from_path(path: &Path) -> Result<Self, DataError> {
        let raw: BTreeMap<String, Vec<StoredTime>> = read_json(path)?;
        let mut board = Self::default();
        for (level, entries) in raw {
            let mut times: Vec<u64> = entries.iter().map(StoredTime::millis).collect();
            times.sort_unstable();
            times.truncate(MAX_ENTRIES);
            board.levels.insert(level, times);
        }
        Ok(board)
    }

    /// Missing file starts empty; a corrupt one is logged and also starts empty.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load_from_path(path).unwrap_or_else(|err| {
            log::warn!("leaderboard reset: {err}");
            Self::default()
        })
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), DataError> {
        write_json(path, &self.levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::temp_file_path;
    use std::fs;

    #[test]
    fn empty_level_accepts_any_time_as_record() {
        let board = Leaderboard::default();
        assert_eq!(board.best_time("level1"), None);
        assert!(board.is_new_record("level1", 60_000));
    }

    #[test]
    fn record_requires_strictly_better_time() {
        let mut board = Leaderboard::default();
        board.add_time("level1", 10_000);
        board.add_time("level1", 12_000);
        assert!(!board.is_new_record("level1", 15_000));
        assert!(!board.is_new_record("level1", 10_000));
        assert!(board.is_new_record("level1", 9_000));
    }

    #[test]
    fn keeps_five_fastest_in_ascending_order() {
        let mut board = Leaderboard::default();
        for time in [20_000, 15_000, 25_000, 5_000, 30_000, 1_000] {
            board.add_time("level1", time);
        }
        assert_eq!(board.times("level1"), &[1_000, 5_000, 15_000, 20_000, 25_000]);
        assert_eq!(board.best_time("level1"), Some(1_000));
        assert!(board.times("level2").is_empty());
    }

    #[test]
    fn save_then_load_keeps_levels() {
        let path = temp_file_path("leaderboard_save");
        let mut board = Leaderboard::default();
        board.add_time("level1", 42_000);
        board.add_time("level2", 17_500);
        board.save_to_path(&path).expect("save leaderboard");

        let loaded = Leaderboard::load_from_path(&path).expect("load leaderboard");
        assert_eq!(loaded, board);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn legacy_object_entries_are_accepted() {
        let path = temp_file_path("leaderboard_legacy");
        fs::write(
            &path,
            r#"{"level1": [{"time": 9000, "name": "Player"}, 7000], "level2": []}"#,
        )
        .expect("write temp file");
        let board = Leaderboard::load_from_path(&path).expect("load legacy leaderboard");
        assert_eq!(board.times("level1"), &[7_000, 9_000]);
        assert_eq!(board.best_time("level2"), None);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_falls_back_to_empty() {
        let path = temp_file_path("leaderboard_corrupt");
        fs::write(&path, "{\"level1\": [1, ").expect("write temp file");
        assert!(Leaderboard::load_from_path(&path).is_err());
        assert_eq!(Leaderboard::load_or_default(&path), Leaderboard::default());
        let _ = fs::remove_file(path);
    }
}
