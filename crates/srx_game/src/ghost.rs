//! Ghost runs: a time-stamped trail of the actor's top-left position and
//! motion flags, recorded during a run and replayed read-only on the next
//! run of the same level.
//!
//! The file is a JSON array of samples ordered by non-decreasing `time`.
//! A ghost that cannot be read is simply disabled; it never stops a run.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::actor::MotionFlags;
use crate::data::{read_json, write_json, DataError};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct GhostSample {
    /// Run clock in milliseconds.
    pub time: u64,
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_facing_right")]
    pub facing_right: bool,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub is_jumping: bool,
    #[serde(default)]
    pub is_falling: bool,
}

fn default_facing_right() -> bool {
    true
}

pub fn ghost_path(ghost_dir: &Path, level_id: &str) -> PathBuf {
    ghost_dir.join(format!("{level_id}_ghost.json"))
}

pub fn load_ghost_from_path(path: &Path) -> Result<Vec<GhostSample>, DataError> {
    let samples: Vec<GhostSample> = read_json(path)?;
    validate_samples(&samples)?;
    Ok(samples)
}

pub fn save_ghost_to_path(path: &Path, samples: &[GhostSample]) -> Result<(), DataError> {
    write_json(path, samples)?;
    log::info!("saved ghost run ({} samples) to {}", samples.len(), path.display());
    Ok(())
}

fn validate_samples(samples: &[GhostSample]) -> Result<(), DataError> {
    if let Some(index) = samples.windows(2).position(|w| w[1].time < w[0].time) {
        return Err(DataError::Invalid(format!(
            "Ghost validation failed: sample {} goes back in time ({} < {})",
            index + 1,
            samples[index + 1].time,
            samples[index].time
        )));
    }
    Ok(())
}

/// Appends samples at a fixed minimum interval of run time.
#[derive(Debug, Clone)]
pub struct GhostRecorder {
    interval_ms: u64,
    samples: Vec<GhostSample>,
}

impl GhostRecorder {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            samples: Vec::new(),
        }
    }

    /// Records a sample if none exists yet or the interval has passed since
    /// the last one. Returns whether a sample was taken.
    pub fn record(
        &mut self,
        now_ms: u64,
        top_left: Vec2,
        facing_right: bool,
        flags: MotionFlags,
    ) -> bool {
        let due = self
            .samples
            .last()
            .map_or(true, |last| now_ms.saturating_sub(last.time) >= self.interval_ms);
        if !due {
            return false;
        }
        self.samples.push(GhostSample {
            time: now_ms,
            x: top_left.x.round() as i32,
            y: top_left.y.round() as i32,
            facing_right,
            is_running: flags.is_running,
            is_jumping: flags.is_jumping,
            is_falling: flags.is_falling,
        });
        true
    }

    pub fn samples(&self) -> &[GhostSample] {
        &self.samples
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Read-only playback of a previous run. Never influences the simulation.
#[derive(Debug, Clone, Default)]
pub struct GhostPlayer {
    samples: Vec<GhostSample>,
    cursor: usize,
}

impl GhostPlayer {
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: Vec<GhostSample>) -> Result<Self, DataError> {
        validate_samples(&samples)?;
        Ok(Self { samples, cursor: 0 })
    }

    /// Loads the ghost at `path`; any problem disables the ghost instead.
    pub fn load_or_inactive(path: &Path) -> Self {
        if !path.exists() {
            log::info!("no ghost run at {}", path.display());
            return Self::inactive();
        }
        match load_ghost_from_path(path).and_then(Self::from_samples) {
            Ok(player) => {
                log::info!(
                    "loaded ghost run ({} samples) from {}",
                    player.samples.len(),
                    path.display()
                );
                player
            }
            Err(err) => {
                log::warn!("ghost disabled: {err}");
                Self::inactive()
            }
        }
    }

    pub fn is_active(&self) -> bool {
        !self.samples.is_empty()
    }

    pub fn samples(&self) -> &[GhostSample] {
        &self.samples
    }

    /// Moves the cursor forward past every sample whose time has come.
    /// The cursor never moves backward; past the end it holds the last sample.
    pub fn advance(&mut self, now_ms: u64) {
        while self
            .samples
            .get(self.cursor + 1)
            .is_some_and(|next| next.time <= now_ms)
        {
            self.cursor += 1;
        }
    }

    pub fn current(&self) -> Option<&GhostSample> {
        self.samples.get(self.cursor)
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}
