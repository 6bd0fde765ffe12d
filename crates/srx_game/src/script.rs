//! Scripted input: a JSON list of render frames with the keys held during
//! each, replayed through the fixed-step clock and the keyboard state just as
//! a windowed front end would feed them.

use std::path::Path;

use serde::Deserialize;
use srx_core::input::{InputState, Key, MoveDir};
use srx_core::time::FixedStep;

use crate::data::{read_json, DataError};
use crate::event::GameEvent;
use crate::run_state::RunState;
use crate::sim::Simulation;

#[derive(Debug, Deserialize, Clone)]
pub struct InputScript {
    /// Seconds per render frame.
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f32,
    pub frames: Vec<ScriptFrame>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ScriptFrame {
    #[serde(default, rename = "move")]
    pub direction: MoveDir,
    #[serde(default)]
    pub jump: bool,
    /// Press Escape on the first repeat of this frame.
    #[serde(default)]
    pub pause: bool,
    /// Press R on the first repeat of this frame.
    #[serde(default)]
    pub restart: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ScriptFrame {
    fn apply(&self, input: &mut InputState) {
        input.set_held(Key::Right, self.direction == MoveDir::Right);
        input.set_held(Key::Left, self.direction == MoveDir::Left);
        input.set_held(Key::Space, self.jump);
        input.set_held(Key::Escape, self.pause);
        input.set_held(Key::R, self.restart);
    }
}

impl InputScript {
    pub fn frame_us(&self) -> u64 {
        (f64::from(self.frame_dt) * 1_000_000.0).round() as u64
    }

    /// One entry per render frame. Pause and restart are presses, so only the
    /// first copy of a repeated frame carries them.
    pub fn expanded_frames(&self) -> Vec<ScriptFrame> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                out.push(ScriptFrame {
                    pause: frame.pause && i == 0,
                    restart: frame.restart && i == 0,
                    repeat: 1,
                    ..*frame
                });
            }
        }
        out
    }
}

pub fn load_script_from_path(path: &Path) -> Result<InputScript, DataError> {
    let script: InputScript = read_json(path)?;
    validate_script(&script)?;
    Ok(script)
}

fn validate_script(script: &InputScript) -> Result<(), DataError> {
    if script.frame_dt <= 0.0 || !script.frame_dt.is_finite() {
        return Err(DataError::Invalid(
            "Script validation failed: frame_dt must be > 0".to_string(),
        ));
    }
    if script.frames.is_empty() {
        return Err(DataError::Invalid(
            "Script validation failed: frames list is empty".to_string(),
        ));
    }
    Ok(())
}

/// Summary of a scripted session.
#[derive(Debug, Clone)]
pub struct ScriptRun {
    pub frames: u64,
    pub ticks: u64,
    pub events: Vec<GameEvent>,
    pub final_state: RunState,
}

/// Plays `script` against `sim` until the script runs out or the run ends.
pub fn run_script(sim: &mut Simulation, script: &InputScript) -> ScriptRun {
    let mut clock = FixedStep::new(sim.config().run.tick_hz);
    let mut input = InputState::new();
    let frame_us = script.frame_us();
    let mut events = Vec::new();

    for frame in script.expanded_frames() {
        frame.apply(&mut input);
        if input.restart_requested() {
            sim.restart();
        }
        if input.pause_requested() {
            sim.toggle_pause();
        }

        clock.begin_frame(frame_us);
        while clock.should_step() {
            events.extend(sim.tick(input.intent()));
        }
        events.extend(sim.drain_events());
        clock.end_frame();
        input.end_frame();

        if sim.run_state().is_finished() {
            break;
        }
    }

    log::debug!(
        "script finished after {} frames / {} ticks in {:?}",
        clock.frame_count,
        clock.fixed_step_count,
        sim.run_state()
    );
    ScriptRun {
        frames: clock.frame_count,
        ticks: clock.fixed_step_count,
        events,
        final_state: sim.run_state(),
    }
}

const fn default_frame_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}
