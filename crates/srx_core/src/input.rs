//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   physically down. Movement and jump intent are derived from held keys.
//!
//! - **Edge-triggered (just_pressed):** true only during the render frame the
//!   press happened, cleared by `end_frame()` at the end of every frame. Pause
//!   and restart are the only edge queries and the runner reads them once per
//!   frame before stepping, so a frame that runs zero ticks loses nothing; tick
//!   intent is built from held keys alone.
//!
//! The simulation never sees keys. It receives one [`TickInput`] per tick,
//! built by [`InputState::intent`].

use std::collections::HashSet;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Space,
    Escape,
    A,
    D,
    W,
    R,
}

/// Horizontal intent for one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDir {
    Left,
    Right,
    #[default]
    None,
}

/// Discrete per-tick intent consumed by the simulation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickInput {
    pub direction: MoveDir,
    pub jump: bool,
}

impl TickInput {
    pub const IDLE: TickInput = TickInput {
        direction: MoveDir::None,
        jump: false,
    };

    pub fn new(direction: MoveDir, jump: bool) -> Self {
        Self { direction, jump }
    }
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn set_held(&mut self, key: Key, down: bool) {
        if down {
            self.key_down(key);
        } else {
            self.key_up(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Right wins over left when both are held.
    pub fn intent(&self) -> TickInput {
        let right = self.is_held(Key::Right) || self.is_held(Key::D);
        let left = self.is_held(Key::Left) || self.is_held(Key::A);
        let direction = if right {
            MoveDir::Right
        } else if left {
            MoveDir::Left
        } else {
            MoveDir::None
        };
        let jump = self.is_held(Key::Space) || self.is_held(Key::Up) || self.is_held(Key::W);
        TickInput { direction, jump }
    }

    pub fn pause_requested(&self) -> bool {
        self.is_just_pressed(Key::Escape)
    }

    pub fn restart_requested(&self) -> bool {
        self.is_just_pressed(Key::R)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
