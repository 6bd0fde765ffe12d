//! SpeedRunner run engine: fixed-tick platformer simulation, ghost replays
//! and run records. Rendering, audio and menus live outside this crate; they
//! read `sim::FrameSnapshot` and consume `event::GameEvent`s.

pub mod actor;
pub mod checkpoint;
pub mod collision;
pub mod config;
pub mod data;
pub mod enemy;
pub mod event;
pub mod ghost;
pub mod leaderboard;
pub mod level;
pub mod platform;
pub mod powerup;
pub mod records;
pub mod run_state;
pub mod script;
pub mod sim;
