//! The simulation: owns every piece of mutable run state and advances it
//! one fixed tick at a time.
//!
//! Processing order of an active tick:
//!   1. Moving platforms
//!   2. Actor kinematics (carry, jump, run, gravity, collision)
//!   3. Effect expiry
//!   4. Enemy behaviors
//!   5. Contacts: enemies, hazards, power-ups, checkpoints, finish
//!   6. Damage and respawn
//!   7. Run clock and state transitions
//!   8. Ghost recorder and ghost player
//!
//! The run clock value read at the start of the tick (`now_ms`) is what every
//! step sees. During the countdown only the countdown clock moves; paused and
//! finished runs do not change at all.

use glam::Vec2;
use srx_core::geometry::Aabb;
use srx_core::input::TickInput;

use crate::actor::{Actor, Facing, MotionFlags};
use crate::checkpoint::CheckpointManager;
use crate::collision::CollisionWorld;
use crate::config::SimConfig;
use crate::enemy::{resolve_contact, Enemy, EnemyContact, EnemyKind};
use crate::event::GameEvent;
use crate::ghost::{GhostPlayer, GhostRecorder, GhostSample};
use crate::level::{Hazard, Level};
use crate::platform::MovingPlatform;
use crate::powerup::{ActiveEffects, PickupOutcome, PowerUp};
use crate::run_state::{RunState, RunTimer, TimerTransition};

/// What a renderer needs to draw one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub run_state: RunState,
    pub countdown_remaining: u32,
    pub elapsed_ms: u64,
    pub lives: u32,
    pub actor: ActorView,
    pub effects: ActiveEffects,
    pub ghost: Option<GhostSample>,
    pub enemies: Vec<EnemyView>,
    pub powerups: Vec<PowerUp>,
    pub platforms: Vec<Aabb>,
    pub hazards: Vec<Hazard>,
    pub checkpoints: Vec<CheckpointView>,
    pub finish: Aabb,
}

#[derive(Debug, Clone, Copy)]
pub struct ActorView {
    pub aabb: Aabb,
    pub velocity: Vec2,
    pub facing_right: bool,
    pub grounded: bool,
    pub flags: MotionFlags,
}

#[derive(Debug, Clone, Copy)]
pub struct EnemyView {
    pub index: usize,
    pub aabb: Aabb,
    pub kind: EnemyKind,
    pub facing_right: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CheckpointView {
    pub aabb: Aabb,
    pub activated: bool,
    pub current: bool,
}

#[derive(Debug, Default)]
struct ContactOutcome {
    damaged: bool,
    finished: bool,
}

pub struct Simulation {
    config: SimConfig,
    level: Level,
    world: CollisionWorld,
    actor: Actor,
    platforms: Vec<MovingPlatform>,
    enemies: Vec<Enemy>,
    powerups: Vec<PowerUp>,
    checkpoints: CheckpointManager,
    timer: RunTimer,
    recorder: GhostRecorder,
    ghost: GhostPlayer,
    pending: Vec<GameEvent>,
}

impl Simulation {
    pub fn new(config: SimConfig, level: Level, ghost: GhostPlayer) -> Self {
        log::info!(
            "starting level '{}' ({} statics, {} platforms, {} enemies, ghost {})",
            level.level_id,
            level.statics.len(),
            level.platforms.len(),
            level.enemies.len(),
            if ghost.is_active() { "on" } else { "off" }
        );
        Self {
            world: CollisionWorld::new(level.statics.clone()),
            actor: Actor::new(level.spawn_box(), &config),
            platforms: level.platforms.clone(),
            enemies: level.enemies.clone(),
            powerups: level.powerups.clone(),
            checkpoints: CheckpointManager::new(level.checkpoints.clone()),
            timer: RunTimer::new(config.run.countdown_secs),
            recorder: GhostRecorder::new(config.run.ghost_sample_interval_ms),
            ghost,
            pending: Vec::new(),
            config,
            level,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn run_state(&self) -> RunState {
        self.timer.state()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.timer.elapsed_ms()
    }

    pub fn lives(&self) -> u32 {
        self.actor.lives
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn ghost(&self) -> &GhostPlayer {
        &self.ghost
    }

    /// Samples recorded so far in this attempt.
    pub fn recorded_samples(&self) -> &[GhostSample] {
        self.recorder.samples()
    }

    /// Events raised by run controls since the last tick or drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Advances one fixed tick. Returns every event raised since the last
    /// call, including run-control events.
    pub fn tick(&mut self, input: TickInput) -> Vec<GameEvent> {
        match self.timer.state() {
            RunState::Countdown => self.tick_countdown(),
            RunState::Active => self.tick_active(input),
            RunState::Paused | RunState::Completed | RunState::Failed => {}
        }
        self.drain_events()
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.timer.pause();
        if paused {
            log::info!("run paused at {} ms", self.timer.elapsed_ms());
            self.pending.push(GameEvent::Paused);
        }
        paused
    }

    pub fn resume(&mut self) -> bool {
        let resumed = self.timer.resume();
        if resumed {
            log::info!("run resumed");
            self.pending.push(GameEvent::Resumed);
        }
        resumed
    }

    /// Pauses an active run or resumes a paused one.
    pub fn toggle_pause(&mut self) -> bool {
        match self.timer.state() {
            RunState::Active => self.pause(),
            RunState::Paused => self.resume(),
            state => {
                log::debug!("pause toggle ignored in {state:?}");
                false
            }
        }
    }

    /// Rebuilds all mutable state from the level and returns to the countdown.
    pub fn restart(&mut self) {
        self.actor = Actor::new(self.level.spawn_box(), &self.config);
        self.platforms = self.level.platforms.clone();
        self.enemies = self.level.enemies.clone();
        self.powerups = self.level.powerups.clone();
        self.checkpoints = CheckpointManager::new(self.level.checkpoints.clone());
        self.timer.reset();
        self.recorder.clear();
        self.ghost.rewind();
        log::info!("level '{}' restarted", self.level.level_id);
        self.pending.push(GameEvent::Restarted);
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let current = self.checkpoints.current();
        FrameSnapshot {
            run_state: self.timer.state(),
            countdown_remaining: self.timer.countdown_remaining(),
            elapsed_ms: self.timer.elapsed_ms(),
            lives: self.actor.lives,
            actor: ActorView {
                aabb: self.actor.aabb,
                velocity: self.actor.velocity,
                facing_right: self.actor.facing == Facing::Right,
                grounded: self.actor.grounded,
                flags: self.actor.motion_flags(),
            },
            effects: self.actor.effects,
            ghost: self.ghost.current().copied(),
            enemies: self
                .enemies
                .iter()
                .enumerate()
                .filter(|(_, e)| e.alive)
                .map(|(index, e)| EnemyView {
                    index,
                    aabb: e.aabb,
                    kind: e.kind,
                    facing_right: e.facing_right(),
                })
                .collect(),
            powerups: self.powerups.clone(),
            platforms: self.platforms.iter().map(MovingPlatform::aabb).collect(),
            hazards: self.level.hazards.clone(),
            checkpoints: self
                .checkpoints
                .checkpoints()
                .iter()
                .enumerate()
                .map(|(i, cp)| CheckpointView {
                    aabb: cp.aabb,
                    activated: cp.activated,
                    current: current == Some(i),
                })
                .collect(),
            finish: self.level.finish,
        }
    }

    fn tick_countdown(&mut self) {
        match self.timer.tick(self.config.tick_dt_us()) {
            Some(TimerTransition::CountdownTick { remaining }) => {
                self.pending.push(GameEvent::CountdownTick { remaining });
            }
            Some(TimerTransition::Started) => self.pending.push(GameEvent::RunStarted),
            None => {}
        }
    }

    fn tick_active(&mut self, input: TickInput) {
        let dt_us = self.config.tick_dt_us();
        let dt = self.config.tick_dt_secs();
        let now_ms = self.timer.elapsed_ms();

        for platform in &mut self.platforms {
            platform.step(dt);
        }

        self.actor.step(input, dt, &self.world, &self.platforms);

        for ended in self.actor.effects.expire(now_ms) {
            log::debug!("{ended:?} expired at {now_ms} ms");
        }

        for enemy in &mut self.enemies {
            enemy.update(dt, now_ms, &self.world, &self.config.enemy);
        }

        let outcome = self.resolve_contacts(now_ms);

        if outcome.damaged {
            self.apply_damage();
        }

        self.timer.tick(dt_us);
        if outcome.finished && !outcome.damaged && self.timer.complete() {
            let time_ms = self.timer.elapsed_ms();
            log::info!("level '{}' completed in {time_ms} ms", self.level.level_id);
            self.pending.push(GameEvent::LevelCompleted { time_ms });
        }

        self.recorder.record(
            now_ms,
            self.actor.aabb.top_left(),
            self.actor.facing == Facing::Right,
            self.actor.motion_flags(),
        );
        self.ghost.advance(now_ms);
        log::trace!(
            "tick {now_ms} ms: actor at {:?} vel {:?}",
            self.actor.aabb.top_left(),
            self.actor.velocity
        );
    }

    /// Evaluates every contact against the post-physics actor box. Kills and
    /// pickups are collected first and applied after each pass.
    fn resolve_contacts(&mut self, now_ms: u64) -> ContactOutcome {
        let actor_box = self.actor.aabb;
        let actor_vy = self.actor.velocity.y;
        let invincible = self.actor.effects.invincible();
        let mut outcome = ContactOutcome::default();

        let mut killed = Vec::new();
        for (index, enemy) in self.enemies.iter().enumerate() {
            if !enemy.alive || !enemy.aabb.overlaps(&actor_box) {
                continue;
            }
            match resolve_contact(&actor_box, actor_vy, invincible, &enemy.aabb) {
                EnemyContact::Stomp => {
                    self.actor.velocity.y = -self.config.physics.stomp_bounce_speed;
                    killed.push(index);
                    self.pending.push(GameEvent::EnemyStomped { index });
                }
                EnemyContact::Defeated => {
                    killed.push(index);
                    self.pending.push(GameEvent::EnemyDefeated { index });
                }
                EnemyContact::Damage => outcome.damaged = true,
            }
        }
        for index in killed {
            self.enemies[index].alive = false;
            log::debug!("enemy {index} destroyed");
        }

        if !invincible
            && self
                .level
                .hazards
                .iter()
                .any(|hazard| hazard.aabb.overlaps(&actor_box))
        {
            outcome.damaged = true;
        }

        let mut taken = Vec::new();
        self.powerups.retain(|powerup| {
            let touched = powerup.aabb.overlaps(&actor_box);
            if touched {
                taken.push(powerup.kind);
            }
            !touched
        });
        for kind in taken {
            match self.actor.effects.activate(kind, now_ms, &self.config.effects) {
                PickupOutcome::Effect { expires_at_ms, .. } => {
                    log::debug!("{kind} active until {expires_at_ms} ms");
                    self.pending
                        .push(GameEvent::PowerUpActivated { kind, expires_at_ms });
                }
                PickupOutcome::ExtraLife => {
                    self.actor.lives += 1;
                    self.pending.push(GameEvent::ExtraLife {
                        lives: self.actor.lives,
                    });
                }
            }
        }

        while let Some(index) = self.checkpoints.try_activate(&actor_box) {
            self.pending.push(GameEvent::CheckpointActivated { index });
        }

        outcome.finished = actor_box.overlaps(&self.level.finish);
        outcome
    }

    fn apply_damage(&mut self) {
        let lives = self.actor.lose_life();
        log::info!("life lost, {lives} left");
        self.pending.push(GameEvent::LifeLost { lives });
        if lives == 0 {
            if self.timer.fail() {
                log::info!("run failed at {} ms", self.timer.elapsed_ms());
                self.pending.push(GameEvent::RunFailed);
            }
            return;
        }
        let point = self
            .checkpoints
            .respawn_point(self.level.player_start, self.config.run.respawn_offset);
        self.actor.respawn_at(point);
        self.pending.push(GameEvent::Respawned);
    }
}
