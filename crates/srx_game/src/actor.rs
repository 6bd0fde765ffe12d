use glam::Vec2;
use srx_core::geometry::Aabb;
use srx_core::input::{MoveDir, TickInput};

use crate::collision::{CollisionMoveResult, CollisionWorld, Obstacle};
use crate::config::{PhysicsConfig, SimConfig};
use crate::platform::MovingPlatform;
use crate::powerup::ActiveEffects;

/// Vertical speed above which the actor counts as falling rather than settling.
pub const FALL_THRESHOLD: f32 = 60.0;
/// Horizontal speed above which the actor counts as running.
pub const RUN_THRESHOLD: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub up: bool,
}

/// Presentation flags derived from velocity; also what the ghost records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionFlags {
    pub is_running: bool,
    pub is_jumping: bool,
    pub is_falling: bool,
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub aabb: Aabb,
    pub velocity: Vec2,
    pub grounded: bool,
    pub facing: Facing,
    pub lives: u32,
    pub effects: ActiveEffects,
    pub contacts: ContactState,
    /// What the actor landed on last tick; a platform here carries the actor.
    pub support: Option<Obstacle>,
    physics: PhysicsConfig,
    speed_multiplier: f32,
}

impl Actor {
    pub fn new(aabb: Aabb, config: &SimConfig) -> Self {
        Self {
            aabb,
            velocity: Vec2::ZERO,
            grounded: false,
            facing: Facing::Right,
            lives: config.run.start_lives,
            effects: ActiveEffects::default(),
            contacts: ContactState::default(),
            support: None,
            physics: config.physics,
            speed_multiplier: config.effects.speed_multiplier,
        }
    }

    pub fn max_speed(&self) -> f32 {
        if self.effects.speed_boost() {
            self.physics.max_speed * self.speed_multiplier
        } else {
            self.physics.max_speed
        }
    }

    /// One fixed tick of kinematics. `platforms` must already have been
    /// stepped for this tick so their `last_delta` is current.
    pub fn step(
        &mut self,
        input: TickInput,
        dt: f32,
        world: &CollisionWorld,
        platforms: &[MovingPlatform],
    ) {
        // Riding a platform: take its displacement before our own movement.
        // Only static geometry can stop the carry.
        if let (true, Some(Obstacle::Platform(index))) = (self.grounded, self.support) {
            if let Some(platform) = platforms.get(index) {
                let carry = platform.last_delta();
                if carry != Vec2::ZERO {
                    self.aabb = world
                        .move_and_collide_detailed(self.aabb, carry.x, carry.y, &[])
                        .aabb;
                }
            }
        }

        // A platform that slid into the actor this tick shoves it aside.
        let moving: Vec<(Aabb, Vec2)> = platforms
            .iter()
            .map(|p| (p.aabb(), p.last_delta()))
            .collect();
        self.aabb = world.push_out_of_platforms(self.aabb, &moving);

        // Jump is only legal from the grounded state left by the previous tick.
        if input.jump && self.grounded {
            self.velocity.y = -self.physics.jump_speed;
        }

        // Horizontal control: accelerate toward intent, friction when idle.
        match input.direction {
            MoveDir::Right => {
                self.velocity.x += self.physics.acceleration * dt;
                self.facing = Facing::Right;
            }
            MoveDir::Left => {
                self.velocity.x -= self.physics.acceleration * dt;
                self.facing = Facing::Left;
            }
            MoveDir::None => {
                self.velocity.x = move_towards(self.velocity.x, 0.0, self.physics.friction * dt);
            }
        }
        let ceiling = self.max_speed();
        self.velocity.x = self.velocity.x.clamp(-ceiling, ceiling);

        self.velocity.y =
            (self.velocity.y + self.physics.gravity * dt).min(self.physics.terminal_velocity);

        let platform_boxes: Vec<Aabb> = moving.iter().map(|(aabb, _)| *aabb).collect();
        let dx = self.velocity.x * dt;
        let dy = self.velocity.y * dt;
        let result = world.move_and_collide_detailed(self.aabb, dx, dy, &platform_boxes);
        self.apply_collision_result(result);
    }

    fn apply_collision_result(&mut self, result: CollisionMoveResult) {
        self.aabb = result.aabb;
        self.contacts = ContactState {
            left: result.blocked_left,
            right: result.blocked_right,
            down: result.blocked_down,
            up: result.blocked_up,
        };

        if (result.blocked_left && self.velocity.x < 0.0)
            || (result.blocked_right && self.velocity.x > 0.0)
        {
            self.velocity.x = 0.0;
        }

        if result.blocked_up && self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }

        // Grounded is driven from collision contact, never carried over.
        if result.blocked_down {
            self.velocity.y = 0.0;
            self.grounded = true;
            self.support = result.support;
        } else {
            self.grounded = false;
            self.support = None;
        }
    }

    /// Moves the actor to `top_left` at rest. Effects and lives are untouched.
    pub fn respawn_at(&mut self, top_left: Vec2) {
        self.aabb = self.aabb.with_top_left(top_left);
        self.velocity = Vec2::ZERO;
        self.grounded = false;
        self.support = None;
        self.contacts = ContactState::default();
    }

    /// Removes one life. Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn motion_flags(&self) -> MotionFlags {
        let is_jumping = self.velocity.y < 0.0;
        let is_falling = !is_jumping && self.velocity.y > FALL_THRESHOLD;
        MotionFlags {
            is_running: !is_jumping && !is_falling && self.velocity.x.abs() > RUN_THRESHOLD,
            is_jumping,
            is_falling,
        }
    }
}

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else if target > current {
        current + max_delta
    } else {
        current - max_delta
    }
}
