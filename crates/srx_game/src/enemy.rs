//! Enemy behaviors and the enemy/actor contact rule.
//!
//! Each `EnemyKind` has its own update function; `Enemy::update` picks one
//! with a single `match`. Enemies never look at each other or at the actor
//! while updating.

use glam::Vec2;
use serde::Deserialize;
use srx_core::geometry::Aabb;

use crate::collision::CollisionWorld;
use crate::config::EnemyConfig;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    #[default]
    Patrol,
    Flying,
    Jumping,
}

#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub aabb: Aabb,
    pub velocity: Vec2,
    pub patrol_distance: f32,
    pub moving_right: bool,
    pub alive: bool,
    pub grounded: bool,
    spawn: Vec2,
    phase: f32,
    last_jump_ms: u64,
}

/// Outcome of the actor touching a live enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyContact {
    /// Landed on it from above while descending.
    Stomp,
    /// Walked into it while invincible.
    Defeated,
    Damage,
}

impl Enemy {
    pub fn new(kind: EnemyKind, aabb: Aabb, patrol_distance: f32) -> Self {
        Self {
            kind,
            aabb,
            velocity: Vec2::ZERO,
            patrol_distance,
            moving_right: false,
            alive: true,
            grounded: false,
            spawn: aabb.top_left(),
            phase: 0.0,
            last_jump_ms: 0,
        }
    }

    pub fn patrol_bounds(&self) -> (f32, f32) {
        (
            self.spawn.x - self.patrol_distance,
            self.spawn.x + self.patrol_distance,
        )
    }

    pub fn facing_right(&self) -> bool {
        self.moving_right
    }

    pub fn update(&mut self, dt: f32, now_ms: u64, world: &CollisionWorld, config: &EnemyConfig) {
        if !self.alive {
            return;
        }
        match self.kind {
            EnemyKind::Patrol => self.update_patrol(dt, config),
            EnemyKind::Flying => self.update_flying(dt, config),
            EnemyKind::Jumping => self.update_jumping(dt, now_ms, world, config),
        }
    }

    fn update_patrol(&mut self, dt: f32, config: &EnemyConfig) {
        let x = self.next_patrol_x(dt, config);
        self.aabb = self.aabb.with_left(x);
    }

    fn update_flying(&mut self, dt: f32, config: &EnemyConfig) {
        let x = self.next_patrol_x(dt, config);
        self.phase += config.fly_frequency * dt;
        let y = self.spawn.y + self.phase.sin() * config.fly_amplitude;
        let before = self.aabb.top_left();
        self.aabb = self.aabb.with_top_left(Vec2::new(x, y));
        if dt > 0.0 {
            self.velocity.y = (y - before.y) / dt;
        }
    }

    fn update_jumping(
        &mut self,
        dt: f32,
        now_ms: u64,
        world: &CollisionWorld,
        config: &EnemyConfig,
    ) {
        if self.grounded && now_ms.saturating_sub(self.last_jump_ms) >= config.jump_interval_ms {
            self.velocity.y = -config.jump_speed;
            self.last_jump_ms = now_ms;
        }
        self.velocity.y += config.gravity * dt;

        let was_moving_right = self.moving_right;
        let dx = self.next_patrol_x(dt, config) - self.aabb.left();
        let dy = self.velocity.y * dt;

        // Static geometry only; moving platforms do not carry enemies.
        let result = world.move_and_collide_detailed(self.aabb, dx, dy, &[]);
        self.aabb = result.aabb;

        if result.blocked_left || result.blocked_right {
            self.moving_right = !was_moving_right;
            self.velocity.x = 0.0;
        }
        if result.blocked_up && self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }
        self.grounded = result.blocked_down;
        if self.grounded {
            self.velocity.y = 0.0;
        }
    }

    /// Steps along the patrol line, clamping to the bound and flipping there.
    fn next_patrol_x(&mut self, dt: f32, config: &EnemyConfig) -> f32 {
        let (min_x, max_x) = self.patrol_bounds();
        let step = config.speed * dt;
        let mut x = self.aabb.left();
        if self.moving_right {
            x += step;
            if x >= max_x {
                x = max_x;
                self.moving_right = false;
            }
        } else {
            x -= step;
            if x <= min_x {
                x = min_x;
                self.moving_right = true;
            }
        }
        self.velocity.x = if self.moving_right { config.speed } else { -config.speed };
        x
    }
}

/// Decides what touching `enemy` does to the actor. Only meaningful when the
/// boxes overlap.
pub fn resolve_contact(actor: &Aabb, actor_vy: f32, invincible: bool, enemy: &Aabb) -> EnemyContact {
    if actor.bottom() < enemy.center_y && actor_vy > 0.0 {
        EnemyContact::Stomp
    } else if invincible {
        EnemyContact::Defeated
    } else {
        EnemyContact::Damage
    }
}
