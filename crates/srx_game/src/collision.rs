//! Collision world: the immutable solid boxes of a level plus the resolver
//! every gravity-affected body goes through.
//!
//! The core algorithm is **axis-separable move-and-slide**: resolve X movement
//! first against every obstacle, then resolve Y using the already-corrected X
//! position. Resolving X first keeps a body that is brushing a wall corner
//! from stalling its vertical motion.
//!
//! Resolution is discrete: the body is moved by the full displacement and then
//! clamped against whatever it overlaps at the destination. Nothing is swept,
//! so a displacement larger than an obstacle's thickness can pass straight
//! through it. Level geometry is expected to be at least one tile thick.
//!
//! Moving platforms are passed in per call as plain boxes; the world itself
//! never mutates after the level is built.

use glam::Vec2;
use srx_core::geometry::Aabb;

/// Shrinks the cross axis when testing the moving axis, so a body resting
/// flush on a floor is not treated as hitting a wall made of that floor.
const EPS: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticKind {
    Solid,
    /// Invisible level boundary. Collides exactly like a solid but is never drawn.
    Boundary,
}

#[derive(Debug, Clone, Copy)]
pub struct StaticGeometry {
    pub aabb: Aabb,
    pub kind: StaticKind,
}

/// What a body collided with. Indices refer to the slices the resolver was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obstacle {
    Static(usize),
    Platform(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct CollisionMoveResult {
    pub aabb: Aabb,
    pub blocked_left: bool,
    pub blocked_right: bool,
    pub blocked_down: bool,
    pub blocked_up: bool,
    /// Obstacle the body landed on, when `blocked_down`.
    pub support: Option<Obstacle>,
}

#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    solids: Vec<StaticGeometry>,
}

impl CollisionWorld {
    pub fn new(solids: Vec<StaticGeometry>) -> Self {
        Self { solids }
    }

    pub fn solids(&self) -> &[StaticGeometry] {
        &self.solids
    }

    pub fn move_and_collide_detailed(
        &self,
        aabb: Aabb,
        dx: f32,
        dy: f32,
        platforms: &[Aabb],
    ) -> CollisionMoveResult {
        // Axis-separable move-and-slide:
        // resolve X first, then resolve Y using updated X position.
        let (resolved_x, hit_x) = self.resolve_axis_x(aabb, dx, platforms);
        let mut moved = aabb;
        moved.center_x = resolved_x;

        let (resolved_y, hit_y) = self.resolve_axis_y(moved, dy, platforms);
        moved.center_y = resolved_y;

        CollisionMoveResult {
            aabb: moved,
            blocked_left: hit_x.is_some() && dx < 0.0,
            blocked_right: hit_x.is_some() && dx > 0.0,
            blocked_down: hit_y.is_some() && dy > 0.0,
            blocked_up: hit_y.is_some() && dy < 0.0,
            support: if dy > 0.0 { hit_y } else { None },
        }
    }

    /// Moves `aabb` out of every platform that slid into it this tick, along
    /// the platform's dominant direction of travel. Each platform is given as
    /// its box and its displacement for the tick. Only static geometry can
    /// stop the push; a body squeezed against a wall stays embedded.
    pub fn push_out_of_platforms(&self, aabb: Aabb, platforms: &[(Aabb, Vec2)]) -> Aabb {
        let mut pushed = aabb;
        for (platform, delta) in platforms {
            if !overlaps_with_margin(&pushed, platform, EPS, EPS) {
                continue;
            }
            let push = if delta.x.abs() >= delta.y.abs() && delta.x != 0.0 {
                let dx = if delta.x > 0.0 {
                    platform.right() - pushed.left()
                } else {
                    platform.left() - pushed.right()
                };
                Vec2::new(dx, 0.0)
            } else if delta.y != 0.0 {
                let dy = if delta.y > 0.0 {
                    platform.bottom() - pushed.top()
                } else {
                    platform.top() - pushed.bottom()
                };
                Vec2::new(0.0, dy)
            } else {
                continue;
            };
            pushed = self
                .move_and_collide_detailed(pushed, push.x, push.y, &[])
                .aabb;
        }
        pushed
    }

    fn obstacles<'a>(
        &'a self,
        platforms: &'a [Aabb],
    ) -> impl Iterator<Item = (Obstacle, Aabb)> + 'a {
        let statics = self
            .solids
            .iter()
            .enumerate()
            .map(|(i, s)| (Obstacle::Static(i), s.aabb));
        let moving = platforms
            .iter()
            .enumerate()
            .map(|(i, p)| (Obstacle::Platform(i), *p));
        statics.chain(moving)
    }

    fn resolve_axis_x(&self, aabb: Aabb, dx: f32, platforms: &[Aabb]) -> (f32, Option<Obstacle>) {
        if dx == 0.0 {
            return (aabb.center_x, None);
        }

        let candidate = aabb.translated(Vec2::new(dx, 0.0));
        let mut candidate_x = candidate.center_x;
        let mut hit = None;

        for (obstacle, other) in self.obstacles(platforms) {
            // Already embedded: the body may only move out of it.
            if overlaps_with_margin(&aabb, &other, EPS, EPS)
                || !overlaps_with_margin(&candidate, &other, 0.0, EPS)
            {
                continue;
            }
            if dx > 0.0 {
                let clamped = other.left() - aabb.half_w;
                if clamped < candidate_x {
                    candidate_x = clamped;
                    hit = Some(obstacle);
                }
            } else {
                let clamped = other.right() + aabb.half_w;
                if clamped > candidate_x {
                    candidate_x = clamped;
                    hit = Some(obstacle);
                }
            }
        }

        // Guardrail: never push opposite direction during resolution.
        if dx > 0.0 {
            candidate_x = candidate_x.max(aabb.center_x);
        } else {
            candidate_x = candidate_x.min(aabb.center_x);
        }

        (candidate_x, hit)
    }

    fn resolve_axis_y(&self, aabb: Aabb, dy: f32, platforms: &[Aabb]) -> (f32, Option<Obstacle>) {
        if dy == 0.0 {
            return (aabb.center_y, None);
        }

        let candidate = aabb.translated(Vec2::new(0.0, dy));
        let mut candidate_y = candidate.center_y;
        let mut hit = None;

        for (obstacle, other) in self.obstacles(platforms) {
            if overlaps_with_margin(&aabb, &other, EPS, EPS)
                || !overlaps_with_margin(&candidate, &other, EPS, 0.0)
            {
                continue;
            }
            if dy > 0.0 {
                // Falling: land on the highest top among everything overlapped.
                let clamped = other.top() - aabb.half_h;
                if clamped < candidate_y {
                    candidate_y = clamped;
                    hit = Some(obstacle);
                }
            } else {
                let clamped = other.bottom() + aabb.half_h;
                if clamped > candidate_y {
                    candidate_y = clamped;
                    hit = Some(obstacle);
                }
            }
        }

        // Guardrail: never push opposite direction during resolution.
        if dy > 0.0 {
            candidate_y = candidate_y.max(aabb.center_y);
        } else {
            candidate_y = candidate_y.min(aabb.center_y);
        }

        (candidate_y, hit)
    }
}

fn overlaps_with_margin(a: &Aabb, b: &Aabb, margin_x: f32, margin_y: f32) -> bool {
    a.left() + margin_x < b.right()
        && a.right() - margin_x > b.left()
        && a.top() + margin_y < b.bottom()
        && a.bottom() - margin_y > b.top()
}
