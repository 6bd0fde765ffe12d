use glam::Vec2;
use serde::Deserialize;
use srx_core::geometry::Aabb;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    fn unit(self) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::X,
            Self::Vertical => Vec2::Y,
        }
    }
}

/// A solid box that shuttles between its start anchor and `start + distance`
/// along one axis.
///
/// Position is always re-derived from the distance travelled along the axis,
/// so floating-point error never accumulates into drift off the rail.
#[derive(Debug, Clone, Copy)]
pub struct MovingPlatform {
    start: Aabb,
    pub axis: Axis,
    pub distance: f32,
    pub speed: f32,
    pub moving_forward: bool,
    travelled: f32,
    last_delta: Vec2,
}

impl MovingPlatform {
    pub fn new(start: Aabb, axis: Axis, distance: f32, speed: f32) -> Self {
        Self {
            start,
            axis,
            distance,
            speed,
            moving_forward: true,
            travelled: 0.0,
            last_delta: Vec2::ZERO,
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.start.translated(self.axis.unit() * self.travelled)
    }

    /// Displacement applied by the most recent `step`.
    pub fn last_delta(&self) -> Vec2 {
        self.last_delta
    }

    /// Advances along the rail, reversing exactly at either end. Returns this tick's displacement.
    pub fn step(&mut self, dt: f32) -> Vec2 {
        let before = self.travelled;
        let stride = self.speed * dt;

        if self.moving_forward {
            self.travelled += stride;
            if self.travelled >= self.distance {
                self.travelled = self.distance;
                self.moving_forward = false;
            }
        } else {
            self.travelled -= stride;
            if self.travelled <= 0.0 {
                self.travelled = 0.0;
                self.moving_forward = true;
            }
        }

        self.last_delta = self.axis.unit() * (self.travelled - before);
        self.last_delta
    }
}
