use glam::Vec2;
use srx_core::geometry::Aabb;

/// A flag the actor can touch once to move its respawn point.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    /// Foot of the flag pole (its bottom-left); respawn is measured from here.
    pub anchor: Vec2,
    pub aabb: Aabb,
    pub activated: bool,
}

impl Checkpoint {
    pub fn new(anchor: Vec2, width: f32, height: f32) -> Self {
        Self {
            anchor,
            aabb: Aabb::from_bottom_left(anchor.x, anchor.y, width, height),
            activated: false,
        }
    }
}

/// Tracks activation and the current respawn anchor.
///
/// Activation is one-way. Only the most recently activated checkpoint is
/// current; earlier ones stay activated but no longer decide respawn.
#[derive(Debug, Clone, Default)]
pub struct CheckpointManager {
    checkpoints: Vec<Checkpoint>,
    current: Option<usize>,
}

impl CheckpointManager {
    pub fn new(checkpoints: Vec<Checkpoint>) -> Self {
        Self {
            checkpoints,
            current: None,
        }
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Activates the first inactive checkpoint `actor` overlaps, if any.
    pub fn try_activate(&mut self, actor: &Aabb) -> Option<usize> {
        let index = self
            .checkpoints
            .iter()
            .position(|cp| !cp.activated && cp.aabb.overlaps(actor))?;
        self.checkpoints[index].activated = true;
        self.current = Some(index);
        log::debug!("checkpoint {index} activated");
        Some(index)
    }

    /// Top-left the actor respawns at: above the current anchor, or `start`.
    pub fn respawn_point(&self, start: Vec2, offset: f32) -> Vec2 {
        self.current
            .and_then(|index| self.checkpoints.get(index))
            .map(|cp| Vec2::new(cp.anchor.x, cp.anchor.y - offset))
            .unwrap_or(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> CheckpointManager {
        CheckpointManager::new(vec![
            Checkpoint::new(Vec2::new(200.0, 364.0), 32.0, 64.0),
            Checkpoint::new(Vec2::new(600.0, 364.0), 32.0, 64.0),
        ])
    }

    #[test]
    fn respawn_uses_start_until_a_checkpoint_is_touched() {
        let cps = manager();
        let start = Vec2::new(32.0, 320.0);
        assert_eq!(cps.respawn_point(start, 64.0), start);
    }

    #[test]
    fn overlap_activates_and_moves_respawn_point() {
        let mut cps = manager();
        let actor = Aabb::from_top_left(210.0, 320.0, 32.0, 32.0);
        assert_eq!(cps.try_activate(&actor), Some(0));
        assert!(cps.checkpoints()[0].activated);
        assert_eq!(
            cps.respawn_point(Vec2::ZERO, 64.0),
            Vec2::new(200.0, 300.0)
        );
    }

    #[test]
    fn activation_is_one_way_and_fires_once() {
        let mut cps = manager();
        let actor = Aabb::from_top_left(210.0, 320.0, 32.0, 32.0);
        cps.try_activate(&actor);
        assert_eq!(cps.try_activate(&actor), None);
        assert!(cps.checkpoints()[0].activated);
    }

    #[test]
    fn latest_activation_is_current() {
        let mut cps = manager();
        cps.try_activate(&Aabb::from_top_left(210.0, 320.0, 32.0, 32.0));
        cps.try_activate(&Aabb::from_top_left(610.0, 320.0, 32.0, 32.0));
        assert_eq!(cps.current(), Some(1));
        // Walking back over the first flag does not make it current again.
        assert_eq!(cps.try_activate(&Aabb::from_top_left(210.0, 320.0, 32.0, 32.0)), None);
        assert_eq!(cps.respawn_point(Vec2::ZERO, 0.0), Vec2::new(600.0, 364.0));
    }

    #[test]
    fn touching_edges_do_not_activate() {
        let mut cps = manager();
        let actor = Aabb::from_top_left(168.0, 320.0, 32.0, 32.0);
        assert_eq!(cps.try_activate(&actor), None);
    }
}
