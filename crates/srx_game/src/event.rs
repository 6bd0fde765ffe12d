use crate::powerup::PowerUpKind;

/// Events emitted by `Simulation::tick` and the run controls.
/// The presentation layer consumes these for messages, sound and menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CountdownTick { remaining: u32 },
    RunStarted,
    CheckpointActivated { index: usize },
    PowerUpActivated { kind: PowerUpKind, expires_at_ms: u64 },
    ExtraLife { lives: u32 },
    EnemyStomped { index: usize },
    EnemyDefeated { index: usize },
    LifeLost { lives: u32 },
    Respawned,
    LevelCompleted { time_ms: u64 },
    RunFailed,
    Paused,
    Resumed,
    Restarted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn powerup_event_compares_kind_and_expiry() {
        let speed = GameEvent::PowerUpActivated {
            kind: PowerUpKind::Speed,
            expires_at_ms: 5_000,
        };
        assert_eq!(
            speed,
            GameEvent::PowerUpActivated {
                kind: PowerUpKind::Speed,
                expires_at_ms: 5_000
            }
        );
        assert_ne!(
            speed,
            GameEvent::PowerUpActivated {
                kind: PowerUpKind::Invincibility,
                expires_at_ms: 5_000
            }
        );
    }
}
