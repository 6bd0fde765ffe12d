//! Power-up pickups and the timed effects they grant.
//!
//! Effects are stamped with an absolute expiry on the run clock, so pausing
//! the run also freezes every effect. Expiry is evaluated once per tick by
//! `ActiveEffects::expire`; between those calls an effect is either fully on
//! or fully off.

use serde::Deserialize;
use srx_core::geometry::Aabb;

use crate::config::EffectConfig;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Speed,
    Invincibility,
    ExtraLife,
}

impl PowerUpKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Speed => "Speed Boost",
            Self::Invincibility => "Invincibility",
            Self::ExtraLife => "Extra Life",
        }
    }
}

impl std::fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Timed effect a power-up can leave on the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    SpeedBoost,
    Invincibility,
}

#[derive(Debug, Clone, Copy)]
pub struct PowerUp {
    pub aabb: Aabb,
    pub kind: PowerUpKind,
}

/// What picking up a power-up did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    Effect { effect: EffectKind, expires_at_ms: u64 },
    ExtraLife,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    speed_boost_until: Option<u64>,
    invincible_until: Option<u64>,
}

impl ActiveEffects {
    pub fn speed_boost(&self) -> bool {
        self.speed_boost_until.is_some()
    }

    pub fn invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    pub fn expiry(&self, effect: EffectKind) -> Option<u64> {
        match effect {
            EffectKind::SpeedBoost => self.speed_boost_until,
            EffectKind::Invincibility => self.invincible_until,
        }
    }

    /// Starts (or restarts) the effect for `kind`. Re-activation replaces the
    /// expiry; durations never stack.
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: u64, config: &EffectConfig) -> PickupOutcome {
        match kind {
            PowerUpKind::Speed => {
                let expires_at_ms = now_ms + config.speed_boost_ms;
                self.speed_boost_until = Some(expires_at_ms);
                PickupOutcome::Effect {
                    effect: EffectKind::SpeedBoost,
                    expires_at_ms,
                }
            }
            PowerUpKind::Invincibility => {
                let expires_at_ms = now_ms + config.invincibility_ms;
                self.invincible_until = Some(expires_at_ms);
                PickupOutcome::Effect {
                    effect: EffectKind::Invincibility,
                    expires_at_ms,
                }
            }
            PowerUpKind::ExtraLife => PickupOutcome::ExtraLife,
        }
    }

    /// Drops every effect whose expiry has been reached. Returns what ended.
    pub fn expire(&mut self, now_ms: u64) -> Vec<EffectKind> {
        let mut ended = Vec::new();
        if self.speed_boost_until.is_some_and(|until| now_ms >= until) {
            self.speed_boost_until = None;
            ended.push(EffectKind::SpeedBoost);
        }
        if self.invincible_until.is_some_and(|until| now_ms >= until) {
            self.invincible_until = None;
            ended.push(EffectKind::Invincibility);
        }
        ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_boost_lasts_for_configured_duration() {
        let config = EffectConfig::default();
        let mut effects = ActiveEffects::default();
        let outcome = effects.activate(PowerUpKind::Speed, 1_000, &config);
        assert_eq!(
            outcome,
            PickupOutcome::Effect {
                effect: EffectKind::SpeedBoost,
                expires_at_ms: 6_000
            }
        );

        assert!(effects.expire(5_999).is_empty());
        assert!(effects.speed_boost());
        assert_eq!(effects.expire(6_000), vec![EffectKind::SpeedBoost]);
        assert!(!effects.speed_boost());
    }

    #[test]
    fn reactivation_resets_expiry_without_stacking() {
        let config = EffectConfig::default();
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUpKind::Invincibility, 0, &config);
        effects.activate(PowerUpKind::Invincibility, 4_000, &config);
        assert_eq!(effects.expiry(EffectKind::Invincibility), Some(9_000));

        effects.expire(5_000);
        assert!(effects.invincible());
        effects.expire(9_000);
        assert!(!effects.invincible());
    }

    #[test]
    fn extra_life_has_no_timer() {
        let config = EffectConfig::default();
        let mut effects = ActiveEffects::default();
        assert_eq!(
            effects.activate(PowerUpKind::ExtraLife, 0, &config),
            PickupOutcome::ExtraLife
        );
        assert_eq!(effects, ActiveEffects::default());
    }

    #[test]
    fn effects_expire_independently() {
        let config = EffectConfig {
            speed_multiplier: 1.5,
            speed_boost_ms: 1_000,
            invincibility_ms: 3_000,
        };
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUpKind::Speed, 0, &config);
        effects.activate(PowerUpKind::Invincibility, 0, &config);
        assert_eq!(effects.expire(1_500), vec![EffectKind::SpeedBoost]);
        assert!(effects.invincible());
    }

    #[test]
    fn kind_parses_from_snake_case() {
        let kind: PowerUpKind = serde_json::from_str("\"extra_life\"").expect("parse kind");
        assert_eq!(kind, PowerUpKind::ExtraLife);
        assert_eq!(kind.to_string(), "Extra Life");
    }
}
