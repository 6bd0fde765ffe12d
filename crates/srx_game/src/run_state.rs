//! Run state machine and clocks.
//!
//! Two clocks live here, both advanced only by fixed ticks: the countdown
//! clock (running only in `Countdown`) and the run clock (running only in
//! `Active`). Both count microseconds so that a 16 667 us tick never loses
//! fractions of a millisecond; callers read milliseconds.

const US_PER_SEC: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Countdown,
    Active,
    Paused,
    Completed,
    Failed,
}

impl RunState {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Something `RunTimer::tick` changed that the UI may want to hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTransition {
    CountdownTick { remaining: u32 },
    Started,
}

#[derive(Debug, Clone)]
pub struct RunTimer {
    state: RunState,
    countdown_secs: u32,
    countdown_us: u64,
    elapsed_us: u64,
}

impl RunTimer {
    pub fn new(countdown_secs: u32) -> Self {
        Self {
            state: RunState::Countdown,
            countdown_secs,
            countdown_us: 0,
            elapsed_us: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Whole seconds left on the countdown, as shown to the player.
    pub fn countdown_remaining(&self) -> u32 {
        if self.state != RunState::Countdown {
            return 0;
        }
        let whole = (self.countdown_us / US_PER_SEC) as u32;
        self.countdown_secs.saturating_sub(whole)
    }

    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_us
    }

    /// Run clock in milliseconds. Frozen outside `Active`.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_us / 1_000
    }

    pub fn tick(&mut self, dt_us: u64) -> Option<TimerTransition> {
        match self.state {
            RunState::Countdown => {
                let before = self.countdown_us / US_PER_SEC;
                self.countdown_us += dt_us;
                let after = self.countdown_us / US_PER_SEC;
                if self.countdown_us >= u64::from(self.countdown_secs) * US_PER_SEC {
                    self.state = RunState::Active;
                    log::info!("countdown finished, run started");
                    Some(TimerTransition::Started)
                } else if after > before {
                    let remaining = self.countdown_secs.saturating_sub(after as u32);
                    Some(TimerTransition::CountdownTick { remaining })
                } else {
                    None
                }
            }
            RunState::Active => {
                self.elapsed_us += dt_us;
                None
            }
            RunState::Paused | RunState::Completed | RunState::Failed => None,
        }
    }

    pub fn pause(&mut self) -> bool {
        self.transition(RunState::Active, RunState::Paused)
    }

    pub fn resume(&mut self) -> bool {
        self.transition(RunState::Paused, RunState::Active)
    }

    pub fn complete(&mut self) -> bool {
        self.transition(RunState::Active, RunState::Completed)
    }

    pub fn fail(&mut self) -> bool {
        self.transition(RunState::Active, RunState::Failed)
    }

    /// Back to a fresh countdown with both clocks at zero.
    pub fn reset(&mut self) {
        *self = Self::new(self.countdown_secs);
    }

    fn transition(&mut self, from: RunState, to: RunState) -> bool {
        if self.state != from {
            log::debug!(
                "rejected run state transition to {to:?} from {:?}",
                self.state
            );
            return false;
        }
        self.state = to;
        true
    }
}
