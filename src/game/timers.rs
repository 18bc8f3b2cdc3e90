//! Tick-driven timers for temporary effects.

use std::time::Duration;

use bitflags::bitflags;

bitflags! {
    /// Temporary effects layered on top of the game status.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Effects: u8 {
        /// Ghosts flee and can be eaten.
        const SCARED = 1 << 0;
        /// Ghost paths are revealed.
        const SHOW_PATH = 1 << 1;
    }
}

/// Remaining time per effect. Advanced explicitly once per tick, never by wall clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectTimers {
    scared: Option<Duration>,
    show_path: Option<Duration>,
}

impl EffectTimers {
    fn slot(&mut self, effect: Effects) -> &mut Option<Duration> {
        if effect == Effects::SCARED {
            &mut self.scared
        } else {
            &mut self.show_path
        }
    }

    /// Starts the timers of `effects`, replacing any that are already running.
    pub fn arm(&mut self, effects: Effects, duration: Duration) {
        for effect in effects.iter() {
            *self.slot(effect) = Some(duration);
        }
    }

    pub fn cancel(&mut self, effects: Effects) {
        for effect in effects.iter() {
            *self.slot(effect) = None;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn active(&self) -> Effects {
        let mut active = Effects::empty();
        active.set(Effects::SCARED, self.scared.is_some());
        active.set(Effects::SHOW_PATH, self.show_path.is_some());
        active
    }

    /// Time left on a single effect's timer.
    pub fn remaining(&self, effect: Effects) -> Option<Duration> {
        if effect == Effects::SCARED {
            self.scared
        } else if effect == Effects::SHOW_PATH {
            self.show_path
        } else {
            None
        }
    }

    /// Counts every running timer down by `dt`, returning the effects that expired.
    pub fn advance(&mut self, dt: Duration) -> Effects {
        let mut expired = Effects::empty();
        for effect in Effects::all().iter() {
            let slot = self.slot(effect);
            if let Some(remaining) = *slot {
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    *slot = None;
                    expired |= effect;
                } else {
                    *slot = Some(remaining);
                }
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_expire_independently() {
        let mut timers = EffectTimers::default();
        timers.arm(Effects::SCARED, Duration::from_millis(100));
        timers.arm(Effects::SHOW_PATH, Duration::from_millis(250));

        assert_eq!(timers.advance(Duration::from_millis(100)), Effects::SCARED);
        assert_eq!(timers.active(), Effects::SHOW_PATH);
        assert_eq!(timers.remaining(Effects::SHOW_PATH), Some(Duration::from_millis(150)));
        assert_eq!(timers.advance(Duration::from_millis(200)), Effects::SHOW_PATH);
        assert!(timers.active().is_empty());
    }

    #[test]
    fn test_rearm_replaces() {
        let mut timers = EffectTimers::default();
        timers.arm(Effects::SCARED, Duration::from_millis(100));
        timers.advance(Duration::from_millis(90));
        timers.arm(Effects::SCARED, Duration::from_millis(100));
        assert!(timers.advance(Duration::from_millis(90)).is_empty());
    }
}
