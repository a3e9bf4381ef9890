//! Cancellable timer scheduler
//!
//! Single-threaded replacement for the interval/timeout soup a browser
//! game loop accumulates. Every timed activity in the game is one of a
//! fixed set of kinds, at most one instance of a kind may be pending, and
//! starting a kind that is still pending is an error rather than a silent
//! double-schedule. The owner drives `poll` with a monotonic millisecond
//! clock and dispatches the fired kinds itself; timers never mutate game
//! state directly.

use thiserror::Error;

/// Every timed activity in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerKind {
    /// Fixed-interval simulation tick
    SimTick,
    /// One-shot big food despawn
    BigFoodExpiry,
    /// One-shot entry into the blink phase
    BigFoodBlinkStart,
    /// Repeating visibility toggle during the blink phase
    BigFoodBlink,
    /// Repeating death animation frame
    DeathFrame,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    /// A timer of this kind is still pending; cancel it before rescheduling
    #[error("timer {0:?} is already active")]
    AlreadyActive(TimerKind),
}

/// Repeating timers that fall behind fire at most this many times per poll
/// before their deadline is resynced (prevents a catch-up spiral)
const MAX_CATCHUP_FIRES: u32 = 8;

#[derive(Debug, Clone)]
struct Entry {
    kind: TimerKind,
    deadline_ms: u64,
    period_ms: Option<u64>,
}

/// The scheduler. All deadlines are absolute milliseconds on the caller's
/// monotonic clock.
#[derive(Debug, Default)]
pub struct Timers {
    entries: Vec<Entry>,
    paused_at_ms: Option<u64>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// Schedule a one-shot timer. Errors if the kind is still pending.
    pub fn schedule_once(
        &mut self,
        kind: TimerKind,
        now_ms: u64,
        delay_ms: u64,
    ) -> Result<(), TimerError> {
        self.insert(kind, now_ms + delay_ms, None)
    }

    /// Schedule a repeating timer. Errors if the kind is still pending.
    pub fn schedule_repeating(
        &mut self,
        kind: TimerKind,
        now_ms: u64,
        period_ms: u64,
    ) -> Result<(), TimerError> {
        let period_ms = period_ms.max(1);
        self.insert(kind, now_ms + period_ms, Some(period_ms))
    }

    /// Cancel-then-start for repeating timers (speed changes)
    pub fn restart_repeating(&mut self, kind: TimerKind, now_ms: u64, period_ms: u64) {
        self.cancel(kind);
        // Cannot fail: the kind was just cancelled
        let _ = self.schedule_repeating(kind, now_ms, period_ms);
    }

    /// Cancel a pending timer. Returns whether one was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.kind != kind);
        let removed = self.entries.len() != before;
        if removed {
            log::debug!("timer {kind:?} cancelled");
        }
        removed
    }

    /// Cancel everything and clear any pause (reset/exit path)
    pub fn cancel_all(&mut self) {
        self.entries.clear();
        self.paused_at_ms = None;
    }

    /// Freeze all deadlines. No-op if already paused.
    pub fn pause(&mut self, now_ms: u64) {
        if self.paused_at_ms.is_none() {
            self.paused_at_ms = Some(now_ms);
        }
    }

    /// Shift outstanding deadlines forward by the paused span and resume.
    pub fn resume(&mut self, now_ms: u64) {
        if let Some(paused_at) = self.paused_at_ms.take() {
            let span = now_ms.saturating_sub(paused_at);
            for entry in &mut self.entries {
                entry.deadline_ms += span;
            }
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at_ms.is_some()
    }

    /// Fire all timers due at `now_ms`, in (deadline, kind) order.
    ///
    /// One-shot timers are removed; repeating timers are rescheduled by
    /// their period, with lateness capped by [`MAX_CATCHUP_FIRES`].
    pub fn poll(&mut self, now_ms: u64) -> Vec<TimerKind> {
        if self.paused_at_ms.is_some() {
            return Vec::new();
        }

        let mut fired = Vec::new();
        let mut catchup = 0u32;
        loop {
            let due = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.deadline_ms <= now_ms)
                .min_by_key(|(_, e)| (e.deadline_ms, e.kind));
            let Some((idx, _)) = due else { break };

            let entry = &mut self.entries[idx];
            fired.push(entry.kind);
            match entry.period_ms {
                Some(period) => {
                    entry.deadline_ms += period;
                    if entry.deadline_ms <= now_ms {
                        catchup += 1;
                        if catchup >= MAX_CATCHUP_FIRES {
                            // Too far behind; resync instead of spiraling
                            for e in self.entries.iter_mut().filter(|e| e.period_ms.is_some()) {
                                if e.deadline_ms <= now_ms {
                                    e.deadline_ms = now_ms + e.period_ms.unwrap_or(1);
                                }
                            }
                            break;
                        }
                    }
                }
                None => {
                    self.entries.swap_remove(idx);
                }
            }
        }
        fired
    }

    fn insert(
        &mut self,
        kind: TimerKind,
        deadline_ms: u64,
        period_ms: Option<u64>,
    ) -> Result<(), TimerError> {
        if self.is_active(kind) {
            return Err(TimerError::AlreadyActive(kind));
        }
        log::debug!("timer {kind:?} scheduled for t={deadline_ms}");
        self.entries.push(Entry {
            kind,
            deadline_ms,
            period_ms,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = Timers::new();
        timers.schedule_once(TimerKind::BigFoodExpiry, 0, 100).unwrap();
        assert!(timers.poll(99).is_empty());
        assert_eq!(timers.poll(100), vec![TimerKind::BigFoodExpiry]);
        assert!(timers.poll(1000).is_empty());
        assert!(!timers.is_active(TimerKind::BigFoodExpiry));
    }

    #[test]
    fn test_double_schedule_is_an_error() {
        let mut timers = Timers::new();
        timers.schedule_repeating(TimerKind::SimTick, 0, 150).unwrap();
        assert_eq!(
            timers.schedule_repeating(TimerKind::SimTick, 0, 150),
            Err(TimerError::AlreadyActive(TimerKind::SimTick))
        );
        // restart_repeating is the sanctioned cancel-then-start
        timers.restart_repeating(TimerKind::SimTick, 0, 100);
        assert_eq!(timers.poll(100), vec![TimerKind::SimTick]);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timers = Timers::new();
        timers.schedule_once(TimerKind::BigFoodBlinkStart, 0, 50).unwrap();
        assert!(timers.cancel(TimerKind::BigFoodBlinkStart));
        assert!(timers.poll(1000).is_empty());
        assert!(!timers.cancel(TimerKind::BigFoodBlinkStart));
    }

    #[test]
    fn test_repeating_fires_per_period() {
        let mut timers = Timers::new();
        timers.schedule_repeating(TimerKind::BigFoodBlink, 0, 200).unwrap();
        assert_eq!(timers.poll(200), vec![TimerKind::BigFoodBlink]);
        assert!(timers.poll(300).is_empty());
        assert_eq!(timers.poll(400), vec![TimerKind::BigFoodBlink]);
    }

    #[test]
    fn test_fire_order_is_deadline_then_kind() {
        let mut timers = Timers::new();
        timers.schedule_once(TimerKind::BigFoodExpiry, 0, 100).unwrap();
        timers.schedule_repeating(TimerKind::SimTick, 0, 50).unwrap();
        let fired = timers.poll(100);
        assert_eq!(
            fired,
            vec![
                TimerKind::SimTick,      // t=50
                TimerKind::SimTick,      // t=100
                TimerKind::BigFoodExpiry // t=100, SimTick < BigFoodExpiry
            ]
        );
    }

    #[test]
    fn test_catchup_is_capped() {
        let mut timers = Timers::new();
        timers.schedule_repeating(TimerKind::SimTick, 0, 10).unwrap();
        // 1000ms behind would be 100 fires; the cap resyncs instead
        let fired = timers.poll(1000);
        assert_eq!(fired.len(), MAX_CATCHUP_FIRES as usize);
        // Deadline resynced past `now`
        assert!(timers.poll(1000).is_empty());
        assert_eq!(timers.poll(1010), vec![TimerKind::SimTick]);
    }

    #[test]
    fn test_pause_freezes_and_resume_shifts() {
        let mut timers = Timers::new();
        timers.schedule_once(TimerKind::BigFoodExpiry, 0, 100).unwrap();
        timers.pause(50);
        assert!(timers.poll(500).is_empty());
        timers.resume(550); // paused for 500ms
        assert!(timers.poll(599).is_empty());
        assert_eq!(timers.poll(600), vec![TimerKind::BigFoodExpiry]);
    }

    #[test]
    fn test_cancel_all_clears_pause() {
        let mut timers = Timers::new();
        timers.schedule_repeating(TimerKind::SimTick, 0, 100).unwrap();
        timers.pause(10);
        timers.cancel_all();
        assert!(!timers.is_paused());
        assert!(!timers.is_active(TimerKind::SimTick));
    }
}
