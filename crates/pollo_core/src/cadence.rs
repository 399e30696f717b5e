//! Repeating and one-shot task timers driven by the simulation clock.
//!
//! Every periodic behaviour in the game (gravity, animation selection, AI
//! decisions, collision passes) owns one of these instead of registering a
//! callback with the host. The owner polls `fire(now)` once per simulation
//! step; dropping the owner drops the timer, and `cancel()` stops it in place.

use rand::Rng;

/// Fixed-period repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    period_ms: u64,
    next_due_ms: u64,
    active: bool,
}

impl Cadence {
    /// First firing one period after `now_ms`.
    pub fn every(period_ms: u64, now_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now_ms + period_ms,
            active: true,
        }
    }

    /// Created cancelled; call `start` to arm it.
    pub fn stopped(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_due_ms: 0,
            active: false,
        }
    }

    pub fn start(&mut self, now_ms: u64) {
        self.next_due_ms = now_ms + self.period_ms;
        self.active = true;
    }

    /// Start only if not already running, keeping the phase of a live timer.
    pub fn ensure_started(&mut self, now_ms: u64) {
        if !self.active {
            self.start(now_ms);
        }
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// True at most once per call when the period has elapsed.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        if !self.active || now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms += self.period_ms;
        if self.next_due_ms <= now_ms {
            // The owner skipped polls; resynchronise rather than burst.
            self.next_due_ms = now_ms + self.period_ms;
        }
        true
    }
}

/// One-shot timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    due_ms: Option<u64>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        self.due_ms = Some(now_ms + delay_ms);
    }

    pub fn cancel(&mut self) {
        self.due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_ms.is_some()
    }

    /// True exactly once, on the first poll at or after the due time.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.due_ms {
            Some(due) if now_ms >= due => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// One uniformly-drawn component of a random interval:
/// `base_ms + r * spread_ms` with `r` in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    pub base_ms: f64,
    pub spread_ms: f64,
}

impl Jitter {
    pub const fn new(base_ms: f64, spread_ms: f64) -> Self {
        Self { base_ms, spread_ms }
    }
}

/// Repeating timer that re-draws its own next interval every time it fires.
/// The interval is the sum of its jitter components.
#[derive(Debug, Clone)]
pub struct RandomCadence {
    parts: &'static [Jitter],
    next_due_ms: u64,
    active: bool,
}

impl RandomCadence {
    pub fn new<R: Rng + ?Sized>(parts: &'static [Jitter], now_ms: u64, rng: &mut R) -> Self {
        let mut cadence = Self {
            parts,
            next_due_ms: 0,
            active: true,
        };
        cadence.next_due_ms = now_ms + cadence.draw(rng);
        cadence
    }

    /// Smallest and largest interval this cadence can draw.
    pub fn bounds(&self) -> (u64, u64) {
        let low: f64 = self.parts.iter().map(|p| p.base_ms).sum();
        let high: f64 = self.parts.iter().map(|p| p.base_ms + p.spread_ms).sum();
        (low as u64, high as u64)
    }

    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn fire<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> bool {
        if !self.active || now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms + self.draw(rng);
        true
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let total: f64 = self
            .parts
            .iter()
            .map(|p| p.base_ms + rng.gen::<f64>() * p.spread_ms)
            .sum();
        (total as u64).max(1)
    }
}
