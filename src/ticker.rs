use simple_error::SimpleError;
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_FRAME_RATE_HZ: f64 = 60.0;

/// Source of animation ticks. `wait_tick` blocks until the next frame is due
/// and returns `false` once the source is exhausted.
pub trait Ticker {
    fn wait_tick(&mut self) -> bool;
}

/// Fixed number of ticks, delivered immediately.
#[derive(Debug, Clone)]
pub struct CountdownTicker {
    remaining: u64,
}

impl CountdownTicker {
    pub fn new(ticks: u64) -> Self {
        Self { remaining: ticks }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Ticker for CountdownTicker {
    fn wait_tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }

        self.remaining -= 1;
        true
    }
}

/// Ticks at a fixed period, standing in for a display refresh callback.
/// The first tick is immediate. A late frame does not cause a burst of
/// catch-up ticks; the schedule restarts from the late tick.
#[derive(Debug, Clone)]
pub struct FixedRateTicker {
    period: Duration,
    next_deadline: Option<Instant>,
    remaining: Option<u64>,
}

impl FixedRateTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_deadline: None,
            remaining: None,
        }
    }

    pub fn from_hz(hz: f64) -> Result<Self, SimpleError> {
        if !(hz > 0.0) || !hz.is_finite() {
            return Err(SimpleError::new("frame rate must be strictly positive"));
        }

        Ok(Self::new(Duration::from_secs_f64(1.0 / hz)))
    }

    pub fn with_limit(mut self, ticks: u64) -> Self {
        self.remaining = Some(ticks);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for FixedRateTicker {
    fn default() -> Self {
        Self::new(Duration::from_secs_f64(1.0 / DEFAULT_FRAME_RATE_HZ))
    }
}

impl Ticker for FixedRateTicker {
    fn wait_tick(&mut self) -> bool {
        match self.remaining.as_mut() {
            Some(0) => return false,
            Some(remaining) => *remaining -= 1,
            None => {}
        }

        let now = Instant::now();

        self.next_deadline = Some(match self.next_deadline {
            None => now + self.period,
            Some(deadline) if deadline > now => {
                thread::sleep(deadline - now);
                deadline + self.period
            }
            Some(_) => now + self.period,
        });

        true
    }
}
