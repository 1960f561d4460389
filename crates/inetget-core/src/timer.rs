//! Monotonic timer and the rate-window moving-average estimator (spec §3/§8).

use std::time::Instant;

/// A simple monotonic elapsed-seconds timer.
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds elapsed since construction (or the last [`Timer::reset`]).
    pub fn query(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

/// Fixed-window moving-average rate estimator: a 125-sample ring buffer
/// (spec's "rate window") smoothing the instantaneous bytes/sec samples
/// taken once per 0.5s interval.
pub struct RateEstimate {
    samples: [f64; Self::WINDOW],
    count: usize,
    cursor: usize,
}

impl RateEstimate {
    const WINDOW: usize = 125;

    pub fn new() -> Self {
        Self {
            samples: [0.0; Self::WINDOW],
            count: 0,
            cursor: 0,
        }
    }

    /// Push a new instantaneous-rate sample and return the smoothed
    /// average over the samples collected so far (never over more than
    /// the last 125).
    pub fn update(&mut self, sample: f64) -> f64 {
        self.samples[self.cursor] = sample;
        self.cursor = (self.cursor + 1) % Self::WINDOW;
        if self.count < Self::WINDOW {
            self.count += 1;
        }
        self.samples[..self.count].iter().sum::<f64>() / self.count as f64
    }
}

impl Default for RateEstimate {
    fn default() -> Self {
        Self::new()
    }
}
