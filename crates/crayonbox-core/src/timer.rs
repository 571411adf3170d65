//! Active drawing time, accumulated across strokes.

use std::time::{Duration, Instant};

/// Tracks how long the pointer was down while drawing.
///
/// Each stroke contributes its wall-clock length to a running total.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    started: Option<Instant>,
    total: Duration,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing a stroke. Ignored while a stroke is already open.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.started.is_none() {
            self.started = Some(now);
        }
    }

    /// Stop the open stroke and return its length in fractional minutes.
    ///
    /// Returns `None` when no stroke was open.
    pub fn stop(&mut self) -> Option<f64> {
        self.stop_at(Instant::now())
    }

    pub fn stop_at(&mut self, now: Instant) -> Option<f64> {
        let started = self.started.take()?;
        let elapsed = now.saturating_duration_since(started);
        self.total += elapsed;
        Some(elapsed.as_secs_f64() / 60.0)
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Total drawing time in fractional minutes.
    pub fn total_minutes(&self) -> f64 {
        self.total.as_secs_f64() / 60.0
    }

    /// Total drawing time rounded to one decimal, as stored with an artwork.
    pub fn rounded_minutes(&self) -> f64 {
        round_minutes(self.total_minutes())
    }

    pub fn reset(&mut self) {
        self.started = None;
        self.total = Duration::ZERO;
    }
}

/// Round minutes to one decimal place.
pub fn round_minutes(minutes: f64) -> f64 {
    (minutes * 10.0).round() / 10.0
}
