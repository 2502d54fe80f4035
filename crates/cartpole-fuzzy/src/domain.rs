// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Domain
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Sampled universe of discourse.

use cartpole_types::config::DomainConfig;
use cartpole_types::error::{FuzzyError, FuzzyResult};
use ndarray::Array1;

/// Absorbs rounding in `(stop - start) / step` so an on-grid `stop` is kept.
const GRID_SNAP: f64 = 1e-9;

/// Upper bound on samples per domain.
const MAX_SAMPLES: usize = 10_000_000;

/// Evenly spaced samples `start, start + step, ..` up to `stop` inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    start: f64,
    stop: f64,
    step: f64,
    len: usize,
}

impl Domain {
    pub fn new(start: f64, stop: f64, step: f64) -> FuzzyResult<Self> {
        if !start.is_finite() || !stop.is_finite() || !step.is_finite() {
            return Err(FuzzyError::ConfigError(format!(
                "domain bounds must be finite: start={start}, stop={stop}, step={step}"
            )));
        }
        if step <= 0.0 {
            return Err(FuzzyError::ConfigError(format!(
                "domain step must be > 0, got {step}"
            )));
        }
        if start >= stop {
            return Err(FuzzyError::ConfigError(format!(
                "domain start must be < stop: start={start}, stop={stop}"
            )));
        }

        let intervals = ((stop - start) / step + GRID_SNAP).floor();
        if intervals >= MAX_SAMPLES as f64 {
            return Err(FuzzyError::ConfigError(format!(
                "domain [{start}, {stop}] step {step} exceeds {MAX_SAMPLES} samples"
            )));
        }

        Ok(Domain {
            start,
            stop,
            step,
            len: intervals as usize + 1,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of sample points, `floor((stop - start) / step) + 1`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a valid domain has at least two samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.stop
    }

    /// Lazy sample sequence; every call starts again at `start`.
    pub fn samples(&self) -> Samples {
        Samples {
            start: self.start,
            stop: self.stop,
            step: self.step,
            index: 0,
            len: self.len,
        }
    }

    /// Samples materialised for vectorised evaluation.
    pub fn grid(&self) -> Array1<f64> {
        self.samples().collect()
    }
}

impl TryFrom<&DomainConfig> for Domain {
    type Error = FuzzyError;

    fn try_from(cfg: &DomainConfig) -> FuzzyResult<Self> {
        Domain::new(cfg.start, cfg.stop, cfg.step)
    }
}

/// Iterator over the sample points of a [`Domain`].
#[derive(Debug, Clone)]
pub struct Samples {
    start: f64,
    stop: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Iterator for Samples {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            return None;
        }
        // Index-based to avoid accumulated drift; clamp the last point.
        let x = (self.start + self.index as f64 * self.step).min(self.stop);
        self.index += 1;
        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Samples {}
