// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Circular Telemetry Buffer
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Fixed-capacity circular buffers holding the most recent cycles.
//! Allocated once per session; recording never reallocates.

use serde::{Deserialize, Serialize};

use crate::cycle::CycleReport;

/// Fixed-size ring of samples for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularChannel {
    data: Vec<f64>,
    head: usize,
    count: usize,
}

impl CircularChannel {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity],
            head: 0,
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Overwrites the oldest sample once full. No-op at zero capacity.
    pub fn push(&mut self, value: f64) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }
        self.data[self.head] = value;
        self.head = (self.head + 1) % capacity;
        self.count = (self.count + 1).min(capacity);
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let start = if self.count < self.capacity() { 0 } else { self.head };
        let (tail, front) = self.data.split_at(start);
        front.iter().chain(tail).take(self.count).copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    pub fn latest(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let idx = (self.head + self.capacity() - 1) % self.capacity();
        Some(self.data[idx])
    }

    /// Largest magnitude among retained samples, 0 when empty.
    pub fn max_abs(&self) -> f64 {
        self.iter().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.iter().sum::<f64>() / self.count as f64)
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }
}

/// Per-cycle channels: the state the controller saw and the force applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySuite {
    pub cart_position: CircularChannel,
    pub cart_velocity: CircularChannel,
    pub pole_angle: CircularChannel,
    pub tip_velocity: CircularChannel,
    pub force: CircularChannel,
}

impl TelemetrySuite {
    pub fn new(capacity: usize) -> Self {
        Self {
            cart_position: CircularChannel::new(capacity),
            cart_velocity: CircularChannel::new(capacity),
            pole_angle: CircularChannel::new(capacity),
            tip_velocity: CircularChannel::new(capacity),
            force: CircularChannel::new(capacity),
        }
    }

    pub fn record(&mut self, report: &CycleReport) {
        let s = &report.state;
        self.cart_position.push(s.cart_position);
        self.cart_velocity.push(s.cart_velocity);
        self.pole_angle.push(s.pole_angle);
        self.tip_velocity.push(s.tip_velocity);
        self.force.push(report.applied_force);
    }

    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    pub fn clear(&mut self) {
        self.cart_position.clear();
        self.cart_velocity.clear();
        self.pole_angle.clear();
        self.tip_velocity.clear();
        self.force.clear();
    }
}
