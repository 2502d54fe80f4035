// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Operator Signal Sources
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Sources of operator signals (force override, pause, reset, exit).
//!
//! A source is polled once per loop iteration, paused iterations included,
//! so a scripted resume can land while the cycle is suspended.

use std::collections::BTreeMap;

use cartpole_types::state::ControlSignals;

/// Writes operator intent into the caller-owned signal set.
pub trait SignalSource {
    fn poll(&mut self, iteration: u64, signals: &mut ControlSignals);
}

impl<F> SignalSource for F
where
    F: FnMut(u64, &mut ControlSignals),
{
    fn poll(&mut self, iteration: u64, signals: &mut ControlSignals) {
        self(iteration, signals)
    }
}

/// Never signals anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignals;

impl SignalSource for NoSignals {
    fn poll(&mut self, _iteration: u64, _signals: &mut ControlSignals) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalEvent {
    /// Replace the controller output for one step (N).
    Override(f64),
    TogglePause,
    Reset,
    Exit,
}

impl SignalEvent {
    fn apply(self, signals: &mut ControlSignals) {
        match self {
            SignalEvent::Override(force) => signals.override_force = Some(force),
            SignalEvent::TogglePause => signals.pause_toggle = true,
            SignalEvent::Reset => signals.reset_request = true,
            SignalEvent::Exit => signals.exit_request = true,
        }
    }
}

/// Pre-recorded events keyed by loop iteration.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSignals {
    events: BTreeMap<u64, Vec<SignalEvent>>,
}

impl ScriptedSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`push`](Self::push).
    pub fn at(mut self, iteration: u64, event: SignalEvent) -> Self {
        self.push(iteration, event);
        self
    }

    pub fn push(&mut self, iteration: u64, event: SignalEvent) {
        self.events.entry(iteration).or_default().push(event);
    }

    /// Number of events not yet delivered.
    pub fn pending(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.events.is_empty()
    }
}

impl SignalSource for ScriptedSignals {
    fn poll(&mut self, iteration: u64, signals: &mut ControlSignals) {
        // Anything scheduled for an iteration already passed is delivered late.
        while let Some(entry) = self.events.first_entry() {
            if *entry.key() > iteration {
                break;
            }
            for event in entry.remove() {
                event.apply(signals);
            }
        }
    }
}
