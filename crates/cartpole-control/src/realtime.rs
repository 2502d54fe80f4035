// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Real-Time Control (RTC) Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Session driver for the control cycle.
//!
//! Polls the signal source, ticks the cycle and, when paced, holds each
//! tick to the plant timestep. Late ticks are counted and logged; the
//! session keeps running.

use std::thread;
use std::time::{Duration, Instant};

use cartpole_types::error::{FuzzyError, FuzzyResult};
use cartpole_types::state::{CartPoleState, ControlSignals};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cycle::{ControlCycle, CycleOutcome, CycleReport};
use crate::plant::Plant;
use crate::signals::SignalSource;
use crate::telemetry::TelemetrySuite;

/// Configuration for the session driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RtcConfig {
    /// Must equal `1 / plant.tau()` when paced.
    pub target_hz: f64,
    /// 0 disables overrun counting.
    pub max_jitter_us: f64,
    pub use_busy_wait: bool,
    /// Off runs cycles back to back.
    pub paced: bool,
    /// Stop after this many stepped cycles.
    pub max_cycles: Option<u64>,
    /// Sleep between polls while paused.
    pub pause_poll: Duration,
    pub telemetry_capacity: usize,
}

impl Default for RtcConfig {
    fn default() -> Self {
        RtcConfig {
            target_hz: 50.0,
            max_jitter_us: 5_000.0,
            use_busy_wait: false,
            paced: false,
            max_cycles: None,
            pause_poll: Duration::from_millis(50),
            telemetry_capacity: 1024,
        }
    }
}

impl RtcConfig {
    /// Paced at the plant's own rate, jitter budget a quarter step.
    pub fn paced_for<P: Plant + ?Sized>(plant: &P) -> Self {
        let tau = plant.tau();
        RtcConfig {
            target_hz: 1.0 / tau,
            max_jitter_us: tau * 1e6 / 4.0,
            paced: true,
            ..Default::default()
        }
    }

    pub fn with_max_cycles(mut self, max_cycles: u64) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    fn validate(&self, tau: f64) -> FuzzyResult<()> {
        if !self.target_hz.is_finite() || self.target_hz <= 0.0 {
            return Err(FuzzyError::ConfigError(
                "target_hz must be finite and > 0".to_string(),
            ));
        }
        if !self.max_jitter_us.is_finite() || self.max_jitter_us < 0.0 {
            return Err(FuzzyError::ConfigError(
                "max_jitter_us must be finite and >= 0".to_string(),
            ));
        }
        if self.telemetry_capacity == 0 {
            return Err(FuzzyError::ConfigError(
                "telemetry_capacity must be > 0".to_string(),
            ));
        }
        if !tau.is_finite() || tau <= 0.0 {
            return Err(FuzzyError::ConfigError(format!(
                "plant tau must be finite and > 0, got {tau}"
            )));
        }
        if self.paced {
            let plant_hz = 1.0 / tau;
            let rel_hz_mismatch = ((plant_hz - self.target_hz) / self.target_hz).abs();
            if rel_hz_mismatch > 1e-6 {
                return Err(FuzzyError::ConfigError(format!(
                    "RtcConfig target_hz ({:.6}) does not match plant frequency ({:.6})",
                    self.target_hz, plant_hz
                )));
            }
        }
        Ok(())
    }
}

/// Summary of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Stepped cycles.
    pub cycles: u64,
    /// Loop iterations, paused ones included.
    pub iterations: u64,
    pub paused_iterations: u64,
    pub no_activation_cycles: u64,
    pub overrides_applied: u64,
    pub resets: u64,
    /// Cycles the plant reported `done`.
    pub done_cycles: u64,
    /// Ended on an exit request rather than the cycle limit.
    pub exited: bool,
    pub max_abs_angle: f64,
    pub max_cycle_time_us: f64,
    pub max_jitter_us: f64,
    pub jitter_overruns: u64,
    pub wall_time_ms: f64,
    pub final_state: CartPoleState,
    pub telemetry: TelemetrySuite,
}

impl SessionReport {
    fn start(initial: CartPoleState, telemetry_capacity: usize) -> Self {
        SessionReport {
            cycles: 0,
            iterations: 0,
            paused_iterations: 0,
            no_activation_cycles: 0,
            overrides_applied: 0,
            resets: 0,
            done_cycles: 0,
            exited: false,
            max_abs_angle: initial.pole_angle.abs(),
            max_cycle_time_us: 0.0,
            max_jitter_us: 0.0,
            jitter_overruns: 0,
            wall_time_ms: 0.0,
            final_state: initial,
            telemetry: TelemetrySuite::new(telemetry_capacity),
        }
    }

    fn absorb(&mut self, report: &CycleReport, cycle_time_us: f64) {
        self.cycles += 1;
        self.no_activation_cycles += u64::from(report.no_activation);
        self.overrides_applied += u64::from(report.overridden);
        self.resets += u64::from(report.reset);
        self.done_cycles += u64::from(report.done);
        self.max_abs_angle = self
            .max_abs_angle
            .max(report.state.pole_angle.abs())
            .max(report.next_state.pole_angle.abs());
        self.max_cycle_time_us = self.max_cycle_time_us.max(cycle_time_us);
        self.final_state = report.next_state;
        self.telemetry.record(report);
    }
}

/// Drives a control cycle against a plant.
pub struct RtcDriver<P: Plant> {
    pub cycle: ControlCycle,
    pub plant: P,
    pub config: RtcConfig,
}

impl<P: Plant> RtcDriver<P> {
    pub fn new(cycle: ControlCycle, plant: P, config: RtcConfig) -> Self {
        Self {
            cycle,
            plant,
            config,
        }
    }

    /// Run until exit or `max_cycles`, calling `on_cycle` after every step.
    pub fn run<S, F>(&mut self, source: &mut S, mut on_cycle: F) -> FuzzyResult<SessionReport>
    where
        S: SignalSource + ?Sized,
        F: FnMut(&CycleReport),
    {
        self.config.validate(self.plant.tau())?;

        let mut report =
            SessionReport::start(self.plant.state(), self.config.telemetry_capacity);
        let mut signals = ControlSignals::default();
        let step_duration = Duration::from_secs_f64(1.0 / self.config.target_hz);
        let mut next_tick = Instant::now();
        let mut plant_done = false;
        let t_start = Instant::now();

        info!(
            paced = self.config.paced,
            target_hz = self.config.target_hz,
            max_cycles = ?self.config.max_cycles,
            rules = self.cycle.engine().rule_count(),
            "session started"
        );

        loop {
            if self.config.max_cycles.is_some_and(|max| report.cycles >= max) {
                break;
            }

            source.poll(report.iterations, &mut signals);
            report.iterations += 1;

            if self.config.paced && !self.cycle.is_paused() {
                self.wait_until(next_tick);
                let jitter_us = jitter_us(Instant::now(), next_tick);
                report.max_jitter_us = report.max_jitter_us.max(jitter_us);
                if self.config.max_jitter_us > 0.0 && jitter_us > self.config.max_jitter_us {
                    report.jitter_overruns += 1;
                    warn!(
                        jitter_us,
                        allowed_us = self.config.max_jitter_us,
                        cycle = report.cycles,
                        "RTC jitter exceeded threshold"
                    );
                }
            }

            let tick_started_at = Instant::now();
            match self.cycle.tick(&mut self.plant, &mut signals)? {
                CycleOutcome::Exited => {
                    report.exited = true;
                    break;
                }
                CycleOutcome::Paused => {
                    report.paused_iterations += 1;
                    if !self.config.pause_poll.is_zero() {
                        thread::sleep(self.config.pause_poll);
                    }
                    // Pacing restarts from the resume.
                    next_tick = Instant::now();
                }
                CycleOutcome::Stepped(cycle) => {
                    let cycle_time_us = tick_started_at.elapsed().as_secs_f64() * 1e6;
                    if cycle.done && !plant_done {
                        warn!(cycle = cycle.cycle, state = ?cycle.next_state, "plant reports done");
                    }
                    plant_done = cycle.done;
                    report.absorb(&cycle, cycle_time_us);
                    on_cycle(&cycle);
                    next_tick += step_duration;
                }
            }
        }

        report.wall_time_ms = t_start.elapsed().as_secs_f64() * 1000.0;
        info!(
            cycles = report.cycles,
            no_activation = report.no_activation_cycles,
            overrides = report.overrides_applied,
            jitter_overruns = report.jitter_overruns,
            exited = report.exited,
            wall_time_ms = report.wall_time_ms,
            "session finished"
        );
        Ok(report)
    }

    fn wait_until(&self, next_tick: Instant) {
        if self.config.use_busy_wait {
            while Instant::now() < next_tick {
                std::hint::spin_loop();
            }
        } else if let Some(wait) = next_tick.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
    }
}

fn jitter_us(now: Instant, scheduled: Instant) -> f64 {
    let delta = if now >= scheduled {
        now - scheduled
    } else {
        scheduled - now
    };
    delta.as_secs_f64() * 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::CartPole;
    use crate::signals::{NoSignals, ScriptedSignals, SignalEvent};
    use cartpole_types::config::{CartPoleParams, ControllerConfig};

    fn driver(config: RtcConfig) -> RtcDriver<CartPole> {
        let cycle = ControlCycle::from_config(&ControllerConfig::default()).expect("default config");
        let plant = CartPole::new(CartPoleParams::default(), 1)
            .expect("valid plant")
            .with_initial_state(CartPoleState::new(0.0, 0.0, 1.0, 0.0));
        RtcDriver::new(cycle, plant, config)
    }

    fn headless(max_cycles: u64) -> RtcConfig {
        RtcConfig {
            pause_poll: Duration::ZERO,
            ..RtcConfig::default().with_max_cycles(max_cycles)
        }
    }

    #[test]
    fn test_run_rejects_invalid_target_hz() {
        let mut d = driver(RtcConfig {
            target_hz: 0.0,
            ..headless(10)
        });
        assert!(d.run(&mut NoSignals, |_| {}).is_err());
    }

    #[test]
    fn test_run_rejects_zero_telemetry_capacity() {
        let mut d = driver(RtcConfig {
            telemetry_capacity: 0,
            ..headless(10)
        });
        assert!(d.run(&mut NoSignals, |_| {}).is_err());
    }

    #[test]
    fn test_paced_run_rejects_target_hz_mismatch() {
        let mut d = driver(RtcConfig {
            target_hz: 40.0,
            paced: true,
            ..headless(10)
        });
        assert!(d.run(&mut NoSignals, |_| {}).is_err());
    }

    #[test]
    fn test_runs_exactly_max_cycles() {
        let mut d = driver(headless(25));
        let mut lines = Vec::new();
        let report = d.run(&mut NoSignals, |c| lines.push(c.to_string())).unwrap();
        assert_eq!(report.cycles, 25);
        assert_eq!(report.iterations, 25);
        assert_eq!(lines.len(), 25);
        assert!(!report.exited);
        assert_eq!(report.telemetry.len(), 25);
        assert!(lines[0].starts_with("cpos="));
    }

    #[test]
    fn test_exit_stops_session_early() {
        let mut d = driver(headless(1000));
        let mut source = ScriptedSignals::new().at(7, SignalEvent::Exit);
        let report = d.run(&mut source, |_| {}).unwrap();
        assert!(report.exited);
        assert_eq!(report.cycles, 7);
        assert_eq!(report.iterations, 8);
    }

    #[test]
    fn test_scripted_pause_resume_kick_and_reset() {
        let mut d = driver(headless(20));
        let mut source = ScriptedSignals::new()
            .at(3, SignalEvent::TogglePause)
            .at(6, SignalEvent::Override(10.0))
            .at(8, SignalEvent::TogglePause)
            .at(12, SignalEvent::Reset);
        let mut overridden_at = Vec::new();
        let report = d
            .run(&mut source, |c| {
                if c.overridden {
                    overridden_at.push(c.cycle);
                }
            })
            .unwrap();
        // Iterations 3..=7 paused; the kick queued at 6 lands on resume.
        assert_eq!(report.paused_iterations, 5);
        assert_eq!(report.cycles, 20);
        assert_eq!(report.iterations, 25);
        assert_eq!(report.overrides_applied, 1);
        assert_eq!(overridden_at, vec![3]);
        assert_eq!(report.resets, 1);
    }

    #[test]
    fn test_session_keeps_pole_bounded() {
        let mut d = driver(headless(300));
        let report = d.run(&mut NoSignals, |_| {}).unwrap();
        assert!(report.max_abs_angle < 10.0, "{}", report.max_abs_angle);
        assert_eq!(report.done_cycles, 0);
        assert!(report.no_activation_cycles < report.cycles);
    }

    #[test]
    fn test_paced_run_passes_with_relaxed_jitter() {
        let mut config = RtcConfig::paced_for(&CartPole::new(CartPoleParams::default(), 0).unwrap());
        config.max_jitter_us = 100_000.0;
        config.max_cycles = Some(5);
        let mut d = driver(config);
        let report = d.run(&mut NoSignals, |_| {}).expect("jitter budget should pass");
        assert_eq!(report.cycles, 5);
        // Five steps at 50 Hz, the first one immediate.
        assert!(report.wall_time_ms >= 70.0, "{}", report.wall_time_ms);
    }

    #[test]
    fn test_tight_jitter_budget_counts_overruns_without_failing() {
        let mut config = RtcConfig::paced_for(&CartPole::new(CartPoleParams::default(), 0).unwrap());
        config.max_jitter_us = 1e-6;
        config.max_cycles = Some(3);
        let mut d = driver(config);
        let report = d.run(&mut NoSignals, |_| {}).unwrap();
        assert_eq!(report.cycles, 3);
        assert!(report.jitter_overruns > 0);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut d = driver(headless(3));
        let report = d.run(&mut NoSignals, |_| {}).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cycles"], 3);
        assert_eq!(json["telemetry"]["force"]["count"], 3);
    }
}
