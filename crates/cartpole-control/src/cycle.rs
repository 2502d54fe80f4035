// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Control Cycle
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One control timestep: signals → state → inference → force → plant.

use std::fmt;

use cartpole_fuzzy::{build_engine, InferenceEngine};
use cartpole_types::config::ControllerConfig;
use cartpole_types::constants::STATE_COMPONENTS;
use cartpole_types::error::{FuzzyError, FuzzyResult};
use cartpole_types::state::{CartPoleState, ControlSignals};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::plant::Plant;

/// What a single `tick` did.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Stepped(CycleReport),
    /// Suspended; the plant was rendered but not advanced.
    Paused,
    Exited,
}

/// Record of one advanced timestep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleReport {
    /// Zero-based index among stepped cycles.
    pub cycle: u64,
    /// State the controller saw, before the step.
    pub state: CartPoleState,
    /// Controller output, idle force on no activation.
    pub inferred_force: f64,
    /// Force actually handed to the plant.
    pub applied_force: f64,
    pub overridden: bool,
    pub no_activation: bool,
    pub reset: bool,
    /// State after the step.
    pub next_state: CartPoleState,
    pub done: bool,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cpos={:8.4}, cvel={:8.4}, pang={:8.4}, tvel={:8.4}, force={:8.4}",
            self.state.cart_position,
            self.state.cart_velocity,
            self.state.pole_angle,
            self.state.tip_velocity,
            self.applied_force
        )
    }
}

/// Fuzzy controller wired to the plant state vector.
#[derive(Debug, Clone)]
pub struct ControlCycle {
    engine: InferenceEngine,
    idle_force: f64,
    paused: bool,
    stepped: u64,
}

impl ControlCycle {
    /// Every engine input must name a state component.
    pub fn new(engine: InferenceEngine, idle_force: f64) -> FuzzyResult<Self> {
        if !idle_force.is_finite() {
            return Err(FuzzyError::ConfigError(format!(
                "idle_force must be finite, got {idle_force}"
            )));
        }
        if let Some(var) = engine
            .inputs()
            .iter()
            .find(|var| !STATE_COMPONENTS.contains(&var.name()))
        {
            return Err(FuzzyError::ConfigError(format!(
                "input '{}' is not a state component (expected one of {})",
                var.name(),
                STATE_COMPONENTS.join(", ")
            )));
        }
        Ok(ControlCycle {
            engine,
            idle_force,
            paused: false,
            stepped: 0,
        })
    }

    pub fn from_config(config: &ControllerConfig) -> FuzzyResult<Self> {
        Self::new(build_engine(config)?, config.idle_force)
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn idle_force(&self) -> f64 {
        self.idle_force
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stepped cycles so far.
    pub fn cycles(&self) -> u64 {
        self.stepped
    }

    /// Force for `state`, falling back to the idle force when no rule fires.
    /// Returns `(force, no_activation)`.
    pub fn control_force(&self, state: &CartPoleState) -> FuzzyResult<(f64, bool)> {
        match self.engine.infer(&state.to_inputs()) {
            Ok(force) => Ok((force, false)),
            Err(e) if e.is_no_activation() => {
                debug!(
                    pole_angle = state.pole_angle,
                    idle_force = self.idle_force,
                    "no rule fired, applying idle force"
                );
                Ok((self.idle_force, true))
            }
            Err(e) => Err(e),
        }
    }

    /// Run one cycle against `plant`, consuming the signals it acts on.
    pub fn tick<P>(&mut self, plant: &mut P, signals: &mut ControlSignals) -> FuzzyResult<CycleOutcome>
    where
        P: Plant + ?Sized,
    {
        if std::mem::take(&mut signals.exit_request) {
            info!(cycles = self.stepped, "exit requested");
            return Ok(CycleOutcome::Exited);
        }
        if std::mem::take(&mut signals.pause_toggle) {
            self.paused = !self.paused;
            info!(paused = self.paused, cycle = self.stepped, "pause toggled");
        }
        if self.paused {
            plant.render();
            return Ok(CycleOutcome::Paused);
        }

        let reset = std::mem::take(&mut signals.reset_request);
        if reset {
            let state = plant.reset();
            debug!(?state, cycle = self.stepped, "plant reset");
        }

        let state = plant.state();
        let (inferred_force, no_activation) = self.control_force(&state)?;

        let (applied_force, overridden) = match signals.override_force.take() {
            Some(force) if force.is_finite() => (force, true),
            Some(force) => {
                warn!(force, "ignoring non-finite override");
                (inferred_force, false)
            }
            None => (inferred_force, false),
        };

        let result = plant.step(applied_force);
        plant.render();

        let report = CycleReport {
            cycle: self.stepped,
            state,
            inferred_force,
            applied_force,
            overridden,
            no_activation,
            reset,
            next_state: result.state,
            done: result.done,
        };
        self.stepped += 1;
        Ok(CycleOutcome::Stepped(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::CartPole;
    use cartpole_types::config::{
        Antecedent, CartPoleParams, Consequent, DomainConfig, RuleConfig, ShapeConfig, TermConfig,
        VariableConfig,
    };
    use cartpole_types::state::StepResult;

    /// Plant that records what the cycle did to it.
    #[derive(Default)]
    struct RecordingPlant {
        state: CartPoleState,
        forces: Vec<f64>,
        resets: usize,
        renders: usize,
    }

    impl Plant for RecordingPlant {
        fn reset(&mut self) -> CartPoleState {
            self.resets += 1;
            self.state = CartPoleState::default();
            self.state
        }

        fn state(&self) -> CartPoleState {
            self.state
        }

        fn step(&mut self, force: f64) -> StepResult {
            self.forces.push(force);
            StepResult {
                state: self.state,
                done: false,
            }
        }

        fn render(&mut self) {
            self.renders += 1;
        }

        fn tau(&self) -> f64 {
            0.02
        }
    }

    fn default_cycle() -> ControlCycle {
        ControlCycle::from_config(&ControllerConfig::default()).unwrap()
    }

    fn leaning(angle: f64) -> RecordingPlant {
        RecordingPlant {
            state: CartPoleState::new(0.0, 0.0, angle, 0.0),
            ..Default::default()
        }
    }

    fn stepped(outcome: CycleOutcome) -> CycleReport {
        match outcome {
            CycleOutcome::Stepped(report) => report,
            other => panic!("expected a stepped cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_state_input() {
        let mut cfg = ControllerConfig::default();
        cfg.inputs.push(VariableConfig {
            name: "pole_mass".to_string(),
            domain: DomainConfig::from((0.0, 1.0, 0.1)),
            terms: vec![TermConfig::new(
                "light",
                ShapeConfig::Falling { low: 0.0, high: 1.0 },
            )],
        });
        cfg.rules.push(RuleConfig::new(
            Antecedent::is("pole_mass", "light"),
            Consequent::new("force", "zero"),
        ));
        let err = ControlCycle::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("pole_mass"), "{err}");
    }

    #[test]
    fn test_rejects_non_finite_idle_force() {
        let engine = build_engine(&ControllerConfig::default()).unwrap();
        assert!(ControlCycle::new(engine, f64::NAN).is_err());
    }

    #[test]
    fn test_upright_falls_back_to_idle_force() {
        let mut cycle = default_cycle();
        let mut plant = leaning(0.0);
        let mut signals = ControlSignals::default();
        let report = stepped(cycle.tick(&mut plant, &mut signals).unwrap());
        assert!(report.no_activation);
        assert_eq!(report.applied_force, 0.0);
        assert_eq!(plant.forces, vec![0.0]);
        assert_eq!(plant.renders, 1);
    }

    #[test]
    fn test_lean_right_pushes_right() {
        let mut cycle = default_cycle();
        let mut plant = leaning(0.05);
        let report = stepped(cycle.tick(&mut plant, &mut ControlSignals::default()).unwrap());
        assert!(!report.no_activation);
        assert!((report.applied_force - 5.333).abs() < 0.02, "{}", report.applied_force);
    }

    #[test]
    fn test_override_replaces_exactly_one_step() {
        let mut cycle = default_cycle();
        let mut plant = leaning(0.0);
        let mut signals = ControlSignals {
            override_force: Some(-10.0),
            ..Default::default()
        };

        let first = stepped(cycle.tick(&mut plant, &mut signals).unwrap());
        assert!(first.overridden);
        assert_eq!(first.applied_force, -10.0);
        assert_eq!(first.inferred_force, 0.0);
        assert!(signals.override_force.is_none());

        let second = stepped(cycle.tick(&mut plant, &mut signals).unwrap());
        assert!(!second.overridden);
        assert_eq!(plant.forces, vec![-10.0, 0.0]);
    }

    #[test]
    fn test_pause_suspends_until_toggled_again() {
        let mut cycle = default_cycle();
        let mut plant = leaning(0.0);
        let mut signals = ControlSignals {
            pause_toggle: true,
            ..Default::default()
        };

        assert_eq!(cycle.tick(&mut plant, &mut signals).unwrap(), CycleOutcome::Paused);
        assert!(cycle.is_paused());
        assert!(!signals.pause_toggle);

        signals.override_force = Some(4.0);
        signals.reset_request = true;
        for _ in 0..3 {
            assert_eq!(cycle.tick(&mut plant, &mut signals).unwrap(), CycleOutcome::Paused);
        }
        assert!(plant.forces.is_empty());
        assert_eq!(plant.resets, 0);
        assert_eq!(plant.renders, 4);
        // Held while paused.
        assert_eq!(signals.override_force, Some(4.0));
        assert!(signals.reset_request);

        signals.pause_toggle = true;
        let report = stepped(cycle.tick(&mut plant, &mut signals).unwrap());
        assert!(report.reset);
        assert!(report.overridden);
        assert_eq!(plant.resets, 1);
        assert_eq!(plant.forces, vec![4.0]);
        assert_eq!(cycle.cycles(), 1);
    }

    #[test]
    fn test_reset_happens_before_state_read() {
        let mut cycle = default_cycle();
        let mut plant = leaning(30.0);
        let mut signals = ControlSignals {
            reset_request: true,
            ..Default::default()
        };
        let report = stepped(cycle.tick(&mut plant, &mut signals).unwrap());
        assert!(report.reset);
        assert_eq!(report.state, CartPoleState::default());
        assert!(report.no_activation);
        assert!(!signals.reset_request);
    }

    #[test]
    fn test_exit_wins_over_everything() {
        let mut cycle = default_cycle();
        let mut plant = leaning(1.0);
        let mut signals = ControlSignals {
            override_force: Some(1.0),
            pause_toggle: true,
            reset_request: true,
            exit_request: true,
        };
        assert_eq!(cycle.tick(&mut plant, &mut signals).unwrap(), CycleOutcome::Exited);
        assert!(!signals.exit_request);
        assert!(plant.forces.is_empty());
        assert_eq!(plant.renders, 0);
        assert!(!cycle.is_paused());
    }

    #[test]
    fn test_non_finite_override_is_ignored() {
        let mut cycle = default_cycle();
        let mut plant = leaning(0.0);
        let mut signals = ControlSignals {
            override_force: Some(f64::INFINITY),
            ..Default::default()
        };
        let report = stepped(cycle.tick(&mut plant, &mut signals).unwrap());
        assert!(!report.overridden);
        assert_eq!(report.applied_force, 0.0);
    }

    #[test]
    fn test_display_line_format() {
        let report = CycleReport {
            cycle: 0,
            state: CartPoleState::new(0.0123, -0.5, 1.25, -20.0),
            inferred_force: 5.0,
            applied_force: 5.33286,
            overridden: false,
            no_activation: false,
            reset: false,
            next_state: CartPoleState::default(),
            done: false,
        };
        assert_eq!(
            report.to_string(),
            "cpos=  0.0123, cvel= -0.5000, pang=  1.2500, tvel=-20.0000, force=  5.3329"
        );
    }

    #[test]
    fn test_default_controller_keeps_pole_up() {
        let mut cycle = default_cycle();
        let mut plant = CartPole::new(CartPoleParams::default(), 0)
            .unwrap()
            .with_initial_state(CartPoleState::new(0.0, 0.0, 2.0, 0.0));
        let mut signals = ControlSignals::default();
        let mut max_angle: f64 = 0.0;
        for _ in 0..250 {
            let report = stepped(cycle.tick(&mut plant, &mut signals).unwrap());
            max_angle = max_angle.max(report.next_state.pole_angle.abs());
            assert!(!report.done, "{report}");
        }
        assert!(max_angle < 10.0, "max |angle| {max_angle}");
    }
}
