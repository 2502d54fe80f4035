// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Plant
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Plant interface and the reference cart-pole simulator.
//!
//! Classic cart-pole dynamics (rigid pole hinged on a cart, frictionless
//! track). Internally radians; the state handed to the controller is in
//! degrees.

use cartpole_types::config::{CartPoleParams, Integrator};
use cartpole_types::error::{FuzzyError, FuzzyResult};
use cartpole_types::state::{CartPoleState, StepResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

/// Half-width of the uniform reset distribution, per component.
const RESET_SPREAD: f64 = 0.05;

/// Plant contract consumed by the control cycle.
pub trait Plant {
    /// Reinitialise and return the fresh state.
    fn reset(&mut self) -> CartPoleState;
    fn state(&self) -> CartPoleState;
    /// Apply `force` (N) for one fixed timestep.
    fn step(&mut self, force: f64) -> StepResult;
    /// Display side effect, fire-and-forget.
    fn render(&mut self) {}
    /// Fixed timestep (s).
    fn tau(&self) -> f64;
}

/// Reference cart-pole simulator.
#[derive(Debug, Clone)]
pub struct CartPole {
    params: CartPoleParams,
    x: f64,
    x_dot: f64,
    theta: f64,     // rad
    theta_dot: f64, // rad/s
    rng: StdRng,
    /// When set, `reset` restores this state instead of sampling one.
    initial: Option<CartPoleState>,
}

impl CartPole {
    /// Seeded simulator, already reset.
    pub fn new(params: CartPoleParams, seed: u64) -> FuzzyResult<Self> {
        let positive = [
            ("gravity", params.gravity),
            ("cart_mass", params.cart_mass),
            ("pole_mass", params.pole_mass),
            ("half_length", params.half_length),
            ("tau", params.tau),
            ("track_limit", params.track_limit),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(FuzzyError::ConfigError(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        let mut plant = CartPole {
            params,
            x: 0.0,
            x_dot: 0.0,
            theta: 0.0,
            theta_dot: 0.0,
            rng: StdRng::seed_from_u64(seed),
            initial: None,
        };
        plant.reset();
        Ok(plant)
    }

    /// Fix the state `reset` returns (angles in degrees) and apply it now.
    pub fn with_initial_state(mut self, state: CartPoleState) -> Self {
        self.initial = Some(state);
        self.set_state(state);
        self
    }

    pub fn set_state(&mut self, state: CartPoleState) {
        self.x = state.cart_position;
        self.x_dot = state.cart_velocity;
        self.theta = state.pole_angle.to_radians();
        self.theta_dot = state.tip_velocity.to_radians();
    }

    pub fn params(&self) -> &CartPoleParams {
        &self.params
    }

    /// (x_acc, theta_acc) for the current state under `force`.
    fn accelerations(&self, force: f64) -> (f64, f64) {
        let p = &self.params;
        let total_mass = p.cart_mass + p.pole_mass;
        let pole_moment = p.pole_mass * p.half_length;
        let (sin, cos) = self.theta.sin_cos();

        let temp = (force + pole_moment * self.theta_dot * self.theta_dot * sin) / total_mass;
        let theta_acc = (p.gravity * sin - cos * temp)
            / (p.half_length * (4.0 / 3.0 - p.pole_mass * cos * cos / total_mass));
        let x_acc = temp - pole_moment * theta_acc * cos / total_mass;
        (x_acc, theta_acc)
    }
}

impl Plant for CartPole {
    fn reset(&mut self) -> CartPoleState {
        match self.initial {
            Some(state) => self.set_state(state),
            None => {
                self.x = self.rng.gen_range(-RESET_SPREAD..RESET_SPREAD);
                self.x_dot = self.rng.gen_range(-RESET_SPREAD..RESET_SPREAD);
                self.theta = self.rng.gen_range(-RESET_SPREAD..RESET_SPREAD);
                self.theta_dot = self.rng.gen_range(-RESET_SPREAD..RESET_SPREAD);
            }
        }
        self.state()
    }

    fn state(&self) -> CartPoleState {
        CartPoleState::new(
            self.x,
            self.x_dot,
            self.theta.to_degrees(),
            self.theta_dot.to_degrees(),
        )
    }

    fn step(&mut self, force: f64) -> StepResult {
        let force = if force.is_finite() {
            force
        } else {
            warn!(force, "non-finite force replaced by 0");
            0.0
        };
        let (x_acc, theta_acc) = self.accelerations(force);
        let tau = self.params.tau;

        match self.params.integrator {
            Integrator::Euler => {
                self.x += tau * self.x_dot;
                self.x_dot += tau * x_acc;
                self.theta += tau * self.theta_dot;
                self.theta_dot += tau * theta_acc;
            }
            Integrator::SemiImplicitEuler => {
                self.x_dot += tau * x_acc;
                self.x += tau * self.x_dot;
                self.theta_dot += tau * theta_acc;
                self.theta += tau * self.theta_dot;
            }
        }

        StepResult {
            state: self.state(),
            done: self.x.abs() > self.params.track_limit,
        }
    }

    fn tau(&self) -> f64 {
        self.params.tau
    }
}
