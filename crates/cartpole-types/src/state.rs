// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CART_POSITION, CART_VELOCITY, POLE_ANGLE, STATE_COMPONENTS, TIP_VELOCITY};

/// Plant state vector as seen by the controller.
/// Angle in degrees, absolute (turns are not wrapped to ±180).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartPoleState {
    pub cart_position: f64, // m
    pub cart_velocity: f64, // m/s
    pub pole_angle: f64,    // deg, > 0 leans right
    pub tip_velocity: f64,  // deg/s, > 0 clockwise
}

impl CartPoleState {
    pub fn new(cart_position: f64, cart_velocity: f64, pole_angle: f64, tip_velocity: f64) -> Self {
        CartPoleState {
            cart_position,
            cart_velocity,
            pole_angle,
            tip_velocity,
        }
    }

    /// Components in state-vector order.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.cart_position,
            self.cart_velocity,
            self.pole_angle,
            self.tip_velocity,
        ]
    }

    /// Look up one component by its input-variable name.
    pub fn component(&self, name: &str) -> Option<f64> {
        match name {
            CART_POSITION => Some(self.cart_position),
            CART_VELOCITY => Some(self.cart_velocity),
            POLE_ANGLE => Some(self.pole_angle),
            TIP_VELOCITY => Some(self.tip_velocity),
            _ => None,
        }
    }

    /// Crisp input map keyed by component name.
    pub fn to_inputs(&self) -> HashMap<String, f64> {
        STATE_COMPONENTS
            .iter()
            .zip(self.as_array())
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

/// Result of advancing the plant by one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub state: CartPoleState,
    /// Plant-side terminal condition (e.g. cart off the track).
    pub done: bool,
}

/// Operator signals handed to the control cycle each iteration.
///
/// Owned by the caller. The cycle clears every field it acts on, so a
/// signal is consumed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlSignals {
    /// Force (N) that replaces the controller output for one step.
    pub override_force: Option<f64>,
    /// First toggle pauses, the next one resumes.
    pub pause_toggle: bool,
    pub reset_request: bool,
    pub exit_request: bool,
}

impl ControlSignals {
    pub fn is_idle(&self) -> bool {
        self.override_force.is_none()
            && !self.pause_toggle
            && !self.reset_request
            && !self.exit_request
    }
}
