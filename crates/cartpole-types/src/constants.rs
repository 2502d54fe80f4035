// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Neutral actuator command used when no rule fires (N).
pub const IDLE_FORCE: f64 = 0.0;

/// Magnitude of one keyboard nudge in the interactive rig (N).
pub const NUDGE_FORCE: f64 = 10.0;

/// State component names, in state-vector order.
pub const CART_POSITION: &str = "cart_position";
pub const CART_VELOCITY: &str = "cart_velocity";
pub const POLE_ANGLE: &str = "pole_angle";
pub const TIP_VELOCITY: &str = "tip_velocity";

pub const STATE_COMPONENTS: [&str; 4] = [CART_POSITION, CART_VELOCITY, POLE_ANGLE, TIP_VELOCITY];

/// Default output variable name.
pub const FORCE: &str = "force";

/// Pole angle universe (degrees): [-180, 180] step 0.1.
pub const ANGLE_DOMAIN: (f64, f64, f64) = (-180.0, 180.0, 0.1);

/// Half-width of the pole angle terms (degrees).
pub const ANGLE_SPREAD: f64 = 0.1;

/// Force universe (N): [-10, 10] step 0.01.
pub const FORCE_DOMAIN: (f64, f64, f64) = (-10.0, 10.0, 0.01);

/// Half-width of the force terms (N).
pub const FORCE_SPREAD: f64 = 2.0;

/// Standard gravity used by the reference plant (m/s²).
pub const GRAVITY: f64 = 9.8;

/// Simulation timestep of the reference plant (s). 20 ms.
pub const TAU: f64 = 0.02;

/// Visible track half-length (m). The cart leaves the view beyond this.
pub const TRACK_LIMIT: f64 = 2.5;
