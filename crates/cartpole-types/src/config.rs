// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::{
    ANGLE_DOMAIN, ANGLE_SPREAD, FORCE, FORCE_DOMAIN, FORCE_SPREAD, GRAVITY, IDLE_FORCE, POLE_ANGLE,
    TAU, TRACK_LIMIT,
};

/// Top-level fuzzy controller configuration.
/// Loaded once at startup; the engine built from it is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub name: String,
    pub inputs: Vec<VariableConfig>,
    pub output: VariableConfig,
    pub rules: Vec<RuleConfig>,
    /// Output substituted when no rule fires.
    #[serde(default = "default_idle_force")]
    pub idle_force: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl From<(f64, f64, f64)> for DomainConfig {
    fn from((start, stop, step): (f64, f64, f64)) -> Self {
        DomainConfig { start, stop, step }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub domain: DomainConfig,
    pub terms: Vec<TermConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub name: String,
    pub shape: ShapeConfig,
}

impl TermConfig {
    pub fn new(name: &str, shape: ShapeConfig) -> Self {
        TermConfig {
            name: name.to_string(),
            shape,
        }
    }
}

/// Membership shape with its breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    /// S-curve from 1 at `low` down to 0 at `high`.
    Falling { low: f64, high: f64 },
    Triangular { left: f64, peak: f64, right: f64 },
    /// S-curve from 0 at `low` up to 1 at `high`.
    Rising { low: f64, high: f64 },
}

/// Rule premise over input-variable terms.
///
/// JSON form is externally tagged, e.g.
/// `{"and": [{"is": {"variable": "pole_angle", "term": "negative"}}, {"not": {...}}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Antecedent {
    Is { variable: String, term: String },
    And(Vec<Antecedent>),
    Or(Vec<Antecedent>),
    Not(Box<Antecedent>),
}

impl Antecedent {
    pub fn is(variable: &str, term: &str) -> Self {
        Antecedent::Is {
            variable: variable.to_string(),
            term: term.to_string(),
        }
    }

    /// Conjunction, flattening nested ANDs.
    pub fn and(self, other: Antecedent) -> Self {
        match self {
            Antecedent::And(mut operands) => {
                operands.push(other);
                Antecedent::And(operands)
            }
            lhs => Antecedent::And(vec![lhs, other]),
        }
    }

    /// Disjunction, flattening nested ORs.
    pub fn or(self, other: Antecedent) -> Self {
        match self {
            Antecedent::Or(mut operands) => {
                operands.push(other);
                Antecedent::Or(operands)
            }
            lhs => Antecedent::Or(vec![lhs, other]),
        }
    }
}

impl std::ops::Not for Antecedent {
    type Output = Antecedent;

    fn not(self) -> Antecedent {
        Antecedent::Not(Box::new(self))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consequent {
    pub variable: String,
    pub term: String,
}

impl Consequent {
    pub fn new(variable: &str, term: &str) -> Self {
        Consequent {
            variable: variable.to_string(),
            term: term.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(rename = "if")]
    pub antecedent: Antecedent,
    #[serde(rename = "then")]
    pub consequent: Consequent,
    /// Scales the firing strength, in [0, 1].
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl RuleConfig {
    pub fn new(antecedent: Antecedent, consequent: Consequent) -> Self {
        RuleConfig {
            antecedent,
            consequent,
            weight: default_weight(),
        }
    }
}

fn default_idle_force() -> f64 {
    IDLE_FORCE
}
fn default_weight() -> f64 {
    1.0
}

/// negative / zero / positive terms spanning `[-spread, spread]`.
fn three_term(name: &str, domain: (f64, f64, f64), spread: f64) -> VariableConfig {
    VariableConfig {
        name: name.to_string(),
        domain: domain.into(),
        terms: vec![
            TermConfig::new(
                "negative",
                ShapeConfig::Falling {
                    low: -spread,
                    high: 0.0,
                },
            ),
            TermConfig::new(
                "zero",
                ShapeConfig::Triangular {
                    left: -spread,
                    peak: 0.0,
                    right: spread,
                },
            ),
            TermConfig::new(
                "positive",
                ShapeConfig::Rising {
                    low: 0.0,
                    high: spread,
                },
            ),
        ],
    }
}

impl Default for ControllerConfig {
    /// Two-rule pole-angle controller:
    /// angle negative ⇒ force negative, angle positive ⇒ force positive.
    /// The `zero` force term exists but no rule concludes it.
    fn default() -> Self {
        ControllerConfig {
            name: "two-rule-angle".to_string(),
            inputs: vec![three_term(POLE_ANGLE, ANGLE_DOMAIN, ANGLE_SPREAD)],
            output: three_term(FORCE, FORCE_DOMAIN, FORCE_SPREAD),
            rules: vec![
                RuleConfig::new(
                    Antecedent::is(POLE_ANGLE, "negative"),
                    Consequent::new(FORCE, "negative"),
                ),
                RuleConfig::new(
                    Antecedent::is(POLE_ANGLE, "positive"),
                    Consequent::new(FORCE, "positive"),
                ),
            ],
            idle_force: IDLE_FORCE,
        }
    }
}

impl ControllerConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> crate::error::FuzzyResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

/// Time integration scheme of the reference plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// Positions advance with the old velocities.
    Euler,
    /// Velocities first, positions with the new velocities. Bounded energy drift.
    #[default]
    SemiImplicitEuler,
}

/// Reference cart-pole plant parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartPoleParams {
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    #[serde(default = "default_cart_mass")]
    pub cart_mass: f64,
    #[serde(default = "default_pole_mass")]
    pub pole_mass: f64,
    /// Half the pole length (m).
    #[serde(default = "default_half_length")]
    pub half_length: f64,
    #[serde(default = "default_tau")]
    pub tau: f64,
    #[serde(default = "default_track_limit")]
    pub track_limit: f64,
    #[serde(default)]
    pub integrator: Integrator,
}

fn default_gravity() -> f64 {
    GRAVITY
}
fn default_cart_mass() -> f64 {
    1.0
}
fn default_pole_mass() -> f64 {
    0.1
}
fn default_half_length() -> f64 {
    0.5
}
fn default_tau() -> f64 {
    TAU
}
fn default_track_limit() -> f64 {
    TRACK_LIMIT
}

impl Default for CartPoleParams {
    fn default() -> Self {
        CartPoleParams {
            gravity: default_gravity(),
            cart_mass: default_cart_mass(),
            pole_mass: default_pole_mass(),
            half_length: default_half_length(),
            tau: default_tau(),
            track_limit: default_track_limit(),
            integrator: Integrator::default(),
        }
    }
}
