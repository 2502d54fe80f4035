// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Fuzzy Inference
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Mamdani fuzzy inference.
//!
//! Sampled domains, closed-form membership shapes, linguistic variables,
//! rule expression trees, min/max implication and aggregation, centroid
//! defuzzification.

pub mod builder;
pub mod defuzz;
pub mod domain;
pub mod fuzzy_set;
pub mod inference;
pub mod membership;
pub mod rule;
pub mod variable;

pub use builder::build_engine;
pub use domain::Domain;
pub use fuzzy_set::FuzzySet;
pub use inference::{InferenceEngine, InferenceTrace};
pub use membership::{MembershipFunction, Shape};
pub use rule::Rule;
pub use variable::{Fuzzified, LinguisticVariable};
