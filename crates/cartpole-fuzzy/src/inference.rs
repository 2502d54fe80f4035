// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Inference Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Mamdani inference: fuzzify → fire → implicate (min) → aggregate (max)
//! → centroid.
//!
//! The engine is immutable after construction. `infer` is a pure function of
//! the configuration and the crisp inputs.

use std::collections::HashMap;

use cartpole_types::error::{FuzzyError, FuzzyResult};
use ndarray::Array1;
use tracing::debug;

use crate::defuzz::centroid;
use crate::fuzzy_set::FuzzySet;
use crate::rule::{CompiledRule, Rule};
use crate::variable::{Fuzzified, LinguisticVariable};

/// Single-output Mamdani fuzzy inference system.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    inputs: Vec<LinguisticVariable>,
    output: LinguisticVariable,
    rules: Vec<CompiledRule>,
    /// Output domain samples, fixed with the configuration.
    grid: Array1<f64>,
    /// Each output term sampled on `grid`, in declaration order.
    term_sets: Vec<FuzzySet>,
}

/// Intermediate values of one inference, for diagnostics.
#[derive(Debug, Clone)]
pub struct InferenceTrace<'a> {
    /// One entry per input variable, in declaration order.
    pub fuzzified: Vec<Fuzzified<'a>>,
    /// Combined (max) firing strength per output term, in declaration order.
    pub term_strengths: Vec<(&'a str, f64)>,
    pub aggregated: FuzzySet,
    /// Centroid, or `None` when no rule fired.
    pub output: Option<f64>,
}

impl InferenceEngine {
    pub fn new(
        inputs: Vec<LinguisticVariable>,
        output: LinguisticVariable,
        rules: Vec<Rule>,
    ) -> FuzzyResult<Self> {
        if inputs.is_empty() {
            return Err(FuzzyError::ConfigError(
                "inference engine needs at least one input variable".to_string(),
            ));
        }
        for (i, var) in inputs.iter().enumerate() {
            if var.term_count() == 0 {
                return Err(FuzzyError::ConfigError(format!(
                    "input variable '{}' has no terms",
                    var.name()
                )));
            }
            if inputs[..i].iter().any(|other| other.name() == var.name()) {
                return Err(FuzzyError::ConfigError(format!(
                    "input variable '{}' declared twice",
                    var.name()
                )));
            }
            if var.name() == output.name() {
                return Err(FuzzyError::ConfigError(format!(
                    "variable '{}' is both input and output",
                    var.name()
                )));
            }
        }
        if output.term_count() == 0 {
            return Err(FuzzyError::ConfigError(format!(
                "output variable '{}' has no terms",
                output.name()
            )));
        }

        let rules = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                CompiledRule::compile(rule, &inputs, &output)
                    .map_err(|e| FuzzyError::ConfigError(format!("rule #{}: {e}", i + 1)))
            })
            .collect::<FuzzyResult<Vec<_>>>()?;

        let grid = output.domain().grid();
        let term_sets = output
            .terms()
            .map(|(_, membership)| membership.sample(output.domain()))
            .collect();
        debug!(
            inputs = inputs.len(),
            rules = rules.len(),
            output = output.name(),
            samples = grid.len(),
            "built inference engine"
        );

        Ok(InferenceEngine {
            inputs,
            output,
            rules,
            grid,
            term_sets,
        })
    }

    pub fn inputs(&self) -> &[LinguisticVariable] {
        &self.inputs
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Crisp output for `inputs` (variable name → value).
    ///
    /// Fails with `NoActivation` when the aggregated set is empty and with
    /// `MissingInput` when a declared input has no value. Extra keys are ignored.
    pub fn infer(&self, inputs: &HashMap<String, f64>) -> FuzzyResult<f64> {
        let fuzzified = self.fuzzify_all(inputs)?;
        let strengths = self.term_strengths(&fuzzified);
        let aggregated = self.aggregate(&strengths);
        centroid(&self.grid, &aggregated, self.output.name())
    }

    /// Like [`infer`](Self::infer), substituting `default` when no rule fires.
    pub fn infer_or(&self, inputs: &HashMap<String, f64>, default: f64) -> FuzzyResult<f64> {
        match self.infer(inputs) {
            Err(e) if e.is_no_activation() => Ok(default),
            other => other,
        }
    }

    /// Full inference with every intermediate stage exposed.
    pub fn trace(&self, inputs: &HashMap<String, f64>) -> FuzzyResult<InferenceTrace<'_>> {
        let fuzzified = self.fuzzify_all(inputs)?;
        let strengths = self.term_strengths(&fuzzified);
        let aggregated = self.aggregate(&strengths);
        let output = match centroid(&self.grid, &aggregated, self.output.name()) {
            Ok(value) => Some(value),
            Err(e) if e.is_no_activation() => None,
            Err(e) => return Err(e),
        };
        let term_strengths = self
            .output
            .terms()
            .map(|(name, _)| name)
            .zip(strengths)
            .collect();
        Ok(InferenceTrace {
            fuzzified,
            term_strengths,
            aggregated,
            output,
        })
    }

    fn fuzzify_all(&self, inputs: &HashMap<String, f64>) -> FuzzyResult<Vec<Fuzzified<'_>>> {
        self.inputs
            .iter()
            .map(|var| {
                inputs
                    .get(var.name())
                    .map(|&value| var.fuzzify(value))
                    .ok_or_else(|| FuzzyError::MissingInput(var.name().to_string()))
            })
            .collect()
    }

    /// Rules sharing a consequent term combine by max, never by sum.
    fn term_strengths(&self, fuzzified: &[Fuzzified<'_>]) -> Vec<f64> {
        let mut strengths = vec![0.0_f64; self.output.term_count()];
        for rule in &self.rules {
            let s = rule.firing_strength(fuzzified);
            let slot = &mut strengths[rule.output_term];
            *slot = slot.max(s);
        }
        strengths
    }

    /// Clip each activated output term at its strength, then take the union.
    fn aggregate(&self, strengths: &[f64]) -> FuzzySet {
        let mut aggregated = FuzzySet::zeros(self.grid.len());
        for (term, &strength) in strengths.iter().enumerate() {
            if strength <= 0.0 {
                continue;
            }
            let implied = self.term_sets[term].clone().clipped(strength);
            aggregated.union_with(&implied);
        }
        aggregated
    }
}
