// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Rules
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fuzzy rules and firing-strength evaluation.
//!
//! AND = min, OR = max, NOT = 1 - degree. Rules are written against variable
//! and term names and compiled to index form when the engine is built.

use cartpole_types::config::{Antecedent, Consequent, RuleConfig};
use cartpole_types::error::{FuzzyError, FuzzyResult};

use crate::variable::{Fuzzified, LinguisticVariable};

/// `IF antecedent THEN consequent`, optionally weighted.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Antecedent,
    pub consequent: Consequent,
    pub weight: f64,
}

impl Rule {
    pub fn new(antecedent: Antecedent, consequent: Consequent) -> Self {
        Rule {
            antecedent,
            consequent,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

impl From<&RuleConfig> for Rule {
    fn from(cfg: &RuleConfig) -> Self {
        Rule {
            antecedent: cfg.antecedent.clone(),
            consequent: cfg.consequent.clone(),
            weight: cfg.weight,
        }
    }
}

/// Antecedent with names resolved to (input variable, term) indices.
#[derive(Debug, Clone)]
enum Node {
    Term { variable: usize, term: usize },
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
}

impl Node {
    fn compile(expr: &Antecedent, inputs: &[LinguisticVariable]) -> FuzzyResult<Node> {
        match expr {
            Antecedent::Is { variable, term } => {
                let var_idx = inputs
                    .iter()
                    .position(|v| v.name() == variable)
                    .ok_or_else(|| {
                        FuzzyError::ConfigError(format!(
                            "rule references unknown input variable '{variable}'"
                        ))
                    })?;
                let term_idx = inputs[var_idx].term_index(term).ok_or_else(|| {
                    FuzzyError::ConfigError(format!(
                        "rule references unknown term '{term}' of variable '{variable}'"
                    ))
                })?;
                Ok(Node::Term {
                    variable: var_idx,
                    term: term_idx,
                })
            }
            Antecedent::And(operands) => Ok(Node::And(Self::compile_all("AND", operands, inputs)?)),
            Antecedent::Or(operands) => Ok(Node::Or(Self::compile_all("OR", operands, inputs)?)),
            Antecedent::Not(inner) => Ok(Node::Not(Box::new(Self::compile(inner, inputs)?))),
        }
    }

    fn compile_all(
        op: &str,
        operands: &[Antecedent],
        inputs: &[LinguisticVariable],
    ) -> FuzzyResult<Vec<Node>> {
        if operands.is_empty() {
            return Err(FuzzyError::ConfigError(format!(
                "{op} node in rule antecedent has no operands"
            )));
        }
        operands
            .iter()
            .map(|operand| Self::compile(operand, inputs))
            .collect()
    }

    fn eval(&self, fuzzified: &[Fuzzified<'_>]) -> f64 {
        match self {
            Node::Term { variable, term } => fuzzified[*variable].degree_at(*term),
            Node::And(operands) => operands
                .iter()
                .map(|n| n.eval(fuzzified))
                .fold(1.0, f64::min),
            Node::Or(operands) => operands
                .iter()
                .map(|n| n.eval(fuzzified))
                .fold(0.0, f64::max),
            Node::Not(inner) => 1.0 - inner.eval(fuzzified),
        }
    }
}

/// Validated rule ready for evaluation.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    antecedent: Node,
    /// Index of the consequent term in the output variable.
    pub(crate) output_term: usize,
    weight: f64,
}

impl CompiledRule {
    pub(crate) fn compile(
        rule: &Rule,
        inputs: &[LinguisticVariable],
        output: &LinguisticVariable,
    ) -> FuzzyResult<Self> {
        if rule.consequent.variable != output.name() {
            return Err(FuzzyError::ConfigError(format!(
                "rule concludes '{}' but the output variable is '{}'",
                rule.consequent.variable,
                output.name()
            )));
        }
        let output_term = output.term_index(&rule.consequent.term).ok_or_else(|| {
            FuzzyError::ConfigError(format!(
                "rule concludes unknown term '{}' of output '{}'",
                rule.consequent.term,
                output.name()
            ))
        })?;
        if !rule.weight.is_finite() || !(0.0..=1.0).contains(&rule.weight) {
            return Err(FuzzyError::ConfigError(format!(
                "rule weight must be in [0, 1], got {}",
                rule.weight
            )));
        }
        Ok(CompiledRule {
            antecedent: Node::compile(&rule.antecedent, inputs)?,
            output_term,
            weight: rule.weight,
        })
    }

    /// Truth degree of the antecedent, scaled by the rule weight.
    pub(crate) fn firing_strength(&self, fuzzified: &[Fuzzified<'_>]) -> f64 {
        (self.antecedent.eval(fuzzified) * self.weight).clamp(0.0, 1.0)
    }
}
