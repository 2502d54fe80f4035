// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Linguistic Variables
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Linguistic variables and fuzzification.

use cartpole_types::config::VariableConfig;
use cartpole_types::error::{FuzzyError, FuzzyResult};

use crate::domain::Domain;
use crate::membership::MembershipFunction;

/// A named quantity over a domain, described by ordered, uniquely named terms.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: String,
    domain: Domain,
    terms: Vec<(String, MembershipFunction)>,
}

impl LinguisticVariable {
    pub fn new(name: &str, domain: Domain) -> Self {
        LinguisticVariable {
            name: name.to_string(),
            domain,
            terms: Vec::new(),
        }
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, term: &str, membership: MembershipFunction) -> FuzzyResult<Self> {
        self.add_term(term, membership)?;
        Ok(self)
    }

    pub fn add_term(&mut self, term: &str, membership: MembershipFunction) -> FuzzyResult<()> {
        if term.is_empty() {
            return Err(FuzzyError::ConfigError(format!(
                "variable '{}' has a term with an empty name",
                self.name
            )));
        }
        if self.term_index(term).is_some() {
            return Err(FuzzyError::ConfigError(format!(
                "variable '{}' defines term '{term}' twice",
                self.name
            )));
        }
        self.terms.push((term.to_string(), membership));
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.terms.iter().position(|(name, _)| name == term)
    }

    pub fn term(&self, term: &str) -> Option<&MembershipFunction> {
        self.terms
            .iter()
            .find(|(name, _)| name == term)
            .map(|(_, mf)| mf)
    }

    /// Terms in declaration order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &MembershipFunction)> {
        self.terms.iter().map(|(name, mf)| (name.as_str(), mf))
    }

    /// Degree of `value` in every term, closed form.
    pub fn fuzzify(&self, value: f64) -> Fuzzified<'_> {
        Fuzzified {
            variable: self,
            value,
            degrees: self.terms.iter().map(|(_, mf)| mf.evaluate(value)).collect(),
        }
    }
}

impl TryFrom<&VariableConfig> for LinguisticVariable {
    type Error = FuzzyError;

    fn try_from(cfg: &VariableConfig) -> FuzzyResult<Self> {
        if cfg.name.is_empty() {
            return Err(FuzzyError::ConfigError(
                "linguistic variable name must not be empty".to_string(),
            ));
        }
        let domain = Domain::try_from(&cfg.domain)
            .map_err(|e| FuzzyError::ConfigError(format!("variable '{}': {e}", cfg.name)))?;
        let mut variable = LinguisticVariable::new(&cfg.name, domain);
        for term in &cfg.terms {
            let mf = MembershipFunction::try_from(&term.shape).map_err(|e| {
                FuzzyError::ConfigError(format!("variable '{}', term '{}': {e}", cfg.name, term.name))
            })?;
            variable.add_term(&term.name, mf)?;
        }
        Ok(variable)
    }
}

/// Per-term degrees of one crisp value, in term declaration order.
#[derive(Debug, Clone)]
pub struct Fuzzified<'a> {
    variable: &'a LinguisticVariable,
    value: f64,
    degrees: Vec<f64>,
}

impl<'a> Fuzzified<'a> {
    pub fn variable(&self) -> &'a LinguisticVariable {
        self.variable
    }

    /// The crisp value that was fuzzified.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn degree(&self, term: &str) -> Option<f64> {
        self.variable.term_index(term).map(|i| self.degrees[i])
    }

    pub(crate) fn degree_at(&self, index: usize) -> f64 {
        self.degrees[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, f64)> + '_ {
        self.variable
            .terms
            .iter()
            .zip(&self.degrees)
            .map(|((name, _), &mu)| (name.as_str(), mu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pole_angle() -> LinguisticVariable {
        LinguisticVariable::new("pole_angle", Domain::new(-180.0, 180.0, 0.1).unwrap())
            .with_term("negative", MembershipFunction::falling(-0.1, 0.0).unwrap())
            .unwrap()
            .with_term("zero", MembershipFunction::triangular(-0.1, 0.0, 0.1).unwrap())
            .unwrap()
            .with_term("positive", MembershipFunction::rising(0.0, 0.1).unwrap())
            .unwrap()
    }

    #[test]
    fn test_fuzzify_upright() {
        let var = pole_angle();
        let f = var.fuzzify(0.0);
        assert_eq!(f.degree("negative"), Some(0.0));
        assert_eq!(f.degree("zero"), Some(1.0));
        assert_eq!(f.degree("positive"), Some(0.0));
        assert_eq!(f.degree("sideways"), None);
    }

    #[test]
    fn test_fuzzify_slight_right_lean() {
        let var = pole_angle();
        let f = var.fuzzify(0.05);
        assert!((f.degree("zero").unwrap() - 0.5).abs() < 1e-12);
        assert!((f.degree("positive").unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(f.degree("negative"), Some(0.0));
    }

    #[test]
    fn test_fuzzify_far_outside_domain() {
        let var = pole_angle();
        let f = var.fuzzify(-500.0);
        assert_eq!(f.degree("negative"), Some(1.0));
        assert_eq!(f.degree("positive"), Some(0.0));
    }

    #[test]
    fn test_iter_preserves_declaration_order() {
        let var = pole_angle();
        let names: Vec<&str> = var.fuzzify(0.0).iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["negative", "zero", "positive"]);
    }

    #[test]
    fn test_duplicate_term_rejected() {
        let result = pole_angle().with_term("zero", MembershipFunction::rising(0.0, 1.0).unwrap());
        assert!(matches!(result, Err(FuzzyError::ConfigError(_))));
    }

    #[test]
    fn test_empty_term_name_rejected() {
        let mut var = LinguisticVariable::new("x", Domain::new(0.0, 1.0, 0.1).unwrap());
        assert!(var
            .add_term("", MembershipFunction::rising(0.0, 1.0).unwrap())
            .is_err());
    }

    #[test]
    fn test_from_config_reports_variable() {
        let cfg = VariableConfig {
            name: "force".to_string(),
            domain: (-10.0, 10.0, 0.0).into(),
            terms: Vec::new(),
        };
        let err = LinguisticVariable::try_from(&cfg).unwrap_err();
        assert!(err.to_string().contains("force"), "{err}");
    }
}
