//! Engine construction from a [`ControllerConfig`].

use cartpole_types::config::ControllerConfig;
use cartpole_types::error::{FuzzyError, FuzzyResult};

use crate::inference::InferenceEngine;
use crate::rule::Rule;
use crate::variable::LinguisticVariable;

/// Validate `config` and build the inference engine it describes.
/// Any malformed domain, shape, term or rule is a `ConfigError`.
pub fn build_engine(config: &ControllerConfig) -> FuzzyResult<InferenceEngine> {
    if !config.idle_force.is_finite() {
        return Err(FuzzyError::ConfigError(format!(
            "idle_force must be finite, got {}",
            config.idle_force
        )));
    }
    let inputs = config
        .inputs
        .iter()
        .map(LinguisticVariable::try_from)
        .collect::<FuzzyResult<Vec<_>>>()?;
    let output = LinguisticVariable::try_from(&config.output)?;
    let rules = config.rules.iter().map(Rule::from).collect();
    InferenceEngine::new(inputs, output, rules)
}
