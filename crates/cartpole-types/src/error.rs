// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FuzzyError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The aggregated output set has zero total degree, so there is no centroid.
    #[error("No rule activated output variable '{variable}'")]
    NoActivation { variable: String },

    #[error("Missing crisp input for variable '{0}'")]
    MissingInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FuzzyError {
    /// True for the recoverable empty-aggregate case.
    pub fn is_no_activation(&self) -> bool {
        matches!(self, FuzzyError::NoActivation { .. })
    }
}

pub type FuzzyResult<T> = Result<T, FuzzyError>;
