// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Membership Functions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Closed-form membership shapes.
//!
//! The S-curves are the two-piece quadratic splines (`zmf` / `smf`):
//! flat outside the breakpoints, quadratic on each half, 0.5 at the midpoint.

use std::fmt;

use cartpole_types::config::ShapeConfig;
use cartpole_types::error::{FuzzyError, FuzzyResult};

use crate::domain::Domain;
use crate::fuzzy_set::FuzzySet;

/// Shape and breakpoints of a membership function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Falling { low: f64, high: f64 },
    Triangular { left: f64, peak: f64, right: f64 },
    Rising { low: f64, high: f64 },
}

/// Validated membership function. Breakpoints are finite and non-decreasing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembershipFunction {
    shape: Shape,
}

fn check_breakpoints(kind: &str, points: &[f64]) -> FuzzyResult<()> {
    if points.iter().any(|p| !p.is_finite()) {
        return Err(FuzzyError::ConfigError(format!(
            "{kind} breakpoints must be finite: {points:?}"
        )));
    }
    if points.windows(2).any(|w| w[0] > w[1]) {
        return Err(FuzzyError::ConfigError(format!(
            "{kind} breakpoints must be non-decreasing: {points:?}"
        )));
    }
    Ok(())
}

impl MembershipFunction {
    /// 1 at and below `low`, 0 at and above `high`.
    pub fn falling(low: f64, high: f64) -> FuzzyResult<Self> {
        check_breakpoints("falling", &[low, high])?;
        Ok(MembershipFunction {
            shape: Shape::Falling { low, high },
        })
    }

    /// 0 outside `(left, right)`, 1 at `peak`, linear in between.
    pub fn triangular(left: f64, peak: f64, right: f64) -> FuzzyResult<Self> {
        check_breakpoints("triangular", &[left, peak, right])?;
        Ok(MembershipFunction {
            shape: Shape::Triangular { left, peak, right },
        })
    }

    /// 0 at and below `low`, 1 at and above `high`.
    pub fn rising(low: f64, high: f64) -> FuzzyResult<Self> {
        check_breakpoints("rising", &[low, high])?;
        Ok(MembershipFunction {
            shape: Shape::Rising { low, high },
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Degree of membership of `x`, always in [0, 1]. NaN maps to 0.
    pub fn evaluate(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        let mu = match self.shape {
            Shape::Falling { low, high } => 1.0 - s_curve(x, low, high),
            Shape::Rising { low, high } => s_curve(x, low, high),
            Shape::Triangular { left, peak, right } => {
                if x == peak {
                    1.0
                } else if x > left && x < peak {
                    (x - left) / (peak - left)
                } else if x > peak && x < right {
                    (right - x) / (right - peak)
                } else {
                    0.0
                }
            }
        };
        // Overflowing spans give inf / inf.
        if mu.is_nan() {
            return 0.0;
        }
        mu.clamp(0.0, 1.0)
    }

    /// Shape sampled on every point of `domain`.
    pub fn sample(&self, domain: &Domain) -> FuzzySet {
        FuzzySet::from_samples(domain.samples().map(|x| self.evaluate(x)))
    }
}

/// Rising S-curve: 0 at `low`, 0.5 at the midpoint, 1 at `high`.
fn s_curve(x: f64, low: f64, high: f64) -> f64 {
    if x <= low {
        return 0.0;
    }
    if x >= high {
        return 1.0;
    }
    let width = high - low;
    let mid = 0.5 * (low + high);
    if x <= mid {
        let t = (x - low) / width;
        2.0 * t * t
    } else {
        let t = (x - high) / width;
        1.0 - 2.0 * t * t
    }
}

impl TryFrom<&ShapeConfig> for MembershipFunction {
    type Error = FuzzyError;

    fn try_from(cfg: &ShapeConfig) -> FuzzyResult<Self> {
        match *cfg {
            ShapeConfig::Falling { low, high } => MembershipFunction::falling(low, high),
            ShapeConfig::Triangular { left, peak, right } => {
                MembershipFunction::triangular(left, peak, right)
            }
            ShapeConfig::Rising { low, high } => MembershipFunction::rising(low, high),
        }
    }
}

impl fmt::Display for MembershipFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape {
            Shape::Falling { low, high } => write!(f, "falling({low}, {high})"),
            Shape::Triangular { left, peak, right } => {
                write!(f, "triangular({left}, {peak}, {right})")
            }
            Shape::Rising { low, high } => write!(f, "rising({low}, {high})"),
        }
    }
}
