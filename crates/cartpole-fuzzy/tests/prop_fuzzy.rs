// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Property-Based Tests (proptest) for cartpole-fuzzy
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for cartpole-fuzzy using proptest.
//!
//! Covers: membership range, triangular vertices, domain sampling, centroid
//! scale invariance, no-activation reporting, mirror symmetry, replay
//! determinism.

use std::collections::HashMap;
use std::path::PathBuf;

use cartpole_fuzzy::defuzz::centroid;
use cartpole_fuzzy::{build_engine, Domain, FuzzySet, InferenceEngine, MembershipFunction};
use cartpole_types::config::ControllerConfig;
use proptest::prelude::*;

fn config_path(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("configs")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn default_engine() -> InferenceEngine {
    build_engine(&ControllerConfig::default()).expect("default config builds")
}

fn angle_rate_engine() -> InferenceEngine {
    let cfg = ControllerConfig::from_file(&config_path("angle_rate.json")).expect("config loads");
    build_engine(&cfg).expect("angle-rate config builds")
}

fn inputs(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Crisp values including extremes, far outside any configured domain.
fn any_crisp() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1e6f64..1e6,
        -1.0f64..1.0,
        -1e308f64..-1e300,
        1e300f64..1e308,
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(f64::NAN),
    ]
}

/// Three sorted finite breakpoints, including spans that overflow f64.
fn breakpoints() -> impl Strategy<Value = (f64, f64, f64)> {
    prop_oneof![
        (-100.0f64..100.0, 0.0f64..50.0, 0.0f64..50.0)
            .prop_map(|(a, d1, d2)| (a, a + d1, a + d1 + d2)),
        (-f64::MAX..-1e307, 1e307f64..f64::MAX).prop_map(|(a, c)| (a, c, c)),
    ]
}

// ── Membership Functions ─────────────────────────────────────────────

proptest! {
    /// Every shape maps every input into [0, 1].
    #[test]
    fn membership_in_unit_interval((a, b, c) in breakpoints(), x in any_crisp()) {
        let shapes = [
            MembershipFunction::falling(a, b).unwrap(),
            MembershipFunction::triangular(a, b, c).unwrap(),
            MembershipFunction::rising(b, c).unwrap(),
        ];
        for mf in &shapes {
            let mu = mf.evaluate(x);
            prop_assert!(!mu.is_nan(), "{} at {} is NaN", mf, x);
            prop_assert!((0.0..=1.0).contains(&mu), "{} at {} = {}", mf, x, mu);
        }
    }

    /// Triangular: 1 at the peak, 0 at both feet.
    #[test]
    fn triangular_vertices(a in -100.0f64..100.0, d1 in 1e-3f64..50.0, d2 in 1e-3f64..50.0) {
        let (b, c) = (a + d1, a + d1 + d2);
        let mf = MembershipFunction::triangular(a, b, c).unwrap();
        prop_assert_eq!(mf.evaluate(b), 1.0);
        prop_assert_eq!(mf.evaluate(a), 0.0);
        prop_assert_eq!(mf.evaluate(c), 0.0);
    }

    /// Falling and rising over the same breakpoints are complements.
    #[test]
    fn falling_complements_rising(a in -50.0f64..50.0, w in 1e-3f64..20.0, x in -100.0f64..100.0) {
        let fall = MembershipFunction::falling(a, a + w).unwrap();
        let rise = MembershipFunction::rising(a, a + w).unwrap();
        prop_assert!((fall.evaluate(x) + rise.evaluate(x) - 1.0).abs() < 1e-12);
    }

    /// Decreasing breakpoints are rejected at construction.
    #[test]
    fn decreasing_breakpoints_rejected(a in -50.0f64..50.0, d in 1e-6f64..10.0) {
        prop_assert!(MembershipFunction::falling(a, a - d).is_err());
        prop_assert!(MembershipFunction::rising(a, a - d).is_err());
        prop_assert!(MembershipFunction::triangular(a, a - d, a).is_err());
    }
}

// ── Domain Sampling ──────────────────────────────────────────────────

proptest! {
    /// Sample count follows floor((stop - start) / step) + 1 and samples
    /// stay inside [start, stop], strictly increasing.
    #[test]
    fn domain_samples_ordered_and_bounded(
        start in -100.0f64..100.0,
        span in 0.1f64..100.0,
        n in 1usize..500,
    ) {
        let stop = start + span;
        let step = span / n as f64;
        let d = Domain::new(start, stop, step).unwrap();
        prop_assert!(d.len() == n + 1 || d.len() == n, "len {} for n {}", d.len(), n);
        let xs: Vec<f64> = d.samples().collect();
        prop_assert_eq!(xs.len(), d.len());
        prop_assert_eq!(xs[0], start);
        for w in xs.windows(2) {
            prop_assert!(w[1] > w[0]);
        }
        prop_assert!(*xs.last().unwrap() <= stop);
    }
}

// ── Defuzzification ──────────────────────────────────────────────────

proptest! {
    /// Uniform positive rescaling leaves the centroid unchanged.
    #[test]
    fn centroid_scale_invariant(
        degrees in prop::collection::vec(0.0f64..1.0, 201),
        k in 1e-3f64..1.0,
    ) {
        let domain = Domain::new(-10.0, 10.0, 0.1).unwrap();
        let grid = domain.grid();
        prop_assume!(degrees.iter().sum::<f64>() > 1e-6);
        let set = FuzzySet::from_samples(degrees);
        let c1 = centroid(&grid, &set, "force").unwrap();
        let c2 = centroid(&grid, &set.scaled(k), "force").unwrap();
        prop_assert!((c1 - c2).abs() < 1e-9, "{} vs {}", c1, c2);
        prop_assert!((-10.0..=10.0).contains(&c1));
    }
}

// ── Inference ────────────────────────────────────────────────────────

proptest! {
    /// Inside the dead band neither rule fires: NoActivation, never NaN/Inf.
    #[test]
    fn dead_band_reports_no_activation(angle in prop_oneof![Just(0.0f64), Just(-0.0f64)]) {
        let engine = default_engine();
        let err = engine.infer(&inputs(&[("pole_angle", angle)])).unwrap_err();
        prop_assert!(err.is_no_activation());
        prop_assert_eq!(engine.infer_or(&inputs(&[("pole_angle", angle)]), 0.0).unwrap(), 0.0);
    }

    /// Any non-zero lean yields a finite force of matching sign.
    #[test]
    fn lean_sign_matches_force_sign(angle in prop_oneof![1e-6f64..720.0, -720.0f64..-1e-6]) {
        let engine = default_engine();
        let force = engine.infer(&inputs(&[("pole_angle", angle)])).unwrap();
        prop_assert!(force.is_finite());
        prop_assert!(force.signum() == angle.signum(), "angle {} force {}", angle, force);
        prop_assert!(force.abs() <= 10.0);
    }

    /// Mirrored rule base: infer(+x) == -infer(-x).
    #[test]
    fn two_rule_mirror_symmetry(x in 1e-4f64..2.0) {
        let engine = default_engine();
        let right = engine.infer(&inputs(&[("pole_angle", x)])).unwrap();
        let left = engine.infer(&inputs(&[("pole_angle", -x)])).unwrap();
        prop_assert!((right + left).abs() < 1e-9, "{} vs {}", right, left);
    }

    /// Two-input mirrored rule base with AND/OR/NOT and a weighted rule.
    #[test]
    fn angle_rate_mirror_symmetry(angle in -20.0f64..20.0, rate in -90.0f64..90.0) {
        let engine = angle_rate_engine();
        let a = engine.infer_or(&inputs(&[("pole_angle", angle), ("tip_velocity", rate)]), 0.0).unwrap();
        let b = engine.infer_or(&inputs(&[("pole_angle", -angle), ("tip_velocity", -rate)]), 0.0).unwrap();
        prop_assert!((a + b).abs() < 1e-9, "{} vs {}", a, b);
    }

    /// Rebuilding the configuration and replaying inputs is bit-identical.
    #[test]
    fn replay_is_bit_identical(seq in prop::collection::vec(-5.0f64..5.0, 1..20)) {
        let first = default_engine();
        let second = default_engine();
        for &angle in &seq {
            let a = first.infer_or(&inputs(&[("pole_angle", angle)]), 0.0).unwrap();
            let b = second.infer_or(&inputs(&[("pole_angle", angle)]), 0.0).unwrap();
            prop_assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
