// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Control
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Control loop around the fuzzy engine.
//!
//! Control cycle, plant interface and reference cart-pole, operator signal
//! sources, telemetry, paced session driver.

pub mod cycle;
pub mod plant;
pub mod realtime;
pub mod signals;
pub mod telemetry;
