//! # Composite Scoring
//!
//! Produces one fitness value in `[0, 100]` per primer pair from independent, capped
//! components whose maxima come from a named [`ScoringPolicy`]:
//!
//! | Component | `probe-aware` | `primer-only` |
//! |---|---|---|
//! | Tm | 25 | 25 |
//! | GC | 15 | 15 |
//! | Structure | 20 | 30 |
//! | 3′ end | 10 | 20 |
//! | Product size | 5 | 10 |
//! | Probe | 25 | - |
//!
//! The composite is the sum of the populated components clamped to `[0, 100]` and rounded to
//! one decimal. [`score`] returns the composite together with its itemized
//! [`ScoreBreakdown`] from the same computation, so the two can never disagree.
//!
//! Scoring never fails: any pair, however pathological, receives a score in range.

pub mod components;
pub mod policy;

pub use policy::{ScoringPolicy, WeightTable};

use crate::core::models::pair::PrimerPair;
use crate::engine::config::QcThresholds;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub tm: f64,
    pub gc: f64,
    pub structure: f64,
    pub three_prime: f64,
    pub product: f64,
    /// Absent when the policy has no probe component.
    pub probe: Option<f64>,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> f64 {
        self.tm
            + self.gc
            + self.structure
            + self.three_prime
            + self.product
            + self.probe.unwrap_or(0.0)
    }

    /// Every component rounded to one decimal, for display.
    pub fn rounded(&self) -> Self {
        Self {
            tm: round1(self.tm),
            gc: round1(self.gc),
            structure: round1(self.structure),
            three_prime: round1(self.three_prime),
            product: round1(self.product),
            probe: self.probe.map(round1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub composite: f64,
    pub breakdown: ScoreBreakdown,
}

#[inline]
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn score(pair: &PrimerPair, thresholds: &QcThresholds, policy: &ScoringPolicy) -> ScoreCard {
    let w = policy.weights();
    let breakdown = ScoreBreakdown {
        tm: components::tm_score(pair, thresholds, w.tm),
        gc: components::gc_score(pair, thresholds, w.gc),
        structure: components::structure_score(pair, thresholds, w.structure),
        three_prime: components::three_prime_score(pair, thresholds, w.three_prime),
        product: components::product_score(pair, thresholds, w.product),
        probe: w
            .probe
            .map(|max| components::probe_score(pair, thresholds, max)),
    };
    let total = breakdown.sum();
    let composite = if total.is_finite() {
        round1(total.clamp(0.0, policy::MAX_TOTAL))
    } else {
        0.0
    };
    ScoreCard {
        composite,
        breakdown,
    }
}

pub fn composite_score(
    pair: &PrimerPair,
    thresholds: &QcThresholds,
    policy: &ScoringPolicy,
) -> f64 {
    score(pair, thresholds, policy).composite
}

/// Stores the composite score on every pair; pairs are scored independently.
pub fn score_pairs(pairs: &mut [PrimerPair], thresholds: &QcThresholds, policy: &ScoringPolicy) {
    #[cfg(not(feature = "parallel"))]
    let iterator = pairs.iter_mut();

    #[cfg(feature = "parallel")]
    let iterator = pairs.par_iter_mut();

    iterator.for_each(|pair| {
        pair.composite_score = composite_score(pair, thresholds, policy);
    });
}
