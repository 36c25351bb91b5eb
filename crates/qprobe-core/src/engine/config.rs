use super::scoring::policy::ScoringPolicy;
use crate::core::generator::{InternalOligoConstraints, PairConstraints};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Poly-X limit handed to the generator for both primers and internal oligos.
pub const GENERATOR_MAX_POLY_X: usize = 4;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Parameter '{name}' must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("Band '{name}' is inverted: expected {lower} <= {upper}")]
    InvertedBand {
        name: &'static str,
        lower: f64,
        upper: f64,
    },

    #[error("Warning band '{name}' must enclose its acceptance band")]
    WarnBandTooNarrow { name: &'static str },

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("Scoring policy '{name}' is invalid: {reason}")]
    InvalidPolicy { name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeThresholds {
    pub tm_delta_ideal_min: f64,
    pub tm_delta_ideal_max: f64,
    pub tm_delta_min: f64,
    pub tm_delta_max: f64,
    pub gc_min: f64,
    pub gc_max: f64,
    pub gc_warn_min: f64,
    pub gc_warn_max: f64,
    pub length_min: usize,
    pub length_max: usize,
    /// Runs of this many identical bases or more are rejected.
    pub max_homopolymer: usize,
    pub near_offset: usize,
    pub far_offset: usize,
}

impl Default for ProbeThresholds {
    fn default() -> Self {
        Self {
            tm_delta_ideal_min: 8.0,
            tm_delta_ideal_max: 10.0,
            tm_delta_min: 6.0,
            tm_delta_max: 12.0,
            gc_min: 30.0,
            gc_max: 80.0,
            gc_warn_min: 25.0,
            gc_warn_max: 85.0,
            length_min: 20,
            length_max: 30,
            max_homopolymer: 4,
            near_offset: 5,
            far_offset: 15,
        }
    }
}

impl ProbeThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("probe.tm_delta_ideal_min", self.tm_delta_ideal_min)?;
        finite("probe.tm_delta_ideal_max", self.tm_delta_ideal_max)?;
        finite("probe.tm_delta_min", self.tm_delta_min)?;
        finite("probe.tm_delta_max", self.tm_delta_max)?;
        ordered(
            "probe.tm_delta_ideal",
            self.tm_delta_ideal_min,
            self.tm_delta_ideal_max,
        )?;
        enclosed(
            "probe.tm_delta",
            (self.tm_delta_ideal_min, self.tm_delta_ideal_max),
            (self.tm_delta_min, self.tm_delta_max),
        )?;

        finite("probe.gc_min", self.gc_min)?;
        finite("probe.gc_max", self.gc_max)?;
        finite("probe.gc_warn_min", self.gc_warn_min)?;
        finite("probe.gc_warn_max", self.gc_warn_max)?;
        ordered("probe.gc", self.gc_min, self.gc_max)?;
        enclosed(
            "probe.gc_warn",
            (self.gc_min, self.gc_max),
            (self.gc_warn_min, self.gc_warn_max),
        )?;

        if self.length_min == 0 {
            return Err(invalid("probe.length_min", "must be at least 1"));
        }
        ordered(
            "probe.length",
            self.length_min as f64,
            self.length_max as f64,
        )?;
        if self.max_homopolymer < 2 {
            return Err(invalid(
                "probe.max_homopolymer",
                "must be at least 2 to detect a run",
            ));
        }
        ordered(
            "probe.offsets",
            self.near_offset as f64,
            self.far_offset as f64,
        )?;
        Ok(())
    }
}

/// Every acceptance band used by QC classification and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcThresholds {
    pub tm_optimal: f64,
    pub tm_min: f64,
    pub tm_max: f64,
    pub tm_warn_min: f64,
    pub tm_warn_max: f64,

    pub tm_diff_max: f64,
    pub tm_diff_warn: f64,

    pub gc_optimal: f64,
    pub gc_min: f64,
    pub gc_max: f64,
    pub gc_warn_min: f64,
    pub gc_warn_max: f64,

    pub length_min: usize,
    pub length_optimal: usize,
    pub length_max: usize,

    /// ΔG ceilings in kcal/mol: values above `*_max` pass, values above `*_warn` warn.
    pub hairpin_dg_max: f64,
    pub hairpin_dg_warn: f64,
    pub self_dimer_dg_max: f64,
    pub self_dimer_dg_warn: f64,
    pub cross_dimer_dg_max: f64,
    pub cross_dimer_dg_warn: f64,

    pub preferred_3prime: Vec<char>,
    pub avoid_3prime: Vec<char>,

    pub product_min: usize,
    pub product_optimal: usize,
    pub product_max: usize,
    pub product_warn_min: usize,
    pub product_warn_max: usize,

    pub probe: ProbeThresholds,
}

impl Default for QcThresholds {
    fn default() -> Self {
        Self {
            tm_optimal: 60.0,
            tm_min: 58.0,
            tm_max: 62.0,
            tm_warn_min: 55.0,
            tm_warn_max: 65.0,
            tm_diff_max: 2.0,
            tm_diff_warn: 4.0,
            gc_optimal: 50.0,
            gc_min: 40.0,
            gc_max: 60.0,
            gc_warn_min: 30.0,
            gc_warn_max: 70.0,
            length_min: 18,
            length_optimal: 20,
            length_max: 25,
            hairpin_dg_max: -2.0,
            hairpin_dg_warn: -4.0,
            self_dimer_dg_max: -9.0,
            self_dimer_dg_warn: -12.0,
            cross_dimer_dg_max: -9.0,
            cross_dimer_dg_warn: -12.0,
            preferred_3prime: vec!['G', 'C'],
            avoid_3prime: vec!['T'],
            product_min: 70,
            product_optimal: 100,
            product_max: 200,
            product_warn_min: 50,
            product_warn_max: 300,
            probe: ProbeThresholds::default(),
        }
    }
}

impl QcThresholds {
    pub fn builder() -> QcThresholdsBuilder {
        QcThresholdsBuilder::new()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("tm_optimal", self.tm_optimal),
            ("tm_min", self.tm_min),
            ("tm_max", self.tm_max),
            ("tm_warn_min", self.tm_warn_min),
            ("tm_warn_max", self.tm_warn_max),
            ("tm_diff_max", self.tm_diff_max),
            ("tm_diff_warn", self.tm_diff_warn),
            ("gc_optimal", self.gc_optimal),
            ("gc_min", self.gc_min),
            ("gc_max", self.gc_max),
            ("gc_warn_min", self.gc_warn_min),
            ("gc_warn_max", self.gc_warn_max),
            ("hairpin_dg_max", self.hairpin_dg_max),
            ("hairpin_dg_warn", self.hairpin_dg_warn),
            ("self_dimer_dg_max", self.self_dimer_dg_max),
            ("self_dimer_dg_warn", self.self_dimer_dg_warn),
            ("cross_dimer_dg_max", self.cross_dimer_dg_max),
            ("cross_dimer_dg_warn", self.cross_dimer_dg_warn),
        ] {
            finite(name, value)?;
        }

        ordered("tm", self.tm_min, self.tm_optimal)?;
        ordered("tm", self.tm_optimal, self.tm_max)?;
        enclosed(
            "tm_warn",
            (self.tm_min, self.tm_max),
            (self.tm_warn_min, self.tm_warn_max),
        )?;

        if self.tm_diff_max < 0.0 {
            return Err(invalid("tm_diff_max", "must not be negative"));
        }
        if self.tm_diff_warn <= 0.0 {
            return Err(invalid("tm_diff_warn", "must be positive"));
        }
        ordered("tm_diff", self.tm_diff_max, self.tm_diff_warn)?;

        ordered("gc", self.gc_min, self.gc_optimal)?;
        ordered("gc", self.gc_optimal, self.gc_max)?;
        enclosed(
            "gc_warn",
            (self.gc_min, self.gc_max),
            (self.gc_warn_min, self.gc_warn_max),
        )?;

        if self.length_min == 0 {
            return Err(invalid("length_min", "must be at least 1"));
        }
        ordered(
            "length",
            self.length_min as f64,
            self.length_optimal as f64,
        )?;
        ordered(
            "length",
            self.length_optimal as f64,
            self.length_max as f64,
        )?;

        ordered("hairpin_dg", self.hairpin_dg_warn, self.hairpin_dg_max)?;
        ordered(
            "self_dimer_dg",
            self.self_dimer_dg_warn,
            self.self_dimer_dg_max,
        )?;
        ordered(
            "cross_dimer_dg",
            self.cross_dimer_dg_warn,
            self.cross_dimer_dg_max,
        )?;

        ordered(
            "product",
            self.product_min as f64,
            self.product_optimal as f64,
        )?;
        ordered(
            "product",
            self.product_optimal as f64,
            self.product_max as f64,
        )?;
        enclosed(
            "product_warn",
            (self.product_min as f64, self.product_max as f64),
            (self.product_warn_min as f64, self.product_warn_max as f64),
        )?;

        self.probe.validate()
    }

    pub fn is_preferred_3prime(&self, base: char) -> bool {
        self.preferred_3prime.contains(&base.to_ascii_uppercase())
    }

    pub fn is_avoided_3prime(&self, base: char) -> bool {
        self.avoid_3prime.contains(&base.to_ascii_uppercase())
    }

    /// Generator constraints for the pair search derived from these thresholds.
    pub fn pair_constraints(&self, num_return: usize) -> PairConstraints {
        PairConstraints {
            size_min: self.length_min,
            size_opt: self.length_optimal,
            size_max: self.length_max,
            tm_min: self.tm_min,
            tm_opt: self.tm_optimal,
            tm_max: self.tm_max,
            gc_min: self.gc_min,
            gc_max: self.gc_max,
            max_poly_x: GENERATOR_MAX_POLY_X,
            product_min: self.product_min,
            product_max: self.product_max,
            num_return,
        }
    }
}

#[derive(Default)]
pub struct QcThresholdsBuilder {
    thresholds: QcThresholds,
}

impl QcThresholdsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tm(mut self, min: f64, optimal: f64, max: f64) -> Self {
        self.thresholds.tm_min = min;
        self.thresholds.tm_optimal = optimal;
        self.thresholds.tm_max = max;
        self
    }
    pub fn tm_warn(mut self, min: f64, max: f64) -> Self {
        self.thresholds.tm_warn_min = min;
        self.thresholds.tm_warn_max = max;
        self
    }
    pub fn tm_difference(mut self, max: f64, warn: f64) -> Self {
        self.thresholds.tm_diff_max = max;
        self.thresholds.tm_diff_warn = warn;
        self
    }
    pub fn gc(mut self, min: f64, optimal: f64, max: f64) -> Self {
        self.thresholds.gc_min = min;
        self.thresholds.gc_optimal = optimal;
        self.thresholds.gc_max = max;
        self
    }
    pub fn gc_warn(mut self, min: f64, max: f64) -> Self {
        self.thresholds.gc_warn_min = min;
        self.thresholds.gc_warn_max = max;
        self
    }
    pub fn primer_length(mut self, min: usize, optimal: usize, max: usize) -> Self {
        self.thresholds.length_min = min;
        self.thresholds.length_optimal = optimal;
        self.thresholds.length_max = max;
        self
    }
    pub fn hairpin_dg(mut self, max: f64, warn: f64) -> Self {
        self.thresholds.hairpin_dg_max = max;
        self.thresholds.hairpin_dg_warn = warn;
        self
    }
    pub fn self_dimer_dg(mut self, max: f64, warn: f64) -> Self {
        self.thresholds.self_dimer_dg_max = max;
        self.thresholds.self_dimer_dg_warn = warn;
        self
    }
    pub fn cross_dimer_dg(mut self, max: f64, warn: f64) -> Self {
        self.thresholds.cross_dimer_dg_max = max;
        self.thresholds.cross_dimer_dg_warn = warn;
        self
    }
    pub fn three_prime_bases(mut self, preferred: Vec<char>, avoided: Vec<char>) -> Self {
        self.thresholds.preferred_3prime = uppercase(preferred);
        self.thresholds.avoid_3prime = uppercase(avoided);
        self
    }
    pub fn product_size(mut self, min: usize, optimal: usize, max: usize) -> Self {
        self.thresholds.product_min = min;
        self.thresholds.product_optimal = optimal;
        self.thresholds.product_max = max;
        self
    }
    pub fn product_warn(mut self, min: usize, max: usize) -> Self {
        self.thresholds.product_warn_min = min;
        self.thresholds.product_warn_max = max;
        self
    }
    pub fn probe(mut self, probe: ProbeThresholds) -> Self {
        self.thresholds.probe = probe;
        self
    }

    pub fn build(self) -> Result<QcThresholds, ConfigError> {
        self.thresholds.validate()?;
        Ok(self.thresholds)
    }
}

/// Parameters of the probe placement search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSearchConfig {
    pub min_length: usize,
    pub max_length: usize,
    /// Bases kept clear of each primer on both sides of the search region.
    pub margin: usize,
    /// Target probe Tm above the primer average, in °C.
    pub target_tm_delta: f64,
    /// Lower Tm-delta bound of the relaxed primary retry.
    pub relaxed_tm_delta_min: f64,
    pub max_internal_proposals: usize,
}

impl Default for ProbeSearchConfig {
    fn default() -> Self {
        Self {
            min_length: 20,
            max_length: 30,
            margin: 2,
            target_tm_delta: 9.0,
            relaxed_tm_delta_min: 4.0,
            max_internal_proposals: 5,
        }
    }
}

impl ProbeSearchConfig {
    /// Smallest gap between the primers that can hold a probe plus both margins.
    pub fn min_gap(&self) -> usize {
        self.min_length + 2 * self.margin
    }

    pub fn validate(&self, probe: &ProbeThresholds) -> Result<(), ConfigError> {
        if self.min_length == 0 {
            return Err(invalid("probe_search.min_length", "must be at least 1"));
        }
        ordered(
            "probe_search.length",
            self.min_length as f64,
            self.max_length as f64,
        )?;
        finite("probe_search.target_tm_delta", self.target_tm_delta)?;
        finite(
            "probe_search.relaxed_tm_delta_min",
            self.relaxed_tm_delta_min,
        )?;
        ordered(
            "probe_search.relaxed_tm_delta",
            self.relaxed_tm_delta_min,
            probe.tm_delta_min,
        )?;
        ordered(
            "probe_search.target_tm_delta",
            probe.tm_delta_min,
            self.target_tm_delta,
        )?;
        ordered(
            "probe_search.target_tm_delta",
            self.target_tm_delta,
            probe.tm_delta_max,
        )?;
        if self.max_internal_proposals == 0 {
            return Err(invalid(
                "probe_search.max_internal_proposals",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    pub(crate) fn internal_constraints(
        &self,
        tm_min: f64,
        tm_opt: f64,
        tm_max: f64,
        probe: &ProbeThresholds,
    ) -> InternalOligoConstraints {
        InternalOligoConstraints {
            size_min: self.min_length,
            size_opt: (self.min_length + self.max_length) / 2,
            size_max: self.max_length,
            tm_min,
            tm_opt,
            tm_max,
            gc_min: probe.gc_min,
            gc_max: probe.gc_max,
            max_poly_x: GENERATOR_MAX_POLY_X,
            num_return: self.max_internal_proposals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignConfig {
    pub thresholds: QcThresholds,
    pub probe_search: ProbeSearchConfig,
    pub scoring_policy: ScoringPolicy,
    /// Number of ranked primer pairs kept per target.
    pub num_pairs: usize,
    pub design_probes: bool,
    /// Upper bound on worker threads; `None` uses the global pool.
    pub max_concurrency: Option<usize>,
}

impl DesignConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        self.probe_search.validate(&self.thresholds.probe)?;
        self.scoring_policy.validate()?;
        if self.num_pairs == 0 {
            return Err(invalid("num_pairs", "must be at least 1"));
        }
        if self.max_concurrency == Some(0) {
            return Err(invalid("max_concurrency", "must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct DesignConfigBuilder {
    thresholds: Option<QcThresholds>,
    probe_search: Option<ProbeSearchConfig>,
    scoring_policy: Option<ScoringPolicy>,
    num_pairs: Option<usize>,
    design_probes: Option<bool>,
    max_concurrency: Option<usize>,
}

impl DesignConfigBuilder {
    pub const DEFAULT_NUM_PAIRS: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn thresholds(mut self, thresholds: QcThresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }
    pub fn probe_search(mut self, config: ProbeSearchConfig) -> Self {
        self.probe_search = Some(config);
        self
    }
    pub fn scoring_policy(mut self, policy: ScoringPolicy) -> Self {
        self.scoring_policy = Some(policy);
        self
    }
    pub fn num_pairs(mut self, n: usize) -> Self {
        self.num_pairs = Some(n);
        self
    }
    pub fn design_probes(mut self, enabled: bool) -> Self {
        self.design_probes = Some(enabled);
        self
    }
    pub fn max_concurrency(mut self, threads: usize) -> Self {
        self.max_concurrency = Some(threads);
        self
    }

    pub fn build(self) -> Result<DesignConfig, ConfigError> {
        let config = DesignConfig {
            thresholds: self.thresholds.unwrap_or_default(),
            probe_search: self.probe_search.unwrap_or_default(),
            scoring_policy: self.scoring_policy.unwrap_or_default(),
            num_pairs: self.num_pairs.unwrap_or(Self::DEFAULT_NUM_PAIRS),
            design_probes: self.design_probes.unwrap_or(true),
            max_concurrency: self.max_concurrency,
        };
        config.validate()?;
        Ok(config)
    }
}

fn uppercase(bases: Vec<char>) -> Vec<char> {
    bases.into_iter().map(|b| b.to_ascii_uppercase()).collect()
}

fn invalid(name: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        reason: reason.to_string(),
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

fn ordered(name: &'static str, lower: f64, upper: f64) -> Result<(), ConfigError> {
    if lower <= upper {
        Ok(())
    } else {
        Err(ConfigError::InvertedBand { name, lower, upper })
    }
}

fn enclosed(name: &'static str, inner: (f64, f64), outer: (f64, f64)) -> Result<(), ConfigError> {
    ordered(name, outer.0, outer.1)?;
    if outer.0 <= inner.0 && inner.1 <= outer.1 {
        Ok(())
    } else {
        Err(ConfigError::WarnBandTooNarrow { name })
    }
}
