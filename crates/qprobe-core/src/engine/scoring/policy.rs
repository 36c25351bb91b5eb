use crate::engine::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Upper bound on the sum of all component maxima.
pub const MAX_TOTAL: f64 = 100.0;

/// Maximum points per score component. `probe: None` removes the probe component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightTable {
    pub tm: f64,
    pub gc: f64,
    pub structure: f64,
    pub three_prime: f64,
    pub product: f64,
    #[serde(default)]
    pub probe: Option<f64>,
}

impl WeightTable {
    pub fn total(&self) -> f64 {
        self.tm
            + self.gc
            + self.structure
            + self.three_prime
            + self.product
            + self.probe.unwrap_or(0.0)
    }
}

/// A named weighting table for the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    name: String,
    weights: WeightTable,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::probe_aware()
    }
}

impl ScoringPolicy {
    pub const PROBE_AWARE: &'static str = "probe-aware";
    pub const PRIMER_ONLY: &'static str = "primer-only";

    /// Primer sub-scores plus a 25-point probe component.
    pub fn probe_aware() -> Self {
        Self {
            name: Self::PROBE_AWARE.to_string(),
            weights: WeightTable {
                tm: 25.0,
                gc: 15.0,
                structure: 20.0,
                three_prime: 10.0,
                product: 5.0,
                probe: Some(25.0),
            },
        }
    }

    /// Primer-only weighting: heavier structure, 3′ end and product terms, no probe term.
    pub fn primer_only() -> Self {
        Self {
            name: Self::PRIMER_ONLY.to_string(),
            weights: WeightTable {
                tm: 25.0,
                gc: 15.0,
                structure: 30.0,
                three_prime: 20.0,
                product: 10.0,
                probe: None,
            },
        }
    }

    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            Self::PROBE_AWARE => Ok(Self::probe_aware()),
            Self::PRIMER_ONLY => Ok(Self::primer_only()),
            other => Err(ConfigError::InvalidPolicy {
                name: other.to_string(),
                reason: format!(
                    "unknown preset; expected '{}' or '{}'",
                    Self::PROBE_AWARE,
                    Self::PRIMER_ONLY
                ),
            }),
        }
    }

    pub fn custom(name: &str, weights: WeightTable) -> Result<Self, ConfigError> {
        let policy = Self {
            name: name.to_string(),
            weights,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn scores_probe(&self) -> bool {
        self.weights.probe.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        let components = [
            ("tm", w.tm),
            ("gc", w.gc),
            ("structure", w.structure),
            ("three_prime", w.three_prime),
            ("product", w.product),
            ("probe", w.probe.unwrap_or(0.0)),
        ];
        for (component, value) in components {
            if !value.is_finite() || value < 0.0 {
                return Err(self.invalid(format!(
                    "weight '{}' must be finite and non-negative, got {}",
                    component, value
                )));
            }
        }
        if w.total() > MAX_TOTAL {
            return Err(self.invalid(format!(
                "weights sum to {}, above the {} point scale",
                w.total(),
                MAX_TOTAL
            )));
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> ConfigError {
        ConfigError::InvalidPolicy {
            name: self.name.clone(),
            reason,
        }
    }
}
