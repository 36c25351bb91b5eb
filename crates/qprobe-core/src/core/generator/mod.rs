//! # Primer Generator Module
//!
//! The interface to the external constrained primer generator. The generator proposes
//! forward/reverse primer pairs for a template and, in internal-oligo mode, hybridization
//! probe candidates for a sub-region. qprobe never enumerates primers itself; it enriches,
//! scores and ranks what the generator proposes.
//!
//! Generator failures are never fatal. Callers turn them into an empty proposal list with
//! [`OrEmpty::or_empty`], which logs the failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("Primer generator is unavailable")]
    Unavailable,
    #[error("Primer generator does not support {0}")]
    Unsupported(&'static str),
    #[error("Primer generator failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairConstraints {
    pub size_min: usize,
    pub size_opt: usize,
    pub size_max: usize,
    pub tm_min: f64,
    pub tm_opt: f64,
    pub tm_max: f64,
    pub gc_min: f64,
    pub gc_max: f64,
    pub max_poly_x: usize,
    pub product_min: usize,
    pub product_max: usize,
    pub num_return: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalOligoConstraints {
    pub size_min: usize,
    pub size_opt: usize,
    pub size_max: usize,
    pub tm_min: f64,
    pub tm_opt: f64,
    pub tm_max: f64,
    pub gc_min: f64,
    pub gc_max: f64,
    pub max_poly_x: usize,
    pub num_return: usize,
}

/// One primer as proposed by the generator. `start` is a template coordinate; optional
/// values are generator-side thermodynamics used in preference to oracle calls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OligoSite {
    pub sequence: String,
    pub start: usize,
    #[serde(default)]
    pub tm: Option<f64>,
    #[serde(default)]
    pub gc_percent: Option<f64>,
    /// Melting temperature of the strongest hairpin, as reported by the generator.
    #[serde(default)]
    pub hairpin_tm: Option<f64>,
    /// Melting temperature of the strongest self-dimer, as reported by the generator.
    #[serde(default)]
    pub self_dimer_tm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairProposal {
    pub forward: OligoSite,
    pub reverse: OligoSite,
    pub product_size: usize,
    #[serde(default)]
    pub cross_dimer_tm: Option<f64>,
}

/// An internal-oligo candidate. `position` is relative to the queried region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalOligoProposal {
    pub sequence: String,
    pub position: usize,
    #[serde(default)]
    pub tm: Option<f64>,
    #[serde(default)]
    pub gc_percent: Option<f64>,
}

pub trait PrimerGenerator: Send + Sync {
    fn design(
        &self,
        template: &str,
        constraints: &PairConstraints,
    ) -> Result<Vec<PairProposal>, GeneratorError>;

    fn design_internal(
        &self,
        _region: &str,
        _constraints: &InternalOligoConstraints,
    ) -> Result<Vec<InternalOligoProposal>, GeneratorError> {
        Err(GeneratorError::Unsupported("internal oligo design"))
    }
}

pub trait OrEmpty<T> {
    fn or_empty(self, operation: &'static str) -> Vec<T>;
}

impl<T> OrEmpty<T> for Result<Vec<T>, GeneratorError> {
    fn or_empty(self, operation: &'static str) -> Vec<T> {
        match self {
            Ok(proposals) => proposals,
            Err(err) => {
                warn!(operation, error = %err, "Primer generator failed; treating as no proposals.");
                Vec::new()
            }
        }
    }
}
