//! # Thermodynamics Module
//!
//! The boundary between qprobe and the external nearest-neighbour thermodynamics oracle.
//!
//! ## Overview
//!
//! The oracle is best-effort enrichment: it may be unavailable, time out, or not support a
//! given calculation. Every query therefore returns an explicit `Result`, and callers decide
//! visibly what to do on failure:
//!
//! - melting temperature and GC content fall back to the closed-form formulas in
//!   [`closed_form`] (`ThermoAdapter::tm_or_fallback`, `ThermoAdapter::gc_or_fallback`);
//! - free energies are replaced by the neutral value `0.0` through [`OrNeutral`], i.e.
//!   "no structure detected".
//!
//! ## Components
//!
//! - [`ThermoOracle`] - The trait an oracle implementation provides
//! - [`adapter::ThermoAdapter`] - Degenerate-input short-circuits, unit normalization and
//!   finiteness checks in front of any oracle
//! - [`closed_form`] - Wallace-rule Tm, GC counting and a structure-Tm to ΔG conversion

pub mod adapter;
pub mod closed_form;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OracleError {
    #[error("Thermodynamics oracle is unavailable")]
    Unavailable,
    #[error("Oracle does not support {0} calculations")]
    Unsupported(&'static str),
    #[error("Oracle call timed out")]
    Timeout,
    #[error("Oracle returned a non-finite value for {0}")]
    NonFinite(&'static str),
    #[error("Oracle call failed: {0}")]
    Failed(String),
}

/// An external thermodynamics oracle. Temperatures are in °C, free energies in kcal/mol.
///
/// Implementations must be deterministic and side-effect free; the probe search issues
/// independent calls from several threads.
pub trait ThermoOracle: Send + Sync {
    fn tm(&self, sequence: &str) -> Result<f64, OracleError>;

    fn gc_percent(&self, sequence: &str) -> Result<f64, OracleError> {
        Ok(crate::core::sequence::gc_percent(sequence))
    }

    fn hairpin_dg(&self, sequence: &str) -> Result<f64, OracleError>;

    fn homodimer_dg(&self, sequence: &str) -> Result<f64, OracleError>;

    fn heterodimer_dg(&self, first: &str, second: &str) -> Result<f64, OracleError>;
}

/// Substitutes the neutral value for a failed free-energy query.
pub trait OrNeutral {
    fn or_neutral(self, quantity: &'static str) -> f64;
}

impl OrNeutral for Result<f64, OracleError> {
    fn or_neutral(self, quantity: &'static str) -> f64 {
        match self {
            Ok(value) => value,
            Err(err) => {
                debug!(quantity, error = %err, "Oracle query failed; using neutral value.");
                0.0
            }
        }
    }
}
