use super::closed_form::{self, round2};
use super::{OracleError, ThermoOracle};
use tracing::debug;

/// Structure calculations are only meaningful from this length on.
pub const MIN_STRUCTURE_LENGTH: usize = 4;

/// Uniform front for any [`ThermoOracle`].
///
/// Degenerate input never reaches the oracle; non-finite oracle output is reported as
/// [`OracleError::NonFinite`]; values are rounded to two decimals.
#[derive(Clone, Copy)]
pub struct ThermoAdapter<'a> {
    oracle: &'a dyn ThermoOracle,
}

fn finite(value: f64, quantity: &'static str) -> Result<f64, OracleError> {
    if value.is_finite() {
        Ok(round2(value))
    } else {
        Err(OracleError::NonFinite(quantity))
    }
}

impl<'a> ThermoAdapter<'a> {
    pub fn new(oracle: &'a dyn ThermoOracle) -> Self {
        Self { oracle }
    }

    pub fn tm(&self, sequence: &str) -> Result<f64, OracleError> {
        if sequence.is_empty() {
            return Ok(0.0);
        }
        finite(self.oracle.tm(&sequence.to_ascii_uppercase())?, "tm")
    }

    pub fn gc_percent(&self, sequence: &str) -> Result<f64, OracleError> {
        if sequence.is_empty() {
            return Ok(0.0);
        }
        finite(
            self.oracle.gc_percent(&sequence.to_ascii_uppercase())?,
            "gc",
        )
    }

    pub fn hairpin_dg(&self, sequence: &str) -> Result<f64, OracleError> {
        if sequence.len() < MIN_STRUCTURE_LENGTH {
            return Ok(0.0);
        }
        finite(
            self.oracle.hairpin_dg(&sequence.to_ascii_uppercase())?,
            "hairpin",
        )
    }

    pub fn self_dimer_dg(&self, sequence: &str) -> Result<f64, OracleError> {
        if sequence.len() < MIN_STRUCTURE_LENGTH {
            return Ok(0.0);
        }
        finite(
            self.oracle.homodimer_dg(&sequence.to_ascii_uppercase())?,
            "self-dimer",
        )
    }

    pub fn cross_dimer_dg(&self, first: &str, second: &str) -> Result<f64, OracleError> {
        if first.is_empty() || second.is_empty() {
            return Ok(0.0);
        }
        finite(
            self.oracle.heterodimer_dg(
                &first.to_ascii_uppercase(),
                &second.to_ascii_uppercase(),
            )?,
            "cross-dimer",
        )
    }

    pub fn tm_or_fallback(&self, sequence: &str) -> f64 {
        self.tm(sequence).unwrap_or_else(|err| {
            debug!(error = %err, "Oracle Tm unavailable; using closed-form estimate.");
            closed_form::tm(sequence)
        })
    }

    pub fn gc_or_fallback(&self, sequence: &str) -> f64 {
        self.gc_percent(sequence).unwrap_or_else(|err| {
            debug!(error = %err, "Oracle GC unavailable; counting bases instead.");
            closed_form::gc_percent(sequence)
        })
    }
}
