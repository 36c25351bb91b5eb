use super::{OracleError, ThermoOracle};
use crate::core::sequence;

/// Oligos shorter than this use the Wallace rule; longer ones the GC-adjusted formula.
pub const WALLACE_MAX_LENGTH: usize = 14;

#[inline]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Closed-form melting temperature:
/// `2(A+T) + 4(G+C)` below 14 nt, `64.9 + 41(G+C − 16.4)/N` otherwise.
pub fn tm(sequence: &str) -> f64 {
    let length = sequence.len();
    if length == 0 {
        return 0.0;
    }
    let (mut at, mut gc) = (0usize, 0usize);
    for base in sequence.bytes() {
        match base.to_ascii_uppercase() {
            b'A' | b'T' => at += 1,
            b'G' | b'C' => gc += 1,
            _ => {}
        }
    }
    if length < WALLACE_MAX_LENGTH {
        (2 * at + 4 * gc) as f64
    } else {
        round2(64.9 + 41.0 * (gc as f64 - 16.4) / length as f64)
    }
}

pub fn gc_percent(sequence: &str) -> f64 {
    round2(sequence::gc_percent(sequence))
}

/// Approximates ΔG (kcal/mol) from a secondary-structure melting temperature as reported by
/// constraint-based primer generators: `ΔG ≈ −(Tm − 25)·0.3`, zero when no structure is
/// reported.
pub fn dg_from_structure_tm(structure_tm: f64) -> f64 {
    if structure_tm <= 0.0 || !structure_tm.is_finite() {
        return 0.0;
    }
    -((structure_tm - 25.0) * 0.3)
}

/// An oracle that only knows the closed-form formulas; free-energy queries are unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedFormOracle;

impl ThermoOracle for ClosedFormOracle {
    fn tm(&self, sequence: &str) -> Result<f64, OracleError> {
        Ok(tm(sequence))
    }

    fn gc_percent(&self, sequence: &str) -> Result<f64, OracleError> {
        Ok(gc_percent(sequence))
    }

    fn hairpin_dg(&self, _sequence: &str) -> Result<f64, OracleError> {
        Err(OracleError::Unsupported("hairpin"))
    }

    fn homodimer_dg(&self, _sequence: &str) -> Result<f64, OracleError> {
        Err(OracleError::Unsupported("self-dimer"))
    }

    fn heterodimer_dg(&self, _first: &str, _second: &str) -> Result<f64, OracleError> {
        Err(OracleError::Unsupported("cross-dimer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallace_rule_applies_to_short_oligos() {
        assert_eq!(tm("ACGT"), 12.0);
        assert_eq!(tm("AAAAAAAAAAAAA"), 26.0);
        assert_eq!(tm(""), 0.0);
    }

    #[test]
    fn gc_adjusted_formula_applies_from_fourteen_bases() {
        // 20 nt, 10 G/C: 64.9 + 41 * (10 - 16.4) / 20 = 51.78
        assert!((tm("ACGTACGTACGTACGTACGT") - 51.78).abs() < 1e-9);
    }

    #[test]
    fn gc_percent_is_rounded_to_two_decimals() {
        assert_eq!(gc_percent("GCA"), 66.67);
    }

    #[test]
    fn structure_tm_conversion() {
        assert_eq!(dg_from_structure_tm(0.0), 0.0);
        assert!((dg_from_structure_tm(45.0) + 6.0).abs() < 1e-9);
        assert_eq!(dg_from_structure_tm(f64::NAN), 0.0);
    }

    #[test]
    fn closed_form_oracle_declines_free_energies() {
        let oracle = ClosedFormOracle;
        assert_eq!(oracle.tm("ACGT"), Ok(12.0));
        assert_eq!(
            oracle.hairpin_dg("ACGTACGT"),
            Err(OracleError::Unsupported("hairpin"))
        );
        assert!(oracle.heterodimer_dg("ACGT", "TTTT").is_err());
    }
}
