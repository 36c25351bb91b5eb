use crate::core::generator::{OligoSite, PairProposal};
use crate::core::models::pair::PrimerPair;
use crate::core::models::primer::Primer;
use crate::core::models::probe::Probe;
use crate::core::thermo::OrNeutral;
use crate::core::thermo::adapter::ThermoAdapter;
use crate::core::thermo::closed_form::dg_from_structure_tm;

/// Computes every thermodynamic property of a primer through the adapter.
pub fn analyze_primer(primer: &mut Primer, adapter: &ThermoAdapter) {
    primer.tm = adapter.tm_or_fallback(&primer.sequence);
    primer.gc_percent = adapter.gc_or_fallback(&primer.sequence);
    primer.hairpin_dg = adapter.hairpin_dg(&primer.sequence).or_neutral("hairpin");
    primer.self_dimer_dg = adapter
        .self_dimer_dg(&primer.sequence)
        .or_neutral("self-dimer");
}

/// Fills the missing Tm/GC of a probe; values already set are kept.
pub fn analyze_probe(probe: &mut Probe, adapter: &ThermoAdapter) {
    let tm = if probe.tm() == 0.0 {
        adapter.tm_or_fallback(probe.sequence())
    } else {
        probe.tm()
    };
    let gc = if probe.gc_percent() == 0.0 {
        adapter.gc_or_fallback(probe.sequence())
    } else {
        probe.gc_percent()
    };
    probe.set_thermo(tm, gc);
}

/// Analyzes primers whose Tm is still unset, recomputes the cross-dimer ΔG and completes
/// the attached probe.
pub fn analyze_pair(pair: &mut PrimerPair, adapter: &ThermoAdapter) {
    analyze_unset_primers(pair, adapter);
    pair.cross_dimer_dg = cross_dimer(pair, adapter);
    if let Some(probe) = pair.probe.as_mut() {
        analyze_probe(probe, adapter);
    }
}

/// Builds an analyzed pair from a generator proposal, preferring the values the generator
/// already computed over oracle queries.
pub fn pair_from_proposal(proposal: &PairProposal, adapter: &ThermoAdapter) -> PrimerPair {
    let mut pair = PrimerPair::new(
        primer_from_site(&proposal.forward, adapter),
        primer_from_site(&proposal.reverse, adapter),
        proposal.product_size,
    );
    analyze_unset_primers(&mut pair, adapter);
    pair.cross_dimer_dg = match provided(proposal.cross_dimer_tm) {
        Some(th) => dg_from_structure_tm(th),
        None => cross_dimer(&pair, adapter),
    };
    pair
}

fn provided(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

// A site without a Tm is left unset so the full analysis runs on it.
fn primer_from_site(site: &OligoSite, adapter: &ThermoAdapter) -> Primer {
    let primer = Primer::new(&site.sequence, site.start);
    let Some(tm) = provided(site.tm) else {
        return primer;
    };

    let gc = provided(site.gc_percent)
        .unwrap_or_else(|| adapter.gc_or_fallback(&primer.sequence));
    let hairpin = match provided(site.hairpin_tm) {
        Some(th) => dg_from_structure_tm(th),
        None => adapter.hairpin_dg(&primer.sequence).or_neutral("hairpin"),
    };
    let self_dimer = match provided(site.self_dimer_tm) {
        Some(th) => dg_from_structure_tm(th),
        None => adapter
            .self_dimer_dg(&primer.sequence)
            .or_neutral("self-dimer"),
    };
    primer.with_thermo(tm, gc).with_structure(hairpin, self_dimer)
}

fn analyze_unset_primers(pair: &mut PrimerPair, adapter: &ThermoAdapter) {
    for primer in [&mut pair.forward, &mut pair.reverse] {
        if !primer.has_thermo() {
            analyze_primer(primer, adapter);
        }
    }
}

fn cross_dimer(pair: &PrimerPair, adapter: &ThermoAdapter) -> f64 {
    adapter
        .cross_dimer_dg(&pair.forward.sequence, &pair.reverse.sequence)
        .or_neutral("cross-dimer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::thermo::{OracleError, ThermoOracle};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FixedOracle {
        calls: AtomicUsize,
    }

    impl FixedOracle {
        fn answer(&self, value: f64) -> Result<f64, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ThermoOracle for FixedOracle {
        fn tm(&self, _sequence: &str) -> Result<f64, OracleError> {
            self.answer(59.5)
        }
        fn gc_percent(&self, _sequence: &str) -> Result<f64, OracleError> {
            self.answer(50.0)
        }
        fn hairpin_dg(&self, _sequence: &str) -> Result<f64, OracleError> {
            self.answer(-1.234)
        }
        fn homodimer_dg(&self, _sequence: &str) -> Result<f64, OracleError> {
            self.answer(-5.0)
        }
        fn heterodimer_dg(&self, _first: &str, _second: &str) -> Result<f64, OracleError> {
            self.answer(-6.0)
        }
    }

    struct DownOracle;

    impl ThermoOracle for DownOracle {
        fn tm(&self, _sequence: &str) -> Result<f64, OracleError> {
            Err(OracleError::Unavailable)
        }
        fn gc_percent(&self, _sequence: &str) -> Result<f64, OracleError> {
            Err(OracleError::Unavailable)
        }
        fn hairpin_dg(&self, _sequence: &str) -> Result<f64, OracleError> {
            Err(OracleError::Timeout)
        }
        fn homodimer_dg(&self, _sequence: &str) -> Result<f64, OracleError> {
            Err(OracleError::Timeout)
        }
        fn heterodimer_dg(&self, _first: &str, _second: &str) -> Result<f64, OracleError> {
            Err(OracleError::Failed("boom".into()))
        }
    }

    fn site(sequence: &str, start: usize, tm: Option<f64>) -> OligoSite {
        OligoSite {
            sequence: sequence.to_string(),
            start,
            tm,
            gc_percent: tm.map(|_| 55.0),
            hairpin_tm: tm.map(|_| 35.0),
            self_dimer_tm: tm.map(|_| 0.0),
        }
    }

    #[test]
    fn analyze_primer_populates_all_fields_from_oracle() {
        let oracle = FixedOracle::default();
        let adapter = ThermoAdapter::new(&oracle);
        let mut primer = Primer::new("ACGTACGTACGTACGTACGT", 0);

        analyze_primer(&mut primer, &adapter);

        assert_eq!(primer.tm, 59.5);
        assert_eq!(primer.gc_percent, 50.0);
        assert_eq!(primer.hairpin_dg, -1.23);
        assert_eq!(primer.self_dimer_dg, -5.0);
    }

    #[test]
    fn oracle_failures_use_fallback_and_neutral_values() {
        let adapter = ThermoAdapter::new(&DownOracle);
        let mut pair = PrimerPair::new(
            Primer::new("GGGCCCAAATTTGGGCCCAA", 0),
            Primer::new("TTGGCCAAGGCCTTGGCCAA", 80),
            100,
        );

        analyze_pair(&mut pair, &adapter);

        assert!(pair.forward.tm > 0.0);
        assert_eq!(pair.forward.gc_percent, 60.0);
        assert_eq!(pair.forward.hairpin_dg, 0.0);
        assert_eq!(pair.forward.self_dimer_dg, 0.0);
        assert_eq!(pair.cross_dimer_dg, 0.0);
    }

    #[test]
    fn analyze_pair_keeps_primers_with_known_tm() {
        let oracle = FixedOracle::default();
        let adapter = ThermoAdapter::new(&oracle);
        let mut pair = PrimerPair::new(
            Primer::new("ACGTACGTACGTACGTACGT", 0).with_thermo(61.0, 45.0),
            Primer::new("TGCATGCATGCATGCATGCA", 80).with_thermo(60.0, 50.0),
            100,
        );

        analyze_pair(&mut pair, &adapter);

        assert_eq!(pair.forward.tm, 61.0);
        assert_eq!(pair.reverse.gc_percent, 50.0);
        assert_eq!(pair.cross_dimer_dg, -6.0);
        assert_eq!(oracle.calls(), 1);
    }

    #[test]
    fn proposal_values_are_preferred_over_oracle_queries() {
        let oracle = FixedOracle::default();
        let adapter = ThermoAdapter::new(&oracle);
        let proposal = PairProposal {
            forward: site("acgtacgtacgtacgtacgt", 10, Some(60.2)),
            reverse: site("TGCATGCATGCATGCATGCA", 90, Some(59.8)),
            product_size: 100,
            cross_dimer_tm: Some(35.0),
        };

        let pair = pair_from_proposal(&proposal, &adapter);

        assert_eq!(oracle.calls(), 0);
        assert_eq!(pair.forward.sequence, "ACGTACGTACGTACGTACGT");
        assert_eq!(pair.forward.end, 30);
        assert_eq!(pair.forward.tm, 60.2);
        assert_eq!(pair.forward.gc_percent, 55.0);
        assert!((pair.forward.hairpin_dg - -3.0).abs() < 1e-9);
        assert_eq!(pair.forward.self_dimer_dg, 0.0);
        assert!((pair.cross_dimer_dg - -3.0).abs() < 1e-9);
        assert_eq!(pair.product_size, 100);
    }

    #[test]
    fn proposal_without_thermodynamics_is_fully_analyzed() {
        let oracle = FixedOracle::default();
        let adapter = ThermoAdapter::new(&oracle);
        let proposal = PairProposal {
            forward: site("ACGTACGTACGTACGTACGT", 10, None),
            reverse: site("TGCATGCATGCATGCATGCA", 90, None),
            product_size: 100,
            cross_dimer_tm: None,
        };

        let pair = pair_from_proposal(&proposal, &adapter);

        assert_eq!(pair.forward.tm, 59.5);
        assert_eq!(pair.reverse.self_dimer_dg, -5.0);
        assert_eq!(pair.cross_dimer_dg, -6.0);
        assert_eq!(oracle.calls(), 9);
    }

    #[test]
    fn analyze_probe_fills_only_missing_values() {
        let oracle = FixedOracle::default();
        let adapter = ThermoAdapter::new(&oracle);
        let mut probe = Probe::new("ACCTGACTGACTGACTGACT", 40, 0.0, 48.0).unwrap();

        analyze_probe(&mut probe, &adapter);

        assert_eq!(probe.tm(), 59.5);
        assert_eq!(probe.gc_percent(), 48.0);
        assert_eq!(oracle.calls(), 1);
    }
}
