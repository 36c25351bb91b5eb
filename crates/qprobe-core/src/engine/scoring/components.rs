//! Individual score components. Each takes the component maximum from the active policy
//! and never returns less than zero or more than that maximum.

use crate::core::models::pair::PrimerPair;
use crate::core::models::primer::Primer;
use crate::core::models::status::QcStatus;
use crate::core::sequence;
use crate::engine::config::QcThresholds;
use crate::engine::qc;

/// Average-Tm distance at which the Tm component reaches zero.
const TM_FALLOFF: f64 = 10.0;
/// Share of the Tm maximum lost to a primer Tm mismatch at the warn threshold.
const TM_MISMATCH_SHARE: f64 = 0.2;
/// Average-GC distance at which the GC component reaches zero.
const GC_FALLOFF: f64 = 30.0;

const STRUCTURE_RAW_MAX: f64 = 30.0;
const STRUCTURE_PENALTY_CAP: f64 = 10.0;
const HAIRPIN_PENALTY_PER_KCAL: f64 = 2.0;
const DIMER_PENALTY_PER_KCAL: f64 = 1.0;

const THREE_PRIME_PREFERRED: f64 = 10.0;
const THREE_PRIME_AVOIDED: f64 = 2.0;
const THREE_PRIME_OTHER: f64 = 7.0;
const THREE_PRIME_RAW_MAX: f64 = 2.0 * THREE_PRIME_PREFERRED;

const PROBE_RAW_MAX: f64 = 10.0;

pub fn tm_score(pair: &PrimerPair, t: &QcThresholds, max: f64) -> f64 {
    let distance = (pair.primer_avg_tm() - t.tm_optimal).abs();
    let base = max * (1.0 - distance / TM_FALLOFF).max(0.0);
    let mismatch = max * TM_MISMATCH_SHARE * (pair.tm_difference() / t.tm_diff_warn).min(1.0);
    (base - mismatch).max(0.0)
}

pub fn gc_score(pair: &PrimerPair, t: &QcThresholds, max: f64) -> f64 {
    let distance = (pair.primer_avg_gc() - t.gc_optimal).abs();
    max * (1.0 - distance / GC_FALLOFF).max(0.0)
}

/// Zero when either hairpin fails QC; otherwise capped penalties for the worst hairpin,
/// the worst self-dimer and the cross-dimer beyond their ceilings.
pub fn structure_score(pair: &PrimerPair, t: &QcThresholds, max: f64) -> f64 {
    if qc::hairpin_status(&pair.forward, t).is_fail()
        || qc::hairpin_status(&pair.reverse, t).is_fail()
    {
        return 0.0;
    }

    let worst_hairpin = pair.forward.hairpin_dg.min(pair.reverse.hairpin_dg);
    let worst_self_dimer = pair.forward.self_dimer_dg.min(pair.reverse.self_dimer_dg);

    let raw = STRUCTURE_RAW_MAX
        - overrun_penalty(worst_hairpin, t.hairpin_dg_max, HAIRPIN_PENALTY_PER_KCAL)
        - overrun_penalty(worst_self_dimer, t.self_dimer_dg_max, DIMER_PENALTY_PER_KCAL)
        - overrun_penalty(pair.cross_dimer_dg, t.cross_dimer_dg_max, DIMER_PENALTY_PER_KCAL);

    raw.max(0.0) * max / STRUCTURE_RAW_MAX
}

fn overrun_penalty(dg: f64, ceiling: f64, per_kcal: f64) -> f64 {
    if dg < ceiling {
        ((ceiling - dg) * per_kcal).min(STRUCTURE_PENALTY_CAP)
    } else {
        0.0
    }
}

fn three_prime_points(primer: &Primer, t: &QcThresholds) -> f64 {
    match primer.three_prime_base() {
        Some(base) if t.is_preferred_3prime(base) => THREE_PRIME_PREFERRED,
        Some(base) if t.is_avoided_3prime(base) => THREE_PRIME_AVOIDED,
        _ => THREE_PRIME_OTHER,
    }
}

pub fn three_prime_score(pair: &PrimerPair, t: &QcThresholds, max: f64) -> f64 {
    let raw = three_prime_points(&pair.forward, t) + three_prime_points(&pair.reverse, t);
    raw * max / THREE_PRIME_RAW_MAX
}

pub fn product_score(pair: &PrimerPair, t: &QcThresholds, max: f64) -> f64 {
    let size = pair.product_size;
    let distance = size.abs_diff(t.product_optimal) as f64;
    let range = t.product_max.saturating_sub(t.product_min).max(1) as f64;
    let score = max * (1.0 - distance / range).max(0.0);
    if size < t.product_min || size > t.product_max {
        score * 0.5
    } else {
        score
    }
}

/// Zero without a probe or when its Tm delta fails QC.
pub fn probe_score(pair: &PrimerPair, t: &QcThresholds, max: f64) -> f64 {
    let Some(probe) = pair.probe.as_ref() else {
        return 0.0;
    };
    let pt = &t.probe;

    let mut raw = match qc::probe_tm_delta_status(probe, pair.primer_avg_tm(), pt) {
        QcStatus::Fail => return 0.0,
        QcStatus::Pass => 4.0,
        QcStatus::Warn => 2.0,
    };

    if qc::probe_five_prime_status(probe) == QcStatus::Pass {
        raw += 2.0;
    }

    raw += match qc::probe_gc_status(probe, pt) {
        QcStatus::Pass => 1.5,
        QcStatus::Warn => 0.5,
        QcStatus::Fail => 0.0,
    };

    if (pt.length_min..=pt.length_max).contains(&probe.len()) {
        raw += 1.0;
    }

    if !sequence::has_homopolymer_run(probe.sequence(), pt.max_homopolymer) {
        raw += 0.5;
    }

    let offset = probe.start().saturating_sub(pair.forward.end);
    if offset <= pt.near_offset {
        raw += 1.0;
    } else if offset <= pt.far_offset {
        raw += 0.5;
    }

    (raw * max / PROBE_RAW_MAX).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::probe::Probe;

    fn primer(sequence: &str, start: usize, tm: f64) -> Primer {
        Primer::new(sequence, start)
            .with_thermo(tm, 50.0)
            .with_structure(0.0, 0.0)
    }

    fn pair() -> PrimerPair {
        PrimerPair::new(
            primer("ACGTACGTACGTACGTACGG", 0, 60.0),
            primer("TTGCATGCATGCATGCATGC", 80, 60.0),
            100,
        )
    }

    #[test]
    fn tm_score_falls_off_linearly_and_penalizes_mismatch() {
        let t = QcThresholds::default();
        let mut p = pair();
        assert_eq!(tm_score(&p, &t, 25.0), 25.0);

        p.forward.tm = 65.0;
        p.reverse.tm = 65.0;
        assert!((tm_score(&p, &t, 25.0) - 12.5).abs() < 1e-9);

        p.forward.tm = 58.0;
        p.reverse.tm = 62.0;
        assert!((tm_score(&p, &t, 25.0) - 20.0).abs() < 1e-9);

        p.forward.tm = 40.0;
        p.reverse.tm = 40.0;
        assert_eq!(tm_score(&p, &t, 25.0), 0.0);
    }

    #[test]
    fn gc_score_reaches_zero_at_thirty_points() {
        let t = QcThresholds::default();
        let mut p = pair();
        assert_eq!(gc_score(&p, &t, 15.0), 15.0);
        p.forward.gc_percent = 80.0;
        p.reverse.gc_percent = 80.0;
        assert_eq!(gc_score(&p, &t, 15.0), 0.0);
        p.forward.gc_percent = 65.0;
        p.reverse.gc_percent = 65.0;
        assert!((gc_score(&p, &t, 15.0) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn structure_penalties_are_capped_and_scaled() {
        let t = QcThresholds::default();
        let mut p = pair();
        assert_eq!(structure_score(&p, &t, 20.0), 20.0);
        assert_eq!(structure_score(&p, &t, 30.0), 30.0);

        p.forward.hairpin_dg = -3.0;
        p.reverse.self_dimer_dg = -10.5;
        p.cross_dimer_dg = -30.0;
        // 30 - 2 - 1.5 - 10 = 16.5 raw
        assert!((structure_score(&p, &t, 30.0) - 16.5).abs() < 1e-9);
        assert!((structure_score(&p, &t, 20.0) - 11.0).abs() < 1e-9);

        p.reverse.hairpin_dg = -4.0;
        assert_eq!(structure_score(&p, &t, 20.0), 0.0);
    }

    #[test]
    fn three_prime_scores_each_primer_categorically() {
        let t = QcThresholds::default();
        let mut p = pair();
        assert_eq!(three_prime_score(&p, &t, 10.0), 10.0);

        p.forward = primer("ACGTACGTACGTACGTACGT", 0, 60.0);
        p.reverse = primer("TTGCATGCATGCATGCATGA", 80, 60.0);
        assert!((three_prime_score(&p, &t, 20.0) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn product_score_is_halved_outside_the_bounds() {
        let t = QcThresholds::default();
        let mut p = pair();
        assert_eq!(product_score(&p, &t, 5.0), 5.0);

        p.product_size = 165;
        assert!((product_score(&p, &t, 5.0) - 2.5).abs() < 1e-9);

        p.product_size = 60;
        let expected = 10.0 * (1.0 - 40.0 / 130.0) * 0.5;
        assert!((product_score(&p, &t, 10.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn probe_score_tracks_tm_delta_tiers() {
        let t = QcThresholds::default();
        let ideal = Probe::new("ACCTGAGTACCAGGATCTTG", 22, 69.0, 50.0).unwrap();
        assert_eq!(probe_score(&pair().with_probe(ideal), &t, 25.0), 25.0);

        let acceptable = Probe::new("ACCTGAGTACCAGGATCTTG", 22, 67.0, 50.0).unwrap();
        assert_eq!(probe_score(&pair().with_probe(acceptable), &t, 25.0), 20.0);

        let cold = Probe::new("ACCTGAGTACCAGGATCTTG", 22, 62.0, 50.0).unwrap();
        assert_eq!(probe_score(&pair().with_probe(cold), &t, 25.0), 0.0);

        assert_eq!(probe_score(&pair(), &t, 25.0), 0.0);
    }
}
