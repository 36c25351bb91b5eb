use super::config::{ProbeThresholds, QcThresholds};
use crate::core::models::pair::PrimerPair;
use crate::core::models::primer::Primer;
use crate::core::models::probe::Probe;
use crate::core::models::status::QcStatus;
use crate::core::sequence::{self, GcClamp};
use serde::{Deserialize, Serialize};

pub fn primer_tm_status(primer: &Primer, t: &QcThresholds) -> QcStatus {
    QcStatus::from_band(
        primer.tm,
        (t.tm_min, t.tm_max),
        (t.tm_warn_min, t.tm_warn_max),
    )
}

pub fn primer_gc_status(primer: &Primer, t: &QcThresholds) -> QcStatus {
    QcStatus::from_band(
        primer.gc_percent,
        (t.gc_min, t.gc_max),
        (t.gc_warn_min, t.gc_warn_max),
    )
}

pub fn hairpin_status(primer: &Primer, t: &QcThresholds) -> QcStatus {
    QcStatus::from_energy(primer.hairpin_dg, t.hairpin_dg_max, t.hairpin_dg_warn)
}

pub fn self_dimer_status(primer: &Primer, t: &QcThresholds) -> QcStatus {
    QcStatus::from_energy(
        primer.self_dimer_dg,
        t.self_dimer_dg_max,
        t.self_dimer_dg_warn,
    )
}

/// Avoided 3′ bases warn; every other base, preferred or not, passes.
pub fn three_prime_status(primer: &Primer, t: &QcThresholds) -> QcStatus {
    match primer.three_prime_base() {
        Some(base) if t.is_avoided_3prime(base) => QcStatus::Warn,
        _ => QcStatus::Pass,
    }
}

pub fn tm_match_status(pair: &PrimerPair, t: &QcThresholds) -> QcStatus {
    QcStatus::from_upper_limit(pair.tm_difference(), t.tm_diff_max, t.tm_diff_warn)
}

pub fn cross_dimer_status(pair: &PrimerPair, t: &QcThresholds) -> QcStatus {
    QcStatus::from_energy(
        pair.cross_dimer_dg,
        t.cross_dimer_dg_max,
        t.cross_dimer_dg_warn,
    )
}

pub fn product_size_status(pair: &PrimerPair, t: &QcThresholds) -> QcStatus {
    QcStatus::from_band(
        pair.product_size as f64,
        (t.product_min as f64, t.product_max as f64),
        (t.product_warn_min as f64, t.product_warn_max as f64),
    )
}

pub fn probe_five_prime_status(probe: &Probe) -> QcStatus {
    if probe.five_prime_base() == 'G' {
        QcStatus::Fail
    } else {
        QcStatus::Pass
    }
}

pub fn probe_gc_status(probe: &Probe, t: &ProbeThresholds) -> QcStatus {
    QcStatus::from_band(
        probe.gc_percent(),
        (t.gc_min, t.gc_max),
        (t.gc_warn_min, t.gc_warn_max),
    )
}

/// Classifies how far the probe Tm sits above the mean primer Tm.
pub fn probe_tm_delta_status(probe: &Probe, primer_avg_tm: f64, t: &ProbeThresholds) -> QcStatus {
    QcStatus::from_band(
        probe.tm() - primer_avg_tm,
        (t.tm_delta_ideal_min, t.tm_delta_ideal_max),
        (t.tm_delta_min, t.tm_delta_max),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimerQc {
    pub tm: QcStatus,
    pub gc: QcStatus,
    pub hairpin: QcStatus,
    pub self_dimer: QcStatus,
    pub three_prime: QcStatus,
    pub gc_clamp: GcClamp,
}

impl PrimerQc {
    pub fn evaluate(primer: &Primer, t: &QcThresholds) -> Self {
        Self {
            tm: primer_tm_status(primer, t),
            gc: primer_gc_status(primer, t),
            hairpin: hairpin_status(primer, t),
            self_dimer: self_dimer_status(primer, t),
            three_prime: three_prime_status(primer, t),
            gc_clamp: sequence::gc_clamp(&primer.sequence),
        }
    }

    pub fn overall(&self) -> QcStatus {
        let clamp = if self.gc_clamp.is_acceptable() {
            QcStatus::Pass
        } else {
            QcStatus::Warn
        };
        [self.tm, self.gc, self.hairpin, self.self_dimer, self.three_prime]
            .into_iter()
            .fold(clamp, QcStatus::worst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeQc {
    pub five_prime: QcStatus,
    pub gc: QcStatus,
    pub tm_delta: QcStatus,
}

impl ProbeQc {
    pub fn evaluate(probe: &Probe, primer_avg_tm: f64, t: &ProbeThresholds) -> Self {
        Self {
            five_prime: probe_five_prime_status(probe),
            gc: probe_gc_status(probe, t),
            tm_delta: probe_tm_delta_status(probe, primer_avg_tm, t),
        }
    }

    pub fn overall(&self) -> QcStatus {
        self.five_prime.worst(self.gc).worst(self.tm_delta)
    }
}

/// Every QC classification of a pair, its primers and its probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairQcReport {
    pub forward: PrimerQc,
    pub reverse: PrimerQc,
    pub tm_match: QcStatus,
    pub cross_dimer: QcStatus,
    pub product_size: QcStatus,
    pub probe: Option<ProbeQc>,
}

impl PairQcReport {
    pub fn evaluate(pair: &PrimerPair, t: &QcThresholds) -> Self {
        Self {
            forward: PrimerQc::evaluate(&pair.forward, t),
            reverse: PrimerQc::evaluate(&pair.reverse, t),
            tm_match: tm_match_status(pair, t),
            cross_dimer: cross_dimer_status(pair, t),
            product_size: product_size_status(pair, t),
            probe: pair
                .probe
                .as_ref()
                .map(|probe| ProbeQc::evaluate(probe, pair.primer_avg_tm(), &t.probe)),
        }
    }

    pub fn overall(&self) -> QcStatus {
        let pair = self
            .tm_match
            .worst(self.cross_dimer)
            .worst(self.product_size)
            .worst(self.forward.overall())
            .worst(self.reverse.overall());
        match &self.probe {
            Some(probe) => pair.worst(probe.overall()),
            None => pair,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primer(sequence: &str, tm: f64, gc: f64) -> Primer {
        Primer::new(sequence, 0)
            .with_thermo(tm, gc)
            .with_structure(-1.0, -5.0)
    }

    fn good_pair() -> PrimerPair {
        PrimerPair::new(
            primer("ACGTACGTACGTACGTAACG", 60.0, 50.0),
            primer("TTGCATGCATGCATGCATGC", 60.5, 50.0),
            100,
        )
        .with_cross_dimer(-3.0)
    }

    #[test]
    fn primer_statuses_follow_default_bands() {
        let t = QcThresholds::default();
        assert_eq!(primer_tm_status(&primer("ACGT", 58.0, 50.0), &t), QcStatus::Pass);
        assert_eq!(primer_tm_status(&primer("ACGT", 64.0, 50.0), &t), QcStatus::Warn);
        assert_eq!(primer_tm_status(&primer("ACGT", 66.0, 50.0), &t), QcStatus::Fail);
        assert_eq!(primer_gc_status(&primer("ACGT", 60.0, 71.0), &t), QcStatus::Fail);

        let strong_hairpin = Primer::new("ACGTACGT", 0).with_structure(-4.0, -5.0);
        assert_eq!(hairpin_status(&strong_hairpin, &t), QcStatus::Fail);
        let weak_hairpin = Primer::new("ACGTACGT", 0).with_structure(-3.0, -12.0);
        assert_eq!(hairpin_status(&weak_hairpin, &t), QcStatus::Warn);
        assert_eq!(self_dimer_status(&weak_hairpin, &t), QcStatus::Fail);
    }

    #[test]
    fn three_prime_t_warns_and_a_passes() {
        let t = QcThresholds::default();
        assert_eq!(three_prime_status(&Primer::new("ACGT", 0), &t), QcStatus::Warn);
        assert_eq!(three_prime_status(&Primer::new("ACGA", 0), &t), QcStatus::Pass);
        assert_eq!(three_prime_status(&Primer::new("ACGC", 0), &t), QcStatus::Pass);
    }

    #[test]
    fn pair_statuses_follow_default_bands() {
        let t = QcThresholds::default();
        let mut pair = good_pair();
        assert_eq!(tm_match_status(&pair, &t), QcStatus::Pass);
        assert_eq!(product_size_status(&pair, &t), QcStatus::Pass);
        assert_eq!(cross_dimer_status(&pair, &t), QcStatus::Pass);

        pair.reverse.tm = 63.5;
        pair.product_size = 250;
        assert_eq!(tm_match_status(&pair, &t), QcStatus::Warn);
        assert_eq!(product_size_status(&pair, &t), QcStatus::Warn);

        pair.product_size = 40;
        assert_eq!(product_size_status(&pair, &t), QcStatus::Fail);
    }

    #[test]
    fn probe_tm_delta_is_relative_to_primer_average() {
        let t = ProbeThresholds::default();
        let probe = Probe::new("ACTGACTGACTGACTGACTG", 40, 69.0, 50.0).unwrap();
        assert_eq!(probe_tm_delta_status(&probe, 60.0, &t), QcStatus::Pass);
        assert_eq!(probe_tm_delta_status(&probe, 62.0, &t), QcStatus::Warn);
        assert_eq!(probe_tm_delta_status(&probe, 66.0, &t), QcStatus::Fail);
        assert_eq!(probe_five_prime_status(&probe), QcStatus::Pass);
    }

    #[test]
    fn report_collects_every_status_and_gc_clamp() {
        let t = QcThresholds::default();
        let probe = Probe::new("ACTGACTGACTGACTGACTG", 40, 69.0, 50.0).unwrap();
        let pair = good_pair().with_probe(probe);

        let report = PairQcReport::evaluate(&pair, &t);

        assert_eq!(report.forward.gc_clamp, GcClamp::Good(2));
        assert_eq!(report.reverse.gc_clamp, GcClamp::Moderate(3));
        assert_eq!(report.probe.map(|p| p.tm_delta), Some(QcStatus::Pass));
        assert_eq!(report.forward.overall(), QcStatus::Pass);
        assert_eq!(report.reverse.overall(), QcStatus::Pass);
        assert_eq!(report.overall(), QcStatus::Pass);
    }

    #[test]
    fn overall_reports_the_worst_component() {
        let t = QcThresholds::default();
        let mut pair = good_pair();
        pair.cross_dimer_dg = -13.0;
        let report = PairQcReport::evaluate(&pair, &t);
        assert_eq!(report.probe, None);
        assert_eq!(report.overall(), QcStatus::Fail);
    }
}
