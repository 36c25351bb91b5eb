use crate::core::models::probe::{ModelError, Probe};
use crate::engine::config::ProbeThresholds;
use std::cmp::Ordering;

/// GC percent a probe candidate is steered towards.
pub const CANDIDATE_GC_TARGET: f64 = 50.0;

const BASE_SCORE: f64 = 50.0;

/// A probe window that survived the hard filters, with its selection score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub start: usize,
    pub sequence: String,
    pub tm: f64,
    pub gc_percent: f64,
    pub score: f64,
}

impl Candidate {
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Higher score first, then earlier start, then shorter probe.
    pub fn preference(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then(self.start.cmp(&other.start))
            .then(self.len().cmp(&other.len()))
    }

    pub fn into_probe(self) -> Result<Probe, ModelError> {
        Probe::new(&self.sequence, self.start, self.tm, self.gc_percent)
    }
}

/// Selection score of a candidate; not the exported probe sub-score.
///
/// `offset` is the distance of the probe start from the forward primer's 3′ end.
pub fn candidate_score(
    tm_delta: f64,
    gc_percent: f64,
    five_prime_base: u8,
    offset: usize,
    target_tm_delta: f64,
    t: &ProbeThresholds,
) -> f64 {
    let mut score = BASE_SCORE;

    let tm_distance = (tm_delta - target_tm_delta).abs();
    score += if tm_distance <= 1.0 {
        25.0
    } else if tm_distance <= 2.0 {
        15.0
    } else if tm_distance <= 4.0 {
        5.0
    } else {
        -10.0
    };

    let gc_distance = (gc_percent - CANDIDATE_GC_TARGET).abs();
    score += if gc_distance <= 5.0 {
        15.0
    } else if gc_distance <= 10.0 {
        10.0
    } else if gc_distance <= 15.0 {
        5.0
    } else {
        0.0
    };

    if matches!(five_prime_base.to_ascii_uppercase(), b'A' | b'C') {
        score += 10.0;
    }

    if offset <= t.near_offset {
        score += 5.0;
    } else if offset <= t.far_offset {
        score += 2.5;
    }

    score
}

pub fn select_best<I>(candidates: I) -> Option<Candidate>
where
    I: IntoIterator<Item = Candidate>,
{
    candidates.into_iter().min_by(|a, b| a.preference(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(start: usize, len: usize, score: f64) -> Candidate {
        Candidate {
            start,
            sequence: "A".repeat(len),
            tm: 70.0,
            gc_percent: 50.0,
            score,
        }
    }

    #[test]
    fn ideal_candidate_collects_every_bonus() {
        let t = ProbeThresholds::default();
        let score = candidate_score(9.0, 50.0, b'C', 3, 9.0, &t);
        assert_eq!(score, 50.0 + 25.0 + 15.0 + 10.0 + 5.0);
    }

    #[test]
    fn tiers_degrade_with_distance() {
        let t = ProbeThresholds::default();
        assert_eq!(candidate_score(10.5, 50.0, b'T', 40, 9.0, &t), 50.0 + 15.0 + 15.0);
        assert_eq!(candidate_score(12.5, 61.0, b'T', 10, 9.0, &t), 50.0 + 5.0 + 5.0 + 2.5);
        assert_eq!(candidate_score(2.0, 70.0, b'T', 16, 9.0, &t), 50.0 - 10.0);
    }

    #[test]
    fn selection_prefers_score_then_start_then_length() {
        let best = select_best(vec![
            candidate(10, 22, 80.0),
            candidate(4, 25, 80.0),
            candidate(4, 21, 80.0),
            candidate(2, 20, 79.5),
        ])
        .unwrap();
        assert_eq!((best.start, best.len()), (4, 21));
    }

    #[test]
    fn selection_of_nothing_is_none() {
        assert_eq!(select_best(Vec::new()), None);
    }

    #[test]
    fn candidate_converts_into_probe() {
        let c = Candidate {
            start: 40,
            sequence: "CCTGAGTACCAGGATCTTGA".into(),
            tm: 69.0,
            gc_percent: 50.0,
            score: 90.0,
        };
        let probe = c.into_probe().unwrap();
        assert_eq!(probe.start(), 40);
        assert_eq!(probe.end(), 60);
        assert_eq!(probe.five_prime_base(), 'C');
    }
}
