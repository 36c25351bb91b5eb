use super::primer::Primer;
use super::probe::Probe;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimerPair {
    pub forward: Primer,
    pub reverse: Primer,
    pub product_size: usize,
    pub cross_dimer_dg: f64,
    pub composite_score: f64,
    /// 1-based position after ranking; 0 while unranked.
    pub rank: usize,
    pub probe: Option<Probe>,
}

impl PrimerPair {
    pub fn new(forward: Primer, reverse: Primer, product_size: usize) -> Self {
        Self {
            forward,
            reverse,
            product_size,
            cross_dimer_dg: 0.0,
            composite_score: 0.0,
            rank: 0,
            probe: None,
        }
    }

    pub fn with_cross_dimer(mut self, cross_dimer_dg: f64) -> Self {
        self.cross_dimer_dg = cross_dimer_dg;
        self
    }

    pub fn with_probe(mut self, probe: Probe) -> Self {
        self.probe = Some(probe);
        self
    }

    #[inline]
    pub fn tm_difference(&self) -> f64 {
        (self.forward.tm - self.reverse.tm).abs()
    }

    #[inline]
    pub fn primer_avg_tm(&self) -> f64 {
        (self.forward.tm + self.reverse.tm) / 2.0
    }

    #[inline]
    pub fn primer_avg_gc(&self) -> f64 {
        (self.forward.gc_percent + self.reverse.gc_percent) / 2.0
    }

    /// Bases strictly between the forward primer's 3′ end and the reverse primer's
    /// binding site, or `None` when the primers touch or overlap.
    pub fn inter_primer_gap(&self) -> Option<usize> {
        self.reverse
            .start
            .checked_sub(self.forward.end)
            .filter(|&gap| gap > 0)
    }

    #[inline]
    pub fn is_ranked(&self) -> bool {
        self.rank > 0
    }
}
