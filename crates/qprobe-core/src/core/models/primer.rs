use serde::{Deserialize, Serialize};

/// A PCR primer placed on the template.
///
/// Coordinates are half-open and 0-based on the template's forward strand, for reverse
/// primers as well; the reverse primer's `sequence` is the reverse complement of the
/// covered template slice. The 3′-terminal base is always derived from `sequence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primer {
    pub sequence: String,
    pub start: usize,
    pub end: usize,
    pub tm: f64,
    pub gc_percent: f64,
    pub hairpin_dg: f64,
    pub self_dimer_dg: f64,
}

impl Primer {
    pub fn new(sequence: &str, start: usize) -> Self {
        let sequence = sequence.trim().to_ascii_uppercase();
        let end = start + sequence.len();
        Self {
            sequence,
            start,
            end,
            tm: 0.0,
            gc_percent: 0.0,
            hairpin_dg: 0.0,
            self_dimer_dg: 0.0,
        }
    }

    pub fn with_thermo(mut self, tm: f64, gc_percent: f64) -> Self {
        self.tm = tm;
        self.gc_percent = gc_percent;
        self
    }

    pub fn with_structure(mut self, hairpin_dg: f64, self_dimer_dg: f64) -> Self {
        self.hairpin_dg = hairpin_dg;
        self.self_dimer_dg = self_dimer_dg;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    #[inline]
    pub fn three_prime_base(&self) -> Option<char> {
        self.sequence.chars().last()
    }

    /// Thermodynamic fields are considered populated once a melting temperature is set.
    #[inline]
    pub fn has_thermo(&self) -> bool {
        self.tm != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_sequence_and_derives_end() {
        let primer = Primer::new(" acgtacgtacgtacgtacgc ", 5);
        assert_eq!(primer.sequence, "ACGTACGTACGTACGTACGC");
        assert_eq!(primer.start, 5);
        assert_eq!(primer.end, 25);
        assert_eq!(primer.len(), 20);
        assert!(!primer.has_thermo());
    }

    #[test]
    fn three_prime_base_is_last_character() {
        let primer = Primer::new("ACGTT", 0);
        assert_eq!(primer.three_prime_base(), Some('T'));
        assert_eq!(Primer::new("", 0).three_prime_base(), None);
    }

    #[test]
    fn builders_populate_thermodynamic_fields() {
        let primer = Primer::new("ACGTACGT", 0)
            .with_thermo(60.5, 50.0)
            .with_structure(-1.2, -5.5);
        assert_eq!(primer.tm, 60.5);
        assert_eq!(primer.gc_percent, 50.0);
        assert_eq!(primer.hairpin_dg, -1.2);
        assert_eq!(primer.self_dimer_dg, -5.5);
        assert!(primer.has_thermo());
    }
}
