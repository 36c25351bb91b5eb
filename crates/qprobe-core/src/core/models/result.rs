use super::pair::PrimerPair;
use serde::{Deserialize, Serialize};

/// The ranked outcome of designing one target. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignResult {
    target_name: String,
    target_sequence: String,
    primer_pairs: Vec<PrimerPair>,
}

impl DesignResult {
    pub fn new(target_name: &str, target_sequence: &str, primer_pairs: Vec<PrimerPair>) -> Self {
        Self {
            target_name: target_name.to_string(),
            target_sequence: target_sequence.to_string(),
            primer_pairs,
        }
    }

    pub fn empty(target_name: &str, target_sequence: &str) -> Self {
        Self::new(target_name, target_sequence, Vec::new())
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn target_sequence(&self) -> &str {
        &self.target_sequence
    }

    pub fn primer_pairs(&self) -> &[PrimerPair] {
        &self.primer_pairs
    }

    pub fn num_pairs(&self) -> usize {
        self.primer_pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primer_pairs.is_empty()
    }

    /// The rank-1 pair, or the first pair if the set was never ranked.
    pub fn best_pair(&self) -> Option<&PrimerPair> {
        self.primer_pairs
            .iter()
            .filter(|pair| pair.is_ranked())
            .min_by_key(|pair| pair.rank)
            .or_else(|| self.primer_pairs.first())
    }

    pub fn into_primer_pairs(self) -> Vec<PrimerPair> {
        self.primer_pairs
    }
}
