//! # Sequence Utilities
//!
//! Base-composition helpers shared by the oracle fallback, the probe filters and the QC
//! report, plus [`index::TemplateIndex`], the precomputed template representation that
//! makes per-window filter evaluation constant time during the exhaustive probe search.

pub mod index;

pub use index::TemplateIndex;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of 3′-terminal bases inspected for a GC clamp.
pub const GC_CLAMP_WINDOW: usize = 5;

#[inline]
pub fn is_gc(base: u8) -> bool {
    matches!(base.to_ascii_uppercase(), b'G' | b'C')
}

/// Anything outside `A`, `C`, `G`, `T` (case-insensitive) is undetermined.
#[inline]
pub fn is_undetermined(base: u8) -> bool {
    !matches!(base.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T')
}

pub fn normalize(sequence: &str) -> String {
    sequence
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn gc_count(sequence: &str) -> usize {
    sequence.bytes().filter(|&b| is_gc(b)).count()
}

pub fn gc_percent(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    gc_count(sequence) as f64 / sequence.len() as f64 * 100.0
}

pub fn has_undetermined(sequence: &str) -> bool {
    sequence.bytes().any(is_undetermined)
}

pub fn longest_homopolymer(sequence: &str) -> usize {
    let bytes = sequence.as_bytes();
    let mut longest = 0;
    let mut current = 0;
    for (i, &base) in bytes.iter().enumerate() {
        if i > 0 && base.eq_ignore_ascii_case(&bytes[i - 1]) {
            current += 1;
        } else {
            current = 1;
        }
        longest = longest.max(current);
    }
    longest
}

/// True if the sequence contains a run of at least `run_length` identical bases.
/// Run lengths of one or less never count as homopolymers.
pub fn has_homopolymer_run(sequence: &str, run_length: usize) -> bool {
    run_length > 1 && longest_homopolymer(sequence) >= run_length
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "gc")]
pub enum GcClamp {
    Absent,
    Good(usize),
    Moderate(usize),
    TooStrong(usize),
}

impl GcClamp {
    pub fn is_acceptable(self) -> bool {
        matches!(self, GcClamp::Good(_) | GcClamp::Moderate(_))
    }
}

impl fmt::Display for GcClamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GcClamp::Absent => write!(f, "No GC clamp (0 G/C in last {} bases)", GC_CLAMP_WINDOW),
            GcClamp::Good(n) => write!(f, "Good GC clamp ({} G/C in last {} bases)", n, GC_CLAMP_WINDOW),
            GcClamp::Moderate(n) => {
                write!(f, "Moderate GC clamp ({} G/C in last {} bases)", n, GC_CLAMP_WINDOW)
            }
            GcClamp::TooStrong(n) => {
                write!(f, "Too strong GC clamp ({} G/C in last {} bases)", n, GC_CLAMP_WINDOW)
            }
        }
    }
}

pub fn gc_clamp(sequence: &str) -> GcClamp {
    let cut = sequence.len().saturating_sub(GC_CLAMP_WINDOW);
    let gc = sequence.as_bytes()[cut..].iter().filter(|&&b| is_gc(b)).count();
    match gc {
        0 => GcClamp::Absent,
        1 | 2 => GcClamp::Good(gc),
        3 => GcClamp::Moderate(gc),
        _ => GcClamp::TooStrong(gc),
    }
}
