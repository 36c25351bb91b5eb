use crate::core::sequence::{self, TemplateIndex};
use crate::engine::config::ProbeThresholds;
use std::fmt;

/// Reason a probe candidate was rejected before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    OutsideRegion,
    Undetermined,
    FivePrimeGuanine,
    Homopolymer,
    GcOutOfRange,
    TmNotAbovePrimers,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::OutsideRegion => "outside the search region",
            Rejection::Undetermined => "contains an undetermined base",
            Rejection::FivePrimeGuanine => "starts with G",
            Rejection::Homopolymer => "contains a homopolymer run",
            Rejection::GcOutOfRange => "GC content out of range",
            Rejection::TmNotAbovePrimers => "Tm not above the primer average",
        };
        f.write_str(reason)
    }
}

#[inline]
fn gc_in_range(gc_percent: f64, t: &ProbeThresholds) -> bool {
    t.gc_min <= gc_percent && gc_percent <= t.gc_max
}

/// Sequence-only filters for a template window, each answered in constant time.
pub fn check_window(
    index: &TemplateIndex,
    start: usize,
    len: usize,
    t: &ProbeThresholds,
) -> Result<(), Rejection> {
    if index.has_undetermined(start, len) {
        return Err(Rejection::Undetermined);
    }
    if index.base_at(start) == Some(b'G') {
        return Err(Rejection::FivePrimeGuanine);
    }
    if index.has_homopolymer(start, len) {
        return Err(Rejection::Homopolymer);
    }
    if !gc_in_range(index.gc_percent(start, len), t) {
        return Err(Rejection::GcOutOfRange);
    }
    Ok(())
}

/// The same filters for a free-standing sequence such as a generator proposal.
pub fn check_sequence(sequence: &str, t: &ProbeThresholds) -> Result<(), Rejection> {
    if sequence.is_empty() || sequence::has_undetermined(sequence) {
        return Err(Rejection::Undetermined);
    }
    if sequence.as_bytes()[0].to_ascii_uppercase() == b'G' {
        return Err(Rejection::FivePrimeGuanine);
    }
    if sequence::has_homopolymer_run(sequence, t.max_homopolymer) {
        return Err(Rejection::Homopolymer);
    }
    if !gc_in_range(sequence::gc_percent(sequence), t) {
        return Err(Rejection::GcOutOfRange);
    }
    Ok(())
}

pub fn check_tm(tm: f64, primer_avg_tm: f64) -> Result<(), Rejection> {
    if tm > primer_avg_tm {
        Ok(())
    } else {
        Err(Rejection::TmNotAbovePrimers)
    }
}
