//! # Probe Placement Search
//!
//! Finds the single best TaqMan hybridization probe between the forward primer's 3′ end and
//! the reverse primer's 5′ start of a primer pair.
//!
//! ## Search Region
//!
//! The probe may occupy `[fwd.end + margin, rev.start − margin)`, clamped to the template.
//! Pairs whose primers overlap, or whose gap cannot hold a minimum-length probe plus both
//! margins, get no probe and cost no oracle calls.
//!
//! ## Hard Filters
//!
//! A candidate is rejected outright ([`Rejection`]) if it contains an undetermined base,
//! starts with G, contains a homopolymer run at the configured limit, has a GC percent
//! outside the probe band, or does not melt strictly above the primer average Tm. The
//! sequence-only filters run in constant time per window against a [`TemplateIndex`].
//!
//! ## Tiers
//!
//! 1. **Primary** - the external generator's internal-oligo mode on the search region,
//!    first with the strict Tm band, then once with the relaxed lower bound.
//! 2. **Fallback** - every window of every permitted length, Tm evaluated in parallel,
//!    in-band candidates preferred over out-of-band ones.
//!
//! Survivors are ranked by [`candidate_score`]; ties go to the earliest start, then the
//! shortest probe, so identical inputs always give the identical probe.
//!
//! [`TemplateIndex`]: crate::core::sequence::TemplateIndex

mod candidate;
mod fallback;
mod filters;
mod primary;

pub use candidate::{CANDIDATE_GC_TARGET, Candidate, candidate_score, select_best};
pub use filters::{Rejection, check_sequence, check_tm, check_window};

use crate::core::generator::PrimerGenerator;
use crate::core::models::pair::PrimerPair;
use crate::core::models::probe::Probe;
use crate::core::sequence::TemplateIndex;
use crate::core::thermo::ThermoOracle;
use crate::core::thermo::adapter::ThermoAdapter;
use crate::engine::config::{ProbeSearchConfig, ProbeThresholds};
use tracing::{debug, warn};

/// One-off probe search over a raw template using only the windowed tier.
///
/// Callers placing probes for many pairs of the same template should build a
/// [`ProbeSearch`] once instead, which indexes the template a single time.
pub fn search_probe(
    template: &str,
    pair: &PrimerPair,
    thresholds: &ProbeThresholds,
    config: &ProbeSearchConfig,
    oracle: &dyn ThermoOracle,
) -> Option<Probe> {
    let index = TemplateIndex::new(template, thresholds.max_homopolymer);
    ProbeSearch::new(&index, thresholds, config, ThermoAdapter::new(oracle)).find(pair)
}

/// Half-open template interval a probe must lie within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRegion {
    pub start: usize,
    pub end: usize,
}

impl SearchRegion {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn contains(&self, start: usize, len: usize) -> bool {
        self.start <= start && start + len <= self.end
    }
}

/// Probe search over one indexed template, reusable across all pairs of a target.
#[derive(Clone, Copy)]
pub struct ProbeSearch<'a> {
    index: &'a TemplateIndex,
    thresholds: &'a ProbeThresholds,
    config: &'a ProbeSearchConfig,
    adapter: ThermoAdapter<'a>,
    generator: Option<&'a dyn PrimerGenerator>,
}

/// Per-pair state shared by both tiers.
pub(crate) struct PairContext<'s, 'a> {
    pub search: &'s ProbeSearch<'a>,
    pub region: SearchRegion,
    pub fwd_end: usize,
    pub primer_avg_tm: f64,
}

impl<'a> ProbeSearch<'a> {
    pub fn new(
        index: &'a TemplateIndex,
        thresholds: &'a ProbeThresholds,
        config: &'a ProbeSearchConfig,
        adapter: ThermoAdapter<'a>,
    ) -> Self {
        Self {
            index,
            thresholds,
            config,
            adapter,
            generator: None,
        }
    }

    pub fn with_generator(mut self, generator: &'a dyn PrimerGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// The permissible probe region for a pair, or `None` when no probe can fit.
    pub fn region(&self, pair: &PrimerPair) -> Option<SearchRegion> {
        let fwd_end = pair.forward.end;
        let rev_start = pair.reverse.start;
        let gap = pair.inter_primer_gap()?;
        if gap < self.config.min_gap() {
            return None;
        }

        let start = fwd_end + self.config.margin;
        let end = (rev_start - self.config.margin).min(self.index.len());
        let region = SearchRegion { start, end };
        (!region.is_empty() && region.len() >= self.config.min_length).then_some(region)
    }

    /// Best probe for the pair, or `None` when nothing survives both tiers.
    pub fn find(&self, pair: &PrimerPair) -> Option<Probe> {
        let Some(region) = self.region(pair) else {
            debug!(
                fwd_end = pair.forward.end,
                rev_start = pair.reverse.start,
                "Inter-primer gap too small for a probe."
            );
            return None;
        };

        let ctx = PairContext {
            search: self,
            region,
            fwd_end: pair.forward.end,
            primer_avg_tm: pair.primer_avg_tm(),
        };

        let best = self
            .generator
            .and_then(|generator| primary::search(&ctx, generator))
            .or_else(|| fallback::search(&ctx))?;

        match best.into_probe() {
            Ok(probe) => Some(probe),
            Err(err) => {
                warn!(error = %err, "Discarding probe candidate that violates probe rules.");
                None
            }
        }
    }
}

impl PairContext<'_, '_> {
    pub fn thresholds(&self) -> &ProbeThresholds {
        self.search.thresholds
    }

    pub fn config(&self) -> &ProbeSearchConfig {
        self.search.config
    }

    pub fn index(&self) -> &TemplateIndex {
        self.search.index
    }

    pub fn adapter(&self) -> &ThermoAdapter<'_> {
        &self.search.adapter
    }

    /// Scores a sequence that already passed the sequence filters; `None` if its Tm fails.
    pub fn score(
        &self,
        start: usize,
        sequence: &str,
        tm: f64,
        gc_percent: f64,
    ) -> Option<Candidate> {
        check_tm(tm, self.primer_avg_tm).ok()?;
        let score = candidate_score(
            tm - self.primer_avg_tm,
            gc_percent,
            sequence.as_bytes()[0],
            start.saturating_sub(self.fwd_end),
            self.config().target_tm_delta,
            self.thresholds(),
        );
        Some(Candidate {
            start,
            sequence: sequence.to_string(),
            tm,
            gc_percent,
            score,
        })
    }
}
