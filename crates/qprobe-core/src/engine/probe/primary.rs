use super::candidate::{Candidate, select_best};
use super::filters::check_sequence;
use super::PairContext;
use crate::core::generator::{GeneratorError, InternalOligoProposal, PrimerGenerator};
use crate::core::sequence;
use crate::core::thermo::closed_form::round2;
use tracing::{debug, warn};

/// Internal-oligo search through the external generator: strict band first, then one
/// relaxed retry. `None` sends the caller to the windowed fallback.
pub(crate) fn search(ctx: &PairContext, generator: &dyn PrimerGenerator) -> Option<Candidate> {
    let region = ctx.index().window(ctx.region.start, ctx.region.len())?;
    let avg = ctx.primer_avg_tm;
    let t = ctx.thresholds();
    let config = ctx.config();

    let strict_opt = avg + config.target_tm_delta;
    let relaxed_min = avg + config.relaxed_tm_delta_min;
    let tiers = [
        ("strict", avg + t.tm_delta_min, strict_opt, avg + t.tm_delta_max),
        (
            "relaxed",
            relaxed_min,
            strict_opt.max(relaxed_min + 1.0),
            avg + t.tm_delta_max,
        ),
    ];

    for (tier, tm_min, tm_opt, tm_max) in tiers {
        let constraints = config.internal_constraints(tm_min, tm_opt, tm_max, t);
        let proposals = match generator.design_internal(region, &constraints) {
            Ok(proposals) => proposals,
            Err(err @ (GeneratorError::Unavailable | GeneratorError::Unsupported(_))) => {
                debug!(error = %err, "Internal-oligo mode unavailable; using windowed search.");
                return None;
            }
            Err(err) => {
                warn!(tier, error = %err, "Internal-oligo generation failed.");
                Vec::new()
            }
        };

        let survivors: Vec<Candidate> = proposals
            .iter()
            .filter_map(|proposal| evaluate_proposal(ctx, proposal))
            .collect();
        debug!(
            tier,
            proposals = proposals.len(),
            survivors = survivors.len(),
            "Evaluated internal-oligo proposals."
        );

        if let Some(best) = select_best(survivors) {
            return Some(best);
        }
    }
    None
}

fn evaluate_proposal(ctx: &PairContext, proposal: &InternalOligoProposal) -> Option<Candidate> {
    let sequence = proposal.sequence.trim().to_ascii_uppercase();
    let start = ctx.region.start + proposal.position;
    if !ctx.region.contains(start, sequence.len()) {
        debug!(start, len = sequence.len(), "Internal-oligo proposal outside the region.");
        return None;
    }
    if let Err(reason) = check_sequence(&sequence, ctx.thresholds()) {
        debug!(%sequence, %reason, "Rejected internal-oligo proposal.");
        return None;
    }

    let tm = proposal
        .tm
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| ctx.adapter().tm_or_fallback(&sequence));
    let gc_percent = proposal
        .gc_percent
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| round2(sequence::gc_percent(&sequence)));
    ctx.score(start, &sequence, tm, gc_percent)
}

#[cfg(test)]
mod tests {
    use super::super::ProbeSearch;
    use super::super::tests::{LengthTmOracle, TEMPLATE, pair_around_gap};
    use super::*;
    use crate::core::generator::{InternalOligoConstraints, PairConstraints, PairProposal};
    use crate::core::models::probe::Probe;
    use crate::core::sequence::TemplateIndex;
    use crate::core::thermo::adapter::ThermoAdapter;
    use crate::engine::config::{ProbeSearchConfig, ProbeThresholds};
    use std::sync::Mutex;
    use std::sync::atomic::Ordering;

    /// Replays a scripted answer per call and records the requested Tm bands.
    struct ScriptedGenerator {
        answers: Mutex<Vec<Result<Vec<InternalOligoProposal>, GeneratorError>>>,
        bands: Mutex<Vec<(f64, f64, f64)>>,
    }

    impl ScriptedGenerator {
        fn new(answers: Vec<Result<Vec<InternalOligoProposal>, GeneratorError>>) -> Self {
            Self {
                answers: Mutex::new(answers.into_iter().rev().collect()),
                bands: Mutex::new(Vec::new()),
            }
        }

        fn bands(&self) -> Vec<(f64, f64, f64)> {
            self.bands.lock().unwrap().clone()
        }
    }

    impl PrimerGenerator for ScriptedGenerator {
        fn design(
            &self,
            _template: &str,
            _constraints: &PairConstraints,
        ) -> Result<Vec<PairProposal>, GeneratorError> {
            Ok(Vec::new())
        }

        fn design_internal(
            &self,
            _region: &str,
            constraints: &InternalOligoConstraints,
        ) -> Result<Vec<InternalOligoProposal>, GeneratorError> {
            self.bands
                .lock()
                .unwrap()
                .push((constraints.tm_min, constraints.tm_opt, constraints.tm_max));
            self.answers.lock().unwrap().pop().unwrap_or(Ok(Vec::new()))
        }
    }

    fn proposal(offset: usize, len: usize, tm: f64) -> InternalOligoProposal {
        // Region of pair_around_gap(20, 64) starts at 22.
        InternalOligoProposal {
            sequence: TEMPLATE[22 + offset..22 + offset + len].to_string(),
            position: offset,
            tm: Some(tm),
            gc_percent: None,
        }
    }

    fn run(generator: &ScriptedGenerator, oracle: &LengthTmOracle) -> Option<Probe> {
        let index = TemplateIndex::new(TEMPLATE, 4);
        let (t, c) = (ProbeThresholds::default(), ProbeSearchConfig::default());
        ProbeSearch::new(&index, &t, &c, ThermoAdapter::new(oracle))
            .with_generator(generator)
            .find(&pair_around_gap(20, 64))
    }

    #[test]
    fn best_primary_survivor_is_returned_without_fallback() {
        let generator = ScriptedGenerator::new(vec![Ok(vec![
            proposal(1, 20, 66.5),
            proposal(0, 22, 69.0),
        ])]);
        let oracle = LengthTmOracle::default();

        let probe = run(&generator, &oracle).unwrap();

        assert_eq!(probe.start(), 22);
        assert_eq!(probe.len(), 22);
        assert_eq!(probe.tm(), 69.0);
        assert_eq!(generator.bands(), vec![(66.0, 69.0, 72.0)]);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_strict_tier_triggers_one_relaxed_retry() {
        let generator =
            ScriptedGenerator::new(vec![Ok(Vec::new()), Ok(vec![proposal(0, 22, 65.0)])]);
        let oracle = LengthTmOracle::default();

        let probe = run(&generator, &oracle).unwrap();

        assert_eq!(probe.start(), 22);
        assert_eq!(probe.tm(), 65.0);
        assert_eq!(generator.bands(), vec![(66.0, 69.0, 72.0), (64.0, 69.0, 72.0)]);
    }

    #[test]
    fn proposals_failing_hard_filters_fall_through_to_windowed_search() {
        let cold = proposal(0, 22, 59.0);
        let generator = ScriptedGenerator::new(vec![Ok(vec![cold.clone()]), Ok(vec![cold])]);
        let oracle = LengthTmOracle::default();

        let probe = run(&generator, &oracle).unwrap();

        assert_eq!(generator.bands().len(), 2);
        assert!(probe.tm() > 60.0);
        assert!(oracle.calls.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn unsupported_internal_mode_skips_the_retry() {
        let generator = ScriptedGenerator::new(vec![Err(GeneratorError::Unsupported(
            "internal oligo design",
        ))]);
        let oracle = LengthTmOracle::default();

        assert!(run(&generator, &oracle).is_some());
        assert_eq!(generator.bands().len(), 1);
    }
}
