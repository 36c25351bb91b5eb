use crate::core::generator::{OrEmpty, PrimerGenerator};
use crate::core::models::pair::PrimerPair;
use crate::core::models::result::DesignResult;
use crate::core::sequence::{self, TemplateIndex};
use crate::core::thermo::ThermoOracle;
use crate::core::thermo::adapter::ThermoAdapter;
use crate::engine::analysis;
use crate::engine::config::DesignConfig;
use crate::engine::error::EngineError;
use crate::engine::probe::ProbeSearch;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::ranking;
use crate::engine::scoring;
use tracing::{info, instrument};

/// Pairs requested from the generator per pair kept in the final result.
const PROPOSAL_OVERSAMPLING: usize = 2;

/// Designs, scores and ranks primer pairs with probes for one target.
///
/// The generator is asked for twice the configured number of pairs; only the best
/// `config.num_pairs` survive ranking.
#[instrument(skip_all, name = "design_workflow", fields(target = target_name))]
pub fn run(
    target_name: &str,
    template: &str,
    generator: &dyn PrimerGenerator,
    oracle: &dyn ThermoOracle,
    config: &DesignConfig,
    reporter: &ProgressReporter,
) -> Result<DesignResult, EngineError> {
    config.validate()?;
    let template = prepare_template(target_name, template)?;
    let adapter = ThermoAdapter::new(oracle);

    let proposals = reporter.phase("Primer Generation", || {
        let constraints = config
            .thresholds
            .pair_constraints(config.num_pairs * PROPOSAL_OVERSAMPLING);
        generator
            .design(&template, &constraints)
            .or_empty("primer pair design")
    });
    info!(proposals = proposals.len(), "Received primer pair proposals.");

    let pairs = reporter.phase("Thermodynamic Analysis", || {
        proposals
            .iter()
            .map(|proposal| analysis::pair_from_proposal(proposal, &adapter))
            .collect::<Vec<_>>()
    });

    let mut pairs = complete(&template, pairs, Some(generator), &adapter, config, reporter);
    pairs.truncate(config.num_pairs);

    info!(pairs = pairs.len(), "Design complete.");
    Ok(DesignResult::new(target_name, &template, pairs))
}

/// Re-evaluates existing primer pairs against a template without the generator.
///
/// Probes already attached to a pair are kept; the others are searched for.
#[instrument(skip_all, name = "evaluate_workflow", fields(target = target_name))]
pub fn evaluate(
    target_name: &str,
    template: &str,
    mut pairs: Vec<PrimerPair>,
    oracle: &dyn ThermoOracle,
    config: &DesignConfig,
    reporter: &ProgressReporter,
) -> Result<DesignResult, EngineError> {
    config.validate()?;
    let template = prepare_template(target_name, template)?;
    let adapter = ThermoAdapter::new(oracle);

    reporter.phase("Thermodynamic Analysis", || {
        for pair in pairs.iter_mut() {
            analysis::analyze_pair(pair, &adapter);
        }
    });

    let pairs = complete(&template, pairs, None, &adapter, config, reporter);
    info!(pairs = pairs.len(), "Evaluation complete.");
    Ok(DesignResult::new(target_name, &template, pairs))
}

fn prepare_template(target_name: &str, template: &str) -> Result<String, EngineError> {
    let template = sequence::normalize(template);
    if template.is_empty() {
        return Err(EngineError::EmptyTemplate(target_name.to_string()));
    }
    Ok(template)
}

fn complete(
    template: &str,
    mut pairs: Vec<PrimerPair>,
    generator: Option<&dyn PrimerGenerator>,
    adapter: &ThermoAdapter,
    config: &DesignConfig,
    reporter: &ProgressReporter,
) -> Vec<PrimerPair> {
    if config.design_probes {
        place_probes(template, &mut pairs, generator, adapter, config, reporter);
    }

    reporter.phase("Scoring", || {
        scoring::score_pairs(&mut pairs, &config.thresholds, &config.scoring_policy);
        ranking::rank_in_place(&mut pairs);
    });
    pairs
}

fn place_probes(
    template: &str,
    pairs: &mut [PrimerPair],
    generator: Option<&dyn PrimerGenerator>,
    adapter: &ThermoAdapter,
    config: &DesignConfig,
    reporter: &ProgressReporter,
) {
    reporter.report(Progress::PhaseStart {
        name: "Probe Placement",
    });
    reporter.report(Progress::TaskStart {
        total_steps: pairs.len() as u64,
    });

    let index = TemplateIndex::new(template, config.thresholds.probe.max_homopolymer);
    let mut search = ProbeSearch::new(
        &index,
        &config.thresholds.probe,
        &config.probe_search,
        *adapter,
    );
    if let Some(generator) = generator {
        search = search.with_generator(generator);
    }

    for pair in pairs.iter_mut() {
        if pair.probe.is_none() {
            pair.probe = search.find(pair);
        }
        reporter.report(Progress::TaskIncrement);
    }

    let with_probe = pairs.iter().filter(|p| p.probe.is_some()).count();
    info!(with_probe, total = pairs.len(), "Probe placement finished.");

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::generator::{GeneratorError, OligoSite, PairConstraints, PairProposal};
    use crate::core::models::primer::Primer;
    use crate::core::models::probe::Probe;
    use crate::core::thermo::OracleError;
    use crate::engine::config::DesignConfigBuilder;
    use crate::engine::scoring::ScoringPolicy;
    use std::sync::Mutex;

    pub(crate) const TEMPLATE: &str = concat!(
        "ATGCGTACGTTAGCCTAGGA",
        "TCCAGTACGATCGGATCCTAGCATCGATGCTAGCTACGATCAGT",
        "CTGACGATCGTAGCTAGGCTAACG"
    );

    /// Tm from length, neutral structures.
    pub(crate) struct LengthOracle;

    impl ThermoOracle for LengthOracle {
        fn tm(&self, sequence: &str) -> Result<f64, OracleError> {
            Ok(45.0 + sequence.len() as f64)
        }
        fn hairpin_dg(&self, _sequence: &str) -> Result<f64, OracleError> {
            Ok(0.0)
        }
        fn homodimer_dg(&self, _sequence: &str) -> Result<f64, OracleError> {
            Ok(0.0)
        }
        fn heterodimer_dg(&self, _first: &str, _second: &str) -> Result<f64, OracleError> {
            Ok(0.0)
        }
    }

    /// Proposes primers cut from the template itself; records the requested count.
    pub(crate) struct TemplateGenerator {
        pub requested: Mutex<Vec<usize>>,
    }

    impl TemplateGenerator {
        pub(crate) fn new() -> Self {
            Self {
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    fn site(template: &str, start: usize, len: usize, tm: f64) -> OligoSite {
        OligoSite {
            sequence: template[start..start + len].to_string(),
            start,
            tm: Some(tm),
            gc_percent: None,
            hairpin_tm: Some(0.0),
            self_dimer_tm: Some(0.0),
        }
    }

    impl PrimerGenerator for TemplateGenerator {
        fn design(
            &self,
            template: &str,
            constraints: &PairConstraints,
        ) -> Result<Vec<PairProposal>, GeneratorError> {
            self.requested.lock().unwrap().push(constraints.num_return);
            if template.len() < 88 {
                return Err(GeneratorError::Failed("template too short".into()));
            }
            Ok(vec![
                PairProposal {
                    forward: site(template, 0, 20, 60.0),
                    reverse: site(template, 64, 20, 60.0),
                    product_size: 84,
                    cross_dimer_tm: Some(0.0),
                },
                PairProposal {
                    forward: site(template, 0, 20, 57.0),
                    reverse: site(template, 30, 20, 63.0),
                    product_size: 50,
                    cross_dimer_tm: Some(0.0),
                },
            ])
        }
    }

    fn config(num_pairs: usize) -> DesignConfig {
        DesignConfigBuilder::new().num_pairs(num_pairs).build().unwrap()
    }

    #[test]
    fn run_designs_ranks_and_attaches_probes() {
        let generator = TemplateGenerator::new();
        let result = run(
            "demo",
            &TEMPLATE.to_lowercase(),
            &generator,
            &LengthOracle,
            &config(5),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.target_name(), "demo");
        assert_eq!(result.target_sequence(), TEMPLATE);
        assert_eq!(result.num_pairs(), 2);
        assert_eq!(*generator.requested.lock().unwrap(), vec![10]);

        let best = result.best_pair().unwrap();
        assert_eq!(best.rank, 1);
        assert_eq!(best.forward.start, 0);
        assert_eq!(best.reverse.start, 64);
        let probe = best.probe.as_ref().expect("gap of 44 holds a probe");
        assert!(probe.tm() > best.primer_avg_tm());

        let second = &result.primer_pairs()[1];
        assert_eq!(second.rank, 2);
        assert!(second.probe.is_none());
        assert!(best.composite_score > second.composite_score);
    }

    #[test]
    fn result_is_truncated_to_the_requested_number_of_pairs() {
        let result = run(
            "demo",
            TEMPLATE,
            &TemplateGenerator::new(),
            &LengthOracle,
            &config(1),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(result.num_pairs(), 1);
        assert_eq!(result.primer_pairs()[0].rank, 1);
    }

    #[test]
    fn whitespace_only_template_is_rejected() {
        let err = run(
            "blank",
            " \n\t ",
            &TemplateGenerator::new(),
            &LengthOracle,
            &config(5),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::EmptyTemplate(name) if name == "blank"));
    }

    #[test]
    fn generator_failure_yields_an_empty_result() {
        let result = run(
            "short",
            "ACGTACGTACGT",
            &TemplateGenerator::new(),
            &LengthOracle,
            &config(5),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(result.is_empty());
        assert!(result.best_pair().is_none());
    }

    #[test]
    fn probe_design_can_be_disabled() {
        let config = DesignConfigBuilder::new()
            .design_probes(false)
            .scoring_policy(ScoringPolicy::primer_only())
            .build()
            .unwrap();
        let result = run(
            "demo",
            TEMPLATE,
            &TemplateGenerator::new(),
            &LengthOracle,
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(result.primer_pairs().iter().all(|p| p.probe.is_none()));
    }

    #[test]
    fn invalid_configuration_fails_before_any_work() {
        let mut config = config(5);
        config.thresholds.tm_min = 70.0;
        let generator = TemplateGenerator::new();
        let err = run(
            "demo",
            TEMPLATE,
            &generator,
            &LengthOracle,
            &config,
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Config { .. }));
        assert!(generator.requested.lock().unwrap().is_empty());
    }

    #[test]
    fn evaluate_keeps_existing_probes_and_searches_missing_ones() {
        let fixed = Probe::new("CAGTACGATCGGATCCTAGCAT", 22, 69.0, 50.0).unwrap();
        let with_probe = PrimerPair::new(
            Primer::new(&TEMPLATE[0..20], 0),
            Primer::new(&TEMPLATE[64..84], 64),
            84,
        )
        .with_probe(fixed.clone());
        let without_probe = PrimerPair::new(
            Primer::new(&TEMPLATE[0..20], 0),
            Primer::new(&TEMPLATE[64..84], 64),
            84,
        );

        let result = evaluate(
            "existing",
            TEMPLATE,
            vec![without_probe, with_probe],
            &LengthOracle,
            &config(5),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.num_pairs(), 2);
        assert!(result.primer_pairs().iter().all(|p| p.probe.is_some()));
        assert!(
            result
                .primer_pairs()
                .iter()
                .any(|p| p.probe.as_ref() == Some(&fixed))
        );
        assert!(result.primer_pairs().iter().all(|p| p.forward.tm == 65.0));
    }

    #[test]
    fn progress_reports_every_phase() {
        let phases = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name } = event {
                phases.lock().unwrap().push(name);
            }
        }));

        run(
            "demo",
            TEMPLATE,
            &TemplateGenerator::new(),
            &LengthOracle,
            &config(5),
            &reporter,
        )
        .unwrap();

        drop(reporter);
        assert_eq!(
            phases.into_inner().unwrap(),
            vec![
                "Primer Generation",
                "Thermodynamic Analysis",
                "Probe Placement",
                "Scoring"
            ]
        );
    }
}
