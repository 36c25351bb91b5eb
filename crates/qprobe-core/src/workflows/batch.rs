use super::design;
use crate::core::generator::PrimerGenerator;
use crate::core::models::pair::PrimerPair;
use crate::core::models::result::DesignResult;
use crate::core::sequence;
use crate::core::thermo::ThermoOracle;
use crate::engine::config::DesignConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A named template to design an assay for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignTarget {
    pub name: String,
    pub sequence: String,
}

impl DesignTarget {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }
}

/// The result for one target of a batch; failed targets carry an empty result and the
/// failure message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetOutcome {
    pub result: DesignResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TargetOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Caller-supplied pairs for one template, to be re-analysed and ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateTarget {
    pub name: String,
    pub sequence: String,
    pub pairs: Vec<PrimerPair>,
}

/// Designs every target independently, at most `config.max_concurrency` at a time.
///
/// Outcomes are returned in input order. A target that fails, including one whose
/// collaborators panic, yields an empty result without affecting the others.
#[instrument(skip_all, name = "batch_workflow", fields(targets = targets.len()))]
pub fn run(
    targets: &[DesignTarget],
    generator: &dyn PrimerGenerator,
    oracle: &dyn ThermoOracle,
    config: &DesignConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<TargetOutcome>, EngineError> {
    run_isolated(targets, "Batch Design", config, reporter, |target| {
        isolate(&target.name, &target.sequence, "Design", || {
            design::run(
                &target.name,
                &target.sequence,
                generator,
                oracle,
                config,
                &ProgressReporter::new(),
            )
        })
    })
}

/// Re-evaluates the pairs of every target with the same isolation and ordering
/// guarantees as [`run`].
#[instrument(skip_all, name = "batch_evaluate_workflow", fields(targets = targets.len()))]
pub fn evaluate(
    targets: &[EvaluateTarget],
    oracle: &dyn ThermoOracle,
    config: &DesignConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<TargetOutcome>, EngineError> {
    run_isolated(targets, "Assay Evaluation", config, reporter, |target| {
        isolate(&target.name, &target.sequence, "Evaluation", || {
            design::evaluate(
                &target.name,
                &target.sequence,
                target.pairs.clone(),
                oracle,
                config,
                &ProgressReporter::new(),
            )
        })
    })
}

fn run_isolated<T: Sync>(
    targets: &[T],
    phase: &'static str,
    config: &DesignConfig,
    reporter: &ProgressReporter,
    process: impl Fn(&T) -> TargetOutcome + Sync,
) -> Result<Vec<TargetOutcome>, EngineError> {
    config.validate()?;

    reporter.report(Progress::PhaseStart { name: phase });
    reporter.report(Progress::TaskStart {
        total_steps: targets.len() as u64,
    });

    let process_one = |target: &T| {
        let outcome = process(target);
        reporter.report(Progress::TargetFinished {
            name: outcome.result.target_name().to_string(),
            pairs: outcome.result.num_pairs(),
        });
        reporter.report(Progress::TaskIncrement);
        outcome
    };

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<TargetOutcome> = targets.iter().map(process_one).collect();

    #[cfg(feature = "parallel")]
    let outcomes: Vec<TargetOutcome> = {
        let work = || targets.par_iter().map(process_one).collect();
        match config.max_concurrency {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| EngineError::Initialization(e.to_string()))?
                .install(work),
            None => work(),
        }
    };

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!(
        phase,
        succeeded = outcomes.len() - failed,
        failed,
        "Batch complete."
    );
    Ok(outcomes)
}

fn isolate(
    name: &str,
    sequence: &str,
    action: &str,
    body: impl FnOnce() -> Result<DesignResult, EngineError>,
) -> TargetOutcome {
    let error = match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(result)) => {
            return TargetOutcome {
                result,
                error: None,
            };
        }
        Ok(Err(err)) => err.to_string(),
        Err(payload) => panic_message(action, payload.as_ref()),
    };

    warn!(target = %name, error = %error, "{} failed for target.", action);
    TargetOutcome {
        result: DesignResult::empty(name, &sequence::normalize(sequence)),
        error: Some(error),
    }
}

fn panic_message(action: &str, payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("{} panicked: {}", action, detail)
}
