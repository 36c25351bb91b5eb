use crate::cli::EvaluateArgs;
use crate::config::PartialDesignConfig;
use crate::error::{CliError, Result};
use crate::report::DesignReport;
use crate::request::{self, EvaluateRequest, TargetPairs};
use crate::utils::progress::CliProgressHandler;
use qprobe::core::models::result::DesignResult;
use qprobe::core::sequence;
use qprobe::core::thermo::closed_form::ClosedFormOracle;
use qprobe::engine::config::DesignConfig;
use qprobe::engine::progress::ProgressReporter;
use qprobe::workflows;
use qprobe::workflows::batch::{EvaluateTarget, TargetOutcome};
use tracing::{info, warn};

pub fn run(args: EvaluateArgs, threads: Option<usize>) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config =
        PartialDesignConfig::load(args.settings.config.as_deref(), &args.settings.set_values)?
            .merge_with_cli(&args.settings, threads)?;

    info!("Loading evaluation request from {:?}", &args.input);
    let request: EvaluateRequest = request::read_json(&args.input)?;
    request.validate()?;
    if request.targets.is_empty() {
        return Err(CliError::Request("The request contains no targets.".to_string()));
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let outcomes = evaluate_all(&request.targets, &config, &reporter)?;

    let report = DesignReport::build(&outcomes, &config);
    report.write(args.output.as_deref())?;

    let failed = report.failed_targets();
    if failed > 0 {
        warn!(failed, "Some targets could not be evaluated.");
    }
    if let Some(path) = &args.output {
        for line in report.summary_lines() {
            println!("{}", line);
        }
        println!("Results written to: {}", path.display());
    }

    Ok(())
}

/// Converts every target's pairs up front; targets whose input cannot be converted are
/// reported as failed without reaching the workflow.
fn evaluate_all(
    targets: &[TargetPairs],
    config: &DesignConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<TargetOutcome>> {
    let prepared: Vec<std::result::Result<EvaluateTarget, TargetOutcome>> =
        targets.iter().map(prepare_target).collect();
    let runnable: Vec<EvaluateTarget> = prepared
        .iter()
        .filter_map(|p| p.as_ref().ok().cloned())
        .collect();

    let mut evaluated =
        workflows::batch::evaluate(&runnable, &ClosedFormOracle, config, reporter)?.into_iter();

    Ok(prepared
        .into_iter()
        .filter_map(|p| match p {
            Ok(_) => evaluated.next(),
            Err(rejected) => Some(rejected),
        })
        .collect())
}

fn prepare_target(target: &TargetPairs) -> std::result::Result<EvaluateTarget, TargetOutcome> {
    let pairs = target
        .pairs
        .iter()
        .map(|input| input.to_pair())
        .collect::<Result<Vec<_>>>();

    match pairs {
        Ok(pairs) => Ok(EvaluateTarget {
            name: target.name.clone(),
            sequence: target.sequence.clone(),
            pairs,
        }),
        Err(err) => {
            warn!(target = %target.name, error = %err, "Target input rejected.");
            Err(TargetOutcome {
                result: DesignResult::empty(&target.name, &sequence::normalize(&target.sequence)),
                error: Some(err.to_string()),
            })
        }
    }
}
