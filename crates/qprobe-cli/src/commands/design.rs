use crate::cli::DesignArgs;
use crate::config::PartialDesignConfig;
use crate::error::{CliError, Result};
use crate::report::DesignReport;
use crate::request::{self, DesignRequest, ProposalTable};
use crate::utils::progress::CliProgressHandler;
use qprobe::core::thermo::closed_form::ClosedFormOracle;
use qprobe::engine::progress::ProgressReporter;
use qprobe::workflows;
use tracing::{info, warn};

pub fn run(args: DesignArgs, threads: Option<usize>) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config =
        PartialDesignConfig::load(args.settings.config.as_deref(), &args.settings.set_values)?
            .merge_with_cli(&args.settings, threads)?;

    info!("Loading design request from {:?}", &args.input);
    let request: DesignRequest = request::read_json(&args.input)?;
    request.validate()?;
    if request.targets.is_empty() {
        return Err(CliError::Request("The request contains no targets.".to_string()));
    }

    let generator = ProposalTable::from_targets(&request.targets);
    let targets = request.design_targets();

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!(
        targets = targets.len(),
        policy = config.scoring_policy.name(),
        "Invoking the batch design workflow..."
    );
    let outcomes =
        workflows::batch::run(&targets, &generator, &ClosedFormOracle, &config, &reporter)?;

    let report = DesignReport::build(&outcomes, &config);
    report.write(args.output.as_deref())?;

    let failed = report.failed_targets();
    if failed > 0 {
        warn!(failed, "Some targets could not be designed.");
    }
    if let Some(path) = &args.output {
        for line in report.summary_lines() {
            println!("{}", line);
        }
        println!("Results written to: {}", path.display());
    }

    Ok(())
}
