use crate::error::Result;
use qprobe::core::models::pair::PrimerPair;
use qprobe::core::models::status::QcStatus;
use qprobe::engine::config::DesignConfig;
use qprobe::engine::qc::PairQcReport;
use qprobe::engine::scoring::{self, ScoreBreakdown};
use qprobe::workflows::batch::TargetOutcome;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// The JSON document written by every command.
#[derive(Serialize, Debug)]
pub struct DesignReport {
    pub version: &'static str,
    pub scoring_policy: String,
    pub targets: Vec<TargetReport>,
}

#[derive(Serialize, Debug)]
pub struct TargetReport {
    pub target_name: String,
    pub target_sequence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub pairs: Vec<PairReport>,
}

#[derive(Serialize, Debug)]
pub struct PairReport {
    pub rank: usize,
    pub composite_score: f64,
    pub breakdown: ScoreBreakdown,
    pub overall_qc: QcStatus,
    pub qc: PairQcReport,
    pub pair: PrimerPair,
}

impl PairReport {
    fn new(pair: &PrimerPair, config: &DesignConfig) -> Self {
        let card = scoring::score(pair, &config.thresholds, &config.scoring_policy);
        let qc = PairQcReport::evaluate(pair, &config.thresholds);
        Self {
            rank: pair.rank,
            composite_score: pair.composite_score,
            breakdown: card.breakdown.rounded(),
            overall_qc: qc.overall(),
            qc,
            pair: pair.clone(),
        }
    }
}

impl DesignReport {
    pub fn build(outcomes: &[TargetOutcome], config: &DesignConfig) -> Self {
        let targets = outcomes
            .iter()
            .map(|outcome| TargetReport {
                target_name: outcome.result.target_name().to_string(),
                target_sequence: outcome.result.target_sequence().to_string(),
                error: outcome.error.clone(),
                pairs: outcome
                    .result
                    .primer_pairs()
                    .iter()
                    .map(|pair| PairReport::new(pair, config))
                    .collect(),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION"),
            scoring_policy: config.scoring_policy.name().to_string(),
            targets,
        }
    }

    pub fn failed_targets(&self) -> usize {
        self.targets.iter().filter(|t| t.error.is_some()).count()
    }

    /// Writes pretty-printed JSON to `path`, or to stdout when no path is given.
    pub fn write(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                let mut file = std::fs::File::create(path)?;
                serde_json::to_writer_pretty(&mut file, self).map_err(std::io::Error::from)?;
                writeln!(file)?;
            }
            None => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                serde_json::to_writer_pretty(&mut lock, self).map_err(std::io::Error::from)?;
                writeln!(lock)?;
            }
        }
        Ok(())
    }

    /// One line per target with its best pair, for the terminal.
    pub fn summary_lines(&self) -> Vec<String> {
        self.targets
            .iter()
            .map(|target| match (&target.error, target.pairs.first()) {
                (Some(error), _) => format!("✗ {}: {}", target.target_name, error),
                (None, None) => format!("- {}: no primer pairs", target.target_name),
                (None, Some(best)) => format!(
                    "✓ {}: {} pair(s), best score {:.1} (QC {}){}",
                    target.target_name,
                    target.pairs.len(),
                    best.composite_score,
                    best.overall_qc,
                    if best.pair.probe.is_some() {
                        ", with probe"
                    } else {
                        ""
                    }
                ),
            })
            .collect()
    }
}
