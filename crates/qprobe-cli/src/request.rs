use crate::error::{CliError, Result};
use qprobe::core::generator::{GeneratorError, PairConstraints, PairProposal, PrimerGenerator};
use qprobe::core::models::pair::PrimerPair;
use qprobe::core::models::primer::Primer;
use qprobe::core::models::probe::Probe;
use qprobe::core::sequence;
use qprobe::workflows::batch::DesignTarget;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

/// Targets together with the primer pair proposals an external generator produced for them.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DesignRequest {
    pub targets: Vec<TargetProposals>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TargetProposals {
    pub name: String,
    pub sequence: String,
    #[serde(default)]
    pub proposals: Vec<PairProposal>,
}

/// Targets with existing assays to re-evaluate.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct EvaluateRequest {
    pub targets: Vec<TargetPairs>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TargetPairs {
    pub name: String,
    pub sequence: String,
    pub pairs: Vec<PairInput>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct OligoInput {
    pub sequence: String,
    pub start: usize,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PairInput {
    pub forward: OligoInput,
    pub reverse: OligoInput,
    #[serde(default)]
    pub probe: Option<OligoInput>,
}

impl PairInput {
    /// Builds an unanalyzed pair; the product spans from the forward start to the reverse end.
    pub fn to_pair(&self) -> Result<PrimerPair> {
        let forward = Primer::new(&self.forward.sequence, self.forward.start);
        let reverse = Primer::new(&self.reverse.sequence, self.reverse.start);
        let product_size = reverse.end.checked_sub(forward.start).ok_or_else(|| {
            CliError::Request(format!(
                "Reverse primer at {} ends before the forward primer at {} starts.",
                reverse.start, forward.start
            ))
        })?;

        let mut pair = PrimerPair::new(forward, reverse, product_size);
        if let Some(probe) = &self.probe {
            let probe = Probe::new(&probe.sequence, probe.start, 0.0, 0.0)
                .map_err(|e| CliError::Request(e.to_string()))?;
            pair = pair.with_probe(probe);
        }
        Ok(pair)
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Reading request from file: {:?}", path);
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Target names identify results, so they must be present and unique.
pub fn check_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(CliError::Request("Every target needs a name.".to_string()));
        }
        if !seen.insert(name) {
            return Err(CliError::Request(format!(
                "Target name '{}' appears more than once.",
                name
            )));
        }
    }
    Ok(())
}

impl DesignRequest {
    pub fn validate(&self) -> Result<()> {
        check_names(self.targets.iter().map(|t| t.name.as_str()))
    }

    pub fn design_targets(&self) -> Vec<DesignTarget> {
        self.targets
            .iter()
            .map(|t| DesignTarget::new(t.name.clone(), t.sequence.clone()))
            .collect()
    }
}

impl EvaluateRequest {
    pub fn validate(&self) -> Result<()> {
        check_names(self.targets.iter().map(|t| t.name.as_str()))
    }
}

/// Serves pre-computed proposals as the primer generator, keyed by normalized template.
#[derive(Debug, Default)]
pub struct ProposalTable {
    by_template: HashMap<String, Vec<PairProposal>>,
}

impl ProposalTable {
    pub fn from_targets(targets: &[TargetProposals]) -> Self {
        let mut by_template: HashMap<String, Vec<PairProposal>> = HashMap::new();
        for target in targets {
            let entry = by_template
                .entry(sequence::normalize(&target.sequence))
                .or_default();
            if !entry.is_empty() {
                warn!(
                    target = %target.name,
                    "Template shared with another target; proposals are pooled."
                );
            }
            entry.extend(target.proposals.iter().cloned());
        }
        Self { by_template }
    }
}

impl PrimerGenerator for ProposalTable {
    fn design(
        &self,
        template: &str,
        constraints: &PairConstraints,
    ) -> std::result::Result<Vec<PairProposal>, GeneratorError> {
        let proposals = self.by_template.get(template).ok_or_else(|| {
            GeneratorError::Failed("no proposals were supplied for this template".to_string())
        })?;
        Ok(proposals
            .iter()
            .take(constraints.num_return)
            .cloned()
            .collect())
    }
}
