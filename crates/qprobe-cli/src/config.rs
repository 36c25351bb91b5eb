use crate::cli::SettingsArgs;
use crate::error::{CliError, Result};
use qprobe::engine::config::{
    DesignConfig, DesignConfigBuilder, ProbeSearchConfig, QcThresholds,
};
use qprobe::engine::scoring::{ScoringPolicy, WeightTable};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialPrimerConfig {
    tm_opt: Option<f64>,
    tm_min: Option<f64>,
    tm_max: Option<f64>,
    tm_warn_min: Option<f64>,
    tm_warn_max: Option<f64>,
    tm_diff_max: Option<f64>,
    tm_diff_warn: Option<f64>,
    gc_opt: Option<f64>,
    gc_min: Option<f64>,
    gc_max: Option<f64>,
    gc_warn_min: Option<f64>,
    gc_warn_max: Option<f64>,
    length_min: Option<usize>,
    length_opt: Option<usize>,
    length_max: Option<usize>,
    preferred_3prime: Option<String>,
    avoid_3prime: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialStructureConfig {
    hairpin_dg_max: Option<f64>,
    hairpin_dg_warn: Option<f64>,
    self_dimer_dg_max: Option<f64>,
    self_dimer_dg_warn: Option<f64>,
    cross_dimer_dg_max: Option<f64>,
    cross_dimer_dg_warn: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialProductConfig {
    min: Option<usize>,
    opt: Option<usize>,
    max: Option<usize>,
    warn_min: Option<usize>,
    warn_max: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialProbeConfig {
    tm_delta_ideal_min: Option<f64>,
    tm_delta_ideal_max: Option<f64>,
    tm_delta_min: Option<f64>,
    tm_delta_max: Option<f64>,
    gc_min: Option<f64>,
    gc_max: Option<f64>,
    gc_warn_min: Option<f64>,
    gc_warn_max: Option<f64>,
    length_min: Option<usize>,
    length_max: Option<usize>,
    max_homopolymer: Option<usize>,
    near_offset: Option<usize>,
    far_offset: Option<usize>,
    margin: Option<usize>,
    target_tm_delta: Option<f64>,
    relaxed_tm_delta_min: Option<f64>,
    max_internal_proposals: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialWeights {
    tm: Option<f64>,
    gc: Option<f64>,
    structure: Option<f64>,
    three_prime: Option<f64>,
    product: Option<f64>,
    probe: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialScoringConfig {
    policy: Option<String>,
    weights: Option<PartialWeights>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialRunConfig {
    num_pairs: Option<usize>,
    design_probes: Option<bool>,
    max_concurrency: Option<usize>,
}

/// The TOML configuration file, every key optional. Missing keys fall back to the
/// library defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialDesignConfig {
    primer: Option<PartialPrimerConfig>,
    structure: Option<PartialStructureConfig>,
    product: Option<PartialProductConfig>,
    probe: Option<PartialProbeConfig>,
    scoring: Option<PartialScoringConfig>,
    design: Option<PartialRunConfig>,
}

macro_rules! overlay {
    ($target:expr, $source:expr, { $($to:ident <- $from:ident),* $(,)? }) => {
        $( if let Some(value) = $source.$from { $target.$to = value; } )*
    };
}

impl PartialDesignConfig {
    /// Loads the optional config file and applies `--set` overrides on top of it.
    pub fn load(path: Option<&Path>, set_values: &[String]) -> Result<Self> {
        let mut table = match path {
            Some(path) => read_table(path)?,
            None => toml::Table::new(),
        };
        apply_set_values(&mut table, set_values)?;
        toml::Value::Table(table)
            .try_into()
            .map_err(|e| CliError::Config(format!("Invalid configuration: {}", e)))
    }

    pub fn merge_with_cli(
        self,
        settings: &SettingsArgs,
        threads: Option<usize>,
    ) -> Result<DesignConfig> {
        let design = self.design.unwrap_or_default();
        let thresholds = merge_thresholds(
            self.primer.unwrap_or_default(),
            self.structure.unwrap_or_default(),
            self.product.unwrap_or_default(),
            self.probe.as_ref(),
        );
        let probe_search = merge_probe_search(self.probe.as_ref());
        let policy = merge_policy(
            settings.policy.as_deref(),
            self.scoring.unwrap_or_default(),
        )?;

        let mut builder = DesignConfigBuilder::new()
            .thresholds(thresholds)
            .probe_search(probe_search)
            .scoring_policy(policy)
            .num_pairs(
                settings
                    .num_pairs
                    .or(design.num_pairs)
                    .unwrap_or(DesignConfigBuilder::DEFAULT_NUM_PAIRS),
            )
            .design_probes(!settings.no_probes && design.design_probes.unwrap_or(true));

        if let Some(threads) = threads.or(design.max_concurrency) {
            builder = builder.max_concurrency(threads);
        }

        let config = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;
        debug!("Effective design configuration: {:?}", config);
        Ok(config)
    }
}

fn read_table(path: &Path) -> Result<toml::Table> {
    debug!("Loading configuration from file: {:?}", path);
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn merge_thresholds(
    primer: PartialPrimerConfig,
    structure: PartialStructureConfig,
    product: PartialProductConfig,
    probe: Option<&PartialProbeConfig>,
) -> QcThresholds {
    let mut t = QcThresholds::default();
    overlay!(t, primer, {
        tm_optimal <- tm_opt,
        tm_min <- tm_min,
        tm_max <- tm_max,
        tm_warn_min <- tm_warn_min,
        tm_warn_max <- tm_warn_max,
        tm_diff_max <- tm_diff_max,
        tm_diff_warn <- tm_diff_warn,
        gc_optimal <- gc_opt,
        gc_min <- gc_min,
        gc_max <- gc_max,
        gc_warn_min <- gc_warn_min,
        gc_warn_max <- gc_warn_max,
        length_min <- length_min,
        length_optimal <- length_opt,
        length_max <- length_max,
    });
    if let Some(bases) = primer.preferred_3prime {
        t.preferred_3prime = parse_bases(&bases);
    }
    if let Some(bases) = primer.avoid_3prime {
        t.avoid_3prime = parse_bases(&bases);
    }

    overlay!(t, structure, {
        hairpin_dg_max <- hairpin_dg_max,
        hairpin_dg_warn <- hairpin_dg_warn,
        self_dimer_dg_max <- self_dimer_dg_max,
        self_dimer_dg_warn <- self_dimer_dg_warn,
        cross_dimer_dg_max <- cross_dimer_dg_max,
        cross_dimer_dg_warn <- cross_dimer_dg_warn,
    });

    overlay!(t, product, {
        product_min <- min,
        product_optimal <- opt,
        product_max <- max,
        product_warn_min <- warn_min,
        product_warn_max <- warn_max,
    });

    if let Some(probe) = probe {
        overlay!(t.probe, probe, {
            tm_delta_ideal_min <- tm_delta_ideal_min,
            tm_delta_ideal_max <- tm_delta_ideal_max,
            tm_delta_min <- tm_delta_min,
            tm_delta_max <- tm_delta_max,
            gc_min <- gc_min,
            gc_max <- gc_max,
            gc_warn_min <- gc_warn_min,
            gc_warn_max <- gc_warn_max,
            length_min <- length_min,
            length_max <- length_max,
            max_homopolymer <- max_homopolymer,
            near_offset <- near_offset,
            far_offset <- far_offset,
        });
    }
    t
}

// Probe length bounds are shared by the QC thresholds and the search.
fn merge_probe_search(probe: Option<&PartialProbeConfig>) -> ProbeSearchConfig {
    let mut config = ProbeSearchConfig::default();
    if let Some(probe) = probe {
        overlay!(config, probe, {
            min_length <- length_min,
            max_length <- length_max,
            margin <- margin,
            target_tm_delta <- target_tm_delta,
            relaxed_tm_delta_min <- relaxed_tm_delta_min,
            max_internal_proposals <- max_internal_proposals,
        });
    }
    config
}

fn merge_policy(cli_policy: Option<&str>, scoring: PartialScoringConfig) -> Result<ScoringPolicy> {
    let name = cli_policy.or(scoring.policy.as_deref());
    let preset = match name {
        Some(name) => ScoringPolicy::by_name(name).map_err(|e| CliError::Config(e.to_string()))?,
        None => ScoringPolicy::default(),
    };

    let Some(weights) = scoring.weights else {
        return Ok(preset);
    };
    let mut table: WeightTable = *preset.weights();
    overlay!(table, weights, {
        tm <- tm,
        gc <- gc,
        structure <- structure,
        three_prime <- three_prime,
        product <- product,
    });
    if weights.probe.is_some() {
        table.probe = weights.probe;
    }
    ScoringPolicy::custom("custom", table).map_err(|e| CliError::Config(e.to_string()))
}

fn parse_bases(bases: &str) -> Vec<char> {
    bases
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Writes each `section.key=value` into the raw table. Values are read as TOML scalars,
/// falling back to a plain string.
fn apply_set_values(table: &mut toml::Table, set_values: &[String]) -> Result<()> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        let path: Vec<&str> = key.trim().split('.').collect();
        if path.iter().any(|segment| segment.is_empty()) {
            return Err(CliError::Config(format!(
                "Invalid configuration key for --set: '{}'",
                key
            )));
        }

        let mut current = &mut *table;
        for section in &path[..path.len() - 1] {
            let entry = current
                .entry(section.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            current = entry.as_table_mut().ok_or_else(|| {
                CliError::Config(format!(
                    "Cannot set '{}': '{}' is not a section.",
                    key, section
                ))
            })?;
        }
        let leaf = path[path.len() - 1];
        current.insert(leaf.to_string(), parse_scalar(value_str.trim()));
    }
    Ok(())
}

fn parse_scalar(raw: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("v = {}", raw))
        .ok()
        .and_then(|mut parsed| parsed.remove("v"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}
