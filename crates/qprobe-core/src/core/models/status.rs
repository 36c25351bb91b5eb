use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QcStatus {
    Pass,
    Warn,
    Fail,
}

impl QcStatus {
    /// Classifies a value against a pass band nested inside a warn band (both inclusive).
    pub fn from_band(value: f64, pass: (f64, f64), warn: (f64, f64)) -> Self {
        if pass.0 <= value && value <= pass.1 {
            QcStatus::Pass
        } else if warn.0 <= value && value <= warn.1 {
            QcStatus::Warn
        } else {
            QcStatus::Fail
        }
    }

    /// Classifies a free energy where more negative is worse: strictly above
    /// `pass_above` passes, strictly above `warn_above` warns.
    pub fn from_energy(dg: f64, pass_above: f64, warn_above: f64) -> Self {
        if dg > pass_above {
            QcStatus::Pass
        } else if dg > warn_above {
            QcStatus::Warn
        } else {
            QcStatus::Fail
        }
    }

    /// Classifies a non-negative magnitude where smaller is better (inclusive limits).
    pub fn from_upper_limit(value: f64, pass_max: f64, warn_max: f64) -> Self {
        if value <= pass_max {
            QcStatus::Pass
        } else if value <= warn_max {
            QcStatus::Warn
        } else {
            QcStatus::Fail
        }
    }

    pub fn is_fail(self) -> bool {
        self == QcStatus::Fail
    }

    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for QcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QcStatus::Pass => "PASS",
            QcStatus::Warn => "WARN",
            QcStatus::Fail => "FAIL",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_classification_is_inclusive_at_both_edges() {
        let pass = (58.0, 62.0);
        let warn = (55.0, 65.0);
        assert_eq!(QcStatus::from_band(58.0, pass, warn), QcStatus::Pass);
        assert_eq!(QcStatus::from_band(62.0, pass, warn), QcStatus::Pass);
        assert_eq!(QcStatus::from_band(55.0, pass, warn), QcStatus::Warn);
        assert_eq!(QcStatus::from_band(65.1, pass, warn), QcStatus::Fail);
    }

    #[test]
    fn energy_classification_treats_more_negative_as_worse() {
        assert_eq!(QcStatus::from_energy(-1.5, -2.0, -4.0), QcStatus::Pass);
        assert_eq!(QcStatus::from_energy(-2.0, -2.0, -4.0), QcStatus::Warn);
        assert_eq!(QcStatus::from_energy(-3.9, -2.0, -4.0), QcStatus::Warn);
        assert_eq!(QcStatus::from_energy(-4.0, -2.0, -4.0), QcStatus::Fail);
    }

    #[test]
    fn upper_limit_classification() {
        assert_eq!(QcStatus::from_upper_limit(2.0, 2.0, 4.0), QcStatus::Pass);
        assert_eq!(QcStatus::from_upper_limit(3.0, 2.0, 4.0), QcStatus::Warn);
        assert_eq!(QcStatus::from_upper_limit(4.5, 2.0, 4.0), QcStatus::Fail);
    }

    #[test]
    fn worst_picks_the_more_severe_status() {
        assert_eq!(QcStatus::Pass.worst(QcStatus::Warn), QcStatus::Warn);
        assert_eq!(QcStatus::Fail.worst(QcStatus::Pass), QcStatus::Fail);
        assert!(QcStatus::Fail.is_fail());
    }

    #[test]
    fn serializes_as_lowercase_label() {
        let json = serde_json::to_string(&QcStatus::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        assert_eq!(QcStatus::Fail.to_string(), "FAIL");
    }
}
