use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ModelError {
    #[error("Probe sequence cannot be empty")]
    EmptyProbe,
    #[error("Probe '{0}' starts with G, which quenches the 5' reporter")]
    FivePrimeGuanine(String),
}

/// A TaqMan hybridization probe.
///
/// A probe can never be constructed with a 5′ guanine; deserialization goes through the
/// same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProbeFields")]
pub struct Probe {
    sequence: String,
    start: usize,
    end: usize,
    tm: f64,
    gc_percent: f64,
}

#[derive(Deserialize)]
struct ProbeFields {
    sequence: String,
    start: usize,
    tm: f64,
    gc_percent: f64,
}

impl TryFrom<ProbeFields> for Probe {
    type Error = ModelError;

    fn try_from(fields: ProbeFields) -> Result<Self, Self::Error> {
        Probe::new(&fields.sequence, fields.start, fields.tm, fields.gc_percent)
    }
}

impl Probe {
    pub fn new(sequence: &str, start: usize, tm: f64, gc_percent: f64) -> Result<Self, ModelError> {
        let sequence = sequence.trim().to_ascii_uppercase();
        match sequence.as_bytes().first() {
            None => return Err(ModelError::EmptyProbe),
            Some(b'G') => return Err(ModelError::FivePrimeGuanine(sequence)),
            Some(_) => {}
        }
        let end = start + sequence.len();
        Ok(Self {
            sequence,
            start,
            end,
            tm,
            gc_percent,
        })
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn tm(&self) -> f64 {
        self.tm
    }

    pub fn gc_percent(&self) -> f64 {
        self.gc_percent
    }

    pub fn five_prime_base(&self) -> char {
        // Construction guarantees a non-empty sequence.
        self.sequence.as_bytes()[0] as char
    }

    pub(crate) fn set_thermo(&mut self, tm: f64, gc_percent: f64) {
        self.tm = tm;
        self.gc_percent = gc_percent;
    }
}
