//! # Core Models Module
//!
//! This module contains the data structures used to represent oligonucleotide candidates
//! and design outcomes in qprobe.
//!
//! ## Overview
//!
//! The models carry sequence, template coordinates and the thermodynamic values populated
//! by the oracle adapter. Terminal bases, Tm difference and primer average Tm are derived
//! on demand and never stored.
//!
//! ## Key Components
//!
//! - [`primer`] - A single PCR primer with its thermodynamic profile
//! - [`probe`] - A TaqMan hybridization probe; construction enforces the no-5′-G rule
//! - [`pair`] - A forward/reverse primer pair with pair-level metrics and its optional probe
//! - [`result`] - The ranked outcome of designing one target sequence
//! - [`status`] - The pass/warn/fail classification shared by QC reports and scoring
//!
//! ## Usage
//!
//! ```ignore
//! use qprobe::core::models::{pair::PrimerPair, primer::Primer};
//!
//! let forward = Primer::new("ACGTGCTAGCTAGGCTAGCG", 10).with_thermo(60.1, 55.0);
//! let reverse = Primer::new("GCTAGCTTAGCGATCGATCC", 110).with_thermo(59.8, 50.0);
//! let pair = PrimerPair::new(forward, reverse, 120);
//! assert!((pair.tm_difference() - 0.3).abs() < 1e-9);
//! ```

pub mod pair;
pub mod primer;
pub mod probe;
pub mod result;
pub mod status;
