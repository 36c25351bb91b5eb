//! # Core Module
//!
//! This module provides the fundamental building blocks of qprobe: the oligonucleotide data
//! models, sequence utilities, and the adapters at the boundary to external scientific
//! collaborators.
//!
//! ## Architecture
//!
//! - **Oligonucleotide Representation** ([`models`]) - Primers, probes, primer pairs, QC status
//!   and design results
//! - **Sequence Utilities** ([`sequence`]) - Base composition, homopolymer detection, GC clamp
//!   assessment and the indexed template used by the windowed probe search
//! - **Thermodynamics** ([`thermo`]) - The oracle trait, its adapter with explicit neutral-value
//!   substitution, and the closed-form fallback formulas
//! - **Primer Generation** ([`generator`]) - The interface to the external constrained primer
//!   and internal-oligo generator
//!
//! ## Scientific Foundation
//!
//! - **Nearest-neighbour thermodynamics** is delegated to an external oracle; this crate only
//!   consumes melting temperatures and free energies.
//! - **Wallace-rule melting temperature** provides a closed-form fallback when the oracle
//!   is unavailable.
//! - **TaqMan chemistry constraints** (no 5′ guanine, probe hotter than primers) are encoded as
//!   structural rules on the probe model.

pub mod generator;
pub mod models;
pub mod sequence;
pub mod thermo;
