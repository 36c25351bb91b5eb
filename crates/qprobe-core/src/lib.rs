//! # qprobe Core Library
//!
//! Probe placement and composite scoring for quantitative PCR assay design. Given a target
//! sequence and primer pairs proposed by an external primer generator, the library places a
//! TaqMan hybridization probe between each pair, scores every pair on a 0–100 fitness scale
//! and produces a stable ranking.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Primer`, `Probe`, `PrimerPair`),
//!   sequence utilities, and the boundaries to the two external collaborators: the
//!   thermodynamics oracle ([`core::thermo`]) and the constrained primer generator
//!   ([`core::generator`]).
//!
//! - **[`engine`]: The Logic Core.** Configuration and validation, thermodynamic enrichment,
//!   QC classification, the tiered probe placement search, the composite scoring engine
//!   and ranking.
//!
//! - **[`workflows`]: The Public API.** End-to-end design of one target or a batch of
//!   targets, tying the `engine` and `core` together.

pub mod core;
pub mod engine;
pub mod workflows;
