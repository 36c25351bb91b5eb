//! # Engine Module
//!
//! This module implements the decision logic of qprobe: it turns raw primer proposals into
//! analyzed, probe-bearing, scored and ranked primer pairs.
//!
//! ## Overview
//!
//! The engine consumes the stateless models and collaborator boundaries of [`crate::core`]
//! and applies the domain rules of qPCR assay design on top of them. Every stage is a pure
//! function of its inputs and the immutable configuration, so pairs and targets can be
//! processed independently and in parallel.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - QC threshold bands, probe search parameters and the
//!   design configuration, all validated at construction time
//! - **Enrichment** ([`analysis`]) - Thermodynamic properties of primers, pairs and probes
//!   through the oracle adapter, preferring generator-provided values
//! - **Quality Control** ([`qc`]) - Pass/warn/fail classification of every primer, pair and
//!   probe property, plus GC clamp assessment
//! - **Probe Placement** ([`probe`]) - Tiered search for the best TaqMan probe between the
//!   primers of a pair
//! - **Scoring** ([`scoring`]) - Policy-weighted composite fitness score with an itemized
//!   breakdown
//! - **Ranking** ([`ranking`]) - Stable ordering of scored pairs with 1-based ranks
//! - **Progress Monitoring** ([`progress`]) - Progress events for outer layers
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Failure Model
//!
//! - **Oracle failures** never surface as errors; they become closed-form fallbacks or
//!   neutral values at an explicit call site.
//! - **Missing probes** are absent results, not errors.
//! - **Invalid configuration** fails fast with [`config::ConfigError`] before any work starts.

pub mod analysis;
pub mod config;
pub mod error;
pub mod probe;
pub mod progress;
pub mod qc;
pub mod ranking;
pub mod scoring;
