//! # Workflows Module
//!
//! High-level entry points that run the complete assay design pipeline for one target or
//! for a batch of targets.
//!
//! ## Overview
//!
//! Each workflow validates its configuration up front, then drives the engine through a
//! fixed sequence of phases, reporting each one through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter):
//!
//! 1. **Primer Generation** - constrained pair proposals from the external generator.
//! 2. **Thermodynamic Analysis** - every primer and pair enriched through the oracle,
//!    reusing the values the generator already computed.
//! 3. **Probe Placement** - the tiered probe search for every pair.
//! 4. **Scoring** - composite scores followed by a stable ranking.
//!
//! ## Architecture
//!
//! - **Design Workflow** ([`design`]) - one target, from raw template to a ranked
//!   [`DesignResult`](crate::core::models::result::DesignResult). Also re-evaluates
//!   pairs supplied by the caller.
//! - **Batch Workflow** ([`batch`]) - many independent targets, designed or re-evaluated,
//!   on a bounded worker pool.
//!   A failing target produces an empty result and never aborts its siblings.
//!
//! ## Failure Semantics
//!
//! Only invalid configuration, an empty template, or an unusable worker pool are reported
//! as [`EngineError`](crate::engine::error::EngineError). Collaborator failures degrade:
//! a failed generator yields no pairs, a failed oracle query yields a fallback or neutral
//! value.

pub mod batch;
pub mod design;
