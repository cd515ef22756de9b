//! Weighted multi-criteria scoring for urban design proposals.
//!
//! Proposals carry raw indicator values, a [`weights::WeightConfiguration`] assigns relative
//! importance per indicator and per category, and the [`scoring`] engine turns both into
//! normalized, ranked scores. [`board::ProposalBoard`] keeps the live state and recomputes
//! results after every change.

pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod proposals;
pub mod results;
pub mod scoring;
pub mod telemetry;
pub mod weights;
