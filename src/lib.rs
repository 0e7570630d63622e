//! Pidsight: P&ID drawing extraction and reconciliation.
//!
//! Takes a vision model's raw read of a piping and instrumentation
//! diagram and turns it into a standards-aligned, reviewable dataset:
//! parse leniently, normalize tags against ISA-5.1/ISO conventions,
//! backfill identity for unlabeled items, validate the result, and
//! queue anything questionable for human review.

pub mod config;
pub mod db;
pub mod export;
pub mod ids;
pub mod models;
pub mod pipeline;
pub mod review;
pub mod standards;
pub mod tags;
