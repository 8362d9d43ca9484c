//! Command-line front end for the estimate consolidator.
//!
//! `cellmap run` consolidates source workbooks into a copy of the target,
//! `cellmap check` reports what a run would trip over without writing, and
//! `cellmap inspect` lists sheets and headers.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod summary;
pub mod types;
