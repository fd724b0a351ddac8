//! Job Cost Allocation Engine
//!
//! This crate turns two weekly timesheet exports into a job-cost allocation:
//! hours are split into regular and overtime per employee and week, costed
//! per project (with the salaried rate adjustment for salaried employees over
//! the standard period hours), and reconciled against a reference payroll.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod report;
pub mod roster;
pub mod run;
