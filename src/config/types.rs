//! Configuration types for job cost allocation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `engine.yaml`. Every section and field has a
//! default, so a partial file only overrides what it names.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::WorkedTime;

/// Costing rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Weekly hours above which hourly employees earn overtime.
    pub weekly_overtime_threshold_hours: u32,
    /// Bi-weekly hours a salary covers; salaried employees above this are
    /// costed at an adjusted rate.
    pub standard_period_hours: u32,
    /// Multiplier applied to the base rate for overtime hours.
    pub overtime_multiplier: Decimal,
}

impl RulesConfig {
    /// Returns the weekly overtime threshold as worked time.
    pub fn weekly_threshold(&self) -> WorkedTime {
        WorkedTime::from_hours(self.weekly_overtime_threshold_hours)
    }

    /// Returns the standard pay-period hours as worked time.
    pub fn standard_period(&self) -> WorkedTime {
        WorkedTime::from_hours(self.standard_period_hours)
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            weekly_overtime_threshold_hours: 40,
            standard_period_hours: 80,
            overtime_multiplier: Decimal::new(15, 1),
        }
    }
}

/// Reconciliation tolerances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Largest absolute variance, in currency, still reported as ok.
    pub tolerance: Decimal,
    /// Largest absolute difference in hours still reported as matching.
    pub hours_tolerance: Decimal,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::ZERO,
            hours_tolerance: Decimal::new(5, 1),
        }
    }
}

/// Layout of the weekly timesheet exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Lines before the header row.
    pub preamble_rows: usize,
    /// Field delimiter.
    pub delimiter: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            preamble_rows: 4,
            delimiter: '\t',
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Costing rules.
    pub rules: RulesConfig,
    /// Reconciliation tolerances.
    pub reconciliation: ReconciliationConfig,
    /// Timesheet export layout.
    pub input: InputConfig,
}
