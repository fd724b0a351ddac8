//! Employee model and related types.
//!
//! This module defines the Employee struct and PayType enum for the
//! read-only roster records that drive classification and costing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an employee is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    /// Paid per hour worked; eligible for weekly overtime.
    Hourly,
    /// Paid a fixed bi-weekly amount; never receives overtime.
    Salaried,
}

/// A roster record.
///
/// The roster is the sole source of pay type and base rate. Records are never
/// mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// The name exactly as it appears in timesheet exports.
    pub name: String,
    /// Hourly or salaried.
    pub pay_type: PayType,
    /// Hourly base rate. For salaried employees this is the rate that, over
    /// the standard period hours, yields the period salary.
    pub base_rate: Decimal,
    /// Accounting code for indirect labor.
    #[serde(default)]
    pub indirect_labor_code: String,
    /// Accounting code for direct labor.
    #[serde(default)]
    pub direct_labor_code: String,
    /// The name used by the reference payroll export, when it differs.
    #[serde(default)]
    pub reference_name: Option<String>,
    /// Owners take distributions rather than wages and are not job costed.
    #[serde(default)]
    pub is_owner: bool,
}

impl Employee {
    /// Returns true if the employee is salaried.
    ///
    /// # Examples
    ///
    /// ```
    /// use job_cost_engine::models::{Employee, PayType};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     name: "Marcella J. Gallick".to_string(),
    ///     pay_type: PayType::Salaried,
    ///     base_rate: Decimal::new(6736, 2),
    ///     indirect_labor_code: String::new(),
    ///     direct_labor_code: String::new(),
    ///     reference_name: None,
    ///     is_owner: false,
    /// };
    /// assert!(employee.is_salaried());
    /// ```
    pub fn is_salaried(&self) -> bool {
        self.pay_type == PayType::Salaried
    }
}
