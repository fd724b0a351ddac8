//! Employee roster access.
//!
//! The roster is the read-only source of pay type and base rate. The engine
//! only sees it through the [`Roster`] trait, so callers can back it with a
//! YAML file, a database, or in-memory test fixtures.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::config::load_yaml;
use crate::error::EngineResult;
use crate::models::Employee;

/// Read-only employee lookup keyed by exact name.
pub trait Roster: Send + Sync {
    /// Returns the employee whose name matches exactly (case and whitespace
    /// sensitive).
    fn get(&self, name: &str) -> Option<&Employee>;

    /// Returns every employee, sorted by name.
    fn all(&self) -> Vec<&Employee>;
}

/// A roster held in memory.
///
/// # Example
///
/// ```
/// use job_cost_engine::models::{Employee, PayType};
/// use job_cost_engine::roster::{InMemoryRoster, Roster};
/// use rust_decimal::Decimal;
///
/// let roster = InMemoryRoster::new(vec![Employee {
///     name: "A".to_string(),
///     pay_type: PayType::Hourly,
///     base_rate: Decimal::new(100, 0),
///     indirect_labor_code: String::new(),
///     direct_labor_code: String::new(),
///     reference_name: None,
///     is_owner: false,
/// }]);
///
/// assert!(roster.get("A").is_some());
/// assert!(roster.get("a").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoster {
    employees: HashMap<String, Employee>,
}

impl InMemoryRoster {
    /// Creates a roster from a list of employees. A later record with the
    /// same name replaces an earlier one.
    pub fn new(employees: Vec<Employee>) -> Self {
        employees.into_iter().collect()
    }

    /// Returns the number of employees.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Returns true if the roster has no employees.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

impl FromIterator<Employee> for InMemoryRoster {
    fn from_iter<I: IntoIterator<Item = Employee>>(iter: I) -> Self {
        Self {
            employees: iter
                .into_iter()
                .map(|employee| (employee.name.clone(), employee))
                .collect(),
        }
    }
}

impl Roster for InMemoryRoster {
    fn get(&self, name: &str) -> Option<&Employee> {
        self.employees.get(name)
    }

    fn all(&self) -> Vec<&Employee> {
        let mut employees: Vec<&Employee> = self.employees.values().collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        employees
    }
}

/// Roster file structure.
#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    employees: Vec<Employee>,
}

/// Loads a roster from a YAML file of the form `employees: [...]`.
pub struct YamlRoster;

impl YamlRoster {
    /// Loads the roster file at `path`.
    ///
    /// Returns `ConfigNotFound` if the file is missing and `ConfigParseError`
    /// if it does not describe a list of employees.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<InMemoryRoster> {
        let file = load_yaml::<RosterFile>(path.as_ref())?;
        Ok(InMemoryRoster::new(file.employees))
    }
}
