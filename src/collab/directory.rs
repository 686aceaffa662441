//! Org-hierarchy seam.
//!
//! Position-based actor resolution needs an external lookup (who is the
//! creator's manager, who holds a position).  The engine only sees this
//! trait; an in-memory implementation ships for tests and embedding.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::EmployeeId;

/// External employee directory and org hierarchy.
pub trait Directory: Send + Sync {
    fn employee_exists(&self, employee: &str) -> bool;
    fn manager_of(&self, employee: &str) -> Option<EmployeeId>;
    fn holders_of(&self, position: &str) -> Vec<EmployeeId>;
}

/// In-memory directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    employees: BTreeSet<EmployeeId>,
    managers: BTreeMap<EmployeeId, EmployeeId>,
    positions: BTreeMap<String, Vec<EmployeeId>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_employee(&mut self, employee: impl Into<String>) -> &mut Self {
        self.employees.insert(employee.into());
        self
    }

    pub fn set_manager(
        &mut self,
        employee: impl Into<String>,
        manager: impl Into<String>,
    ) -> &mut Self {
        let employee = employee.into();
        let manager = manager.into();
        self.employees.insert(employee.clone());
        self.employees.insert(manager.clone());
        self.managers.insert(employee, manager);
        self
    }

    pub fn add_position_holder(
        &mut self,
        position: impl Into<String>,
        employee: impl Into<String>,
    ) -> &mut Self {
        let employee = employee.into();
        self.employees.insert(employee.clone());
        self.positions.entry(position.into()).or_default().push(employee);
        self
    }
}

impl Directory for InMemoryDirectory {
    fn employee_exists(&self, employee: &str) -> bool {
        self.employees.contains(employee)
    }

    fn manager_of(&self, employee: &str) -> Option<EmployeeId> {
        self.managers.get(employee).cloned()
    }

    fn holders_of(&self, position: &str) -> Vec<EmployeeId> {
        self.positions.get(position).cloned().unwrap_or_default()
    }
}
