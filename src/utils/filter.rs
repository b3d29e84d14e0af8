use crate::models::employee::Employee;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Local list filter: free-text query OR'd across name, email, employee code
/// and role, AND'd with an exact department match. Empty parts match all.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub query: String,
    pub department: String,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        if !self.query.is_empty() {
            let query = self.query.to_lowercase();
            let hit = [
                &employee.name,
                &employee.email,
                &employee.employee_id,
                &employee.role,
            ]
            .iter()
            .any(|value| value.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }

        self.department.is_empty() || employee.department == self.department
    }

    pub fn apply(&self, employees: &[Employee]) -> Vec<Employee> {
        employees
            .iter()
            .filter(|employee| self.matches(employee))
            .cloned()
            .collect()
    }
}

/// Distinct departments present in `employees`, sorted.
pub fn departments(employees: &[Employee]) -> Vec<String> {
    employees
        .iter()
        .map(|employee| employee.department.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
