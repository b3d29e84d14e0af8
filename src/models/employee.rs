use crate::utils::validation::{required_text, validate_name, validate_salary, EMAIL_RE, PHONE_RE};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Departments offered by the employee form.
pub const DEPARTMENTS: [&str; 6] = [
    "Engineering",
    "Human Resources",
    "Sales",
    "Marketing",
    "Finance",
    "Operations",
];

/// A persisted row of the `employees` table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: Uuid,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub role: String,
    pub salary: f64,
    pub date_of_joining: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

/// Unvalidated form state for a record being created or edited.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Validate)]
pub struct EmployeeDraft {
    #[validate(custom(function = "required_text", message = "Employee ID is required"))]
    pub employee_id: String,
    #[validate(custom = "validate_name")]
    pub name: String,
    #[validate(
        custom(function = "required_text", message = "Email is required"),
        regex(path = "EMAIL_RE", message = "Invalid email format")
    )]
    pub email: String,
    #[validate(
        custom(function = "required_text", message = "Phone is required"),
        regex(path = "PHONE_RE", message = "Invalid phone format")
    )]
    pub phone: String,
    #[validate(custom(function = "required_text", message = "Department is required"))]
    pub department: String,
    #[validate(custom(function = "required_text", message = "Role is required"))]
    pub role: String,
    #[validate(custom = "validate_salary")]
    pub salary: f64,
    #[validate(required(message = "Date of joining is required"))]
    pub date_of_joining: Option<NaiveDate>,
}

impl From<&Employee> for EmployeeDraft {
    fn from(employee: &Employee) -> Self {
        EmployeeDraft {
            employee_id: employee.employee_id.clone(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            department: employee.department.clone(),
            role: employee.role.clone(),
            salary: employee.salary,
            date_of_joining: Some(employee.date_of_joining),
        }
    }
}

/// Insert payload: a validated draft stamped with its creator.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub role: String,
    pub salary: f64,
    pub date_of_joining: Option<NaiveDate>,
    pub created_by: Uuid,
}

impl NewEmployee {
    pub fn from_draft(draft: &EmployeeDraft, created_by: Uuid) -> Self {
        NewEmployee {
            employee_id: draft.employee_id.clone(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            department: draft.department.clone(),
            role: draft.role.clone(),
            salary: draft.salary,
            date_of_joining: draft.date_of_joining,
            created_by,
        }
    }
}

/// Update payload. The employee code is fixed once a record exists, so it is not here.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EmployeeUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub role: String,
    pub salary: f64,
    pub date_of_joining: Option<NaiveDate>,
}

impl From<&EmployeeDraft> for EmployeeUpdate {
    fn from(draft: &EmployeeDraft) -> Self {
        EmployeeUpdate {
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            department: draft.department.clone(),
            role: draft.role.clone(),
            salary: draft.salary,
            date_of_joining: draft.date_of_joining,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    EmployeeId,
    Name,
    Email,
    Phone,
    Department,
    Role,
    Salary,
    DateOfJoining,
}

impl DraftField {
    pub const ALL: [DraftField; 8] = [
        DraftField::EmployeeId,
        DraftField::Name,
        DraftField::Email,
        DraftField::Phone,
        DraftField::Department,
        DraftField::Role,
        DraftField::Salary,
        DraftField::DateOfJoining,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::EmployeeId => "employee_id",
            DraftField::Name => "name",
            DraftField::Email => "email",
            DraftField::Phone => "phone",
            DraftField::Department => "department",
            DraftField::Role => "role",
            DraftField::Salary => "salary",
            DraftField::DateOfJoining => "date_of_joining",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DraftField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("Unknown field '{}'", s))
    }
}

impl EmployeeDraft {
    /// Applies raw text input to one field. Unparsable salary becomes 0 and
    /// an unparsable date becomes absent, both of which fail validation.
    pub fn set(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::EmployeeId => self.employee_id = value.to_string(),
            DraftField::Name => self.name = value.to_string(),
            DraftField::Email => self.email = value.to_string(),
            DraftField::Phone => self.phone = value.to_string(),
            DraftField::Department => self.department = value.to_string(),
            DraftField::Role => self.role = value.to_string(),
            DraftField::Salary => self.salary = value.trim().parse().unwrap_or(0.0),
            DraftField::DateOfJoining => {
                self.date_of_joining = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
            }
        }
    }
}
