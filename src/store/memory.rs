use super::{EmployeeQuery, RemoteStore, StoreFactory};
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, EmployeeUpdate, NewEmployee};
use crate::models::user::AuthUser;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Per-operation call counts recorded by [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub current_user: usize,
    pub select: usize,
    pub insert: usize,
    pub update: usize,
    pub delete: usize,
}

impl StoreCalls {
    /// Calls that touched the employees table.
    pub fn table_calls(&self) -> usize {
        self.select + self.insert + self.update + self.delete
    }
}

/// In-process stand-in for the managed backend.
#[derive(Default)]
pub struct MemoryStore {
    employees: Mutex<Vec<Employee>>,
    user: Mutex<Option<AuthUser>>,
    failure: Mutex<Option<AppError>>,
    current_user_calls: AtomicUsize,
    select_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds rows as given; newest-first ordering comes from `created_at`.
    pub fn with_employees(employees: Vec<Employee>) -> Self {
        MemoryStore {
            employees: Mutex::new(employees),
            ..Self::default()
        }
    }

    pub async fn sign_in(&self, user: AuthUser) {
        *self.user.lock().await = Some(user);
    }

    pub async fn sign_out(&self) {
        *self.user.lock().await = None;
    }

    /// Every table call fails with `err` until cleared.
    pub async fn fail_with(&self, err: Option<AppError>) {
        *self.failure.lock().await = err;
    }

    pub async fn rows(&self) -> Vec<Employee> {
        self.employees.lock().await.clone()
    }

    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            current_user: self.current_user_calls.load(Ordering::Relaxed),
            select: self.select_calls.load(Ordering::Relaxed),
            insert: self.insert_calls.load(Ordering::Relaxed),
            update: self.update_calls.load(Ordering::Relaxed),
            delete: self.delete_calls.load(Ordering::Relaxed),
        }
    }

    async fn check_failure(&self) -> AppResult<()> {
        match self.failure.lock().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn ilike(value: &str, needle: &str) -> bool {
    value.to_lowercase().contains(&needle.to_lowercase())
}

fn missing_date() -> AppError {
    AppError::RemoteError(
        "null value in column \"date_of_joining\" violates not-null constraint".to_string(),
    )
}

fn single_row_missing() -> AppError {
    AppError::NotFound("JSON object requested, multiple (or no) rows returned".to_string())
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn current_user(&self) -> AppResult<Option<AuthUser>> {
        self.current_user_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.user.lock().await.clone())
    }

    async fn select_employees(&self, query: &EmployeeQuery) -> AppResult<Vec<Employee>> {
        self.select_calls.fetch_add(1, Ordering::Relaxed);
        self.check_failure().await?;

        let mut rows: Vec<Employee> = self
            .employees
            .lock()
            .await
            .iter()
            .filter(|employee| match query {
                EmployeeQuery::All => true,
                EmployeeQuery::ById(id) => employee.id == *id,
                EmployeeQuery::Search(text) => {
                    ilike(&employee.name, text)
                        || ilike(&employee.email, text)
                        || ilike(&employee.employee_id, text)
                        || ilike(&employee.department, text)
                }
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_employee(&self, row: &NewEmployee) -> AppResult<Employee> {
        self.insert_calls.fetch_add(1, Ordering::Relaxed);
        self.check_failure().await?;

        let mut employees = self.employees.lock().await;
        if employees.iter().any(|e| e.employee_id == row.employee_id) {
            return Err(AppError::Conflict(
                "duplicate key value violates unique constraint \"employees_employee_id_key\""
                    .to_string(),
            ));
        }
        let date_of_joining: NaiveDate = row.date_of_joining.ok_or_else(missing_date)?;

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::new_v4(),
            employee_id: row.employee_id.clone(),
            name: row.name.clone(),
            email: row.email.clone(),
            phone: row.phone.clone(),
            department: row.department.clone(),
            role: row.role.clone(),
            salary: row.salary,
            date_of_joining,
            created_at: now,
            updated_at: now,
            created_by: Some(row.created_by),
        };
        // front insertion keeps same-instant rows newest first after the stable sort
        employees.insert(0, employee.clone());
        Ok(employee)
    }

    async fn update_employee(&self, id: Uuid, changes: &EmployeeUpdate) -> AppResult<Employee> {
        self.update_calls.fetch_add(1, Ordering::Relaxed);
        self.check_failure().await?;

        let mut employees = self.employees.lock().await;
        let employee = employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(single_row_missing)?;
        // a rejected row is left as it was
        let date_of_joining = changes.date_of_joining.ok_or_else(missing_date)?;

        employee.name = changes.name.clone();
        employee.email = changes.email.clone();
        employee.phone = changes.phone.clone();
        employee.department = changes.department.clone();
        employee.role = changes.role.clone();
        employee.salary = changes.salary;
        employee.date_of_joining = date_of_joining;
        employee.updated_at = Utc::now();
        Ok(employee.clone())
    }

    async fn delete_employee(&self, id: Uuid) -> AppResult<()> {
        self.delete_calls.fetch_add(1, Ordering::Relaxed);
        self.check_failure().await?;

        // deleting an absent row is not an error for the backend either
        self.employees.lock().await.retain(|e| e.id != id);
        Ok(())
    }
}

impl StoreFactory for Arc<MemoryStore> {
    type Store = Arc<MemoryStore>;

    fn session(&self, _access_token: Option<&str>) -> Self::Store {
        Arc::clone(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(code: &str) -> NewEmployee {
        NewEmployee {
            employee_id: code.to_string(),
            name: "Test Person".to_string(),
            email: "test@example.com".to_string(),
            phone: "555 0100".to_string(),
            department: "Operations".to_string(),
            role: "Coordinator".to_string(),
            salary: 40000.0,
            date_of_joining: NaiveDate::from_ymd_opt(2020, 2, 2),
            created_by: Uuid::nil(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_rejects_duplicate_codes() {
        let store = MemoryStore::new();
        let created = store.insert_employee(&row("EMP010")).await.unwrap();
        assert_eq!(created.created_by, Some(Uuid::nil()));
        assert_eq!(created.created_at, created.updated_at);

        let dup = store.insert_employee(&row("EMP010")).await.unwrap_err();
        assert!(matches!(dup, AppError::Conflict(_)));
        assert_eq!(store.calls().insert, 2);
    }

    #[tokio::test]
    async fn select_orders_newest_first() {
        let store = MemoryStore::new();
        let first = store.insert_employee(&row("EMP001")).await.unwrap();
        let second = store.insert_employee(&row("EMP002")).await.unwrap();
        {
            let mut rows = store.employees.lock().await;
            for e in rows.iter_mut() {
                if e.id == first.id {
                    e.created_at = second.created_at - Duration::seconds(5);
                }
            }
        }
        let rows = store.select_employees(&EmployeeQuery::All).await.unwrap();
        assert_eq!(rows[0].id, second.id);
        assert_eq!(rows[1].id, first.id);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let store = MemoryStore::new();
        let changes = EmployeeUpdate {
            name: "X".to_string(),
            email: String::new(),
            phone: String::new(),
            department: String::new(),
            role: String::new(),
            salary: 1.0,
            date_of_joining: None,
        };
        let err = store.update_employee(Uuid::new_v4(), &changes).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn rejected_update_leaves_row_untouched() {
        let store = MemoryStore::new();
        let created = store.insert_employee(&row("EMP020")).await.unwrap();
        let changes = EmployeeUpdate {
            name: "Renamed".to_string(),
            email: "renamed@example.com".to_string(),
            phone: "555 0199".to_string(),
            department: "Sales".to_string(),
            role: "Lead".to_string(),
            salary: 99000.0,
            date_of_joining: None,
        };
        let err = store.update_employee(created.id, &changes).await.unwrap_err();
        assert!(matches!(err, AppError::RemoteError(_)));
        assert_eq!(store.rows().await, vec![created]);
    }

    #[tokio::test]
    async fn injected_failure_applies_to_table_calls() {
        let store = MemoryStore::new();
        store
            .fail_with(Some(AppError::RemoteError("connection reset".to_string())))
            .await;
        assert!(store.select_employees(&EmployeeQuery::All).await.is_err());
        assert!(store.current_user().await.is_ok());
        store.fail_with(None).await;
        assert!(store.select_employees(&EmployeeQuery::All).await.is_ok());
        assert_eq!(store.calls().select, 2);
    }
}
