use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, EmployeeDraft, EmployeeUpdate, NewEmployee};
use crate::store::{EmployeeQuery, RemoteStore};
use log::{error, info};
use uuid::Uuid;

/// The only component that talks to the backend. Each method maps to one
/// remote call and hands back a `Result` instead of failing loudly.
pub struct EmployeeService<S> {
    store: S,
}

impl<S: RemoteStore> EmployeeService<S> {
    pub fn new(store: S) -> Self {
        EmployeeService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list_all(&self) -> AppResult<Vec<Employee>> {
        self.store
            .select_employees(&EmployeeQuery::All)
            .await
            .map_err(|err| log_failure("list employees", err))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Employee>> {
        self.store
            .select_employees(&EmployeeQuery::ById(id))
            .await
            .map(|rows| rows.into_iter().next())
            .map_err(|err| log_failure("fetch employee", err))
    }

    /// Inserts the draft stamped with the signed-in user as creator.
    pub async fn create(&self, draft: &EmployeeDraft) -> AppResult<Employee> {
        let user = self
            .store
            .current_user()
            .await
            .map_err(|err| log_failure("resolve current user", err))?
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        let row = NewEmployee::from_draft(draft, user.id);
        let employee = self
            .store
            .insert_employee(&row)
            .await
            .map_err(|err| log_failure("create employee", err))?;
        info!("Created employee {} ({})", employee.employee_id, employee.id);
        Ok(employee)
    }

    pub async fn update(&self, id: Uuid, changes: &EmployeeUpdate) -> AppResult<Employee> {
        let employee = self
            .store
            .update_employee(id, changes)
            .await
            .map_err(|err| log_failure("update employee", err))?;
        info!("Updated employee {} ({})", employee.employee_id, employee.id);
        Ok(employee)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store
            .delete_employee(id)
            .await
            .map_err(|err| log_failure("delete employee", err))?;
        info!("Deleted employee {}", id);
        Ok(())
    }

    /// Server-side search over name, email, employee code and department.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Employee>> {
        self.store
            .select_employees(&EmployeeQuery::Search(query.to_string()))
            .await
            .map_err(|err| log_failure("search employees", err))
    }
}

fn log_failure(action: &str, err: AppError) -> AppError {
    error!("Failed to {}: {}", action, err);
    err
}
