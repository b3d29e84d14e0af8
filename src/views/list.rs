use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::services::employee::EmployeeService;
use crate::store::RemoteStore;
use crate::utils::filter::{departments, EmployeeFilter};
use serde::Serialize;
use uuid::Uuid;

pub const LOAD_FAILED: &str = "Failed to load employees";
pub const DELETE_FAILED: &str = "Failed to delete employee";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    Loading,
    Ready,
    ConfirmingDelete,
}

/// The employee table: full record set from the backend plus the locally
/// filtered view of it.
#[derive(Debug, Serialize)]
pub struct ListView {
    status: ListStatus,
    error: Option<String>,
    filter: EmployeeFilter,
    departments: Vec<String>,
    employees: Vec<Employee>,
    total: usize,
    pending_delete: Option<Uuid>,
    #[serde(skip)]
    all: Vec<Employee>,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    pub fn new() -> Self {
        ListView {
            status: ListStatus::Loading,
            error: None,
            filter: EmployeeFilter::default(),
            departments: Vec::new(),
            employees: Vec::new(),
            total: 0,
            pending_delete: None,
            all: Vec::new(),
        }
    }

    pub fn status(&self) -> ListStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter(&self) -> &EmployeeFilter {
        &self.filter
    }

    /// Records passing the current filter, newest first.
    pub fn filtered(&self) -> &[Employee] {
        &self.employees
    }

    pub fn all(&self) -> &[Employee] {
        &self.all
    }

    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    pub fn pending_delete(&self) -> Option<Uuid> {
        self.pending_delete
    }

    pub fn find(&self, id: Uuid) -> Option<&Employee> {
        self.all.iter().find(|employee| employee.id == id)
    }

    /// Fetches the full record set. On failure the records are cleared and
    /// a single message is kept for display.
    pub async fn activate<S: RemoteStore>(&mut self, service: &EmployeeService<S>) {
        self.status = ListStatus::Loading;
        self.pending_delete = None;

        match service.list_all().await {
            Ok(rows) => {
                self.all = rows;
                self.error = None;
            }
            Err(_) => {
                self.all.clear();
                self.error = Some(LOAD_FAILED.to_string());
            }
        }

        self.departments = departments(&self.all);
        self.status = ListStatus::Ready;
        self.recompute();
    }

    pub fn set_query(&mut self, query: &str) {
        self.filter.query = query.to_string();
        self.recompute();
    }

    pub fn set_department(&mut self, department: &str) {
        self.filter.department = department.to_string();
        self.recompute();
    }

    pub fn request_delete(&mut self, id: Uuid) -> AppResult<()> {
        if self.status != ListStatus::Ready {
            return Err(AppError::Conflict("The list is not ready".to_string()));
        }
        if self.find(id).is_none() {
            return Err(AppError::NotFound("Employee not found".to_string()));
        }
        self.pending_delete = Some(id);
        self.status = ListStatus::ConfirmingDelete;
        Ok(())
    }

    pub fn cancel_delete(&mut self) -> AppResult<()> {
        if self.status != ListStatus::ConfirmingDelete {
            return Err(AppError::Conflict(
                "No deletion is awaiting confirmation".to_string(),
            ));
        }
        self.pending_delete = None;
        self.status = ListStatus::Ready;
        Ok(())
    }

    /// Deletes the pending record, then re-fetches everything. Nothing is
    /// removed locally ahead of the backend.
    pub async fn confirm_delete<S: RemoteStore>(
        &mut self,
        service: &EmployeeService<S>,
    ) -> AppResult<()> {
        let id = match (self.status, self.pending_delete) {
            (ListStatus::ConfirmingDelete, Some(id)) => id,
            _ => {
                return Err(AppError::Conflict(
                    "No deletion is awaiting confirmation".to_string(),
                ))
            }
        };

        self.status = ListStatus::Loading;
        match service.delete(id).await {
            Ok(()) => self.activate(service).await,
            Err(_) => {
                self.pending_delete = None;
                self.error = Some(DELETE_FAILED.to_string());
                self.status = ListStatus::Ready;
            }
        }
        Ok(())
    }

    fn recompute(&mut self) {
        self.employees = self.filter.apply(&self.all);
        self.total = self.all.len();
    }
}
