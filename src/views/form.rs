use crate::errors::{AppError, AppResult};
use crate::models::employee::{DraftField, Employee, EmployeeDraft, EmployeeUpdate, DEPARTMENTS};
use crate::services::employee::EmployeeService;
use crate::store::RemoteStore;
use crate::utils::validation::validate_draft;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit { id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Editing,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; field errors are set and nothing was sent.
    Invalid,
    /// The backend rejected the save; `submit_error` holds its message.
    Failed,
    Saved(Employee),
}

/// Create/edit form for a single employee.
#[derive(Debug, Serialize)]
pub struct FormView {
    mode: FormMode,
    status: FormStatus,
    draft: EmployeeDraft,
    field_errors: BTreeMap<DraftField, String>,
    submit_error: Option<String>,
    /// Options for the department selector.
    departments: &'static [&'static str],
}

impl FormView {
    pub fn create() -> Self {
        FormView {
            mode: FormMode::Create,
            status: FormStatus::Editing,
            draft: EmployeeDraft::default(),
            field_errors: BTreeMap::new(),
            submit_error: None,
            departments: &DEPARTMENTS,
        }
    }

    pub fn edit(employee: &Employee) -> Self {
        FormView {
            mode: FormMode::Edit { id: employee.id },
            draft: EmployeeDraft::from(employee),
            ..Self::create()
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn draft(&self) -> &EmployeeDraft {
        &self.draft
    }

    pub fn field_errors(&self) -> &BTreeMap<DraftField, String> {
        &self.field_errors
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn departments(&self) -> &[&'static str] {
        self.departments
    }

    /// No input is accepted while a save is in flight or after it landed.
    pub fn is_disabled(&self) -> bool {
        self.status != FormStatus::Editing
    }

    pub fn set_field(&mut self, field: DraftField, value: &str) -> AppResult<()> {
        if self.is_disabled() {
            return Err(AppError::Conflict("The form is not editable right now".to_string()));
        }
        if field == DraftField::EmployeeId && matches!(self.mode, FormMode::Edit { .. }) {
            return Err(AppError::Conflict("Employee ID cannot be changed".to_string()));
        }
        self.draft.set(field, value);
        self.field_errors.remove(&field);
        Ok(())
    }

    /// Checks every field and records one message per failing field.
    pub fn validate(&mut self) -> bool {
        self.field_errors = validate_draft(&self.draft);
        self.field_errors.is_empty()
    }

    /// Validates, then sends exactly one create or update.
    pub async fn submit<S: RemoteStore>(
        &mut self,
        service: &EmployeeService<S>,
    ) -> AppResult<SubmitOutcome> {
        if self.is_disabled() {
            return Err(AppError::Conflict("The form is not editable right now".to_string()));
        }
        self.submit_error = None;

        if !self.validate() {
            return Ok(SubmitOutcome::Invalid);
        }

        self.status = FormStatus::Submitting;
        let (result, fallback) = match self.mode {
            FormMode::Create => (service.create(&self.draft).await, "Failed to create employee"),
            FormMode::Edit { id } => (
                service.update(id, &EmployeeUpdate::from(&self.draft)).await,
                "Failed to update employee",
            ),
        };

        match result {
            Ok(employee) => {
                self.status = FormStatus::Succeeded;
                Ok(SubmitOutcome::Saved(employee))
            }
            Err(err) => {
                let message = if err.message().is_empty() {
                    fallback.to_string()
                } else {
                    err.message().to_string()
                };
                self.submit_error = Some(message);
                self.status = FormStatus::Editing;
                Ok(SubmitOutcome::Failed)
            }
        }
    }
}
