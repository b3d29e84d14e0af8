use super::form::{FormMode, FormView, SubmitOutcome};
use super::list::{ListStatus, ListView};
use crate::errors::{AppError, AppResult};
use crate::services::employee::EmployeeService;
use crate::store::RemoteStore;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    List(ListView),
    Form(FormView),
}

/// In-page navigation between the employee list and the employee form.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Dashboard {
    view: View,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    /// Starts on a list that has not fetched yet; see [`Dashboard::ensure_active`].
    pub fn new() -> Self {
        Dashboard {
            view: View::List(ListView::new()),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Runs the initial fetch for a list that was mounted but never loaded.
    pub async fn ensure_active<S: RemoteStore>(&mut self, service: &EmployeeService<S>) {
        if let View::List(list) = &mut self.view {
            if list.status() == ListStatus::Loading {
                list.activate(service).await;
            }
        }
    }

    /// Mounts a fresh list, which always re-fetches.
    pub async fn show_list<S: RemoteStore>(&mut self, service: &EmployeeService<S>) {
        let mut list = ListView::new();
        list.activate(service).await;
        self.view = View::List(list);
    }

    pub fn show_add(&mut self) {
        if let View::Form(form) = &self.view {
            if form.mode() == FormMode::Create {
                return;
            }
        }
        self.view = View::Form(FormView::create());
    }

    pub fn edit(&mut self, id: Uuid) -> AppResult<()> {
        let list = self.list()?;
        let employee = list
            .find(id)
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
        let form = FormView::edit(employee);
        self.view = View::Form(form);
        Ok(())
    }

    pub fn list(&self) -> AppResult<&ListView> {
        match &self.view {
            View::List(list) => Ok(list),
            View::Form(_) => Err(AppError::Conflict("The employee list is not open".to_string())),
        }
    }

    pub fn list_mut(&mut self) -> AppResult<&mut ListView> {
        match &mut self.view {
            View::List(list) => Ok(list),
            View::Form(_) => Err(AppError::Conflict("The employee list is not open".to_string())),
        }
    }

    pub fn form(&self) -> AppResult<&FormView> {
        match &self.view {
            View::Form(form) => Ok(form),
            View::List(_) => Err(AppError::Conflict("The employee form is not open".to_string())),
        }
    }

    pub fn form_mut(&mut self) -> AppResult<&mut FormView> {
        match &mut self.view {
            View::Form(form) => Ok(form),
            View::List(_) => Err(AppError::Conflict("The employee form is not open".to_string())),
        }
    }

    /// Submits the open form. A successful save drops the draft and returns
    /// to a freshly fetched list.
    pub async fn submit_form<S: RemoteStore>(
        &mut self,
        service: &EmployeeService<S>,
    ) -> AppResult<SubmitOutcome> {
        let outcome = self.form_mut()?.submit(service).await?;
        if let SubmitOutcome::Saved(_) = &outcome {
            self.show_list(service).await;
        }
        Ok(outcome)
    }

    pub async fn cancel_form<S: RemoteStore>(
        &mut self,
        service: &EmployeeService<S>,
    ) -> AppResult<()> {
        if self.form()?.is_disabled() {
            return Err(AppError::Conflict("The form is not editable right now".to_string()));
        }
        self.show_list(service).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::DraftField;
    use crate::models::user::AuthUser;
    use crate::store::memory::MemoryStore;

    async fn service() -> EmployeeService<MemoryStore> {
        let store = MemoryStore::new();
        store
            .sign_in(AuthUser {
                id: Uuid::new_v4(),
                email: None,
            })
            .await;
        EmployeeService::new(store)
    }

    fn fill(form: &mut FormView, code: &str) {
        for (field, value) in [
            (DraftField::EmployeeId, code),
            (DraftField::Name, "Noor Haddad"),
            (DraftField::Email, "noor@example.com"),
            (DraftField::Phone, "555 0199"),
            (DraftField::Department, "Marketing"),
            (DraftField::Role, "Brand Lead"),
            (DraftField::Salary, "67000"),
            (DraftField::DateOfJoining, "2020-05-20"),
        ] {
            form.set_field(field, value).unwrap();
        }
    }

    #[tokio::test]
    async fn saving_returns_to_a_refetched_list() {
        let service = service().await;
        let mut dashboard = Dashboard::new();
        dashboard.ensure_active(&service).await;
        assert_eq!(service.store().calls().select, 1);

        dashboard.show_add();
        fill(dashboard.form_mut().unwrap(), "EMP100");
        let outcome = dashboard.submit_form(&service).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));

        let list = dashboard.list().unwrap();
        assert_eq!(list.filtered().len(), 1);
        assert!(dashboard.form().is_err());
        assert_eq!(service.store().calls().insert, 1);
        assert_eq!(service.store().calls().select, 2);

        dashboard.show_add();
        assert_eq!(dashboard.form().unwrap().draft().name, "");
    }

    #[tokio::test]
    async fn invalid_submit_stays_on_the_form() {
        let service = service().await;
        let mut dashboard = Dashboard::new();
        dashboard.show_add();

        let outcome = dashboard.submit_form(&service).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert!(!dashboard.form().unwrap().field_errors().is_empty());
        assert_eq!(service.store().calls().table_calls(), 0);
    }

    #[tokio::test]
    async fn edit_seeds_form_from_loaded_record() {
        let service = service().await;
        let mut dashboard = Dashboard::new();
        dashboard.show_add();
        fill(dashboard.form_mut().unwrap(), "EMP200");
        dashboard.submit_form(&service).await.unwrap();

        let id = dashboard.list().unwrap().all()[0].id;
        dashboard.edit(id).unwrap();
        let form = dashboard.form().unwrap();
        assert_eq!(form.mode(), FormMode::Edit { id });
        assert_eq!(form.draft().employee_id, "EMP200");

        dashboard.cancel_form(&service).await.unwrap();
        assert!(dashboard.list().is_ok());
        assert!(matches!(dashboard.edit(Uuid::new_v4()), Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_actions_need_the_list_view() {
        let mut dashboard = Dashboard::new();
        dashboard.show_add();
        assert!(matches!(dashboard.list_mut(), Err(AppError::Conflict(_))));
        assert!(matches!(dashboard.edit(Uuid::new_v4()), Err(AppError::Conflict(_))));
    }
}
