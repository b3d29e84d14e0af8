use crate::errors::AppResult;
use crate::models::employee::{Employee, EmployeeUpdate, NewEmployee};
use crate::models::user::AuthUser;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub mod memory;
pub mod supabase;

/// Row selection for `employees`. Results are always newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeQuery {
    All,
    ById(Uuid),
    Search(String),
}

/// The managed backend: table access plus the auth service's view of the caller.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn current_user(&self) -> AppResult<Option<AuthUser>>;

    async fn select_employees(&self, query: &EmployeeQuery) -> AppResult<Vec<Employee>>;

    async fn insert_employee(&self, row: &NewEmployee) -> AppResult<Employee>;

    async fn update_employee(&self, id: Uuid, changes: &EmployeeUpdate) -> AppResult<Employee>;

    async fn delete_employee(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    async fn current_user(&self) -> AppResult<Option<AuthUser>> {
        (**self).current_user().await
    }

    async fn select_employees(&self, query: &EmployeeQuery) -> AppResult<Vec<Employee>> {
        (**self).select_employees(query).await
    }

    async fn insert_employee(&self, row: &NewEmployee) -> AppResult<Employee> {
        (**self).insert_employee(row).await
    }

    async fn update_employee(&self, id: Uuid, changes: &EmployeeUpdate) -> AppResult<Employee> {
        (**self).update_employee(id, changes).await
    }

    async fn delete_employee(&self, id: Uuid) -> AppResult<()> {
        (**self).delete_employee(id).await
    }
}

/// Hands out a store scoped to one caller's access token.
pub trait StoreFactory: Send + Sync + 'static {
    type Store: RemoteStore;

    fn session(&self, access_token: Option<&str>) -> Self::Store;
}
