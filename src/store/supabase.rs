use super::{EmployeeQuery, RemoteStore, StoreFactory};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, EmployeeUpdate, NewEmployee};
use crate::models::user::AuthUser;
use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

const EMPLOYEES_TABLE: &str = "employees";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Process-wide handle to the managed backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    rest_url: Url,
    auth_url: Url,
    anon_key: Arc<str>,
}

impl SupabaseClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let rest_url = config
            .supabase_url
            .join("rest/v1/")
            .map_err(|err| AppError::ConfigError(format!("Invalid REST endpoint: {}", err)))?;
        let auth_url = config
            .supabase_url
            .join("auth/v1/")
            .map_err(|err| AppError::ConfigError(format!("Invalid auth endpoint: {}", err)))?;
        let http = Client::builder()
            .build()
            .map_err(|err| AppError::ConfigError(format!("Failed to build HTTP client: {}", err)))?;

        Ok(SupabaseClient {
            http,
            rest_url,
            auth_url,
            anon_key: Arc::from(config.supabase_anon_key.as_str()),
        })
    }

    pub fn session(&self, access_token: Option<&str>) -> SupabaseSession {
        SupabaseSession {
            client: self.clone(),
            access_token: access_token.map(str::to_string),
        }
    }

    fn table_url(&self) -> AppResult<Url> {
        self.rest_url
            .join(EMPLOYEES_TABLE)
            .map_err(|err| AppError::InternalServerError(err.to_string()))
    }

    fn user_url(&self) -> AppResult<Url> {
        self.auth_url
            .join("user")
            .map_err(|err| AppError::InternalServerError(err.to_string()))
    }
}

impl StoreFactory for SupabaseClient {
    type Store = SupabaseSession;

    fn session(&self, access_token: Option<&str>) -> Self::Store {
        SupabaseClient::session(self, access_token)
    }
}

/// The backend as seen by one caller. Without a token requests go out under the anon key.
#[derive(Debug, Clone)]
pub struct SupabaseSession {
    client: SupabaseClient,
    access_token: Option<String>,
}

impl SupabaseSession {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token
            .as_deref()
            .unwrap_or(&*self.client.anon_key);
        request
            .header("apikey", &*self.client.anon_key)
            .bearer_auth(bearer)
    }

    fn single_row(request: RequestBuilder) -> RequestBuilder {
        request
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, SINGLE_OBJECT)
    }
}

#[async_trait]
impl RemoteStore for SupabaseSession {
    async fn current_user(&self) -> AppResult<Option<AuthUser>> {
        if self.access_token.is_none() {
            return Ok(None);
        }

        let url = self.client.user_url()?;
        debug!("GET {}", url);
        let response = self.authorize(self.client.http.get(url)).send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => handle_response(response).await.map(Some),
        }
    }

    async fn select_employees(&self, query: &EmployeeQuery) -> AppResult<Vec<Employee>> {
        let url = self.client.table_url()?;
        let params = select_params(query);
        debug!("GET {} {:?}", url, params);
        let response = self
            .authorize(self.client.http.get(url).query(&params))
            .send()
            .await?;
        handle_response(response).await
    }

    async fn insert_employee(&self, row: &NewEmployee) -> AppResult<Employee> {
        let url = self.client.table_url()?;
        debug!("POST {} employee_id={}", url, row.employee_id);
        let request = self
            .client
            .http
            .post(url)
            .query(&[("select", "*")])
            .json(row);
        let response = self.authorize(Self::single_row(request)).send().await?;
        handle_response(response).await
    }

    async fn update_employee(&self, id: Uuid, changes: &EmployeeUpdate) -> AppResult<Employee> {
        let url = self.client.table_url()?;
        debug!("PATCH {} id={}", url, id);
        let request = self
            .client
            .http
            .patch(url)
            .query(&[("id", format!("eq.{}", id)), ("select", "*".to_string())])
            .json(changes);
        let response = self.authorize(Self::single_row(request)).send().await?;
        handle_response(response).await
    }

    async fn delete_employee(&self, id: Uuid) -> AppResult<()> {
        let url = self.client.table_url()?;
        debug!("DELETE {} id={}", url, id);
        let response = self
            .authorize(
                self.client
                    .http
                    .delete(url)
                    .query(&[("id", format!("eq.{}", id))]),
            )
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(error_from_status(status, &body))
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(error_from_status(status, &body));
    }
    response.json().await.map_err(Into::into)
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
}

/// Maps a failed backend response onto the error taxonomy, keeping the backend's wording.
pub(crate) fn error_from_status(status: StatusCode, body: &str) -> AppError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized(message),
        StatusCode::NOT_FOUND | StatusCode::NOT_ACCEPTABLE => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::RemoteError(message),
    }
}

pub(crate) fn select_params(query: &EmployeeQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", "*".to_string())];
    match query {
        EmployeeQuery::All => {}
        EmployeeQuery::ById(id) => params.push(("id", format!("eq.{}", id))),
        EmployeeQuery::Search(text) => params.push(("or", search_filter(text))),
    }
    params.push(("order", "created_at.desc".to_string()));
    params
}

/// `or=(...)` over the searchable columns. The pattern is quoted so commas
/// and parentheses in user input stay literal.
pub(crate) fn search_filter(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    let clauses: Vec<String> = ["name", "email", "employee_id", "department"]
        .iter()
        .map(|column| format!("{}.ilike.\"*{}*\"", column, escaped))
        .collect();
    format!("({})", clauses.join(","))
}
