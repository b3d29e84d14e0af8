use super::session::{bearer_token, AppState};
use crate::errors::AppError;
use crate::store::StoreFactory;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct EmployeeQueryParams {
    search: Option<String>,
}

pub async fn get_employees<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
    query: web::Query<EmployeeQueryParams>,
) -> Result<HttpResponse, actix_web::Error> {
    let token = bearer_token(&req)?;
    let service = state.service(token);

    let employees = match query.search.as_deref().map(str::trim) {
        Some(search) if !search.is_empty() => service.search(search).await?,
        _ => service.list_all().await?,
    };

    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let token = bearer_token(&req)?;
    let id = Uuid::parse_str(&id.into_inner())
        .map_err(|_| AppError::BadRequest("Invalid employee ID".to_string()))?;

    match state.service(token).get_by_id(id).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(employee)),
        None => Err(AppError::NotFound("Employee not found".to_string()).into()),
    }
}
