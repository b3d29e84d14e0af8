use super::session::{open_dashboard, AppState};
use crate::errors::AppError;
use crate::models::employee::DraftField;
use crate::store::StoreFactory;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViewName {
    List,
    Add,
}

#[derive(Deserialize)]
pub struct ViewRequest {
    view: ViewName,
}

#[derive(Deserialize)]
pub struct FilterUpdate {
    query: Option<String>,
    department: Option<String>,
}

#[derive(Deserialize)]
pub struct FieldUpdate {
    field: DraftField,
    value: String,
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid employee ID".to_string()))
}

pub async fn get_dashboard<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
) -> Result<HttpResponse, actix_web::Error> {
    let (_service, dashboard) = open_dashboard(&req, &state).await?;
    Ok(HttpResponse::Ok().json(&*dashboard))
}

pub async fn switch_view<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
    body: web::Json<ViewRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let (service, mut dashboard) = open_dashboard(&req, &state).await?;
    match body.view {
        ViewName::List => dashboard.show_list(&service).await,
        ViewName::Add => dashboard.show_add(),
    }
    Ok(HttpResponse::Ok().json(&*dashboard))
}

pub async fn update_filter<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
    body: web::Json<FilterUpdate>,
) -> Result<HttpResponse, actix_web::Error> {
    let (_service, mut dashboard) = open_dashboard(&req, &state).await?;
    let list = dashboard.list_mut()?;
    if let Some(query) = &body.query {
        list.set_query(query);
    }
    if let Some(department) = &body.department {
        list.set_department(department);
    }
    Ok(HttpResponse::Ok().json(&*dashboard))
}

pub async fn open_edit<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let id = parse_id(&id.into_inner())?;
    let (_service, mut dashboard) = open_dashboard(&req, &state).await?;
    dashboard.edit(id)?;
    Ok(HttpResponse::Ok().json(&*dashboard))
}

pub async fn request_delete<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    let id = parse_id(&id.into_inner())?;
    let (_service, mut dashboard) = open_dashboard(&req, &state).await?;
    dashboard.list_mut()?.request_delete(id)?;
    Ok(HttpResponse::Ok().json(&*dashboard))
}

pub async fn confirm_delete<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
) -> Result<HttpResponse, actix_web::Error> {
    let (service, mut dashboard) = open_dashboard(&req, &state).await?;
    dashboard.list_mut()?.confirm_delete(&service).await?;
    Ok(HttpResponse::Ok().json(&*dashboard))
}

pub async fn cancel_delete<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
) -> Result<HttpResponse, actix_web::Error> {
    let (_service, mut dashboard) = open_dashboard(&req, &state).await?;
    dashboard.list_mut()?.cancel_delete()?;
    Ok(HttpResponse::Ok().json(&*dashboard))
}

pub async fn update_form<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
    body: web::Json<FieldUpdate>,
) -> Result<HttpResponse, actix_web::Error> {
    let (_service, mut dashboard) = open_dashboard(&req, &state).await?;
    dashboard.form_mut()?.set_field(body.field, &body.value)?;
    Ok(HttpResponse::Ok().json(&*dashboard))
}

pub async fn submit_form<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
) -> Result<HttpResponse, actix_web::Error> {
    let (service, mut dashboard) = open_dashboard(&req, &state).await?;
    dashboard.submit_form(&service).await?;
    Ok(HttpResponse::Ok().json(&*dashboard))
}

pub async fn cancel_form<F: StoreFactory>(
    req: HttpRequest,
    state: web::Data<AppState<F>>,
) -> Result<HttpResponse, actix_web::Error> {
    let (service, mut dashboard) = open_dashboard(&req, &state).await?;
    dashboard.cancel_form(&service).await?;
    Ok(HttpResponse::Ok().json(&*dashboard))
}
