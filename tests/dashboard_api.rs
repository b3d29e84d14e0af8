use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::NaiveDate;
use employee_records::handlers::{self, session::AppState};
use employee_records::models::employee::NewEmployee;
use employee_records::models::user::AuthUser;
use employee_records::store::memory::MemoryStore;
use employee_records::store::RemoteStore;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

const TOKEN: (&str, &str) = ("Authorization", "Bearer session-token");

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let creator = Uuid::new_v4();
    for (code, name, department, role) in [
        ("EMP001", "Alice Moreau", "Engineering", "Engineering Manager"),
        ("EMP002", "Bob Stone", "Sales", "Sales Rep"),
    ] {
        store
            .insert_employee(&NewEmployee {
                employee_id: code.to_string(),
                name: name.to_string(),
                email: format!("{}@example.com", code.to_lowercase()),
                phone: "555-0123".to_string(),
                department: department.to_string(),
                role: role.to_string(),
                salary: 75000.0,
                date_of_joining: NaiveDate::from_ymd_opt(2022, 8, 15),
                created_by: creator,
            })
            .await
            .unwrap();
    }
    store
        .sign_in(AuthUser {
            id: creator,
            email: Some("hr@example.com".to_string()),
        })
        .await;
    store
}

macro_rules! app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(Arc::clone(&$store))))
                .configure(handlers::configure::<Arc<MemoryStore>>),
        )
        .await
    };
}

#[actix_web::test]
async fn requests_without_token_are_rejected() {
    let store = seeded_store().await;
    let app = app!(store);

    let req = test::TestRequest::get().uri("/v1/dashboard").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Missing token" }));
    assert_eq!(store.calls().select, 0);
}

#[actix_web::test]
async fn unrecognized_tokens_get_no_dashboard() {
    let store = Arc::new(MemoryStore::new());
    let state = web::Data::new(AppState::new(Arc::clone(&store)));
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure::<Arc<MemoryStore>>),
    )
    .await;

    for i in 0..50 {
        let req = test::TestRequest::get()
            .uri("/v1/dashboard")
            .insert_header(("Authorization", format!("Bearer junk-{}", i)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(state.session_count().await, 0);
    assert_eq!(store.calls().select, 0);
}

#[actix_web::test]
async fn first_visit_loads_the_list() {
    let store = seeded_store().await;
    let app = app!(store);

    let req = test::TestRequest::get()
        .uri("/v1/dashboard")
        .insert_header(TOKEN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["view"], "list");
    assert_eq!(body["status"], "ready");
    assert_eq!(body["total"], 2);
    assert_eq!(body["departments"], json!(["Engineering", "Sales"]));

    // a second visit reuses the loaded state
    let req = test::TestRequest::get()
        .uri("/v1/dashboard")
        .insert_header(TOKEN)
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(store.calls().select, 1);
    assert_eq!(store.calls().current_user, 1);
}

#[actix_web::test]
async fn filter_is_applied_locally() {
    let store = seeded_store().await;
    let app = app!(store);

    let req = test::TestRequest::patch()
        .uri("/v1/dashboard/filter")
        .insert_header(TOKEN)
        .set_json(json!({ "query": "eng" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let employees = body["employees"].as_array().unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0]["role"], "Engineering Manager");
    assert_eq!(body["total"], 2);
    assert_eq!(store.calls().select, 1);
}

#[actix_web::test]
async fn create_flow_returns_to_refetched_list() {
    let store = seeded_store().await;
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/v1/dashboard/view")
        .insert_header(TOKEN)
        .set_json(json!({ "view": "add" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["view"], "form");
    assert_eq!(body["mode"]["kind"], "create");

    for (field, value) in [
        ("employee_id", "EMP003"),
        ("name", "Carla Diaz"),
        ("email", "carla@example.com"),
        ("phone", "(555) 010-9999"),
        ("department", "Finance"),
        ("role", "Analyst"),
        ("salary", "64000"),
        ("date_of_joining", "2024-02-01"),
    ] {
        let req = test::TestRequest::patch()
            .uri("/v1/dashboard/form")
            .insert_header(TOKEN)
            .set_json(json!({ "field": field, "value": value }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/v1/dashboard/form/submit")
        .insert_header(TOKEN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["view"], "list");
    assert_eq!(body["total"], 3);
    assert_eq!(body["employees"][0]["employee_id"], "EMP003");

    let calls = store.calls();
    assert_eq!(calls.insert, 2 + 1);
    assert_eq!(calls.select, 2);
}

#[actix_web::test]
async fn invalid_form_reports_every_field() {
    let store = seeded_store().await;
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/v1/dashboard/view")
        .insert_header(TOKEN)
        .set_json(json!({ "view": "add" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["departments"].as_array().unwrap().len(), 6);
    let baseline = store.calls();

    let req = test::TestRequest::post()
        .uri("/v1/dashboard/form/submit")
        .insert_header(TOKEN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["view"], "form");
    assert_eq!(body["field_errors"].as_object().unwrap().len(), 8);
    assert_eq!(body["field_errors"]["email"], "Email is required");

    let calls = store.calls();
    assert_eq!(calls.insert, baseline.insert);
    assert_eq!(calls.current_user, baseline.current_user);
}

#[actix_web::test]
async fn delete_needs_confirmation_then_refetches() {
    let store = seeded_store().await;
    let app = app!(store);
    let victim = store.rows().await[0].id;

    let req = test::TestRequest::post()
        .uri(&format!("/v1/dashboard/delete/{}", victim))
        .insert_header(TOKEN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "confirming_delete");
    assert_eq!(body["pending_delete"], victim.to_string());

    let req = test::TestRequest::post()
        .uri("/v1/dashboard/delete/cancel")
        .insert_header(TOKEN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(store.calls().delete, 0);

    let req = test::TestRequest::post()
        .uri(&format!("/v1/dashboard/delete/{}", victim))
        .insert_header(TOKEN)
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/v1/dashboard/delete/confirm")
        .insert_header(TOKEN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(store.calls().delete, 1);
    assert_eq!(store.calls().select, 2);
}

#[actix_web::test]
async fn edit_keeps_employee_code_locked() {
    let store = seeded_store().await;
    let app = app!(store);
    let target = store.rows().await[0].clone();

    let req = test::TestRequest::post()
        .uri(&format!("/v1/dashboard/edit/{}", target.id))
        .insert_header(TOKEN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["mode"]["kind"], "edit");
    assert_eq!(body["draft"]["employee_id"], target.employee_id);

    let req = test::TestRequest::patch()
        .uri("/v1/dashboard/form")
        .insert_header(TOKEN)
        .set_json(json!({ "field": "employee_id", "value": "EMP777" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::patch()
        .uri("/v1/dashboard/form")
        .insert_header(TOKEN)
        .set_json(json!({ "field": "role", "value": "Director" }))
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/v1/dashboard/form/submit")
        .insert_header(TOKEN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["view"], "list");
    assert_eq!(store.calls().update, 1);

    let updated = store
        .rows()
        .await
        .into_iter()
        .find(|e| e.id == target.id)
        .unwrap();
    assert_eq!(updated.role, "Director");
    assert_eq!(updated.employee_id, target.employee_id);
}

#[actix_web::test]
async fn employee_endpoints_wrap_the_access_layer() {
    let store = seeded_store().await;
    let app = app!(store);

    let req = test::TestRequest::get()
        .uri("/v1/employee?search=sales")
        .insert_header(TOKEN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["employee_id"], "EMP002");

    let req = test::TestRequest::get()
        .uri("/v1/employee")
        .insert_header(TOKEN)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri(&format!("/v1/employee/{}", Uuid::new_v4()))
        .insert_header(TOKEN)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/v1/employee/not-a-uuid")
        .insert_header(TOKEN)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
