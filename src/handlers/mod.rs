pub mod dashboard;
pub mod employee;
pub mod session;

use crate::store::StoreFactory;
use actix_web::web;

pub fn configure<F: StoreFactory>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/v1/dashboard").route(web::get().to(dashboard::get_dashboard::<F>)),
    )
    .service(
        web::resource("/v1/dashboard/view").route(web::post().to(dashboard::switch_view::<F>)),
    )
    .service(
        web::resource("/v1/dashboard/filter")
            .route(web::patch().to(dashboard::update_filter::<F>)),
    )
    .service(
        web::resource("/v1/dashboard/edit/{id}").route(web::post().to(dashboard::open_edit::<F>)),
    )
    // fixed segments first so they are not read as an id
    .service(
        web::resource("/v1/dashboard/delete/confirm")
            .route(web::post().to(dashboard::confirm_delete::<F>)),
    )
    .service(
        web::resource("/v1/dashboard/delete/cancel")
            .route(web::post().to(dashboard::cancel_delete::<F>)),
    )
    .service(
        web::resource("/v1/dashboard/delete/{id}")
            .route(web::post().to(dashboard::request_delete::<F>)),
    )
    .service(
        web::resource("/v1/dashboard/form").route(web::patch().to(dashboard::update_form::<F>)),
    )
    .service(
        web::resource("/v1/dashboard/form/submit")
            .route(web::post().to(dashboard::submit_form::<F>)),
    )
    .service(
        web::resource("/v1/dashboard/form/cancel")
            .route(web::post().to(dashboard::cancel_form::<F>)),
    )
    .service(
        web::resource("/v1/employee").route(web::get().to(employee::get_employees::<F>)),
    )
    .service(
        web::resource("/v1/employee/{id}").route(web::get().to(employee::get_employee::<F>)),
    );
}
