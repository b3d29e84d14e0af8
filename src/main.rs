use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use employee_records::config::Config;
use employee_records::handlers::{self, session::AppState};
use employee_records::store::supabase::SupabaseClient;
use log::{error, info};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    // Missing backend configuration is the one fatal condition
    let config = Config::from_env().map_err(|err| {
        error!("{}", err);
        io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
    })?;
    let client = SupabaseClient::new(&config).map_err(|err| {
        error!("{}", err);
        io::Error::new(io::ErrorKind::Other, err.to_string())
    })?;

    let state = web::Data::new(AppState::new(client));

    info!("Starting server at {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure::<SupabaseClient>)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
