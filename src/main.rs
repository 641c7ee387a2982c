use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use dotenv::dotenv;
use std::io;

use todo_api::auth::TokenIssuer;
use todo_api::config::Config;
use todo_api::routes::{self, health};
use todo_api::{store, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let stores = store::connect(&config.store_backend, config.store_timeout)
        .await
        .map_err(|e| {
            log::error!("Failed to initialise store: {}", e);
            io::Error::new(io::ErrorKind::Other, e.to_string())
        })?;

    let state = AppState::new(
        stores,
        TokenIssuer::new(config.jwt_secret.as_bytes()),
        config.bcrypt_cost,
    );

    log::info!("Starting todo API server at {}", config.server_url());

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .configure(move |cfg| state.configure(cfg))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
