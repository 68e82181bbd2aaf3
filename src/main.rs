use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;

use tasknest::auth::TokenIssuer;
use tasknest::config::Config;
use tasknest::notify::LogNotifier;
use tasknest::routes;
use tasknest::state::AppState;
use tasknest::store::PgStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        issuer: TokenIssuer::new(config.jwt_secret.clone()),
        notifier: Arc::new(LogNotifier),
    };

    log::info!("Starting tasknest server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
