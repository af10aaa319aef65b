use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware, web};

use rsvp::config::AppConfig;
use rsvp::{db, handlers};

fn startup_error(e: rsvp::errors::AppError) -> std::io::Error {
    log::error!("{e}");
    std::io::Error::other(e.to_string())
}

fn setup_cors(allowed_origin: &str) -> Cors {
    let cors = if allowed_origin == "*" {
        Cors::default().allow_any_origin()
    } else {
        Cors::default().allowed_origin(allowed_origin)
    };

    cors.allowed_methods(["GET", "POST"])
        .allowed_header(header::CONTENT_TYPE)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(startup_error)?;

    let pool = db::init_pool(&config).await.map_err(startup_error)?;
    if config.run_migrations {
        db::run_migrations(&pool).await.map_err(startup_error)?;
    } else {
        log::info!("RUN_MIGRATIONS=false, skipping schema setup");
    }

    let (host, port) = config.bind_addr();
    log::info!("Backend running on http://{host}:{port}");

    let cors_origin = config.cors_allowed_origin.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(setup_cors(&cors_origin))
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(handlers::json_config())
            .configure(handlers::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(handlers::not_found))
    })
    .bind((host, port))?
    .run()
    .await
}
