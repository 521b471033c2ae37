use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizsmith_server::{app_state::AppState, auth::AuthMiddleware, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = Arc::new(
        AppState::new(config)
            .await
            .unwrap_or_else(|e| panic!("failed to initialize application state: {}", e)),
    );
    let jwt_service = state.jwt_service.clone();

    log::info!("starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .service(handlers::health_check)
            .service(handlers::health_check_ready)
            .service(
                web::scope("/api/auth")
                    .service(handlers::register)
                    .service(handlers::login),
            )
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .service(handlers::generate_quiz)
                    .service(handlers::generate_descriptive_quiz)
                    .service(handlers::generate_combined_exam)
                    .service(handlers::list_quizzes)
                    .service(handlers::get_quiz)
                    .service(handlers::delete_quiz)
                    .service(handlers::submit_quiz)
                    .service(handlers::list_submissions)
                    .service(handlers::put_provider_key),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
