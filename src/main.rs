use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use learnpath_server::{
    app_state::AppState, config::Config, graphql::create_schema, handlers,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if config.is_production() {
        if let Err(e) = config.validate_for_production() {
            log::error!("refusing to start: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    }

    let app_state = AppState::new(config.clone())
        .await
        .map_err(|e| std::io::Error::other(format!("failed to initialise application: {}", e)))?;

    if let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) {
        if let Err(e) = app_state.auth_service.ensure_admin(username, password).await {
            log::error!("failed to create bootstrap admin: {}", e);
        }
    }

    let schema = create_schema(app_state.clone());
    let bind = (config.web_server_host.clone(), config.web_server_port);

    log::info!("starting HTTP server on {}:{}", bind.0, bind.1);
    log::info!("GraphiQL playground: http://{}:{}/graphiql", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(app_state.jwt_service.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(cors(&config.cors_allowed_origin))
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure)
    })
    .bind(bind)?
    .run()
    .await
}

fn cors(allowed_origin: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(3600);

    if allowed_origin == "*" {
        cors.allow_any_origin()
    } else {
        allowed_origin
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}
