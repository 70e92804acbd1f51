use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use supplier_portal_backend::auth::middleware::JwtSecret;
use supplier_portal_backend::cache::ViewerCache;
use supplier_portal_backend::clock::SystemClock;
use supplier_portal_backend::config::AppConfig;
use supplier_portal_backend::create_pool;
use supplier_portal_backend::db::SeaOrmStore;
use supplier_portal_backend::engine::Engine;
use supplier_portal_backend::handlers;
use supplier_portal_backend::scheduler::spawn_status_sweeper;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to database: {e}")))?;
    Migrator::up(&db, None)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to run migrations: {e}")))?;
    tracing::info!("Database migrations applied");

    let engine = Arc::new(Engine::new(
        SeaOrmStore::new(db),
        SystemClock,
        config.engine.clone(),
    ));
    let sweeper = spawn_status_sweeper(engine.clone(), config.engine.sweep_interval);
    tracing::info!(
        every_secs = config.engine.sweep_interval.as_secs(),
        policy = ?config.engine.status_policy,
        "Status sweeper started"
    );

    let engine_data = web::Data::from(engine);
    let viewer_cache = web::Data::new(ViewerCache::new(config.viewer_cache_ttl));
    let jwt_secret = web::Data::new(JwtSecret(config.jwt_secret.clone()));

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server running at http://{bind_addr}");

    let result = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(engine_data.clone())
            .app_data(viewer_cache.clone())
            .app_data(jwt_secret.clone())
            .service(
                web::scope("/api")
                    .configure(handlers::init_routes::<SeaOrmStore, SystemClock>),
            )
    })
    .bind(&bind_addr)?
    .run()
    .await;

    sweeper.abort();
    result
}
