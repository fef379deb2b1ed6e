use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foods_api::{config::Config, db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,foods_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    tracing::info!("Connecting to database...");
    let db = db::establish_connection(&config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e))?;
    tracing::info!("Database connected (pool max {})", config.db_max_connections);

    tracing::info!("API server listening on http://{}:{}", config.host, config.port);

    let data = web::Data::new(db);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure_routes)
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
