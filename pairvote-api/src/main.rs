mod auth;
mod routes;

use pairvote_app::config::AppConfig;
use pairvote_app::infrastructure::db;
use pairvote_app::AppContext;
use tower_http::compression::CompressionLayer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env();

    let conn = db::create_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");

    db::run_migrations(&conn)
        .await
        .expect("Failed to run migrations");

    let ctx = AppContext::new(conn, &config);

    let app = routes::router(ctx).layer(CompressionLayer::new());

    tracing::info!("Listening on http://{}", config.bind_addr);
    tracing::info!(
        "Quota day boundary: {}; limits: suggestions {:?}/day, votes {:?}/day",
        config.quota_timezone,
        config.daily_suggestion_limit,
        config.daily_vote_limit
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
