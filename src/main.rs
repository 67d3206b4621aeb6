use shift_scheduler_api::{app, config, database};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting shift scheduler API in {:?} mode", config.environment);

    database::Database::migrate()
        .await
        .unwrap_or_else(|e| panic!("failed to apply database migrations: {}", e));

    // Development-only demo data; logs and continues on failure
    database::seed::run().await;

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("SHIFT_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Shift scheduler API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
