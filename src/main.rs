use dotenvy::dotenv;
use fondos_api::{create_app, db};

#[tokio::main]
async fn main() {
    // Load .env (if present) so DATABASE_URL from file is visible
    let _ = dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Connect to the database
    let conn = db::connect().await.expect("Failed to connect to database");

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    let addr = format!("0.0.0.0:{}", port);

    // Run our server
    let app = create_app(conn);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}
