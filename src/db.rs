use sea_orm::{Database, DatabaseConnection, DbErr};
use std::env;

/// Connect to PostgreSQL. `DATABASE_URL` wins when set; otherwise the URL is
/// assembled from the discrete `PG*` variables.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let db_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            let host = env::var("PGHOST").unwrap_or_else(|_| "localhost".to_string());
            let user = env::var("PGUSER").unwrap_or_else(|_| "postgres".to_string());
            let password = env::var("PGPASSWORD").unwrap_or_default();
            let database = env::var("PGDATABASE").unwrap_or_else(|_| "postgres".to_string());
            let port = env::var("PGPORT").unwrap_or_else(|_| "5432".to_string());
            format!(
                "postgres://{}:{}@{}:{}/{}",
                user, password, host, port, database
            )
        }
    };

    tracing::info!("Connecting to PostgreSQL");
    Database::connect(&db_url).await
}
