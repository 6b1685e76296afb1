pub mod auth;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
pub mod schema;

use sqlx::{Pool, Sqlite};

// Struct representing the application state
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub config: Config,
}

// Process-wide configuration, read once at startup and immutable after
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://todo.db".to_string());
        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret".to_string());
        let token_ttl_minutes = std::env::var("TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(60);

        Self {
            database_url,
            jwt_secret,
            token_ttl_minutes,
        }
    }
}

// Create the 'users' and 'todos' tables if they don't exist
pub async fn create_tables(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL
    );"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        completed BOOLEAN NOT NULL DEFAULT 0,
        owner_id INTEGER NOT NULL REFERENCES users(id),
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
