use std::{net::SocketAddr, sync::Arc};

use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use todo_api::{create_tables, route::create_router, AppState, Config};

// Entry point of the application
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_api=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();

    // Check if the database exists, if not, create it
    if !Sqlite::database_exists(&config.database_url)
        .await
        .unwrap_or(false)
    {
        info!("Creating database {}", config.database_url);
        match Sqlite::create_database(&config.database_url).await {
            Ok(_) => info!("Create db success"),
            Err(error) => panic!("error: {}", error),
        }
    } else {
        info!("Database already exists");
    }

    // Connect to the database
    let pool = match SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            info!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            error!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    // Create the 'users' and 'todos' tables if they don't exist
    if let Err(err) = create_tables(&pool).await {
        error!("🔥 Failed to create tables: {:?}", err);
        std::process::exit(1);
    }

    // Create an Arc-wrapped instance of the application state
    let app_state = Arc::new(AppState { db: pool, config });

    // Configure CORS settings for the application; any origin is allowed
    // in this deployment
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Create the Axum application with routes and middleware
    let app = create_router(app_state).layer(cors);

    info!("🚀 Server started successfully");

    // Specify the address and port to run the server on
    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));

    // Start the Axum server
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
