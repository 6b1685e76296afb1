use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use sqlx::query_as;
use tracing::{debug, error};

use crate::{
    auth,
    error::ApiError,
    model::{CurrentUser, Todo, User},
    schema::{AuthSchema, CreateTodoSchema, TokenResponse},
    AppState,
};

// Handler for the health checker route
pub async fn health_checker_handler() -> impl IntoResponse {
    const MESSAGE: &str = "Multi-user Todo API with Rust, SQLX, SQLite, and Axum";

    let json_response = serde_json::json!({
        "status": "success",
        "message": MESSAGE
    });

    Json(json_response)
}

// Resolve the verified subject to its account row. A valid token whose
// account no longer exists is NotFound, not Unauthenticated.
async fn fetch_current_user(
    data: &AppState,
    current_user: &CurrentUser,
) -> Result<User, ApiError> {
    let user = query_as::<_, User>(
        "SELECT id, username, hashed_password FROM users WHERE username = ?",
    )
    .bind(&current_user.username)
    .fetch_optional(&data.db)
    .await?;

    user.ok_or(ApiError::NotFound("User not found"))
}

fn issue_token(data: &AppState, username: &str) -> Result<String, ApiError> {
    auth::create_access_token(
        &data.config.jwt_secret,
        username,
        data.config.token_ttl_minutes,
    )
    .map_err(|err| {
        error!("token issuance failed: {:?}", err);
        ApiError::Internal
    })
}

// Handler for registering a new user; a successful registration also
// logs the user in
pub async fn register(
    State(data): State<Arc<AppState>>,
    Json(body): Json<AuthSchema>,
) -> Result<impl IntoResponse, ApiError> {
    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password must not be empty",
        ));
    }

    let existing = query_as::<_, User>(
        "SELECT id, username, hashed_password FROM users WHERE username = ?",
    )
    .bind(&body.username)
    .fetch_optional(&data.db)
    .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("User already exists"));
    }

    let hashed = auth::hash_password(&body.password).map_err(|err| {
        error!("password hashing failed: {:?}", err);
        ApiError::Internal
    })?;

    let user_result = query_as::<_, User>(
        "INSERT INTO users (username, hashed_password) VALUES (?, ?) RETURNING id, username, hashed_password",
    )
    .bind(&body.username)
    .bind(&hashed)
    .fetch_one(&data.db)
    .await;

    let user = match user_result {
        Ok(user) => user,
        // A concurrent registration can slip past the existence check;
        // the unique index on username reports it here instead
        Err(err) if err.to_string().contains("UNIQUE constraint failed") => {
            return Err(ApiError::Conflict("User already exists"));
        }
        Err(err) => return Err(err.into()),
    };

    debug!("registered user {}", user.username);

    let token = issue_token(&data, &user.username)?;
    Ok(Json(TokenResponse::bearer(token)))
}

// Handler for logging in an existing user
pub async fn login(
    State(data): State<Arc<AppState>>,
    Json(body): Json<AuthSchema>,
) -> Result<impl IntoResponse, ApiError> {
    let db_user = query_as::<_, User>(
        "SELECT id, username, hashed_password FROM users WHERE username = ?",
    )
    .bind(&body.username)
    .fetch_optional(&data.db)
    .await?;

    // One generic failure for unknown user and wrong password alike
    let db_user = match db_user {
        Some(user) if auth::verify_password(&body.password, &user.hashed_password) => user,
        _ => return Err(ApiError::Unauthenticated("Incorrect username or password")),
    };

    let token = issue_token(&data, &db_user.username)?;
    Ok(Json(TokenResponse::bearer(token)))
}

// Handler for creating a new Todo owned by the authenticated user
pub async fn create_todo(
    State(data): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateTodoSchema>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title.is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty"));
    }

    let user = fetch_current_user(&data, &current_user).await?;

    let todo = query_as::<_, Todo>(
        "INSERT INTO todos (title, description, owner_id) VALUES (?, ?, ?) RETURNING id, title, description, completed",
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(user.id)
    .fetch_one(&data.db)
    .await?;

    Ok(Json(todo))
}

// Handler for listing the authenticated user's Todo items
pub async fn get_todos(
    State(data): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = fetch_current_user(&data, &current_user).await?;

    let todos = query_as::<_, Todo>(
        "SELECT id, title, description, completed FROM todos WHERE owner_id = ?",
    )
    .bind(user.id)
    .fetch_all(&data.db)
    .await?;

    Ok(Json(todos))
}

// Handler for toggling a Todo's completed flag
pub async fn toggle_todo(
    Path(id): Path<i32>,
    State(data): State<Arc<AppState>>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = fetch_current_user(&data, &current_user).await?;

    // Filtering by owner as well as id makes another user's todo
    // indistinguishable from a missing one
    let todo = query_as::<_, Todo>(
        "UPDATE todos SET completed = NOT completed WHERE id = ? AND owner_id = ? RETURNING id, title, description, completed",
    )
    .bind(id)
    .bind(user.id)
    .fetch_optional(&data.db)
    .await?
    .ok_or(ApiError::NotFound("Todo not found"))?;

    Ok(Json(json!({ "id": todo.id, "completed": todo.completed })))
}
