// Data model representing a Todo item
#[derive(Debug, sqlx::FromRow, serde::Serialize, serde::Deserialize)]
pub struct Todo {
    pub(crate) id: i32,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) completed: bool,
}

// Data model representing a registered user. No Serialize derive: the
// password hash must never end up in a response body.
#[derive(Debug, sqlx::FromRow)]
pub struct User {
    pub(crate) id: i32,
    pub(crate) username: String,
    pub(crate) hashed_password: String,
}

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub(crate) username: String,
}
