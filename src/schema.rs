// Struct representing the request body for register and login
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct AuthSchema {
    pub username: String,
    pub password: String,
}

// Struct representing the request body for creating a new Todo
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CreateTodoSchema {
    pub title: String,
    pub description: Option<String>,
}

// Struct representing the response body carrying an access token
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
