use std::sync::Arc;

use axum::{
    extract::State,
    http::{self, Request},
    middleware::Next,
    response::Response,
};

use crate::{auth, error::ApiError, model::CurrentUser, AppState};

// Gate for protected routes: require a well-formed bearer token, verify
// it, and stash the subject for the handlers. Runs before any store
// access happens.
pub async fn mw_require_auth<B>(
    State(data): State<Arc<AppState>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let auth_header = match auth_header {
        Some(auth_header) => auth_header,
        None => return Err(ApiError::Unauthenticated("Missing authorization header")),
    };

    let (scheme, token) = auth_header
        .split_once(' ')
        .ok_or(ApiError::Unauthenticated("Invalid authorization header"))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::Unauthenticated("Invalid auth scheme"));
    }

    let claims = auth::decode_token(&data.config.jwt_secret, token.trim())
        .map_err(|_| ApiError::Unauthenticated("Could not validate credentials"))?;

    request.extensions_mut().insert(CurrentUser {
        username: claims.sub,
    });

    Ok(next.run(request).await)
}
