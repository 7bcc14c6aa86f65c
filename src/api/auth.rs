//! Librarian account endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::librarian::{LibrarianProfile, LoginRequest, RegisterLibrarian},
    AppState,
};

/// Create a librarian account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterLibrarian,
    responses(
        (status = 201, description = "Account created", body = LibrarianProfile),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterLibrarian>,
) -> AppResult<(StatusCode, Json<LibrarianProfile>)> {
    let profile = state.services.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Verify librarian credentials
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LibrarianProfile),
        (status = 401, description = "Authentication failed")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LibrarianProfile>> {
    let profile = state
        .services
        .auth
        .verify(&request.username, &request.password)
        .await?;
    Ok(Json(profile))
}
