//! Librarian account model and auth request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Librarian account row. The password hash never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct Librarian {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public view of a librarian account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibrarianProfile {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Librarian> for LibrarianProfile {
    fn from(librarian: Librarian) -> Self {
        Self {
            id: librarian.id,
            username: librarian.username,
            name: librarian.name,
            email: librarian.email,
            created_at: librarian.created_at,
        }
    }
}

/// Register librarian request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterLibrarian {
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
