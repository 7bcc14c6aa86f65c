//! Librarian accounts repository

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::librarian::{Librarian, RegisterLibrarian},
};

#[derive(Clone)]
pub struct LibrariansRepository {
    pool: Pool<Sqlite>,
}

impl LibrariansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Create a librarian account with an already-hashed password
    pub async fn create(
        &self,
        request: &RegisterLibrarian,
        password_hash: &str,
    ) -> AppResult<Librarian> {
        let created = sqlx::query_as::<_, Librarian>(
            r#"
            INSERT INTO librarians (username, password_hash, name, email, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&request.username)
        .bind(password_hash)
        .bind(&request.name)
        .bind(&request.email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                AppError::DuplicateKey(format!(
                    "Username {} is already taken",
                    request.username
                ))
            }
            _ => err.into(),
        })?;

        Ok(created)
    }

    /// Look up an account by username
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<Librarian>> {
        let librarian =
            sqlx::query_as::<_, Librarian>("SELECT * FROM librarians WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(librarian)
    }
}
