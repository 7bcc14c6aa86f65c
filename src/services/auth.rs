//! Librarian authentication service
//!
//! Passwords are stored as salted Argon2 hashes. Verification takes the same
//! shape whether the username exists or not, and failure carries no detail
//! about which part was wrong.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::librarian::{LibrarianProfile, RegisterLibrarian},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
}

impl AuthService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a librarian account
    pub async fn register(&self, request: RegisterLibrarian) -> AppResult<LibrarianProfile> {
        request.validate()?;
        let hash = self.hash_password(&request.password)?;
        let librarian = self.repository.librarians.create(&request, &hash).await?;
        Ok(librarian.into())
    }

    /// Verify credentials. An unknown username still runs a hash so the
    /// response shape does not reveal whether the account exists.
    pub async fn verify(&self, username: &str, password: &str) -> AppResult<LibrarianProfile> {
        let librarian = self.repository.librarians.get_by_username(username).await?;

        match librarian {
            Some(librarian) => {
                if self.verify_password(&librarian.password_hash, password)? {
                    Ok(librarian.into())
                } else {
                    Err(AppError::AuthenticationFailed)
                }
            }
            None => {
                let _ = self.hash_password(password)?;
                Err(AppError::AuthenticationFailed)
            }
        }
    }

    fn verify_password(&self, hash: &str, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
