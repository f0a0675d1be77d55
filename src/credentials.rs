use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use crate::{auth::Principal, repository::RepositoryState};

/// AuthFailure
///
/// Failure modes of the credential check. A missing user and a wrong password
/// collapse into the same variant so the login flow cannot be used to probe
/// which usernames exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("password hashing failed")]
    Hash,
}

/// Authenticator
///
/// Credential Authenticator collaborator: verifies a username/password pair
/// against the stored argon2 hash and issues the authenticated principal.
/// Hash algorithm internals are delegated entirely to the argon2 crate.
#[derive(Clone)]
pub struct Authenticator {
    repo: RepositoryState,
}

impl Authenticator {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// authenticate
    ///
    /// Resolves the username, verifies the password against the stored hash,
    /// and returns the principal to be established in the session.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Principal, AuthFailure> {
        let user = self
            .repo
            .find_user_by_username(username)
            .await
            .ok_or(AuthFailure::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(Principal {
            id: user.id,
            username: user.username,
            role_code: user.role,
        })
    }
}

/// Hashes a password for storage, generating a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthFailure> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthFailure::Hash)
}

/// Verifies a password against a stored PHC hash string.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthFailure> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthFailure::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthFailure::InvalidCredentials)
}
