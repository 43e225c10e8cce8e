//! Registration, login and user lookup.

use std::sync::Arc;

use chrono::Utc;
use domains::lookup::{by_id_or_not_found, first_or_not_found};
use domains::{AppError, AuthError, EntitySet, PasswordHasher, Result, TokenService, User};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserDto};

/// Same message for unknown email and wrong password, so login responses do not
/// reveal which accounts exist.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct UserService {
    users: Arc<dyn EntitySet<User>>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    /// Held from the uniqueness check through the insert, so two registrations
    /// for the same email or username cannot both pass the check.
    registration: Mutex<()>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn EntitySet<User>>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            registration: Mutex::new(()),
        }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> Result<AuthResponse> {
        let email = request.email.trim().to_string();
        let username = request.username.trim().to_string();

        // Cheap rejection before paying for the hash; repeated under the lock.
        self.ensure_unique(&email, &username).await?;
        let password_hash = self.hash_password(request.password).await?;

        let user = {
            let _guard = self.registration.lock().await;
            self.ensure_unique(&email, &username).await?;
            self.users
                .insert(User {
                    id: 0,
                    username,
                    email,
                    password_hash,
                    created_at: Utc::now(),
                })
                .await?
        };

        let issued = self.tokens.issue(&user)?;
        info!(user_id = user.id, "user registered");
        Ok(AuthResponse::new(issued, user))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let email = request.email.trim().to_string();
        let Some(user) = self.users.find_first(&|u: &User| u.has_email(&email)).await? else {
            warn!("login attempt for unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS).into());
        };

        if !self
            .verify_password(request.password, user.password_hash.clone())
            .await?
        {
            warn!(user_id = user.id, "login attempt with wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS).into());
        }

        let issued = self.tokens.issue(&user)?;
        info!(user_id = user.id, "user logged in");
        Ok(AuthResponse::new(issued, user))
    }

    pub async fn get(&self, id: i64) -> Result<UserDto> {
        let user: User = by_id_or_not_found(self.users.as_ref(), id).await?;
        Ok(user.into())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<UserDto> {
        let user = first_or_not_found(
            self.users.as_ref(),
            |u: &User| u.has_email(email),
            format!("User with email '{email}' not found"),
        )
        .await?;
        Ok(user.into())
    }

    async fn ensure_unique(&self, email: &str, username: &str) -> Result<()> {
        if self.users.count(&|u: &User| u.has_email(email)).await? > 0 {
            return Err(AppError::bad_request(format!("Email '{email}' is already registered")).into());
        }
        if self.users.count(&|u: &User| u.username == username).await? > 0 {
            return Err(AppError::bad_request(format!("Username '{username}' is already taken")).into());
        }
        Ok(())
    }

    // Hashing is CPU-bound, so it runs on the blocking pool.
    async fn hash_password(&self, password: String) -> Result<String> {
        let hasher = Arc::clone(&self.hasher);
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| AuthError::Hashing(format!("hashing task failed: {err}")))??;
        Ok(hash)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool> {
        let hasher = Arc::clone(&self.hasher);
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| AuthError::Hashing(format!("verification task failed: {err}")))??;
        Ok(matches)
    }
}
