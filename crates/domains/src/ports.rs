//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the services.

use async_trait::async_trait;

use crate::errors::{AuthError, RepositoryError};
use crate::models::{Claims, Entity, IssuedToken, User};

/// Value-level selector over entities of type `T`.
pub type Predicate<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

/// Persistence contract for one entity type, the data context's "table".
///
/// Implementations make no ordering promise for [`EntitySet::find_first`] when
/// several entities match.
#[async_trait]
pub trait EntitySet<T: Entity>: Send + Sync {
    /// First entity matching `predicate`, if any.
    async fn find_first(&self, predicate: Predicate<'_, T>) -> Result<Option<T>, RepositoryError>;

    /// Every entity matching `predicate`, in ascending id order.
    async fn find_all(&self, predicate: Predicate<'_, T>) -> Result<Vec<T>, RepositoryError>;

    async fn count(&self, predicate: Predicate<'_, T>) -> Result<usize, RepositoryError>;

    /// Stores a new entity, assigning its id. Returns the stored copy.
    async fn insert(&self, entity: T) -> Result<T, RepositoryError>;

    /// Replaces the entity with the same id.
    async fn update(&self, entity: T) -> Result<T, RepositoryError>;

    async fn remove(&self, id: i64) -> Result<(), RepositoryError>;

    /// Removes every entity matching `predicate`, returning how many were removed.
    async fn remove_where(&self, predicate: Predicate<'_, T>) -> Result<usize, RepositoryError>;
}

/// One-way password hashing.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` for a wrong password; `Err` only when `hash` is unreadable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Access-token issuance and validation.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, user: &User) -> Result<IssuedToken, AuthError>;

    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}
