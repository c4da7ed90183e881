//! Caller identification. Authentication itself happens upstream; these
//! helpers map the uid the client presents onto a stored user.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::info;

use crate::errors::AppError;
use crate::models::user::User;
use crate::store::Store;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The uid from the `x-user-id` header. Missing or blank → 401.
#[derive(Debug, Clone)]
pub struct CallerId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| CallerId(v.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}

/// Looks the caller up, creating a placeholder record on first contact.
pub async fn ensure_caller(store: &dyn Store, caller: &CallerId) -> Result<User, AppError> {
    if let Some(user) = store.get_user(&caller.0).await? {
        return Ok(user);
    }
    let short: String = caller.0.chars().take(8).collect();
    let email = format!("user_{}@localhost", caller.0);
    let name = format!("User {short}");
    let user = store
        .upsert_user(&caller.0, Some(&email), Some(&name))
        .await?;
    info!("Created placeholder user {}", user.id);
    Ok(user)
}

/// Resolves a client-supplied uid to a stored user: by id first, then by email.
pub async fn resolve_user(
    store: &dyn Store,
    user_id: &str,
    email: Option<&str>,
) -> Result<User, AppError> {
    if let Some(user) = store.get_user(user_id).await? {
        return Ok(user);
    }
    if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
        if let Some(user) = store.find_user_by_email(email).await? {
            info!("Resolved user {user_id} by email to {}", user.id);
            return Ok(user);
        }
    }
    Err(AppError::NotFound("User not found in database".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_resolve_user_falls_back_to_email() {
        let store = MemoryStore::new();
        store
            .upsert_user("db-id", Some("sam@example.com"), None)
            .await
            .unwrap();
        let user = resolve_user(&store, "auth-uid", Some("sam@example.com"))
            .await
            .unwrap();
        assert_eq!(user.id, "db-id");
    }

    #[tokio::test]
    async fn test_resolve_user_unknown_is_not_found() {
        let store = MemoryStore::new();
        let err = resolve_user(&store, "nobody", None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ensure_caller_creates_placeholder_once() {
        let store = MemoryStore::new();
        let caller = CallerId("abcdef123456".to_string());
        let first = ensure_caller(&store, &caller).await.unwrap();
        assert_eq!(first.email.as_deref(), Some("user_abcdef123456@localhost"));
        assert_eq!(first.name.as_deref(), Some("User abcdef12"));
        let second = ensure_caller(&store, &caller).await.unwrap();
        assert_eq!(first.created_at, second.created_at);
    }
}
