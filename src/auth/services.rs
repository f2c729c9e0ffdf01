//! Login and token refresh.

use tracing::{info, warn};

use super::{
    dto::{AccessToken, TokenPair},
    jwt::JwtKeys,
    password::verify_password,
};
use crate::{
    error::{AppError, AppResult},
    store::Store,
    validation::{finish, required, required_verbatim},
};

/// Verifies credentials and issues an access/refresh pair. The refresh token is persisted;
/// earlier refresh tokens of the same user stay valid.
pub async fn login(
    store: &dyn Store,
    keys: &JwtKeys,
    email: Option<&str>,
    password: Option<&str>,
) -> AppResult<TokenPair> {
    let mut errors = Vec::new();
    let email = required(email, "Email", &mut errors).to_lowercase();
    let password = required_verbatim(password, "Password", &mut errors);
    finish(errors)?;

    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| {
            warn!(%email, "login unknown email");
            AppError::not_found("User not found")
        })?;

    if !verify_password(&password, &user.password_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let access_token = keys.sign_access(user.id, user.role)?;
    let refresh_token = keys.sign_refresh(user.id, user.role)?;
    store.insert_refresh_token(user.id, &refresh_token).await?;

    info!(user_id = %user.id, "user logged in");
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Exchanges a persisted, unexpired refresh token for a new access token.
///
/// Subject and role come from the refresh token itself; the user row is not re-read.
pub async fn refresh(
    store: &dyn Store,
    keys: &JwtKeys,
    refresh_token: Option<&str>,
) -> AppResult<AccessToken> {
    let mut errors = Vec::new();
    let token = required(refresh_token, "Refresh token", &mut errors);
    finish(errors)?;

    if !store.refresh_token_exists(&token).await? {
        warn!("refresh token not on record");
        return Err(AppError::InvalidRefreshToken);
    }

    let claims = keys.verify_refresh(&token).map_err(|e| {
        warn!(error = %e, "refresh token rejected");
        AppError::InvalidRefreshToken
    })?;

    let access_token = keys.sign_access(claims.sub, claims.role)?;
    info!(user_id = %claims.sub, "access token refreshed");
    Ok(AccessToken { access_token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::password::hash_password,
        state::AppState,
        store::memory::MemoryStore,
        users::repo_types::{NewUser, Role},
    };
    use axum::extract::FromRef;
    use std::sync::Arc;
    use uuid::Uuid;

    async fn setup(role: Role) -> (Arc<MemoryStore>, JwtKeys, Uuid) {
        let store = Arc::new(MemoryStore::default());
        let keys = JwtKeys::from_ref(&AppState::fake_with(store.clone()));
        let user = store
            .insert_user(NewUser {
                username: "ada".into(),
                email: "ada@example.com".into(),
                password_hash: hash_password("analytical-engine").unwrap(),
                role,
            })
            .await
            .unwrap();
        (store, keys, user.id)
    }

    #[tokio::test]
    async fn account_without_usable_hash_cannot_log_in() {
        let store = MemoryStore::default();
        let keys = JwtKeys::from_ref(&AppState::fake());
        let locked = store.seed_user("locked@example.com").await;
        let err = login(&store, &keys, Some("locked@example.com"), Some(""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = login(&store, &keys, Some("locked@example.com"), Some("!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(store.refresh_token_count(locked), 0);
    }

    #[tokio::test]
    async fn login_issues_verifiable_pair_and_persists_refresh() {
        let (store, keys, user_id) = setup(Role::Admin).await;
        let pair = login(
            store.as_ref(),
            &keys,
            Some(" Ada@Example.com "),
            Some("analytical-engine"),
        )
        .await
        .unwrap();

        let access = keys.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.role, Role::Admin);
        assert_eq!(access.exp - access.iat, 3600);

        let refresh_claims = keys.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh_claims.exp - refresh_claims.iat, 7 * 24 * 3600);
        assert!(store.refresh_token_exists(&pair.refresh_token).await.unwrap());
    }

    #[tokio::test]
    async fn password_whitespace_is_significant() {
        let store = MemoryStore::default();
        let keys = JwtKeys::from_ref(&AppState::fake());
        store
            .insert_user(NewUser {
                username: "grace".into(),
                email: "grace@example.com".into(),
                password_hash: hash_password("  cobol ").unwrap(),
                role: Role::User,
            })
            .await
            .unwrap();

        let err = login(&store, &keys, Some("grace@example.com"), Some("cobol"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        login(&store, &keys, Some("grace@example.com"), Some("  cobol "))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn repeated_logins_keep_all_refresh_tokens() {
        let (store, keys, user_id) = setup(Role::User).await;
        for _ in 0..2 {
            login(store.as_ref(), &keys, Some("ada@example.com"), Some("analytical-engine"))
                .await
                .unwrap();
        }
        assert_eq!(store.refresh_token_count(user_id), 2);
    }

    #[tokio::test]
    async fn login_failures() {
        let (store, keys, _) = setup(Role::User).await;
        let err = login(store.as_ref(), &keys, Some("nobody@example.com"), Some("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = login(store.as_ref(), &keys, Some("ada@example.com"), Some("wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = login(store.as_ref(), &keys, None, Some("wrong")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(d) if d == vec!["Email is required."]));
    }

    #[tokio::test]
    async fn refresh_rotates_access_token_with_embedded_claims() {
        let (store, keys, user_id) = setup(Role::Admin).await;
        let pair = login(store.as_ref(), &keys, Some("ada@example.com"), Some("analytical-engine"))
            .await
            .unwrap();

        let fresh = refresh(store.as_ref(), &keys, Some(&pair.refresh_token)).await.unwrap();
        let claims = keys.verify_access(&fresh.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn refresh_rejects_well_formed_token_not_on_record() {
        let (store, keys, user_id) = setup(Role::User).await;
        let forged = keys.sign_refresh(user_id, Role::User).unwrap();
        let err = refresh(store.as_ref(), &keys, Some(&forged)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn refresh_rejects_stored_access_token() {
        let (store, keys, user_id) = setup(Role::User).await;
        let access = keys.sign_access(user_id, Role::User).unwrap();
        store.insert_refresh_token(user_id, &access).await.unwrap();
        let err = refresh(store.as_ref(), &keys, Some(&access)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRefreshToken));
    }

    #[tokio::test]
    async fn deleting_the_user_invalidates_its_refresh_tokens() {
        let (store, keys, user_id) = setup(Role::User).await;
        let pair = login(store.as_ref(), &keys, Some("ada@example.com"), Some("analytical-engine"))
            .await
            .unwrap();
        store.delete_user(user_id).await.unwrap();
        let err = refresh(store.as_ref(), &keys, Some(&pair.refresh_token)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRefreshToken));
    }
}
