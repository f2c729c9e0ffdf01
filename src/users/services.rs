use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{RegisterRequest, UpdateUserRequest},
    repo_types::{NewUser, Role, User},
};
use crate::{
    auth::{password::hash_password, AuthUser},
    error::{AppError, AppResult},
    patch::Patch,
    store::Store,
    validation::{finish, is_valid_email, required, required_verbatim},
};

const ROLE_CHOICES: &str = "Role must be one of: user, admin.";

fn parse_role(raw: &str) -> Option<Role> {
    match raw.trim() {
        "user" => Some(Role::User),
        "admin" => Some(Role::Admin),
        _ => None,
    }
}

/// Creates a user with a hashed password. Duplicate emails surface as `Conflict`.
pub async fn register(store: &dyn Store, payload: RegisterRequest) -> AppResult<User> {
    let mut errors = Vec::new();
    let username = required(payload.username.as_deref(), "Username", &mut errors);
    let email = required(payload.email.as_deref(), "Email", &mut errors).to_lowercase();
    let password = required_verbatim(payload.password.as_deref(), "Password", &mut errors);
    if !email.is_empty() && !is_valid_email(&email) {
        errors.push("Email must be a valid email address.".into());
    }
    let role = match payload.role.as_deref() {
        None => Role::default(),
        Some(raw) => parse_role(raw).unwrap_or_else(|| {
            errors.push(ROLE_CHOICES.into());
            Role::default()
        }),
    };
    finish(errors)?;

    let password_hash = hash_password(&password)?;
    let user = store
        .insert_user(NewUser {
            username,
            email,
            password_hash,
            role,
        })
        .await?;

    info!(user_id = %user.id, role = ?user.role, "user registered");
    Ok(user)
}

pub async fn list_users(store: &dyn Store, caller: AuthUser) -> AppResult<Vec<User>> {
    caller.require_admin()?;
    Ok(store.list_users().await?)
}

pub async fn get_user(store: &dyn Store, caller: AuthUser, id: Uuid) -> AppResult<User> {
    caller.require_self_or_admin(id)?;
    store
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// Only admins may change a role.
pub async fn update_user(
    store: &dyn Store,
    caller: AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<User> {
    caller.require_self_or_admin(id)?;
    let mut user = store
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let mut errors = Vec::new();
    payload
        .username
        .apply_required(&mut user.username, "Username", &mut errors);
    let email_supplied = !payload.email.is_missing();
    payload.email.apply_required(&mut user.email, "Email", &mut errors);
    if email_supplied {
        user.email = user.email.to_lowercase();
        if !is_valid_email(&user.email) {
            errors.push("Email must be a valid email address.".into());
        }
    }
    match payload.role {
        Patch::Missing => {}
        Patch::Value(raw) => match parse_role(&raw) {
            Some(role) if role != user.role && !caller.is_admin() => {
                warn!(user_id = %caller.id, "role change refused");
                return Err(AppError::forbidden("Forbidden: Admins only"));
            }
            Some(role) => user.role = role,
            None => errors.push(ROLE_CHOICES.into()),
        },
        Patch::Null => errors.push("Role is required.".into()),
    }
    finish(errors)?;

    let user = store
        .update_user(&user)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    info!(user_id = %user.id, by = %caller.id, "user updated");
    Ok(user)
}

/// Removes the user together with its folders, day tests and refresh tokens.
pub async fn delete_user(store: &dyn Store, caller: AuthUser, id: Uuid) -> AppResult<()> {
    caller.require_self_or_admin(id)?;
    if !store.delete_user(id).await? {
        return Err(AppError::not_found("User not found"));
    }
    info!(user_id = %id, by = %caller.id, "user deleted");
    Ok(())
}
