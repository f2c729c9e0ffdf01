use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateMetadataRequest, UpdateMetadataRequest},
    repo_types::{Metadata, NewMetadata},
};
use crate::{
    error::{found_any, AppError, AppResult},
    ownership::{ensure_owner, owned_row, Resource},
    patch::Patch,
    store::Store,
    validation::{finish, optional, required},
};

const NEGATIVE_TIME: &str = "Time spent must not be negative.";

/// Attaches study metadata to a file the caller owns.
pub async fn create_metadata(
    store: &dyn Store,
    caller: Uuid,
    file_id: Uuid,
    payload: CreateMetadataRequest,
) -> AppResult<Metadata> {
    let mut errors = Vec::new();
    let subject = required(payload.subject.as_deref(), "Subject", &mut errors);
    if payload.time_spent.is_some_and(|t| t < 0) {
        errors.push(NEGATIVE_TIME.into());
    }
    finish(errors)?;

    ensure_owner(store, Resource::File, file_id, caller).await?;

    let metadata = store
        .insert_metadata(
            file_id,
            NewMetadata {
                subject,
                level: optional(payload.level),
                time_spent: payload.time_spent,
                notes: optional(payload.notes),
            },
        )
        .await?;
    info!(metadata_id = %metadata.id, %file_id, user_id = %caller, "metadata created");
    Ok(metadata)
}

pub async fn list_metadata(
    store: &dyn Store,
    caller: Uuid,
    file_id: Uuid,
) -> AppResult<Vec<Metadata>> {
    ensure_owner(store, Resource::File, file_id, caller).await?;
    found_any(
        store.list_metadata(file_id).await?,
        "No metadata found for this file.",
    )
}

pub async fn get_metadata(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<Metadata> {
    let row = store.find_metadata(id).await?;
    owned_row(store, Resource::Metadata, id, caller, row).await
}

/// `level`, `time_spent` and `notes` are cleared by an explicit `null`.
pub async fn update_metadata(
    store: &dyn Store,
    caller: Uuid,
    id: Uuid,
    payload: UpdateMetadataRequest,
) -> AppResult<Metadata> {
    let row = store.find_metadata(id).await?;
    let mut metadata = owned_row(store, Resource::Metadata, id, caller, row).await?;

    let mut errors = Vec::new();
    payload
        .subject
        .apply_required(&mut metadata.subject, "Subject", &mut errors);
    if matches!(payload.time_spent, Patch::Value(t) if t < 0) {
        errors.push(NEGATIVE_TIME.into());
    }
    finish(errors)?;

    trimmed(payload.level).apply_to(&mut metadata.level);
    payload.time_spent.apply_to(&mut metadata.time_spent);
    trimmed(payload.notes).apply_to(&mut metadata.notes);

    let metadata = store
        .update_metadata(&metadata)
        .await?
        .ok_or_else(|| AppError::not_found("Metadata not found."))?;
    info!(metadata_id = %id, user_id = %caller, "metadata updated");
    Ok(metadata)
}

/// Removes the metadata with its words and skill ratings.
pub async fn delete_metadata(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<()> {
    let row = store.find_metadata(id).await?;
    owned_row(store, Resource::Metadata, id, caller, row).await?;
    store.delete_metadata(id).await?;
    info!(metadata_id = %id, user_id = %caller, "metadata deleted");
    Ok(())
}

/// Blank text counts as `null`.
fn trimmed(patch: Patch<String>) -> Patch<String> {
    match patch {
        Patch::Value(v) => match optional(Some(v)) {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        },
        other => other,
    }
}
