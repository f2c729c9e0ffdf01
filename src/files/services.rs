use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateFileRequest, UpdateFileRequest},
    repo_types::File,
};
use crate::{
    error::{found_any, AppError, AppResult},
    ownership::{ensure_owner, owned_row, Resource},
    patch::Patch,
    store::Store,
    validation::{finish, required},
};

/// Creates a file in a folder the caller owns. The name is trimmed, the content kept as sent.
pub async fn create_file(
    store: &dyn Store,
    caller: Uuid,
    folder_id: Uuid,
    payload: CreateFileRequest,
) -> AppResult<File> {
    let mut errors = Vec::new();
    let name = required(payload.name.as_deref(), "File name", &mut errors);
    required(payload.content.as_deref(), "File content", &mut errors);
    finish(errors)?;
    let content = payload.content.unwrap_or_default();

    ensure_owner(store, Resource::Folder, folder_id, caller).await?;

    let file = store.insert_file(folder_id, &name, &content).await?;
    info!(file_id = %file.id, %folder_id, user_id = %caller, "file created");
    Ok(file)
}

pub async fn list_files(store: &dyn Store, caller: Uuid, folder_id: Uuid) -> AppResult<Vec<File>> {
    ensure_owner(store, Resource::Folder, folder_id, caller).await?;
    found_any(
        store.list_files(folder_id).await?,
        "No files found in this folder.",
    )
}

pub async fn get_file(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<File> {
    let row = store.find_file(id).await?;
    owned_row(store, Resource::File, id, caller, row).await
}

pub async fn update_file(
    store: &dyn Store,
    caller: Uuid,
    id: Uuid,
    payload: UpdateFileRequest,
) -> AppResult<File> {
    let row = store.find_file(id).await?;
    let mut file = owned_row(store, Resource::File, id, caller, row).await?;

    let mut errors = Vec::new();
    payload.name.apply_required(&mut file.name, "File name", &mut errors);
    match payload.content {
        Patch::Missing => {}
        Patch::Value(content) if !content.trim().is_empty() => file.content = content,
        _ => errors.push("File content is required.".into()),
    }
    finish(errors)?;

    let file = store
        .update_file(&file)
        .await?
        .ok_or_else(|| AppError::not_found("File not found."))?;
    info!(file_id = %id, user_id = %caller, "file updated");
    Ok(file)
}

/// Removes the file and its metadata.
pub async fn delete_file(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<()> {
    let row = store.find_file(id).await?;
    owned_row(store, Resource::File, id, caller, row).await?;
    store.delete_file(id).await?;
    info!(file_id = %id, user_id = %caller, "file deleted");
    Ok(())
}
