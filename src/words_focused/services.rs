use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateWordRequest, UpdateWordRequest},
    repo_types::{NewWordFocused, WordFocused},
};
use crate::{
    error::{found_any, AppError, AppResult},
    ownership::{ensure_owner, owned_row, Resource},
    patch::Patch,
    store::Store,
    validation::{finish, required},
};

pub async fn create_word(
    store: &dyn Store,
    caller: Uuid,
    metadata_id: Uuid,
    payload: CreateWordRequest,
) -> AppResult<WordFocused> {
    let mut errors = Vec::new();
    let word = required(payload.word.as_deref(), "Word", &mut errors);
    let meaning = required(payload.meaning.as_deref(), "Meaning", &mut errors);
    finish(errors)?;

    ensure_owner(store, Resource::Metadata, metadata_id, caller).await?;

    let word = store
        .insert_word(
            metadata_id,
            NewWordFocused {
                word,
                meaning,
                remembered: payload.remembered.unwrap_or(false),
            },
        )
        .await?;
    info!(word_id = %word.id, %metadata_id, user_id = %caller, "word focused created");
    Ok(word)
}

pub async fn list_words(
    store: &dyn Store,
    caller: Uuid,
    metadata_id: Uuid,
) -> AppResult<Vec<WordFocused>> {
    ensure_owner(store, Resource::Metadata, metadata_id, caller).await?;
    found_any(
        store.list_words(metadata_id).await?,
        "No words found for this metadata.",
    )
}

pub async fn get_word(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<WordFocused> {
    let row = store.find_word(id).await?;
    owned_row(store, Resource::WordFocused, id, caller, row).await
}

/// `remembered` takes any explicit boolean, `false` included; `null` leaves it as is.
pub async fn update_word(
    store: &dyn Store,
    caller: Uuid,
    id: Uuid,
    payload: UpdateWordRequest,
) -> AppResult<WordFocused> {
    let row = store.find_word(id).await?;
    let mut word = owned_row(store, Resource::WordFocused, id, caller, row).await?;

    let mut errors = Vec::new();
    payload.word.apply_required(&mut word.word, "Word", &mut errors);
    payload
        .meaning
        .apply_required(&mut word.meaning, "Meaning", &mut errors);
    finish(errors)?;
    if let Patch::Value(remembered) = payload.remembered {
        word.remembered = remembered;
    }

    let word = store
        .update_word(&word)
        .await?
        .ok_or_else(|| AppError::not_found("Word focused not found."))?;
    info!(word_id = %id, user_id = %caller, "word focused updated");
    Ok(word)
}

pub async fn delete_word(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<()> {
    let row = store.find_word(id).await?;
    owned_row(store, Resource::WordFocused, id, caller, row).await?;
    store.delete_word(id).await?;
    info!(word_id = %id, user_id = %caller, "word focused deleted");
    Ok(())
}
