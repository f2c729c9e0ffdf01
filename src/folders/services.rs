use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateFolderRequest, UpdateFolderRequest},
    repo_types::Folder,
};
use crate::{
    error::{found_any, AppError, AppResult},
    ownership::{owned_row, Resource},
    patch::Patch,
    store::Store,
    validation::{finish, required},
};

pub async fn create_folder(
    store: &dyn Store,
    caller: Uuid,
    payload: CreateFolderRequest,
) -> AppResult<Folder> {
    let mut errors = Vec::new();
    let name = required(payload.name.as_deref(), "Folder name", &mut errors);
    finish(errors)?;

    let folder = store.insert_folder(caller, &name).await?;
    info!(folder_id = %folder.id, user_id = %caller, "folder created");
    Ok(folder)
}

pub async fn list_folders(store: &dyn Store, caller: Uuid) -> AppResult<Vec<Folder>> {
    found_any(
        store.list_folders(caller).await?,
        "No folders found for this user.",
    )
}

pub async fn get_folder(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<Folder> {
    let row = store.find_folder(id).await?;
    owned_row(store, Resource::Folder, id, caller, row).await
}

/// A folder only has a name, so the update must carry one.
pub async fn update_folder(
    store: &dyn Store,
    caller: Uuid,
    id: Uuid,
    payload: UpdateFolderRequest,
) -> AppResult<Folder> {
    let row = store.find_folder(id).await?;
    let mut folder = owned_row(store, Resource::Folder, id, caller, row).await?;

    let mut errors = Vec::new();
    let name = match payload.name {
        Patch::Missing => Patch::Null,
        other => other,
    };
    name.apply_required(&mut folder.name, "Folder name", &mut errors);
    finish(errors)?;

    let folder = store
        .update_folder(&folder)
        .await?
        .ok_or_else(|| AppError::not_found("Folder not found."))?;
    info!(folder_id = %id, user_id = %caller, "folder updated");
    Ok(folder)
}

/// Removes the folder and, through it, every file below.
pub async fn delete_folder(store: &dyn Store, caller: Uuid, id: Uuid) -> AppResult<()> {
    let row = store.find_folder(id).await?;
    owned_row(store, Resource::Folder, id, caller, row).await?;
    store.delete_folder(id).await?;
    info!(folder_id = %id, user_id = %caller, "folder deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn named(name: &str) -> CreateFolderRequest {
        CreateFolderRequest {
            name: Some(name.into()),
        }
    }

    #[tokio::test]
    async fn owner_reads_stranger_is_forbidden_then_gone_after_delete() {
        let store = MemoryStore::default();
        let a = store.seed_user("a@example.com").await;
        let b = store.seed_user("b@example.com").await;

        let f1 = create_folder(&store, a, named("Biology")).await.unwrap();

        let err = get_folder(&store, b, f1.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let got = get_folder(&store, a, f1.id).await.unwrap();
        assert_eq!(got.name, "Biology");
        assert_eq!(got.user_id, a);

        delete_folder(&store, a, f1.id).await.unwrap();
        let err = get_folder(&store, a, f1.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_trims_and_validates() {
        let store = MemoryStore::default();
        let a = store.seed_user("a@example.com").await;

        let folder = create_folder(&store, a, named("  Biology  ")).await.unwrap();
        assert_eq!(folder.name, "Biology");

        let err = create_folder(&store, a, named("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(d) if d == vec!["Folder name is required."]));
    }

    #[tokio::test]
    async fn empty_listing_is_not_found() {
        let store = MemoryStore::default();
        let a = store.seed_user("a@example.com").await;
        let b = store.seed_user("b@example.com").await;
        assert!(matches!(list_folders(&store, a).await, Err(AppError::NotFound(_))));

        create_folder(&store, a, named("Biology")).await.unwrap();
        create_folder(&store, a, named("History")).await.unwrap();
        create_folder(&store, b, named("Art")).await.unwrap();
        let names: Vec<_> = list_folders(&store, a)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Biology", "History"]);
    }

    #[tokio::test]
    async fn stranger_cannot_update_or_delete() {
        let store = MemoryStore::default();
        let a = store.seed_user("a@example.com").await;
        let b = store.seed_user("b@example.com").await;
        let folder = create_folder(&store, a, named("Biology")).await.unwrap();

        let rename = UpdateFolderRequest {
            name: Patch::Value("Mine now".into()),
        };
        assert!(matches!(
            update_folder(&store, b, folder.id, rename).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            delete_folder(&store, b, folder.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(get_folder(&store, a, folder.id).await.unwrap().name, "Biology");
    }

    #[tokio::test]
    async fn update_requires_a_name() {
        let store = MemoryStore::default();
        let a = store.seed_user("a@example.com").await;
        let folder = create_folder(&store, a, named("Biology")).await.unwrap();

        let err = update_folder(&store, a, folder.id, UpdateFolderRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let renamed = update_folder(
            &store,
            a,
            folder.id,
            UpdateFolderRequest {
                name: Patch::Value(" Chemistry ".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Chemistry");
    }

    #[tokio::test]
    async fn deleting_folder_removes_its_files() {
        let store = MemoryStore::default();
        let a = store.seed_user("a@example.com").await;
        let folder = create_folder(&store, a, named("Biology")).await.unwrap();
        let file = store.insert_file(folder.id, "Cells", "text").await.unwrap();

        delete_folder(&store, a, folder.id).await.unwrap();
        assert!(store.find_file(file.id).await.unwrap().is_none());
    }
}
