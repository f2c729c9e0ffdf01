//! Ownership resolution: every nested entity is owned by the user at the top of its chain.
//!
//! The chain is table driven. Each [`Resource`] knows which resource its parent
//! column points at; a folder or day test points straight at a user.

use tracing::warn;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    store::{Store, StoreResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Folder,
    File,
    Metadata,
    WordFocused,
    SkillPerformance,
    DayTest,
}

impl Resource {
    /// The resource the parent column references, `None` when it references a user.
    pub const fn parent(self) -> Option<Resource> {
        match self {
            Resource::Folder | Resource::DayTest => None,
            Resource::File => Some(Resource::Folder),
            Resource::Metadata => Some(Resource::File),
            Resource::WordFocused | Resource::SkillPerformance => Some(Resource::Metadata),
        }
    }

    pub const fn table(self) -> &'static str {
        match self {
            Resource::Folder => "folders",
            Resource::File => "files",
            Resource::Metadata => "metadata",
            Resource::WordFocused => "words_focused",
            Resource::SkillPerformance => "skills_performance",
            Resource::DayTest => "day_tests",
        }
    }

    pub const fn parent_column(self) -> &'static str {
        match self {
            Resource::Folder | Resource::DayTest => "user_id",
            Resource::File => "folder_id",
            Resource::Metadata => "file_id",
            Resource::WordFocused | Resource::SkillPerformance => "metadata_id",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Resource::Folder => "Folder",
            Resource::File => "File",
            Resource::Metadata => "Metadata",
            Resource::WordFocused => "Word focused",
            Resource::SkillPerformance => "Skill performance",
            Resource::DayTest => "Day test",
        }
    }

    pub const fn noun(self) -> &'static str {
        match self {
            Resource::Folder => "folder",
            Resource::File => "file",
            Resource::Metadata => "metadata",
            Resource::WordFocused => "word focused",
            Resource::SkillPerformance => "skill performance",
            Resource::DayTest => "day test",
        }
    }
}

/// Walks parent links from `(resource, id)` up to the owning user.
/// `None` when any link in the chain is missing.
pub async fn resolve_owner(
    store: &dyn Store,
    resource: Resource,
    id: Uuid,
) -> StoreResult<Option<Uuid>> {
    let (mut resource, mut id) = (resource, id);
    loop {
        let Some(parent_id) = store.parent_of(resource, id).await? else {
            return Ok(None);
        };
        match resource.parent() {
            Some(next) => {
                resource = next;
                id = parent_id;
            }
            None => return Ok(Some(parent_id)),
        }
    }
}

/// Fails with `Forbidden` unless `caller` owns `(resource, id)`.
///
/// A missing chain counts as not owned; callers that must report a missing
/// entity as 404 load it before calling this.
pub async fn ensure_owner(
    store: &dyn Store,
    resource: Resource,
    id: Uuid,
    caller: Uuid,
) -> AppResult<()> {
    match resolve_owner(store, resource, id).await? {
        Some(owner) if owner == caller => Ok(()),
        owner => {
            warn!(?resource, %id, %caller, ?owner, "ownership check failed");
            Err(AppError::forbidden(format!(
                "Access denied. You do not own this {}.",
                resource.noun()
            )))
        }
    }
}

/// Unwraps a row loaded by id, then checks the caller owns it.
/// `NotFound` when the row is absent, `Forbidden` when it belongs to someone else.
pub async fn owned_row<T>(
    store: &dyn Store,
    resource: Resource,
    id: Uuid,
    caller: Uuid,
    row: Option<T>,
) -> AppResult<T> {
    let row = row.ok_or_else(|| AppError::not_found(format!("{} not found.", resource.title())))?;
    ensure_owner(store, resource, id, caller).await?;
    Ok(row)
}
