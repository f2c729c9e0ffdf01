//! Persistence boundary. Services only see the [`Store`] trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    day_tests::repo_types::{DayTest, NewDayTest},
    files::repo_types::File,
    folders::repo_types::Folder,
    metadata::repo_types::{Metadata, NewMetadata},
    ownership::Resource,
    skills_performance::repo_types::{Performance, SkillPerformance},
    users::repo_types::{NewUser, User},
    words_focused::repo_types::{NewWordFocused, WordFocused},
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Row-level access to every table. Deleting a row removes everything it owns.
///
/// `update_*` methods persist every mutable column of the given row, bump
/// `updated_at` and return the stored row (`None` if it vanished meanwhile).
#[async_trait]
pub trait Store: Send + Sync {
    /// The id held in the parent reference column of `resource` row `id`.
    async fn parent_of(&self, resource: Resource, id: Uuid) -> StoreResult<Option<Uuid>>;

    // users
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn update_user(&self, user: &User) -> StoreResult<Option<User>>;
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    // refresh tokens
    async fn insert_refresh_token(&self, user_id: Uuid, token: &str) -> StoreResult<()>;
    async fn refresh_token_exists(&self, token: &str) -> StoreResult<bool>;

    // folders
    async fn insert_folder(&self, user_id: Uuid, name: &str) -> StoreResult<Folder>;
    async fn find_folder(&self, id: Uuid) -> StoreResult<Option<Folder>>;
    async fn list_folders(&self, user_id: Uuid) -> StoreResult<Vec<Folder>>;
    async fn update_folder(&self, folder: &Folder) -> StoreResult<Option<Folder>>;
    async fn delete_folder(&self, id: Uuid) -> StoreResult<bool>;

    // files
    async fn insert_file(&self, folder_id: Uuid, name: &str, content: &str) -> StoreResult<File>;
    async fn find_file(&self, id: Uuid) -> StoreResult<Option<File>>;
    async fn list_files(&self, folder_id: Uuid) -> StoreResult<Vec<File>>;
    async fn update_file(&self, file: &File) -> StoreResult<Option<File>>;
    async fn delete_file(&self, id: Uuid) -> StoreResult<bool>;

    // metadata
    async fn insert_metadata(&self, file_id: Uuid, metadata: NewMetadata) -> StoreResult<Metadata>;
    async fn find_metadata(&self, id: Uuid) -> StoreResult<Option<Metadata>>;
    async fn list_metadata(&self, file_id: Uuid) -> StoreResult<Vec<Metadata>>;
    async fn update_metadata(&self, metadata: &Metadata) -> StoreResult<Option<Metadata>>;
    async fn delete_metadata(&self, id: Uuid) -> StoreResult<bool>;

    // words focused
    async fn insert_word(&self, metadata_id: Uuid, word: NewWordFocused) -> StoreResult<WordFocused>;
    async fn find_word(&self, id: Uuid) -> StoreResult<Option<WordFocused>>;
    async fn list_words(&self, metadata_id: Uuid) -> StoreResult<Vec<WordFocused>>;
    async fn update_word(&self, word: &WordFocused) -> StoreResult<Option<WordFocused>>;
    async fn delete_word(&self, id: Uuid) -> StoreResult<bool>;

    // skills performance
    async fn insert_skill(
        &self,
        metadata_id: Uuid,
        skill: &str,
        performance: Performance,
    ) -> StoreResult<SkillPerformance>;
    async fn find_skill(&self, id: Uuid) -> StoreResult<Option<SkillPerformance>>;
    async fn list_skills(&self, metadata_id: Uuid) -> StoreResult<Vec<SkillPerformance>>;
    async fn update_skill(&self, skill: &SkillPerformance) -> StoreResult<Option<SkillPerformance>>;
    async fn delete_skill(&self, id: Uuid) -> StoreResult<bool>;

    // day tests
    async fn insert_day_test(&self, user_id: Uuid, day_test: NewDayTest) -> StoreResult<DayTest>;
    async fn find_day_test(&self, id: Uuid) -> StoreResult<Option<DayTest>>;
    async fn list_day_tests(&self, user_id: Uuid) -> StoreResult<Vec<DayTest>>;
    async fn update_day_test(&self, day_test: &DayTest) -> StoreResult<Option<DayTest>>;
    async fn delete_day_test(&self, id: Uuid) -> StoreResult<bool>;
}
