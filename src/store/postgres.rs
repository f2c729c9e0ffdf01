use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::{
    config::AppConfig,
    day_tests::repo_types::{DayTest, NewDayTest},
    files::repo_types::File,
    folders::repo_types::Folder,
    metadata::repo_types::{Metadata, NewMetadata},
    ownership::Resource,
    skills_performance::repo_types::{Performance, SkillPerformance},
    users::repo_types::{NewUser, User},
    words_focused::repo_types::{NewWordFocused, WordFocused},
};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";
const FOLDER_COLUMNS: &str = "id, name, user_id, created_at, updated_at";
const FILE_COLUMNS: &str = "id, name, content, folder_id, created_at, updated_at";
const METADATA_COLUMNS: &str =
    "id, subject, level, time_spent, notes, file_id, created_at, updated_at";
const WORD_COLUMNS: &str = "id, word, meaning, remembered, metadata_id, created_at, updated_at";
const SKILL_COLUMNS: &str = "id, skill, performance, metadata_id, created_at, updated_at";
const DAY_TEST_COLUMNS: &str = "id, date, test_results, notes, user_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    /// Connects the pool and applies pending migrations.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        Ok(Self { db })
    }

    async fn delete_from(&self, table: &str, id: Uuid) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        let done = sqlx::query(&sql).bind(id).execute(&self.db).await?;
        Ok(done.rows_affected() > 0)
    }
}

/// Maps a unique violation (SQLSTATE 23505) to `Conflict`.
fn conflict_on_unique(err: sqlx::Error, message: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            StoreError::Conflict(message.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn parent_of(&self, resource: Resource, id: Uuid) -> StoreResult<Option<Uuid>> {
        // Both identifiers come from a closed enum, never from input.
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            resource.parent_column(),
            resource.table()
        );
        let parent = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(parent)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "Email already registered"))
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at");
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.db).await?)
    }

    async fn update_user(&self, user: &User) -> StoreResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET username = $2, email = $3, role = $4, updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(user.role)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| conflict_on_unique(e, "Email already registered"))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        self.delete_from("users", id).await
    }

    async fn insert_refresh_token(&self, user_id: Uuid, token: &str) -> StoreResult<()> {
        sqlx::query("INSERT INTO refresh_tokens (token, user_id) VALUES ($1, $2)")
            .bind(token)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn refresh_token_exists(&self, token: &str) -> StoreResult<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM refresh_tokens WHERE token = $1)",
        )
        .bind(token)
        .fetch_one(&self.db)
        .await?;
        Ok(found)
    }

    async fn insert_folder(&self, user_id: Uuid, name: &str) -> StoreResult<Folder> {
        let sql = format!(
            "INSERT INTO folders (name, user_id) VALUES ($1, $2) RETURNING {FOLDER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Folder>(&sql)
            .bind(name)
            .bind(user_id)
            .fetch_one(&self.db)
            .await?)
    }

    async fn find_folder(&self, id: Uuid) -> StoreResult<Option<Folder>> {
        let sql = format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1");
        Ok(sqlx::query_as::<_, Folder>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn list_folders(&self, user_id: Uuid) -> StoreResult<Vec<Folder>> {
        let sql = format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE user_id = $1 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, Folder>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?)
    }

    async fn update_folder(&self, folder: &Folder) -> StoreResult<Option<Folder>> {
        let sql = format!(
            "UPDATE folders SET name = $2, updated_at = now()
             WHERE id = $1
             RETURNING {FOLDER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Folder>(&sql)
            .bind(folder.id)
            .bind(&folder.name)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn delete_folder(&self, id: Uuid) -> StoreResult<bool> {
        self.delete_from(Resource::Folder.table(), id).await
    }

    async fn insert_file(&self, folder_id: Uuid, name: &str, content: &str) -> StoreResult<File> {
        let sql = format!(
            "INSERT INTO files (name, content, folder_id) VALUES ($1, $2, $3)
             RETURNING {FILE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, File>(&sql)
            .bind(name)
            .bind(content)
            .bind(folder_id)
            .fetch_one(&self.db)
            .await?)
    }

    async fn find_file(&self, id: Uuid) -> StoreResult<Option<File>> {
        let sql = format!("SELECT {FILE_COLUMNS} FROM files WHERE id = $1");
        Ok(sqlx::query_as::<_, File>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn list_files(&self, folder_id: Uuid) -> StoreResult<Vec<File>> {
        let sql = format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE folder_id = $1 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, File>(&sql)
            .bind(folder_id)
            .fetch_all(&self.db)
            .await?)
    }

    async fn update_file(&self, file: &File) -> StoreResult<Option<File>> {
        let sql = format!(
            "UPDATE files SET name = $2, content = $3, updated_at = now()
             WHERE id = $1
             RETURNING {FILE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, File>(&sql)
            .bind(file.id)
            .bind(&file.name)
            .bind(&file.content)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn delete_file(&self, id: Uuid) -> StoreResult<bool> {
        self.delete_from(Resource::File.table(), id).await
    }

    async fn insert_metadata(&self, file_id: Uuid, metadata: NewMetadata) -> StoreResult<Metadata> {
        let sql = format!(
            "INSERT INTO metadata (subject, level, time_spent, notes, file_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {METADATA_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Metadata>(&sql)
            .bind(&metadata.subject)
            .bind(&metadata.level)
            .bind(metadata.time_spent)
            .bind(&metadata.notes)
            .bind(file_id)
            .fetch_one(&self.db)
            .await?)
    }

    async fn find_metadata(&self, id: Uuid) -> StoreResult<Option<Metadata>> {
        let sql = format!("SELECT {METADATA_COLUMNS} FROM metadata WHERE id = $1");
        Ok(sqlx::query_as::<_, Metadata>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn list_metadata(&self, file_id: Uuid) -> StoreResult<Vec<Metadata>> {
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM metadata WHERE file_id = $1 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, Metadata>(&sql)
            .bind(file_id)
            .fetch_all(&self.db)
            .await?)
    }

    async fn update_metadata(&self, metadata: &Metadata) -> StoreResult<Option<Metadata>> {
        let sql = format!(
            "UPDATE metadata
                SET subject = $2, level = $3, time_spent = $4, notes = $5, updated_at = now()
              WHERE id = $1
             RETURNING {METADATA_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Metadata>(&sql)
            .bind(metadata.id)
            .bind(&metadata.subject)
            .bind(&metadata.level)
            .bind(metadata.time_spent)
            .bind(&metadata.notes)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn delete_metadata(&self, id: Uuid) -> StoreResult<bool> {
        self.delete_from(Resource::Metadata.table(), id).await
    }

    async fn insert_word(&self, metadata_id: Uuid, word: NewWordFocused) -> StoreResult<WordFocused> {
        let sql = format!(
            "INSERT INTO words_focused (word, meaning, remembered, metadata_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {WORD_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, WordFocused>(&sql)
            .bind(&word.word)
            .bind(&word.meaning)
            .bind(word.remembered)
            .bind(metadata_id)
            .fetch_one(&self.db)
            .await?)
    }

    async fn find_word(&self, id: Uuid) -> StoreResult<Option<WordFocused>> {
        let sql = format!("SELECT {WORD_COLUMNS} FROM words_focused WHERE id = $1");
        Ok(sqlx::query_as::<_, WordFocused>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn list_words(&self, metadata_id: Uuid) -> StoreResult<Vec<WordFocused>> {
        let sql = format!(
            "SELECT {WORD_COLUMNS} FROM words_focused WHERE metadata_id = $1 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, WordFocused>(&sql)
            .bind(metadata_id)
            .fetch_all(&self.db)
            .await?)
    }

    async fn update_word(&self, word: &WordFocused) -> StoreResult<Option<WordFocused>> {
        let sql = format!(
            "UPDATE words_focused
                SET word = $2, meaning = $3, remembered = $4, updated_at = now()
              WHERE id = $1
             RETURNING {WORD_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, WordFocused>(&sql)
            .bind(word.id)
            .bind(&word.word)
            .bind(&word.meaning)
            .bind(word.remembered)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn delete_word(&self, id: Uuid) -> StoreResult<bool> {
        self.delete_from(Resource::WordFocused.table(), id).await
    }

    async fn insert_skill(
        &self,
        metadata_id: Uuid,
        skill: &str,
        performance: Performance,
    ) -> StoreResult<SkillPerformance> {
        let sql = format!(
            "INSERT INTO skills_performance (skill, performance, metadata_id)
             VALUES ($1, $2, $3)
             RETURNING {SKILL_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, SkillPerformance>(&sql)
            .bind(skill)
            .bind(performance)
            .bind(metadata_id)
            .fetch_one(&self.db)
            .await?)
    }

    async fn find_skill(&self, id: Uuid) -> StoreResult<Option<SkillPerformance>> {
        let sql = format!("SELECT {SKILL_COLUMNS} FROM skills_performance WHERE id = $1");
        Ok(sqlx::query_as::<_, SkillPerformance>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn list_skills(&self, metadata_id: Uuid) -> StoreResult<Vec<SkillPerformance>> {
        let sql = format!(
            "SELECT {SKILL_COLUMNS} FROM skills_performance
              WHERE metadata_id = $1 ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, SkillPerformance>(&sql)
            .bind(metadata_id)
            .fetch_all(&self.db)
            .await?)
    }

    async fn update_skill(&self, skill: &SkillPerformance) -> StoreResult<Option<SkillPerformance>> {
        let sql = format!(
            "UPDATE skills_performance
                SET skill = $2, performance = $3, updated_at = now()
              WHERE id = $1
             RETURNING {SKILL_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, SkillPerformance>(&sql)
            .bind(skill.id)
            .bind(&skill.skill)
            .bind(skill.performance)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn delete_skill(&self, id: Uuid) -> StoreResult<bool> {
        self.delete_from(Resource::SkillPerformance.table(), id).await
    }

    async fn insert_day_test(&self, user_id: Uuid, day_test: NewDayTest) -> StoreResult<DayTest> {
        let sql = format!(
            "INSERT INTO day_tests (date, test_results, notes, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {DAY_TEST_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, DayTest>(&sql)
            .bind(day_test.date)
            .bind(&day_test.test_results)
            .bind(&day_test.notes)
            .bind(user_id)
            .fetch_one(&self.db)
            .await?)
    }

    async fn find_day_test(&self, id: Uuid) -> StoreResult<Option<DayTest>> {
        let sql = format!("SELECT {DAY_TEST_COLUMNS} FROM day_tests WHERE id = $1");
        Ok(sqlx::query_as::<_, DayTest>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn list_day_tests(&self, user_id: Uuid) -> StoreResult<Vec<DayTest>> {
        let sql = format!(
            "SELECT {DAY_TEST_COLUMNS} FROM day_tests WHERE user_id = $1 ORDER BY date, created_at"
        );
        Ok(sqlx::query_as::<_, DayTest>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await?)
    }

    async fn update_day_test(&self, day_test: &DayTest) -> StoreResult<Option<DayTest>> {
        let sql = format!(
            "UPDATE day_tests
                SET date = $2, test_results = $3, notes = $4, updated_at = now()
              WHERE id = $1
             RETURNING {DAY_TEST_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, DayTest>(&sql)
            .bind(day_test.id)
            .bind(day_test.date)
            .bind(&day_test.test_results)
            .bind(&day_test.notes)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn delete_day_test(&self, id: Uuid) -> StoreResult<bool> {
        self.delete_from(Resource::DayTest.table(), id).await
    }
}
