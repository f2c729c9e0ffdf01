//! In-process store used by tests. Mirrors the `ON DELETE CASCADE` rules of the schema.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::{
    day_tests::repo_types::{DayTest, NewDayTest},
    files::repo_types::File,
    folders::repo_types::Folder,
    metadata::repo_types::{Metadata, NewMetadata},
    ownership::Resource,
    skills_performance::repo_types::{Performance, SkillPerformance},
    users::repo_types::{NewUser, Role, User},
    words_focused::repo_types::{NewWordFocused, WordFocused},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    refresh_tokens: Vec<(Uuid, String)>,
    folders: Vec<Folder>,
    files: Vec<File>,
    metadata: Vec<Metadata>,
    words: Vec<WordFocused>,
    skills: Vec<SkillPerformance>,
    day_tests: Vec<DayTest>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn remove_metadata(&mut self, id: Uuid) -> bool {
        let before = self.metadata.len();
        self.metadata.retain(|m| m.id != id);
        self.words.retain(|w| w.metadata_id != id);
        self.skills.retain(|s| s.metadata_id != id);
        before != self.metadata.len()
    }

    fn remove_file(&mut self, id: Uuid) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        let owned: Vec<Uuid> = self
            .metadata
            .iter()
            .filter(|m| m.file_id == id)
            .map(|m| m.id)
            .collect();
        for m in owned {
            self.remove_metadata(m);
        }
        before != self.files.len()
    }

    fn remove_folder(&mut self, id: Uuid) -> bool {
        let before = self.folders.len();
        self.folders.retain(|f| f.id != id);
        let owned: Vec<Uuid> = self
            .files
            .iter()
            .filter(|f| f.folder_id == id)
            .map(|f| f.id)
            .collect();
        for f in owned {
            self.remove_file(f);
        }
        before != self.folders.len()
    }

    fn remove_user(&mut self, id: Uuid) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        self.refresh_tokens.retain(|(user_id, _)| *user_id != id);
        self.day_tests.retain(|d| d.user_id != id);
        let owned: Vec<Uuid> = self
            .folders
            .iter()
            .filter(|f| f.user_id == id)
            .map(|f| f.id)
            .collect();
        for f in owned {
            self.remove_folder(f);
        }
        before != self.users.len()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    /// Inserts a plain user with an unusable password hash and returns its id.
    pub async fn seed_user(&self, email: &str) -> Uuid {
        self.insert_user(NewUser {
            username: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: "!".to_string(),
            role: Role::User,
        })
        .await
        .expect("seed user")
        .id
    }

    pub fn refresh_token_count(&self, user_id: Uuid) -> usize {
        self.lock()
            .refresh_tokens
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .count()
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Replaces the row with the same id, stamping `updated_at`.
macro_rules! replace_row {
    ($rows:expr, $row:expr) => {{
        match $rows.iter_mut().find(|r| r.id == $row.id) {
            Some(slot) => {
                *slot = $row.clone();
                slot.updated_at = now();
                Ok(Some(slot.clone()))
            }
            None => Ok(None),
        }
    }};
}

#[async_trait]
impl Store for MemoryStore {
    async fn parent_of(&self, resource: Resource, id: Uuid) -> StoreResult<Option<Uuid>> {
        let t = self.lock();
        let parent = match resource {
            Resource::Folder => t.folders.iter().find(|r| r.id == id).map(|r| r.user_id),
            Resource::File => t.files.iter().find(|r| r.id == id).map(|r| r.folder_id),
            Resource::Metadata => t.metadata.iter().find(|r| r.id == id).map(|r| r.file_id),
            Resource::WordFocused => t.words.iter().find(|r| r.id == id).map(|r| r.metadata_id),
            Resource::SkillPerformance => {
                t.skills.iter().find(|r| r.id == id).map(|r| r.metadata_id)
            }
            Resource::DayTest => t.day_tests.iter().find(|r| r.id == id).map(|r| r.user_id),
        };
        Ok(parent)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut t = self.lock();
        if t.email_taken(&user.email, None) {
            return Err(StoreError::Conflict("Email already registered".into()));
        }
        let row = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now(),
            updated_at: now(),
        };
        t.users.push(row.clone());
        Ok(row)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.lock().users.clone())
    }

    async fn update_user(&self, user: &User) -> StoreResult<Option<User>> {
        let mut t = self.lock();
        if t.email_taken(&user.email, Some(user.id)) {
            return Err(StoreError::Conflict("Email already registered".into()));
        }
        replace_row!(t.users, user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.lock().remove_user(id))
    }

    async fn insert_refresh_token(&self, user_id: Uuid, token: &str) -> StoreResult<()> {
        self.lock().refresh_tokens.push((user_id, token.to_string()));
        Ok(())
    }

    async fn refresh_token_exists(&self, token: &str) -> StoreResult<bool> {
        Ok(self.lock().refresh_tokens.iter().any(|(_, t)| t == token))
    }

    async fn insert_folder(&self, user_id: Uuid, name: &str) -> StoreResult<Folder> {
        let row = Folder {
            id: Uuid::new_v4(),
            name: name.to_string(),
            user_id,
            created_at: now(),
            updated_at: now(),
        };
        self.lock().folders.push(row.clone());
        Ok(row)
    }

    async fn find_folder(&self, id: Uuid) -> StoreResult<Option<Folder>> {
        Ok(self.lock().folders.iter().find(|r| r.id == id).cloned())
    }

    async fn list_folders(&self, user_id: Uuid) -> StoreResult<Vec<Folder>> {
        Ok(self.lock().folders.iter().filter(|r| r.user_id == user_id).cloned().collect())
    }

    async fn update_folder(&self, folder: &Folder) -> StoreResult<Option<Folder>> {
        replace_row!(self.lock().folders, folder)
    }

    async fn delete_folder(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.lock().remove_folder(id))
    }

    async fn insert_file(&self, folder_id: Uuid, name: &str, content: &str) -> StoreResult<File> {
        let row = File {
            id: Uuid::new_v4(),
            name: name.to_string(),
            content: content.to_string(),
            folder_id,
            created_at: now(),
            updated_at: now(),
        };
        self.lock().files.push(row.clone());
        Ok(row)
    }

    async fn find_file(&self, id: Uuid) -> StoreResult<Option<File>> {
        Ok(self.lock().files.iter().find(|r| r.id == id).cloned())
    }

    async fn list_files(&self, folder_id: Uuid) -> StoreResult<Vec<File>> {
        Ok(self.lock().files.iter().filter(|r| r.folder_id == folder_id).cloned().collect())
    }

    async fn update_file(&self, file: &File) -> StoreResult<Option<File>> {
        replace_row!(self.lock().files, file)
    }

    async fn delete_file(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.lock().remove_file(id))
    }

    async fn insert_metadata(&self, file_id: Uuid, metadata: NewMetadata) -> StoreResult<Metadata> {
        let row = Metadata {
            id: Uuid::new_v4(),
            subject: metadata.subject,
            level: metadata.level,
            time_spent: metadata.time_spent,
            notes: metadata.notes,
            file_id,
            created_at: now(),
            updated_at: now(),
        };
        self.lock().metadata.push(row.clone());
        Ok(row)
    }

    async fn find_metadata(&self, id: Uuid) -> StoreResult<Option<Metadata>> {
        Ok(self.lock().metadata.iter().find(|r| r.id == id).cloned())
    }

    async fn list_metadata(&self, file_id: Uuid) -> StoreResult<Vec<Metadata>> {
        Ok(self.lock().metadata.iter().filter(|r| r.file_id == file_id).cloned().collect())
    }

    async fn update_metadata(&self, metadata: &Metadata) -> StoreResult<Option<Metadata>> {
        replace_row!(self.lock().metadata, metadata)
    }

    async fn delete_metadata(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.lock().remove_metadata(id))
    }

    async fn insert_word(&self, metadata_id: Uuid, word: NewWordFocused) -> StoreResult<WordFocused> {
        let row = WordFocused {
            id: Uuid::new_v4(),
            word: word.word,
            meaning: word.meaning,
            remembered: word.remembered,
            metadata_id,
            created_at: now(),
            updated_at: now(),
        };
        self.lock().words.push(row.clone());
        Ok(row)
    }

    async fn find_word(&self, id: Uuid) -> StoreResult<Option<WordFocused>> {
        Ok(self.lock().words.iter().find(|r| r.id == id).cloned())
    }

    async fn list_words(&self, metadata_id: Uuid) -> StoreResult<Vec<WordFocused>> {
        Ok(self.lock().words.iter().filter(|r| r.metadata_id == metadata_id).cloned().collect())
    }

    async fn update_word(&self, word: &WordFocused) -> StoreResult<Option<WordFocused>> {
        replace_row!(self.lock().words, word)
    }

    async fn delete_word(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.lock();
        let before = t.words.len();
        t.words.retain(|r| r.id != id);
        Ok(before != t.words.len())
    }

    async fn insert_skill(
        &self,
        metadata_id: Uuid,
        skill: &str,
        performance: Performance,
    ) -> StoreResult<SkillPerformance> {
        let row = SkillPerformance {
            id: Uuid::new_v4(),
            skill: skill.to_string(),
            performance,
            metadata_id,
            created_at: now(),
            updated_at: now(),
        };
        self.lock().skills.push(row.clone());
        Ok(row)
    }

    async fn find_skill(&self, id: Uuid) -> StoreResult<Option<SkillPerformance>> {
        Ok(self.lock().skills.iter().find(|r| r.id == id).cloned())
    }

    async fn list_skills(&self, metadata_id: Uuid) -> StoreResult<Vec<SkillPerformance>> {
        Ok(self.lock().skills.iter().filter(|r| r.metadata_id == metadata_id).cloned().collect())
    }

    async fn update_skill(&self, skill: &SkillPerformance) -> StoreResult<Option<SkillPerformance>> {
        replace_row!(self.lock().skills, skill)
    }

    async fn delete_skill(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.lock();
        let before = t.skills.len();
        t.skills.retain(|r| r.id != id);
        Ok(before != t.skills.len())
    }

    async fn insert_day_test(&self, user_id: Uuid, day_test: NewDayTest) -> StoreResult<DayTest> {
        let row = DayTest {
            id: Uuid::new_v4(),
            date: day_test.date,
            test_results: day_test.test_results,
            notes: day_test.notes,
            user_id,
            created_at: now(),
            updated_at: now(),
        };
        self.lock().day_tests.push(row.clone());
        Ok(row)
    }

    async fn find_day_test(&self, id: Uuid) -> StoreResult<Option<DayTest>> {
        Ok(self.lock().day_tests.iter().find(|r| r.id == id).cloned())
    }

    async fn list_day_tests(&self, user_id: Uuid) -> StoreResult<Vec<DayTest>> {
        Ok(self.lock().day_tests.iter().filter(|r| r.user_id == user_id).cloned().collect())
    }

    async fn update_day_test(&self, day_test: &DayTest) -> StoreResult<Option<DayTest>> {
        replace_row!(self.lock().day_tests, day_test)
    }

    async fn delete_day_test(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.lock();
        let before = t.day_tests.len();
        t.day_tests.retain(|r| r.id != id);
        Ok(before != t.day_tests.len())
    }
}
