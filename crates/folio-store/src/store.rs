use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use folio_core::types::{
    Experience, ExperiencePatch, Message, NewExperience, NewMessage, NewProject, NewSkill, Profile,
    ProfilePatch, Project, ProjectPatch, Skill, SkillPatch, Social, SocialUpsert, User,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The persistence seam. Handlers only ever talk to this trait; the
/// backend behind it is chosen by configuration (Postgres in production,
/// in-memory for development and tests).
#[async_trait]
pub trait ContentStore: Send + Sync {
    // -------- Users --------
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn update_user_password(&self, id: Uuid, password_hash: &str) -> StoreResult<()>;
    /// Insert the admin account when the username is not yet taken.
    async fn ensure_admin(&self, username: &str, password_hash: &str) -> StoreResult<()>;

    // -------- Projects --------
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;
    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>>;
    async fn create_project(&self, input: NewProject) -> StoreResult<Project>;
    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> StoreResult<Option<Project>>;
    async fn delete_project(&self, id: Uuid) -> StoreResult<bool>;

    // -------- Skills --------
    async fn list_skills(&self) -> StoreResult<Vec<Skill>>;
    async fn get_skill(&self, id: Uuid) -> StoreResult<Option<Skill>>;
    async fn create_skill(&self, input: NewSkill) -> StoreResult<Skill>;
    async fn update_skill(&self, id: Uuid, patch: SkillPatch) -> StoreResult<Option<Skill>>;
    async fn delete_skill(&self, id: Uuid) -> StoreResult<bool>;

    // -------- Experiences --------
    async fn list_experiences(&self) -> StoreResult<Vec<Experience>>;
    async fn get_experience(&self, id: Uuid) -> StoreResult<Option<Experience>>;
    async fn create_experience(&self, input: NewExperience) -> StoreResult<Experience>;
    async fn update_experience(
        &self,
        id: Uuid,
        patch: ExperiencePatch,
    ) -> StoreResult<Option<Experience>>;
    async fn delete_experience(&self, id: Uuid) -> StoreResult<bool>;

    // -------- Socials --------
    async fn list_socials(&self) -> StoreResult<Vec<Social>>;
    /// Update the link for a platform, inserting it when absent. The bool
    /// is true when a new row was created.
    async fn upsert_social(&self, platform: &str, input: SocialUpsert)
        -> StoreResult<(Social, bool)>;

    // -------- Profile (singleton) --------
    async fn get_profile(&self) -> StoreResult<Option<Profile>>;
    async fn upsert_profile(&self, patch: ProfilePatch) -> StoreResult<(Profile, bool)>;

    // -------- Messages --------
    async fn create_message(&self, input: NewMessage) -> StoreResult<Message>;
    async fn list_messages(&self) -> StoreResult<Vec<Message>>;
    async fn unread_count(&self) -> StoreResult<i64>;
    async fn mark_message_read(&self, id: Uuid) -> StoreResult<Option<Message>>;
    async fn delete_message(&self, id: Uuid) -> StoreResult<bool>;
}
