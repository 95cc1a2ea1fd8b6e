use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use folio_core::types::{
    Experience, ExperiencePatch, Message, NewExperience, NewMessage, NewProject, NewSkill, Profile,
    ProfilePatch, Project, ProjectPatch, Skill, SkillPatch, Social, SocialUpsert, User,
};

use crate::store::{ContentStore, StoreError, StoreResult};

/// In-memory backend for development and tests. Same trait surface as
/// Postgres, nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    projects: DashMap<Uuid, Project>,
    skills: DashMap<Uuid, Skill>,
    experiences: DashMap<Uuid, Experience>,
    socials: DashMap<Uuid, Social>,
    profile: RwLock<Option<Profile>>,
    messages: DashMap<Uuid, Message>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn profile_lock(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Option<Profile>>> {
        self.profile
            .write()
            .map_err(|_| StoreError::Database("profile lock poisoned".into()))
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|e| e.value().username == username)
            .map(|e| e.value().clone()))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.get(&id).map(|e| e.value().clone()))
    }

    async fn update_user_password(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        match self.users.get_mut(&id) {
            Some(mut entry) => {
                entry.value_mut().password_hash = password_hash.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("user {id}"))),
        }
    }

    async fn ensure_admin(&self, username: &str, password_hash: &str) -> StoreResult<()> {
        if self.find_user_by_username(username).await?.is_some() {
            return Ok(());
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now().naive_utc(),
        };
        self.users.insert(user.id, user);
        Ok(())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let mut all: Vec<Project> = self.projects.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.projects.get(&id).map(|e| e.value().clone()))
    }

    async fn create_project(&self, input: NewProject) -> StoreResult<Project> {
        let project = Project {
            id: Uuid::new_v4(),
            title: input.title,
            subtitle: Some(input.subtitle.unwrap_or_default()),
            stack: input.stack,
            features: input.features,
            link: Some(input.link.unwrap_or_default()),
            image: Some(input.image.unwrap_or_default()),
            created_at: Utc::now().naive_utc(),
        };
        self.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> StoreResult<Option<Project>> {
        let Some(mut entry) = self.projects.get_mut(&id) else {
            return Ok(None);
        };
        let p = entry.value_mut();
        if let Some(title) = patch.title {
            p.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            p.subtitle = Some(subtitle);
        }
        if let Some(stack) = patch.stack {
            p.stack = stack;
        }
        if let Some(features) = patch.features {
            p.features = features;
        }
        if let Some(link) = patch.link {
            p.link = Some(link);
        }
        if let Some(image) = patch.image {
            p.image = Some(image);
        }
        Ok(Some(p.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.projects.remove(&id).is_some())
    }

    async fn list_skills(&self) -> StoreResult<Vec<Skill>> {
        let mut all: Vec<Skill> = self.skills.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(all)
    }

    async fn get_skill(&self, id: Uuid) -> StoreResult<Option<Skill>> {
        Ok(self.skills.get(&id).map(|e| e.value().clone()))
    }

    async fn create_skill(&self, input: NewSkill) -> StoreResult<Skill> {
        let skill = Skill {
            id: Uuid::new_v4(),
            title: input.title,
            level: Some(input.level.unwrap_or_default()),
            color: Some(input.color.unwrap_or_else(|| "#000000".to_string())),
            progress: input.progress.unwrap_or(0),
            total_skills: input.total_skills.unwrap_or(0),
            equipment: input.equipment,
            achievements: input.achievements,
        };
        self.skills.insert(skill.id, skill.clone());
        Ok(skill)
    }

    async fn update_skill(&self, id: Uuid, patch: SkillPatch) -> StoreResult<Option<Skill>> {
        let Some(mut entry) = self.skills.get_mut(&id) else {
            return Ok(None);
        };
        let s = entry.value_mut();
        if let Some(title) = patch.title {
            s.title = title;
        }
        if let Some(level) = patch.level {
            s.level = Some(level);
        }
        if let Some(color) = patch.color {
            s.color = Some(color);
        }
        if let Some(progress) = patch.progress {
            s.progress = progress;
        }
        if let Some(total) = patch.total_skills {
            s.total_skills = total;
        }
        if let Some(equipment) = patch.equipment {
            s.equipment = equipment;
        }
        if let Some(achievements) = patch.achievements {
            s.achievements = achievements;
        }
        Ok(Some(s.clone()))
    }

    async fn delete_skill(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.skills.remove(&id).is_some())
    }

    async fn list_experiences(&self) -> StoreResult<Vec<Experience>> {
        let mut all: Vec<Experience> = self.experiences.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn get_experience(&self, id: Uuid) -> StoreResult<Option<Experience>> {
        Ok(self.experiences.get(&id).map(|e| e.value().clone()))
    }

    async fn create_experience(&self, input: NewExperience) -> StoreResult<Experience> {
        let experience = Experience {
            id: Uuid::new_v4(),
            company: input.company,
            role: input.role,
            period: Some(input.period.unwrap_or_default()),
            description: Some(input.description.unwrap_or_default()),
            achievements: input.achievements,
            stack: input.stack,
            created_at: Utc::now().naive_utc(),
        };
        self.experiences.insert(experience.id, experience.clone());
        Ok(experience)
    }

    async fn update_experience(
        &self,
        id: Uuid,
        patch: ExperiencePatch,
    ) -> StoreResult<Option<Experience>> {
        let Some(mut entry) = self.experiences.get_mut(&id) else {
            return Ok(None);
        };
        let e = entry.value_mut();
        if let Some(company) = patch.company {
            e.company = company;
        }
        if let Some(role) = patch.role {
            e.role = role;
        }
        if let Some(period) = patch.period {
            e.period = Some(period);
        }
        if let Some(description) = patch.description {
            e.description = Some(description);
        }
        if let Some(achievements) = patch.achievements {
            e.achievements = achievements;
        }
        if let Some(stack) = patch.stack {
            e.stack = stack;
        }
        Ok(Some(e.clone()))
    }

    async fn delete_experience(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.experiences.remove(&id).is_some())
    }

    async fn list_socials(&self) -> StoreResult<Vec<Social>> {
        let mut all: Vec<Social> = self.socials.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.platform.cmp(&b.platform));
        Ok(all)
    }

    async fn upsert_social(
        &self,
        platform: &str,
        input: SocialUpsert,
    ) -> StoreResult<(Social, bool)> {
        let href = input.href.unwrap_or_default();
        if let Some(mut entry) = self
            .socials
            .iter_mut()
            .find(|e| e.value().platform == platform)
        {
            let s = entry.value_mut();
            s.href = href;
            s.label = input.label;
            return Ok((s.clone(), false));
        }
        let social = Social {
            id: Uuid::new_v4(),
            platform: platform.to_string(),
            href,
            label: input.label,
        };
        self.socials.insert(social.id, social.clone());
        Ok((social, true))
    }

    async fn get_profile(&self) -> StoreResult<Option<Profile>> {
        self.profile
            .read()
            .map(|p| p.clone())
            .map_err(|_| StoreError::Database("profile lock poisoned".into()))
    }

    async fn upsert_profile(&self, patch: ProfilePatch) -> StoreResult<(Profile, bool)> {
        let mut guard = self.profile_lock()?;
        match guard.as_mut() {
            Some(profile) => {
                if let Some(name) = patch.name {
                    profile.name = name;
                }
                if let Some(role) = patch.role {
                    profile.role = Some(role);
                }
                if let Some(bio) = patch.bio {
                    profile.bio = Some(bio);
                }
                if let Some(years) = patch.years {
                    profile.years = Some(years);
                }
                if let Some(count) = patch.projects_count {
                    profile.projects_count = Some(count);
                }
                if let Some(awesomeness) = patch.awesomeness {
                    profile.awesomeness = Some(awesomeness);
                }
                if let Some(expertise) = patch.expertise {
                    profile.expertise = expertise;
                }
                Ok((profile.clone(), false))
            }
            None => {
                let profile = Profile {
                    id: Uuid::new_v4(),
                    name: patch.name.unwrap_or_default(),
                    role: patch.role,
                    bio: patch.bio,
                    years: patch.years,
                    projects_count: patch.projects_count,
                    awesomeness: patch.awesomeness,
                    expertise: patch.expertise.unwrap_or_default(),
                };
                *guard = Some(profile.clone());
                Ok((profile, true))
            }
        }
    }

    async fn create_message(&self, input: NewMessage) -> StoreResult<Message> {
        let message = Message {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            message: input.message,
            is_read: false,
            created_at: Utc::now().naive_utc(),
        };
        self.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn list_messages(&self) -> StoreResult<Vec<Message>> {
        let mut all: Vec<Message> = self.messages.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn unread_count(&self) -> StoreResult<i64> {
        Ok(self.messages.iter().filter(|e| !e.value().is_read).count() as i64)
    }

    async fn mark_message_read(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let Some(mut entry) = self.messages.get_mut(&id) else {
            return Ok(None);
        };
        entry.value_mut().is_read = true;
        Ok(Some(entry.value().clone()))
    }

    async fn delete_message(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.messages.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> NewProject {
        NewProject {
            title: "Portfolio".into(),
            subtitle: None,
            stack: vec!["Rust".into()],
            features: vec![],
            link: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn project_crud_round_trip() {
        let store = MemoryStore::new();
        let created = store.create_project(sample_project()).await.unwrap();

        let fetched = store.get_project(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Portfolio");

        let patch = ProjectPatch {
            title: Some("Updated".into()),
            ..Default::default()
        };
        let updated = store.update_project(created.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.stack, vec!["Rust".to_string()]);

        assert!(store.delete_project(created.id).await.unwrap());
        assert!(store.get_project(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_missing_project_returns_none() {
        let store = MemoryStore::new();
        let result = store
            .update_project(Uuid::new_v4(), ProjectPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn social_upsert_inserts_then_updates() {
        let store = MemoryStore::new();
        let input = SocialUpsert {
            platform: None,
            href: Some("https://github.com/dev".into()),
            label: "GitHub".into(),
        };
        let (social, created) = store.upsert_social("github", input.clone()).await.unwrap();
        assert!(created);
        assert_eq!(social.platform, "github");

        let (social, created) = store
            .upsert_social(
                "github",
                SocialUpsert {
                    label: "GH".into(),
                    ..input
                },
            )
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(social.label, "GH");
        assert_eq!(store.list_socials().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn profile_upsert_creates_singleton() {
        let store = MemoryStore::new();
        assert!(store.get_profile().await.unwrap().is_none());

        let (profile, created) = store
            .upsert_profile(ProfilePatch {
                name: Some("Dev".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(created);
        assert_eq!(profile.name, "Dev");

        let (profile, created) = store
            .upsert_profile(ProfilePatch {
                bio: Some("Builds things".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(profile.name, "Dev");
        assert_eq!(profile.bio.as_deref(), Some("Builds things"));
    }

    #[tokio::test]
    async fn messages_track_unread_count() {
        let store = MemoryStore::new();
        let msg = store
            .create_message(NewMessage {
                name: "Visitor".into(),
                email: "visitor@example.com".into(),
                message: "Hi".into(),
            })
            .await
            .unwrap();
        assert_eq!(store.unread_count().await.unwrap(), 1);

        store.mark_message_read(msg.id).await.unwrap().unwrap();
        assert_eq!(store.unread_count().await.unwrap(), 0);

        assert!(store.delete_message(msg.id).await.unwrap());
        assert_eq!(store.list_messages().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let store = MemoryStore::new();
        store.ensure_admin("admin", "hash-one").await.unwrap();
        store.ensure_admin("admin", "hash-two").await.unwrap();

        let user = store.find_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(user.password_hash, "hash-one");
    }
}
