use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use folio_core::config::DatabaseConfig;
use folio_core::types::{
    Experience, ExperiencePatch, Message, NewExperience, NewMessage, NewProject, NewSkill, Profile,
    ProfilePatch, Project, ProjectPatch, Skill, SkillPatch, Social, SocialUpsert, User,
};

use crate::store::{ContentStore, StoreError, StoreResult};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".into()),
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Idempotent schema setup, applied at startup.
const MIGRATIONS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        username VARCHAR(50) UNIQUE NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS projects (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title VARCHAR(100) NOT NULL,
        subtitle VARCHAR(255),
        stack TEXT[] NOT NULL DEFAULT '{}',
        features TEXT[] NOT NULL DEFAULT '{}',
        link VARCHAR(255),
        image VARCHAR(255),
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS skills (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        title VARCHAR(100) NOT NULL,
        level VARCHAR(50),
        color VARCHAR(20) DEFAULT '#000000',
        progress INT NOT NULL DEFAULT 0 CHECK (progress >= 0 AND progress <= 100),
        total_skills INT NOT NULL DEFAULT 0,
        equipment TEXT[] NOT NULL DEFAULT '{}',
        achievements TEXT[] NOT NULL DEFAULT '{}'
    )"#,
    r#"CREATE TABLE IF NOT EXISTS experiences (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        company VARCHAR(100) NOT NULL,
        role VARCHAR(100) NOT NULL,
        period VARCHAR(50),
        description TEXT,
        achievements TEXT[] NOT NULL DEFAULT '{}',
        stack TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS socials (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        platform VARCHAR(50) NOT NULL UNIQUE,
        href VARCHAR(255) NOT NULL,
        label VARCHAR(50) NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS profile (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(100) NOT NULL,
        role VARCHAR(100),
        bio TEXT,
        years VARCHAR(10),
        projects_count VARCHAR(10),
        awesomeness VARCHAR(10),
        expertise TEXT[] NOT NULL DEFAULT '{}'
    )"#,
    r#"CREATE TABLE IF NOT EXISTS messages (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL,
        message TEXT NOT NULL,
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
];

/// Postgres-backed [`ContentStore`].
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Database("DATABASE_URL is not set".into()))?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        for ddl in MIGRATIONS {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        info!("database schema is up to date");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user_password(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    async fn ensure_admin(&self, username: &str, password_hash: &str) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_project(&self, input: NewProject) -> StoreResult<Project> {
        let row = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (title, subtitle, stack, features, link, image)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(input.title)
        .bind(input.subtitle.unwrap_or_default())
        .bind(input.stack)
        .bind(input.features)
        .bind(input.link.unwrap_or_default())
        .bind(input.image.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_project(&self, id: Uuid, patch: ProjectPatch) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(
            "UPDATE projects SET
                title = COALESCE($2, title),
                subtitle = COALESCE($3, subtitle),
                stack = COALESCE($4, stack),
                features = COALESCE($5, features),
                link = COALESCE($6, link),
                image = COALESCE($7, image)
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.subtitle)
        .bind(patch.stack)
        .bind(patch.features)
        .bind(patch.link)
        .bind(patch.image)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_skills(&self) -> StoreResult<Vec<Skill>> {
        let rows = sqlx::query_as::<_, Skill>("SELECT * FROM skills ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_skill(&self, id: Uuid) -> StoreResult<Option<Skill>> {
        let row = sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_skill(&self, input: NewSkill) -> StoreResult<Skill> {
        let row = sqlx::query_as::<_, Skill>(
            "INSERT INTO skills (title, level, color, progress, total_skills, equipment, achievements)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(input.title)
        .bind(input.level.unwrap_or_default())
        .bind(input.color.unwrap_or_else(|| "#000000".to_string()))
        .bind(input.progress.unwrap_or(0))
        .bind(input.total_skills.unwrap_or(0))
        .bind(input.equipment)
        .bind(input.achievements)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_skill(&self, id: Uuid, patch: SkillPatch) -> StoreResult<Option<Skill>> {
        let row = sqlx::query_as::<_, Skill>(
            "UPDATE skills SET
                title = COALESCE($2, title),
                level = COALESCE($3, level),
                color = COALESCE($4, color),
                progress = COALESCE($5, progress),
                total_skills = COALESCE($6, total_skills),
                equipment = COALESCE($7, equipment),
                achievements = COALESCE($8, achievements)
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.level)
        .bind(patch.color)
        .bind(patch.progress)
        .bind(patch.total_skills)
        .bind(patch.equipment)
        .bind(patch.achievements)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_skill(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_experiences(&self) -> StoreResult<Vec<Experience>> {
        let rows =
            sqlx::query_as::<_, Experience>("SELECT * FROM experiences ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    async fn get_experience(&self, id: Uuid) -> StoreResult<Option<Experience>> {
        let row = sqlx::query_as::<_, Experience>("SELECT * FROM experiences WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_experience(&self, input: NewExperience) -> StoreResult<Experience> {
        let row = sqlx::query_as::<_, Experience>(
            "INSERT INTO experiences (company, role, period, description, achievements, stack)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(input.company)
        .bind(input.role)
        .bind(input.period.unwrap_or_default())
        .bind(input.description.unwrap_or_default())
        .bind(input.achievements)
        .bind(input.stack)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_experience(
        &self,
        id: Uuid,
        patch: ExperiencePatch,
    ) -> StoreResult<Option<Experience>> {
        let row = sqlx::query_as::<_, Experience>(
            "UPDATE experiences SET
                company = COALESCE($2, company),
                role = COALESCE($3, role),
                period = COALESCE($4, period),
                description = COALESCE($5, description),
                achievements = COALESCE($6, achievements),
                stack = COALESCE($7, stack)
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.company)
        .bind(patch.role)
        .bind(patch.period)
        .bind(patch.description)
        .bind(patch.achievements)
        .bind(patch.stack)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_experience(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_socials(&self) -> StoreResult<Vec<Social>> {
        let rows = sqlx::query_as::<_, Social>("SELECT * FROM socials ORDER BY platform ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn upsert_social(
        &self,
        platform: &str,
        input: SocialUpsert,
    ) -> StoreResult<(Social, bool)> {
        let href = input.href.unwrap_or_default();
        let updated = sqlx::query_as::<_, Social>(
            "UPDATE socials SET href = $2, label = $3 WHERE platform = $1 RETURNING *",
        )
        .bind(platform)
        .bind(&href)
        .bind(&input.label)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(social) = updated {
            return Ok((social, false));
        }
        let inserted = sqlx::query_as::<_, Social>(
            "INSERT INTO socials (platform, href, label) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(platform)
        .bind(&href)
        .bind(&input.label)
        .fetch_one(&self.pool)
        .await?;
        Ok((inserted, true))
    }

    async fn get_profile(&self) -> StoreResult<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>("SELECT * FROM profile LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn upsert_profile(&self, patch: ProfilePatch) -> StoreResult<(Profile, bool)> {
        let existing = self.get_profile().await?;
        match existing {
            Some(profile) => {
                let row = sqlx::query_as::<_, Profile>(
                    "UPDATE profile SET
                        name = COALESCE($2, name),
                        role = COALESCE($3, role),
                        bio = COALESCE($4, bio),
                        years = COALESCE($5, years),
                        projects_count = COALESCE($6, projects_count),
                        awesomeness = COALESCE($7, awesomeness),
                        expertise = COALESCE($8, expertise)
                     WHERE id = $1 RETURNING *",
                )
                .bind(profile.id)
                .bind(patch.name)
                .bind(patch.role)
                .bind(patch.bio)
                .bind(patch.years)
                .bind(patch.projects_count)
                .bind(patch.awesomeness)
                .bind(patch.expertise)
                .fetch_one(&self.pool)
                .await?;
                Ok((row, false))
            }
            None => {
                let row = sqlx::query_as::<_, Profile>(
                    "INSERT INTO profile (name, role, bio, years, projects_count, awesomeness, expertise)
                     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
                )
                .bind(patch.name.unwrap_or_default())
                .bind(patch.role)
                .bind(patch.bio)
                .bind(patch.years)
                .bind(patch.projects_count)
                .bind(patch.awesomeness)
                .bind(patch.expertise.unwrap_or_default())
                .fetch_one(&self.pool)
                .await?;
                Ok((row, true))
            }
        }
    }

    async fn create_message(&self, input: NewMessage) -> StoreResult<Message> {
        let row = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (name, email, message) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(input.name)
        .bind(input.email)
        .bind(input.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_messages(&self) -> StoreResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, Message>("SELECT * FROM messages ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn unread_count(&self) -> StoreResult<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM messages WHERE is_read = FALSE")
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }

    async fn mark_message_read(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let row = sqlx::query_as::<_, Message>(
            "UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_message(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
