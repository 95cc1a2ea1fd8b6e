use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::{FieldValidator, Validate, ValidationError};

// -------- Stored rows --------

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub stack: Vec<String>,
    pub features: Vec<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Skill {
    pub id: Uuid,
    pub title: String,
    pub level: Option<String>,
    pub color: Option<String>,
    pub progress: i32,
    pub total_skills: i32,
    pub equipment: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Experience {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub period: Option<String>,
    pub description: Option<String>,
    pub achievements: Vec<String>,
    pub stack: Vec<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Social {
    pub id: Uuid,
    pub platform: String,
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub years: Option<String>,
    pub projects_count: Option<String>,
    pub awesomeness: Option<String>,
    pub expertise: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

// -------- Request inputs --------
//
// Strict shapes: unknown fields are rejected at deserialization, matching
// the original schemas. Validation sanitizes string fields in place.

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewProject {
    pub title: String,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub link: Option<String>,
    pub image: Option<String>,
}

impl Validate for NewProject {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.required_text("title", &mut self.title, 100);
        v.optional_text("subtitle", &mut self.subtitle, 255);
        v.list("stack", &mut self.stack, 10, 50);
        v.list("features", &mut self.features, 10, 255);
        v.url("link", &self.link);
        v.optional_text("image", &mut self.image, 255);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub stack: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub link: Option<String>,
    pub image: Option<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.stack.is_none()
            && self.features.is_none()
            && self.link.is_none()
            && self.image.is_none()
    }
}

impl Validate for ProjectPatch {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.optional_text("title", &mut self.title, 100);
        v.optional_text("subtitle", &mut self.subtitle, 255);
        v.optional_list("stack", &mut self.stack, 10, 50);
        v.optional_list("features", &mut self.features, 10, 255);
        v.url("link", &self.link);
        v.optional_text("image", &mut self.image, 255);
        v.finish()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewSkill {
    pub title: String,
    pub level: Option<String>,
    pub color: Option<String>,
    pub progress: Option<i32>,
    #[serde(rename = "totalSkills")]
    pub total_skills: Option<i32>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl Validate for NewSkill {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.required_text("title", &mut self.title, 100);
        v.optional_text("level", &mut self.level, 50);
        v.hex_color("color", &self.color);
        v.range("progress", self.progress, 0, 100);
        v.range("totalSkills", self.total_skills, 0, 100);
        v.list("equipment", &mut self.equipment, 20, 50);
        v.list("achievements", &mut self.achievements, 10, 255);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SkillPatch {
    pub title: Option<String>,
    pub level: Option<String>,
    pub color: Option<String>,
    pub progress: Option<i32>,
    #[serde(rename = "totalSkills")]
    pub total_skills: Option<i32>,
    pub equipment: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
}

impl SkillPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.level.is_none()
            && self.color.is_none()
            && self.progress.is_none()
            && self.total_skills.is_none()
            && self.equipment.is_none()
            && self.achievements.is_none()
    }
}

impl Validate for SkillPatch {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.optional_text("title", &mut self.title, 100);
        v.optional_text("level", &mut self.level, 50);
        v.hex_color("color", &self.color);
        v.range("progress", self.progress, 0, 100);
        v.range("totalSkills", self.total_skills, 0, 100);
        v.optional_list("equipment", &mut self.equipment, 20, 50);
        v.optional_list("achievements", &mut self.achievements, 10, 255);
        v.finish()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewExperience {
    pub company: String,
    pub role: String,
    pub period: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub stack: Vec<String>,
}

impl Validate for NewExperience {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.required_text("company", &mut self.company, 100);
        v.required_text("role", &mut self.role, 100);
        v.optional_text("period", &mut self.period, 50);
        v.optional_text("description", &mut self.description, 1000);
        v.list("achievements", &mut self.achievements, 10, 255);
        v.list("stack", &mut self.stack, 10, 50);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub period: Option<String>,
    pub description: Option<String>,
    pub achievements: Option<Vec<String>>,
    pub stack: Option<Vec<String>>,
}

impl ExperiencePatch {
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.role.is_none()
            && self.period.is_none()
            && self.description.is_none()
            && self.achievements.is_none()
            && self.stack.is_none()
    }
}

impl Validate for ExperiencePatch {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.optional_text("company", &mut self.company, 100);
        v.optional_text("role", &mut self.role, 100);
        v.optional_text("period", &mut self.period, 50);
        v.optional_text("description", &mut self.description, 1000);
        v.optional_list("achievements", &mut self.achievements, 10, 255);
        v.optional_list("stack", &mut self.stack, 10, 50);
        v.finish()
    }
}

/// Body of `PUT /api/socials/{platform}`. The platform in the body, if
/// present, is ignored in favor of the path parameter.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SocialUpsert {
    pub platform: Option<String>,
    pub href: Option<String>,
    pub label: String,
}

impl Validate for SocialUpsert {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.optional_text("platform", &mut self.platform, 50);
        v.optional_text("href", &mut self.href, 255);
        v.required_text("label", &mut self.label, 50);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub years: Option<String>,
    pub projects_count: Option<String>,
    pub awesomeness: Option<String>,
    pub expertise: Option<Vec<String>>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.bio.is_none()
            && self.years.is_none()
            && self.projects_count.is_none()
            && self.awesomeness.is_none()
            && self.expertise.is_none()
    }
}

impl Validate for ProfilePatch {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.optional_text("name", &mut self.name, 100);
        v.optional_text("role", &mut self.role, 100);
        v.optional_text("bio", &mut self.bio, 1000);
        v.optional_text("years", &mut self.years, 10);
        v.optional_text("projects_count", &mut self.projects_count, 10);
        v.optional_text("awesomeness", &mut self.awesomeness, 10);
        v.optional_list("expertise", &mut self.expertise, 10, 50);
        v.finish()
    }
}

/// Contact form submission. The only public write in the API.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Validate for NewMessage {
    fn validate(&mut self) -> Result<(), ValidationError> {
        let mut v = FieldValidator::new();
        v.required_text("name", &mut self.name, 100);
        v.email("email", &mut self.email);
        v.required_text("message", &mut self.message, 10_000);
        v.finish()
    }
}
