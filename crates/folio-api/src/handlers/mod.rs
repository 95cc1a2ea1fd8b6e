pub mod auth;
pub mod experiences;
pub mod health;
pub mod messages;
pub mod profile;
pub mod projects;
pub mod skills;
pub mod socials;
