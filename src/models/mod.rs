pub mod about;
pub mod admin;
pub mod analytics;
pub mod profile;
pub mod project;
pub mod settings;
pub mod stat;
