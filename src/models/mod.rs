pub mod admin;
pub mod candidate;
pub mod content_group;
pub mod file;
pub mod question;
