pub mod mcq_markdown;
pub mod time;
pub mod token;
pub mod validation;
