pub mod generator;
pub mod handlers;
pub mod history;
pub mod prompts;
pub mod templates;
