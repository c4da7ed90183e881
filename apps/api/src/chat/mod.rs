pub mod assistant;
pub mod handlers;
pub mod prompts;
