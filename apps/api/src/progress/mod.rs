pub mod feedback;
pub mod handlers;
pub mod prompts;
pub mod reconcile;
pub mod resolution;
