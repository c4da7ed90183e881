pub mod chat;
pub mod notification;
pub mod roadmap;
pub mod study_plan;
pub mod user;
