//! Learning assistant: context assembly, the model call and its fallback.

use anyhow::Result;
use tracing::{debug, warn};

use crate::chat::prompts::{CHAT_SYSTEM_TEMPLATE, ROADMAP_CONTEXT_TEMPLATE};
use crate::llm_client::{ChatTurn, LanguageModel};
use crate::models::chat::{ChatMessageRow, ChatRole};
use crate::models::user::User;
use crate::progress::reconcile::Tally;
use crate::roadmap::history::current_roadmap;
use crate::store::Store;

const UNSPECIFIED: &str = "not specified";
const STARTING_OUT: &str = "Starting the journey";

/// What the assistant knows about the user's current roadmap.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapContext {
    pub career_path: String,
    pub overview: String,
    pub completed: i32,
    pub total: i32,
    /// First uncompleted step, if any.
    pub focus_step: Option<String>,
}

pub async fn load_context(store: &dyn Store, user_id: &str) -> Result<Option<RoadmapContext>> {
    let Some(roadmap) = current_roadmap(store, user_id).await? else {
        return Ok(None);
    };
    let steps = store.list_steps(roadmap.id).await?;
    let tally = Tally::of(&steps);
    Ok(Some(RoadmapContext {
        career_path: roadmap.career_path,
        overview: roadmap.overview,
        completed: tally.completed,
        total: tally.total,
        focus_step: steps.into_iter().find(|s| !s.completed).map(|s| s.title),
    }))
}

fn field(value: &Option<String>) -> &str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNSPECIFIED)
}

pub fn system_prompt(user: &User, context: Option<&RoadmapContext>) -> String {
    let profile = user.profile().cloned().unwrap_or_default();
    let roadmap_context = context
        .map(|ctx| {
            ROADMAP_CONTEXT_TEMPLATE
                .replace("{career_path}", &ctx.career_path)
                .replace("{overview}", &ctx.overview)
                .replace("{completed}", &ctx.completed.to_string())
                .replace("{total}", &ctx.total.to_string())
                .replace("{focus_step}", ctx.focus_step.as_deref().unwrap_or(STARTING_OUT))
        })
        .unwrap_or_default();

    CHAT_SYSTEM_TEMPLATE
        .replace("{name}", field(&user.name))
        .replace("{learning_style}", field(&profile.learning_style))
        .replace("{skill_level}", field(&profile.current_skill_level))
        .replace("{career_goal}", field(&profile.career_goal))
        .replace("{study_time}", field(&profile.study_time))
        .replace("{roadmap_context}", &roadmap_context)
}

/// Reply stored when the model is unavailable.
pub fn fallback_reply(context: Option<&RoadmapContext>) -> String {
    match context {
        Some(RoadmapContext {
            focus_step: Some(step),
            completed,
            total,
            ..
        }) => format!(
            "I can't reach the assistant right now, but you're doing well: {completed} of {total} steps done. \
            Your current focus is \"{step}\". Try working through one of its milestones today, \
            and ask me again in a little while."
        ),
        Some(ctx) => format!(
            "I can't reach the assistant right now. You've completed every step of \"{}\", \
            so generating your next roadmap is a great move.",
            ctx.career_path
        ),
        None => "I can't reach the assistant right now. Start by generating a roadmap \
            from your profile, then ask me again about your first step."
            .to_string(),
    }
}

/// Stored messages as model turns, skipping rows with unknown roles.
pub fn to_turns(messages: &[ChatMessageRow]) -> Vec<ChatTurn> {
    messages
        .iter()
        .filter_map(|m| {
            ChatRole::parse(&m.role).map(|role| ChatTurn {
                role,
                content: m.content.clone(),
            })
        })
        .collect()
}

#[derive(Debug)]
pub struct ChatExchange {
    pub reply: ChatMessageRow,
    pub fallback: bool,
}

/// Stores the user's message, asks the model with the recent history and
/// stores the answer.
pub async fn converse(
    store: &dyn Store,
    llm: &dyn LanguageModel,
    user: &User,
    message: &str,
    history_limit: i64,
) -> Result<ChatExchange> {
    store
        .append_chat_message(&user.id, ChatRole::User, message)
        .await?;
    let history = store.recent_chat_messages(&user.id, history_limit).await?;
    let context = load_context(store, &user.id).await?;
    let system = system_prompt(user, context.as_ref());
    debug!(
        "Chat for user {} with {} turns of history",
        user.id,
        history.len()
    );

    let (content, fallback) = match llm.complete(&system, &to_turns(&history)).await {
        Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), false),
        Ok(_) => {
            warn!("Chat model returned an empty reply for user {}", user.id);
            (fallback_reply(context.as_ref()), true)
        }
        Err(e) => {
            warn!("Chat model failed for user {}: {e}", user.id);
            (fallback_reply(context.as_ref()), true)
        }
    };

    let reply = store
        .append_chat_message(&user.id, ChatRole::Assistant, &content)
        .await?;
    Ok(ChatExchange { reply, fallback })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ScriptedModel;
    use crate::models::roadmap::{RoadmapDraft, StepDraft, WeeklySchedule};
    use crate::roadmap::history::save_initial;
    use crate::store::MemoryStore;

    async fn user_with_roadmap(store: &MemoryStore) -> User {
        let user = store
            .upsert_user("u1", Some("u1@example.com"), Some("Ada"))
            .await
            .unwrap();
        let steps = ["Python", "Pandas"]
            .iter()
            .map(|t| StepDraft {
                id: String::new(),
                title: t.to_string(),
                description: String::new(),
                duration: String::new(),
                resources: vec![],
                skills: vec![],
                milestones: vec![],
                completed: false,
                progress: 0,
            })
            .collect();
        let draft = RoadmapDraft {
            career_path: "Data Analyst".to_string(),
            overview: "Numbers".to_string(),
            estimated_timeframe: String::new(),
            steps,
            weekly_schedule: WeeklySchedule::default(),
        };
        save_initial(store, "u1", &draft).await.unwrap();
        user
    }

    #[tokio::test]
    async fn test_context_points_at_first_uncompleted_step() {
        let store = MemoryStore::new();
        user_with_roadmap(&store).await;
        let ctx = load_context(&store, "u1").await.unwrap().unwrap();
        assert_eq!(ctx.focus_step.as_deref(), Some("Python"));
        assert_eq!((ctx.completed, ctx.total), (0, 2));
    }

    #[tokio::test]
    async fn test_converse_sends_history_once_and_stores_reply() {
        let store = MemoryStore::new();
        let user = user_with_roadmap(&store).await;
        let llm = ScriptedModel::new(vec![Some("Start with Python basics.")]);

        let exchange = converse(&store, &llm, &user, "Where do I start?", 10)
            .await
            .unwrap();
        assert!(!exchange.fallback);
        assert_eq!(exchange.reply.content, "Start with Python basics.");
        assert_eq!(exchange.reply.role, "assistant");

        let calls = llm.calls.lock().unwrap();
        let (system, turns) = &calls[0];
        assert!(system.contains("Name: Ada"));
        assert!(system.contains("Current Focus Step: Python"));
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, "Where do I start?");
    }

    #[tokio::test]
    async fn test_converse_keeps_only_recent_turns() {
        let store = MemoryStore::new();
        let user = user_with_roadmap(&store).await;
        for i in 0..6 {
            store
                .append_chat_message("u1", ChatRole::User, &format!("old {i}"))
                .await
                .unwrap();
        }
        let llm = ScriptedModel::new(vec![Some("ok")]);
        converse(&store, &llm, &user, "newest", 3).await.unwrap();

        let calls = llm.calls.lock().unwrap();
        let contents: Vec<&str> = calls[0].1.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["old 4", "old 5", "newest"]);
    }

    #[tokio::test]
    async fn test_converse_falls_back_with_focus_step() {
        let store = MemoryStore::new();
        let user = user_with_roadmap(&store).await;
        let llm = ScriptedModel::new(vec![None]);
        let exchange = converse(&store, &llm, &user, "help", 10).await.unwrap();
        assert!(exchange.fallback);
        assert!(exchange.reply.content.contains("\"Python\""));
        assert_eq!(store.list_chat_messages("u1").await.unwrap().len(), 2);
    }

    #[test]
    fn test_system_prompt_without_profile_or_roadmap() {
        let user = User {
            id: "u9".to_string(),
            email: None,
            name: None,
            profile: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let prompt = system_prompt(&user, None);
        assert!(prompt.contains("Career Goal: not specified"));
        assert!(!prompt.contains("Current Learning Path"));
        assert!(fallback_reply(None).contains("generating a roadmap"));
    }
}
