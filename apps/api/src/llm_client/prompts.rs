// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every generation prompt that asks for learning resources.
pub const REAL_RESOURCES_INSTRUCTION: &str = "\
    Prefer real, well-known resources (Coursera, edX, freeCodeCamp, official documentation, \
    classic books, YouTube channels). Never invent URLs; omit the url field when unsure.";
