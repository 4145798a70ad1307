// Cross-cutting prompt fragments shared by every stage that calls the model.
// Stage-specific prompts live in generation/prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Prepended to the drafting prompts.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the master profile. \
    Do NOT infer, interpolate, or invent employers, dates, metrics or skills. \
    If the profile does not support a claim, leave it out.";
