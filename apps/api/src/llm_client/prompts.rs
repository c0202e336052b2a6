// Shared prompt fragments.
// Each task defines its own template in generation/prompts.rs; cross-cutting
// instructions live here.

/// Appended to every prompt whose response is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON, no markdown formatting. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Appended to prompts whose response is used verbatim as plain text.
pub const PLAIN_TEXT_INSTRUCTION: &str = "Return ONLY the requested text. \
    Do NOT wrap it in JSON or markdown code fences. \
    Do NOT add commentary before or after it.";
