// Generation: resume ATS analysis, cover letters, interview coaching.
// All model calls go through llm_client::ModelClient and the per-task TtlCaches.

pub mod cover_letter;
pub mod handlers;
pub mod interview;
pub mod parse;
pub mod prompts;
pub mod resume;
pub mod score;
pub mod service;
pub mod upload;
