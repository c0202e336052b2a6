//! Interview coach turns: request/result types, greeting, prompt builder, parser,
//! fallback and mock.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::parse::{decode_json, ParseError};
use crate::generation::prompts::{render, INTERVIEW_PROMPT_TEMPLATE};
use crate::generation::score;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Questions the mock interviewer picks from.
pub const MOCK_QUESTIONS: [&str; 4] = [
    "Can you describe a challenging technical problem you solved recently?",
    "How do you handle disagreements with stakeholders?",
    "Tell me about a time you failed and what you learned.",
    "What is your approach to testing and quality assurance?",
];

const FALLBACK_QUESTION: &str = "Can you tell me more about that experience?";
const FALLBACK_SCORE: u8 = 6;
const MOCK_SCORE: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn speaker(self) -> &'static str {
        match self {
            Role::User => "Candidate",
            Role::Assistant => "Interviewer",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Interview setup chosen by the candidate. Treated as opaque text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewConfig {
    pub role: String,
    pub company_type: String,
    #[serde(default)]
    pub seniority: String,
    #[serde(default)]
    pub round: String,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub config: InterviewConfig,
}

impl InterviewRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.config.role.trim().is_empty() {
            return Err(AppError::Validation("config.role cannot be empty".to_string()));
        }
        if self.config.company_type.trim().is_empty() {
            return Err(AppError::Validation(
                "config.companyType cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub better_answer: String,
    #[serde(deserialize_with = "score::rating")]
    pub score: u8,
}

/// `feedback` is `None` only for the opening greeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewTurnResult {
    pub message: String,
    pub feedback: Option<Feedback>,
}

/// Model output for a non-opening turn; feedback is mandatory there.
#[derive(Deserialize)]
struct ModelTurn {
    message: String,
    feedback: Feedback,
}

/// Opening line for an empty conversation.
pub fn greeting(config: &InterviewConfig) -> InterviewTurnResult {
    InterviewTurnResult {
        message: format!(
            "Hello! I'm your AI Interview Coach. I see you're applying for a {} position at a {} company. \
             To start, tell me a little bit about yourself and why you're interested in this role.",
            config.role, config.company_type
        ),
        feedback: None,
    }
}

/// Renders prior turns as "Candidate:" / "Interviewer:" lines.
pub fn render_conversation(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.speaker(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_interview_prompt(request: &InterviewRequest) -> String {
    let config = &request.config;
    let conversation = render_conversation(&request.messages);
    let last_answer = request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    render(
        INTERVIEW_PROMPT_TEMPLATE,
        &[
            ("role", config.role.as_str()),
            ("company_type", config.company_type.as_str()),
            ("seniority", config.seniority.as_str()),
            ("round", config.round.as_str()),
            ("difficulty", config.difficulty.as_str()),
            ("conversation", conversation.as_str()),
            ("last_answer", last_answer),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

pub fn parse_interview_turn(raw: &str) -> Result<InterviewTurnResult, ParseError> {
    let turn: ModelTurn = decode_json(raw)?;
    let message = turn.message.trim();
    if message.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(InterviewTurnResult {
        message: message.to_string(),
        feedback: Some(turn.feedback),
    })
}

/// Generic follow-up used when the model's answer cannot be decoded.
pub fn fallback_turn() -> InterviewTurnResult {
    InterviewTurnResult {
        message: FALLBACK_QUESTION.to_string(),
        feedback: Some(Feedback {
            strengths: vec!["Good start".to_string()],
            improvements: vec!["Add more specific details".to_string()],
            better_answer: "Try to include metrics and outcomes.".to_string(),
            score: FALLBACK_SCORE,
        }),
    }
}

/// Mock turn: fixed feedback plus a question drawn uniformly from `MOCK_QUESTIONS`.
pub fn mock_turn<R: Rng + ?Sized>(rng: &mut R) -> InterviewTurnResult {
    let question = MOCK_QUESTIONS.choose(rng).copied().unwrap_or(FALLBACK_QUESTION);

    InterviewTurnResult {
        message: question.to_string(),
        feedback: Some(Feedback {
            strengths: vec![
                "Good clarity".to_string(),
                "Mentioned relevant experience".to_string(),
            ],
            improvements: vec![
                "Could be more specific about outcomes".to_string(),
                "Use more action verbs".to_string(),
            ],
            better_answer:
                "A stronger answer would quantify your impact, e.g., 'I improved X by Y%'."
                    .to_string(),
            score: MOCK_SCORE,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn config() -> InterviewConfig {
        InterviewConfig {
            role: "Staff Engineer".to_string(),
            company_type: "Fintech Startup".to_string(),
            seniority: "Senior".to_string(),
            round: "System Design".to_string(),
            difficulty: "Hard".to_string(),
        }
    }

    fn conversation() -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: Role::Assistant,
                content: "Tell me about yourself.".to_string(),
            },
            ChatMessage {
                role: Role::User,
                content: "I build payment systems in Rust.".to_string(),
            },
        ]
    }

    #[test]
    fn test_greeting_names_role_and_company_type() {
        let turn = greeting(&config());
        assert!(turn.message.contains("Staff Engineer"));
        assert!(turn.message.contains("Fintech Startup"));
        assert!(turn.feedback.is_none());
    }

    #[test]
    fn test_greeting_serializes_null_feedback() {
        let json = serde_json::to_value(greeting(&config())).unwrap();
        assert!(json["feedback"].is_null());
    }

    #[test]
    fn test_conversation_uses_speaker_labels() {
        assert_eq!(
            render_conversation(&conversation()),
            "Interviewer: Tell me about yourself.\nCandidate: I build payment systems in Rust."
        );
    }

    #[test]
    fn test_prompt_contains_history_latest_answer_and_setup() {
        let request = InterviewRequest {
            messages: conversation(),
            config: config(),
        };
        let prompt = build_interview_prompt(&request);
        assert!(prompt.contains("Interviewer: Tell me about yourself.\nCandidate: I build payment systems in Rust."));
        assert!(prompt.contains("CANDIDATE'S LAST ANSWER:\nI build payment systems in Rust."));
        assert!(prompt.contains("- Interview Round: System Design"));
        assert!(prompt.contains("- Seniority: Senior"));
        assert!(prompt.contains("- Difficulty: Hard"));
        assert!(prompt.contains("<integer 1-10>"));
    }

    #[test]
    fn test_parse_fenced_turn() {
        let raw = "Sure!\n```json\n{\"feedback\": {\"strengths\": [\"Clear\"], \"improvements\": [\"Metrics\"], \"betterAnswer\": \"Say X\", \"score\": 8}, \"message\": \"How would you shard the ledger?\"}\n```";
        let turn = parse_interview_turn(raw).unwrap();
        assert_eq!(turn.message, "How would you shard the ledger?");
        let feedback = turn.feedback.unwrap();
        assert_eq!(feedback.score, 8);
        assert_eq!(feedback.better_answer, "Say X");
    }

    #[test]
    fn test_parse_clamps_rating() {
        let raw = r#"{"feedback": {"score": 15}, "message": "Next?"}"#;
        let turn = parse_interview_turn(raw).unwrap();
        assert_eq!(turn.feedback.unwrap().score, 10);
    }

    #[test]
    fn test_parse_rejects_missing_feedback_or_message() {
        assert!(parse_interview_turn(r#"{"message": "Next?"}"#).is_err());
        assert!(parse_interview_turn(r#"{"feedback": {"score": 5}, "message": "  "}"#).is_err());
        assert!(parse_interview_turn("not json at all").is_err());
    }

    #[test]
    fn test_fallback_turn_scores_six() {
        let turn = fallback_turn();
        assert!(!turn.message.is_empty());
        assert_eq!(turn.feedback.unwrap().score, 6);
    }

    #[test]
    fn test_mock_turn_draws_from_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let turn = mock_turn(&mut rng);
            assert!(MOCK_QUESTIONS.contains(&turn.message.as_str()));
            assert_eq!(turn.feedback.as_ref().unwrap().score, 7);
            seen.insert(turn.message);
        }
        assert_eq!(seen.len(), MOCK_QUESTIONS.len());
    }

    #[test]
    fn test_request_deserializes_client_payload() {
        let request: InterviewRequest = serde_json::from_value(serde_json::json!({
            "messages": [
                {"role": "assistant", "content": "Hello!"},
                {"role": "user", "content": "Hi", "feedback": null}
            ],
            "config": {
                "role": "Software Engineer",
                "companyType": "Tech Giant",
                "seniority": "Mid-Level",
                "round": "Technical",
                "difficulty": "Medium"
            }
        }))
        .unwrap();
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.config.company_type, "Tech Giant");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result: Result<ChatMessage, _> =
            serde_json::from_value(serde_json::json!({"role": "system", "content": "x"}));
        assert!(result.is_err());
    }
}
