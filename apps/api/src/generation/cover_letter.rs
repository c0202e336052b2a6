//! Cover letter generation: request/result types, prompt builder, parser and mock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::parse::ParseError;
use crate::generation::prompts::{render, COVER_LETTER_PROMPT_TEMPLATE};
use crate::llm_client::prompts::PLAIN_TEXT_INSTRUCTION;
use crate::llm_client::strip_code_fences;

const DEFAULT_MANAGER: &str = "Hiring Manager";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub job_description: String,
    pub company_name: String,
    #[serde(default)]
    pub hiring_manager: Option<String>,
    pub user_experience: String,
    pub tone: String,
}

impl CoverLetterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("jobDescription", &self.job_description),
            ("companyName", &self.company_name),
            ("userExperience", &self.user_experience),
            ("tone", &self.tone),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }

    /// Addressee for the salutation; blank or missing means "Hiring Manager".
    pub fn manager(&self) -> &str {
        self.hiring_manager
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MANAGER)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterResult {
    pub letter: String,
}

/// Date header format, e.g. "March 7, 2026".
pub fn format_letter_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn today() -> String {
    format_letter_date(chrono::Local::now().date_naive())
}

pub fn build_cover_letter_prompt(request: &CoverLetterRequest, date: &str) -> String {
    render(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("job_description", request.job_description.as_str()),
            ("company_name", request.company_name.as_str()),
            ("hiring_manager", request.manager()),
            ("user_experience", request.user_experience.as_str()),
            ("tone", request.tone.as_str()),
            ("date", date),
            ("plain_text", PLAIN_TEXT_INSTRUCTION),
        ],
    )
}

/// The letter is plain text. Fences are stripped, and a `{"letter": ...}` object is
/// unwrapped if the model answered in JSON anyway.
pub fn parse_cover_letter(raw: &str) -> Result<CoverLetterResult, ParseError> {
    let text = strip_code_fences(raw);

    if text.starts_with('{') {
        if let Ok(wrapped) = serde_json::from_str::<CoverLetterResult>(text) {
            return non_empty(wrapped.letter.trim());
        }
    }

    non_empty(text)
}

fn non_empty(letter: &str) -> Result<CoverLetterResult, ParseError> {
    if letter.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(CoverLetterResult {
        letter: letter.to_string(),
    })
}

/// Fixed letter served when no model is configured.
pub fn mock_cover_letter(request: &CoverLetterRequest, date: &str) -> CoverLetterResult {
    let manager = request.manager();
    let company = request.company_name.as_str();

    let letter = format!(
        "{date}

{manager}
{company}

Dear {manager},

I've been following {company}'s recent expansion into AI-driven analytics with great enthusiasm. As a developer who believes that technology should empower human potential rather than replace it, your mission resonates deeply with my own professional philosophy. I am writing to express my strong interest in the Software Engineer role, where I can contribute my expertise in full-stack development to accelerate your product roadmap.

Throughout my career, I have consistently delivered high-impact solutions by bridging the gap between complex backend logic and intuitive user interfaces. My experience aligns perfectly with your requirements for scalable architecture and modern frontend frameworks. Specifically, I bring three core strengths to your team:

First, my proficiency in React and Node.js has allowed me to build robust applications that serve thousands of daily users. Second, I have a proven track record of optimizing database performance, reducing query times by up to 40%. Third, I thrive in collaborative Agile environments, where I have successfully mentored junior developers and led sprint planning sessions.

One of my proudest achievements was at my previous role, where I spearheaded the migration of a legacy monolith to a microservices architecture. This initiative not only improved system reliability by 99.9% but also reduced deployment times from hours to minutes. I am eager to bring this same level of technical rigor and innovation to the engineering challenges at {company}.

I am particularly excited about {company}'s recent launch of the \"DataFlow\" product. I see immense potential in integrating real-time data visualization features, an area where I have significant experience. I would welcome the opportunity to discuss how my background in data-heavy applications can help drive the next phase of this product's growth.

Thank you for your time and consideration. I am confident that my technical skills and passion for building user-centric software make me a strong candidate for this position. I look forward to the possibility of discussing how I can contribute to the continued success of {company}.

Sincerely,

[Your Name]"
    );

    CoverLetterResult { letter }
}
