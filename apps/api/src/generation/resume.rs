//! Resume ATS analysis: request/result types, prompt builder, parser and mock.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::parse::{decode_json, ParseError};
use crate::generation::prompts::{render, ANALYSIS_PROMPT_TEMPLATE};
use crate::generation::score;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Alternatives requested per rewritten bullet.
pub const REWRITE_ALTERNATIVES: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

impl AnalyzeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.resume_text.trim().is_empty() {
            return Err(AppError::Validation("resumeText cannot be empty".to_string()));
        }
        if self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "jobDescription cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(deserialize_with = "score::percent")]
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    #[serde(default)]
    pub keywords: KeywordReport,
    #[serde(default)]
    pub formatting: FormattingReport,
    #[serde(default)]
    pub impact_rewrites: Vec<ImpactRewrite>,
    #[serde(default)]
    pub fixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(deserialize_with = "score::percent")]
    pub keywords: u8,
    #[serde(deserialize_with = "score::percent")]
    pub formatting: u8,
    #[serde(deserialize_with = "score::percent")]
    pub impact: u8,
    #[serde(deserialize_with = "score::percent")]
    pub brevity: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordReport {
    pub missing: Vec<String>,
    pub overused: Vec<String>,
    pub suggested: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingReport {
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRewrite {
    pub original: String,
    pub alternatives: Vec<String>,
}

pub fn build_analysis_prompt(request: &AnalyzeRequest) -> String {
    render(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("resume_text", request.resume_text.as_str()),
            ("job_description", request.job_description.as_str()),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

/// Recovers an `AnalysisResult` from raw model output.
/// Rewrites with no alternatives are dropped; extra alternatives are cut to three.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, ParseError> {
    let mut analysis: AnalysisResult = decode_json(raw)?;

    analysis
        .impact_rewrites
        .retain(|rewrite| !rewrite.alternatives.is_empty());
    for rewrite in &mut analysis.impact_rewrites {
        rewrite.alternatives.truncate(REWRITE_ALTERNATIVES);
    }

    Ok(analysis)
}

/// Static report served when no model is configured.
pub fn mock_analysis() -> AnalysisResult {
    AnalysisResult {
        score: 72,
        breakdown: ScoreBreakdown {
            keywords: 65,
            formatting: 80,
            impact: 70,
            brevity: 75,
        },
        keywords: KeywordReport {
            missing: strings(&[
                "Agile Methodology",
                "Cloud Computing",
                "Stakeholder Management",
                "CI/CD",
            ]),
            overused: strings(&["Team player", "Hardworking", "Motivated"]),
            suggested: strings(&[
                "Led cross-functional teams in Agile environments",
                "Implemented CI/CD pipelines using Jenkins",
            ]),
        },
        formatting: FormattingReport {
            issues: strings(&[
                "Date format inconsistency (use MM/YYYY)",
                "Multiple columns detected (may confuse older ATS)",
            ]),
            suggestions: strings(&[
                "Standardize date formats",
                "Switch to single-column layout for work experience",
            ]),
        },
        impact_rewrites: vec![
            ImpactRewrite {
                original: "Responsible for managing the team.".to_string(),
                alternatives: strings(&[
                    "Led a team of 5 engineers to deliver project X ahead of schedule.",
                    "Orchestrated daily stand-ups and sprint planning, increasing velocity by 20%.",
                    "Mentored junior developers, resulting in 0% attrition over 12 months.",
                ]),
            },
            ImpactRewrite {
                original: "Worked on the frontend code.".to_string(),
                alternatives: strings(&[
                    "Architected the frontend using React and Redux, improving load time by 40%.",
                    "Developed reusable UI components, reducing development time for future features.",
                    "Optimized rendering performance, boosting Lighthouse score from 60 to 95.",
                ]),
            },
        ],
        fixes: strings(&[
            "Add 'Agile Methodology' and 'CI/CD' to your Skills section.",
            "Quantify your leadership experience with specific team sizes and outcomes.",
            "Change the resume layout to a single column for better parsing.",
        ]),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
