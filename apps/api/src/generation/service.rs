//! Generation orchestrators.
//!
//! Each task is a two-way decision on `ModelClient::is_configured()`:
//! - unconfigured → sleep for the mock latency, return the task's mock payload
//! - configured   → build prompt → cached (generate → parse)
//!
//! Only parsed results are cached. An unparseable response is a failed producer
//! call, so it is never stored and the next identical request asks the model again.
//! Provider failures are never retried here; they surface as `AppError::Generation`
//! with a generic message. A parse failure is recovered only for interview turns.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{cache_key, TtlCache};
use crate::errors::AppError;
use crate::generation::cover_letter::{self, CoverLetterRequest, CoverLetterResult};
use crate::generation::interview::{self, InterviewRequest, InterviewTurnResult};
use crate::generation::parse::ParseError;
use crate::generation::resume::{self, AnalysisResult, AnalyzeRequest};
use crate::llm_client::{LlmError, ModelClient};

pub const ANALYZE_TASK: &str = "analyze-resume";
pub const COVER_LETTER_TASK: &str = "generate-cover-letter";
pub const INTERVIEW_TASK: &str = "interview-chat";

const ANALYZE_FAILED: &str = "Failed to analyze resume";
const COVER_LETTER_FAILED: &str = "Failed to generate cover letter";
const INTERVIEW_FAILED: &str = "Failed to generate response";

const ANALYZE_MOCK_DELAY: Duration = Duration::from_millis(2000);
const COVER_LETTER_MOCK_DELAY: Duration = Duration::from_millis(3000);
const INTERVIEW_MOCK_DELAY: Duration = Duration::from_millis(1500);

/// Parsed live-path results, one TTL cache per task.
pub struct GenerationCache {
    analyses: TtlCache<AnalysisResult>,
    cover_letters: TtlCache<CoverLetterResult>,
    interview_turns: TtlCache<InterviewTurnResult>,
}

impl GenerationCache {
    pub fn new() -> Self {
        Self {
            analyses: TtlCache::new(),
            cover_letters: TtlCache::new(),
            interview_turns: TtlCache::new(),
        }
    }

    /// Returns how many slots were removed across all tasks.
    pub async fn purge_expired(&self) -> usize {
        self.analyses.purge_expired().await
            + self.cover_letters.purge_expired().await
            + self.interview_turns.purge_expired().await
    }

    pub async fn len(&self) -> usize {
        self.analyses.len().await + self.cover_letters.len().await + self.interview_turns.len().await
    }
}

/// Why a live generation produced no result.
#[derive(Debug, Error)]
enum GenerateError {
    #[error("cache key could not be built: {0}")]
    Key(#[from] serde_json::Error),

    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("unparseable response ({error}): {raw}")]
    Parse { error: ParseError, raw: String },
}

impl GenerateError {
    fn into_app_error(self, task: &str, public: &'static str) -> AppError {
        match self {
            GenerateError::Key(e) => {
                AppError::Internal(anyhow::anyhow!("Failed to build {task} cache key: {e}"))
            }
            other => AppError::generation(public, format!("{task}: {other}")),
        }
    }
}

pub struct GenerationService {
    model: Arc<dyn ModelClient>,
    cache: Arc<GenerationCache>,
    cache_ttl: Duration,
}

impl GenerationService {
    pub fn new(model: Arc<dyn ModelClient>, cache: Arc<GenerationCache>, cache_ttl: Duration) -> Self {
        Self {
            model,
            cache,
            cache_ttl,
        }
    }

    /// `true` when requests go to the live model.
    pub fn is_live(&self) -> bool {
        self.model.is_configured()
    }

    pub async fn analyze_resume(&self, request: &AnalyzeRequest) -> Result<AnalysisResult, AppError> {
        if !self.is_live() {
            tokio::time::sleep(ANALYZE_MOCK_DELAY).await;
            return Ok(resume::mock_analysis());
        }

        let prompt = resume::build_analysis_prompt(request);
        let analysis = self
            .generate_cached(
                &self.cache.analyses,
                ANALYZE_TASK,
                request,
                &prompt,
                resume::parse_analysis,
            )
            .await
            .map_err(|e| e.into_app_error(ANALYZE_TASK, ANALYZE_FAILED))?;

        info!("Resume analyzed: score={}", analysis.score);
        Ok(analysis)
    }

    pub async fn generate_cover_letter(
        &self,
        request: &CoverLetterRequest,
    ) -> Result<CoverLetterResult, AppError> {
        let date = cover_letter::today();

        if !self.is_live() {
            tokio::time::sleep(COVER_LETTER_MOCK_DELAY).await;
            return Ok(cover_letter::mock_cover_letter(request, &date));
        }

        let prompt = cover_letter::build_cover_letter_prompt(request, &date);
        // The date is part of the prompt, so it is part of the key.
        self.generate_cached(
            &self.cache.cover_letters,
            COVER_LETTER_TASK,
            &(&date, request),
            &prompt,
            cover_letter::parse_cover_letter,
        )
        .await
        .map_err(|e| e.into_app_error(COVER_LETTER_TASK, COVER_LETTER_FAILED))
    }

    pub async fn interview_turn(
        &self,
        request: &InterviewRequest,
    ) -> Result<InterviewTurnResult, AppError> {
        if request.messages.is_empty() {
            return Ok(interview::greeting(&request.config));
        }

        if !self.is_live() {
            tokio::time::sleep(INTERVIEW_MOCK_DELAY).await;
            return Ok(interview::mock_turn(&mut rand::rng()));
        }

        let prompt = interview::build_interview_prompt(request);
        let result = self
            .generate_cached(
                &self.cache.interview_turns,
                INTERVIEW_TASK,
                request,
                &prompt,
                interview::parse_interview_turn,
            )
            .await;

        match result {
            Ok(turn) => Ok(turn),
            Err(GenerateError::Parse { error, raw }) => {
                warn!("Unparseable {INTERVIEW_TASK} response ({error}), using fallback turn: {raw}");
                Ok(interview::fallback_turn())
            }
            Err(e) => Err(e.into_app_error(INTERVIEW_TASK, INTERVIEW_FAILED)),
        }
    }

    /// Generates and parses `prompt`, memoized under `task` + serialized `input`.
    /// A parse failure fails the producer, so nothing is stored for the key.
    async fn generate_cached<T, I>(
        &self,
        cache: &TtlCache<T>,
        task: &'static str,
        input: &I,
        prompt: &str,
        parse: fn(&str) -> Result<T, ParseError>,
    ) -> Result<T, GenerateError>
    where
        T: Clone + Send + Sync,
        I: Serialize + ?Sized,
    {
        let key = cache_key(task, input)?;

        let generate = cache.memoize(
            move || async move {
                let raw = self.model.generate(prompt).await?;
                let parsed =
                    parse(&raw).map_err(|error| GenerateError::Parse { error, raw })?;
                Ok::<T, GenerateError>(parsed)
            },
            key,
            self.cache_ttl,
        );
        debug!("Generating {task} (cache key {} bytes)", generate.key().len());

        generate.call().await
    }
}
