//! Chat and analysis relay handlers.
//!
//! # Responsibility
//! - Validate relay requests, build model input, map results to
//!   status/body pairs the UI shell understands.
//!
//! # Invariants
//! - Handlers never panic and always return a JSON object body.
//! - Blank chat messages are rejected before credentials are checked.
//! - Log lines carry counts and error kinds, never message text.
//! - Malformed analysis records are dropped one by one; only a body that is
//!   not an object of lists fails the request.

use crate::assistant::client::{GenerateRequest, GenerateTurn, GenerativeClient};
use crate::assistant::error::{AssistantError, AssistantErrorKind};
use crate::assistant::prompt::{analysis_prompt, therapist_instruction, COACH_INSTRUCTION};
use crate::model::chat::{ChatRole, ChatTurn, Therapist};
use crate::model::task::Task;
use crate::model::transaction::{Month, Transaction};
use crate::stats::dashboard::{dashboard_stats, DashboardStats};
use chrono::NaiveDate;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// Reply shown when the analysis call fails.
pub const ANALYSIS_FALLBACK: &str = "Keep up the great work! 🌟";

/// Chat relay request body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub therapist: Option<Therapist>,
}

/// Analysis relay request body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default, deserialize_with = "lenient_records")]
    pub events: Vec<Task>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub transactions: Vec<Transaction>,
    pub current_month: Month,
}

/// Statistics echoed back with an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub completion_rate: u32,
    pub today_tasks: usize,
    pub upcoming_tasks: usize,
    pub capacity: u32,
    pub financial_safe: f64,
}

impl From<&DashboardStats> for AnalysisStats {
    fn from(stats: &DashboardStats) -> Self {
        Self {
            completion_rate: stats.completion_rate,
            today_tasks: stats.today_tasks,
            upcoming_tasks: stats.upcoming_tasks,
            capacity: stats.capacity,
            financial_safe: stats.finance.remaining,
        }
    }
}

/// HTTP-like relay result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayResponse {
    pub status: u16,
    pub body: Value,
}

impl RelayResponse {
    fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Relays one chat message with its history.
pub fn handle_chat<C>(client: &C, request: ChatRequest) -> RelayResponse
where
    C: GenerativeClient + ?Sized,
{
    let message = request.message.trim();
    if message.is_empty() {
        return RelayResponse::new(400, json!({ "error": "Message is required" }));
    }
    if !client.is_configured() {
        warn!("event=assistant_chat module=assistant status=error reason=missing_api_key");
        return RelayResponse::new(500, json!({ "error": "API key not configured" }));
    }

    let mut turns: Vec<GenerateTurn> = request
        .history
        .iter()
        .map(|turn| GenerateTurn {
            role: ChatRole::from_client(&turn.role),
            text: turn.content.clone(),
        })
        .collect();
    turns.push(GenerateTurn::user(message));

    let generate = GenerateRequest {
        system_instruction: therapist_instruction(request.therapist.as_ref()),
        turns,
    };

    match client.generate(&generate) {
        Ok(text) => {
            info!(
                "event=assistant_chat module=assistant status=ok history_turns={} persona={}",
                request.history.len(),
                request.therapist.is_some()
            );
            RelayResponse::new(200, json!({ "message": text }))
        }
        Err(err) => {
            warn!(
                "event=assistant_chat module=assistant status=error kind={}",
                err.kind.as_str()
            );
            chat_error_response(&err)
        }
    }
}

/// Parses a JSON chat body and relays it.
pub fn handle_chat_json<C>(client: &C, body: &str) -> RelayResponse
where
    C: GenerativeClient + ?Sized,
{
    match serde_json::from_str::<ChatRequest>(body) {
        Ok(request) => handle_chat(client, request),
        Err(err) => invalid_body(&err),
    }
}

/// Computes statistics for `today` and asks the model for a short analysis.
pub fn handle_analyze<C>(client: &C, request: AnalyzeRequest, today: NaiveDate) -> RelayResponse
where
    C: GenerativeClient + ?Sized,
{
    if !client.is_configured() {
        warn!("event=assistant_analyze module=assistant status=error reason=missing_api_key");
        return RelayResponse::new(500, json!({ "error": "API key not configured" }));
    }

    let stats = dashboard_stats(
        &request.events,
        &request.transactions,
        today,
        request.current_month,
    );
    let generate = GenerateRequest {
        system_instruction: COACH_INSTRUCTION.to_string(),
        turns: vec![GenerateTurn::user(analysis_prompt(&stats))],
    };

    match client.generate(&generate) {
        Ok(analysis) => {
            info!(
                "event=assistant_analyze module=assistant status=ok tasks={} transactions={}",
                request.events.len(),
                request.transactions.len()
            );
            RelayResponse::new(
                200,
                json!({ "analysis": analysis, "stats": AnalysisStats::from(&stats) }),
            )
        }
        Err(err) => {
            warn!(
                "event=assistant_analyze module=assistant status=error kind={}",
                err.kind.as_str()
            );
            analyze_failure()
        }
    }
}

/// Parses a JSON analysis body and relays it.
pub fn handle_analyze_json<C>(client: &C, body: &str, today: NaiveDate) -> RelayResponse
where
    C: GenerativeClient + ?Sized,
{
    match serde_json::from_str::<AnalyzeRequest>(body) {
        Ok(request) => handle_analyze(client, request, today),
        Err(err) => {
            warn!(
                "event=assistant_analyze module=assistant status=error reason=invalid_body line={} column={}",
                err.line(),
                err.column()
            );
            analyze_failure()
        }
    }
}

fn chat_error_response(err: &AssistantError) -> RelayResponse {
    let (error, message) = match err.kind {
        AssistantErrorKind::RateLimited => (
            "Rate limit exceeded",
            "I'm getting a lot of requests right now. Please wait a moment and try again.",
        ),
        AssistantErrorKind::Unauthorized => (
            "Authentication failed",
            "The AI service rejected its credentials. Please check the API key configuration.",
        ),
        AssistantErrorKind::Unknown => (
            "Failed to get response from AI",
            "Failed to get response from AI. Please try again.",
        ),
    };
    RelayResponse::new(
        err.kind.http_status(),
        json!({ "error": error, "details": err.detail, "message": message }),
    )
}

/// Decodes a list record by record, skipping entries that do not parse.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    let total = raw.len();
    let records: Vec<T> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if records.len() < total {
        warn!(
            "event=assistant_analyze module=assistant status=partial reason=malformed_record skipped={}",
            total - records.len()
        );
    }
    Ok(records)
}

fn analyze_failure() -> RelayResponse {
    RelayResponse::new(
        500,
        json!({ "error": "Failed to analyze data", "analysis": ANALYSIS_FALLBACK }),
    )
}

fn invalid_body(err: &serde_json::Error) -> RelayResponse {
    warn!(
        "event=assistant_chat module=assistant status=error reason=invalid_body line={} column={}",
        err.line(),
        err.column()
    );
    RelayResponse::new(
        400,
        json!({
            "error": "Invalid request body",
            "details": err.to_string(),
            "message": "Message is required",
        }),
    )
}
