//! Segment summarization
//!
//! Formats a date bucket's transcript, sends it to the summarization
//! endpoint with a fixed instructional prompt, and degrades to a fixed
//! sentinel on any failure. One failed date never blocks other dates or
//! topics, and nothing is retried.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::conversation::Message;
use crate::error::Result;

/// Fixed sentinel recorded in place of a summary when the call fails
pub const SUMMARY_FAILURE_SENTINEL: &str = "要約エラー";

/// Fixed instructional prompt. Requests six labeled subsections with
/// indicative character lengths; the last two labels are the extraction
/// contract for the index page.
const PROMPT_HEADER: &str = "\
以下は株式銘柄に関する1日分の分析会話の記録です。
この内容をもとに、以下のフォーマットで要点を箇条書きで整理してください。

---

分析結果の要約（300字程度）：

短期的目線の分析（150字程度）：

中期的目線の分析（150字程度）：

長期的目線の分析（150字程度）：

最新の状況（40字程度）：

いつ買うべきか（40字程度）：

---

【会話記録】
";

/// Outcome of one summarization call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// The endpoint returned a summary
    Generated(String),
    /// The call failed; the sentinel is recorded instead
    Degraded { reason: String },
}

impl SummaryOutcome {
    /// The text written into the document section
    pub fn into_text(self) -> String {
        match self {
            SummaryOutcome::Generated(text) => text,
            SummaryOutcome::Degraded { .. } => SUMMARY_FAILURE_SENTINEL.to_string(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SummaryOutcome::Degraded { .. })
    }
}

/// Format a date bucket's transcript: `Q: ` for user messages, `A: ` for
/// everything else, joined with newlines.
pub fn format_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|message| {
            let prefix = if message.role.is_user() { "Q: " } else { "A: " };
            format!("{}{}", prefix, message.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The full prompt sent to the endpoint for one transcript
pub fn build_prompt(transcript: &str) -> String {
    format!("{}{}", PROMPT_HEADER, transcript)
}

/// External summarization boundary
pub trait Summarizer {
    /// Summarize one date's formatted transcript. Never fails the caller;
    /// failures are reported through [`SummaryOutcome::Degraded`].
    fn summarize(&self, transcript: &str) -> SummaryOutcome;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

// Response decoding is lenient: every level defaults so a shape change
// degrades instead of panicking.

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Synchronous client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    url: String,
    timeout: Duration,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Build a client from the run configuration. The API key is required
    /// here, at the point a call would actually be made.
    pub fn new(config: &ReportConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Ok(Self {
            url: format!("{}?key={}", config.endpoint, api_key),
            timeout: Duration::from_secs(config.timeout_seconds),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn call(&self, prompt: &str) -> std::result::Result<String, String> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };
        let payload =
            serde_json::to_string(&request).map_err(|e| format!("request encoding: {}", e))?;

        let response = ureq::post(&self.url)
            .set("Content-Type", "application/json")
            .timeout(self.timeout)
            .send_string(&payload);

        let body = match response {
            Ok(res) => res
                .into_string()
                .map_err(|e| format!("response read: {}", e))?,
            Err(ureq::Error::Status(code, _)) => return Err(format!("HTTP {}", code)),
            Err(ureq::Error::Transport(e)) => return Err(format!("transport: {}", e)),
        };

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| format!("response decoding: {}", e))?;

        parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.trim().to_string())
            .ok_or_else(|| "response has no candidate text".to_string())
    }
}

impl Summarizer for GeminiClient {
    fn summarize(&self, transcript: &str) -> SummaryOutcome {
        let prompt = build_prompt(transcript);
        match self.call(&prompt) {
            Ok(text) => SummaryOutcome::Generated(text),
            Err(reason) => {
                tracing::debug!(reason = %reason, "summarization call failed");
                SummaryOutcome::Degraded { reason }
            }
        }
    }
}
