//! Gemini generation client
//!
//! Builds the instructional prompt, calls the Gemini generateContent API
//! once (no streaming, no retry on malformed output), and parses the reply
//! into a typed [`GenerationResult`] with field-presence and range checks
//! before anything is persisted.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, StudyError};

/// Hard cap on the extracted-text characters embedded in the prompt
pub const MAX_PROMPT_CHARS: usize = 20_000;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A flashcard draft, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FlashcardDraft {
    pub front: String,
    pub back: String,
}

/// A quiz-question draft, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizDraft {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

/// Structured generation output, consumed once by the persister
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationResult {
    pub summary: String,
    pub flashcards: Vec<FlashcardDraft>,
    pub quizzes: Vec<QuizDraft>,
}

/// Turns extracted document text into structured study content
#[async_trait]
pub trait StudyGenerator: Send + Sync {
    async fn generate(&self, text: &str) -> Result<GenerationResult>;
}

/// Gemini client using the generateContent REST API
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client for the given model
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| StudyError::Generation(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.model)
    }
}

#[derive(serde::Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(serde::Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(serde::Serialize)]
struct Part {
    text: String,
}

#[derive(serde::Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

#[async_trait]
impl StudyGenerator for GeminiClient {
    async fn generate(&self, text: &str) -> Result<GenerationResult> {
        info!("Requesting study content from {}", self.model);

        let prompt = build_prompt(text);
        debug!("Prompt length: {} chars", prompt.len());

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 4096,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| StudyError::Generation(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StudyError::Generation(format!(
                "Gemini generation failed ({}): {}",
                status, body
            )));
        }

        let gen_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| StudyError::Generation(format!("Failed to parse Gemini response: {}", e)))?;

        let reply = gen_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| StudyError::Generation("No text in Gemini response".to_string()))?;

        debug!("Gemini reply length: {} chars", reply.len());
        parse_generation(&reply)
    }
}

/// Build the fixed instructional prompt around the (truncated) document text
fn build_prompt(text: &str) -> String {
    format!(
        r#"Act as an expert teacher. Analyze the following text extracted from an educational PDF:

--- BEGIN TEXT ---
{text}
--- END TEXT ---

(The text may be truncated.)

Your task is to generate study content in strict JSON format.
Generate 2 things:
1. "flashcards": a list of 5 key concepts (front: question/concept, back: definition/answer).
2. "quizzes": a list of 3 multiple-choice questions.

The JSON format must be exactly:
{{
    "summary": "A brief two-line summary of the document.",
    "flashcards": [
        {{"front": "Question 1", "back": "Answer 1"}}
    ],
    "quizzes": [
        {{
            "question": "Question?",
            "options": ["Option A", "Option B", "Option C", "Option D"],
            "correct_index": 0,
            "explanation": "Why it is correct."
        }}
    ]
}}
Respond ONLY with the JSON."#,
        text = truncate_chars(text, MAX_PROMPT_CHARS)
    )
}

/// Parse a model reply into a typed result
///
/// Strips any markdown code fences first, then deserializes and validates.
/// A missing required field or an out-of-range `correct_index` is a parse
/// failure, never a partial result.
pub fn parse_generation(reply: &str) -> Result<GenerationResult> {
    let clean = strip_code_fences(reply);

    let result: GenerationResult = serde_json::from_str(&clean)
        .map_err(|e| StudyError::Generation(format!("Malformed generation response: {}", e)))?;

    validate(&result)?;
    Ok(result)
}

fn validate(result: &GenerationResult) -> Result<()> {
    for (i, quiz) in result.quizzes.iter().enumerate() {
        if quiz.options.is_empty() {
            return Err(StudyError::Generation(format!(
                "Quiz {} has no answer options",
                i
            )));
        }
        if quiz.correct_index >= quiz.options.len() {
            return Err(StudyError::Generation(format!(
                "Quiz {} correct_index {} out of range for {} options",
                i,
                quiz.correct_index,
                quiz.options.len()
            )));
        }
    }
    Ok(())
}

/// Strip the ```json fences the model sometimes wraps around its reply
fn strip_code_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "").trim().to_string()
}

/// Take the first `max_chars` characters of `s`
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
