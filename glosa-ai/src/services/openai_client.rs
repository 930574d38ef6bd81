//! OpenAI-compatible API client
//!
//! Implements all three collaborators against the `/chat/completions` and
//! `/audio/speech` endpoints of an OpenAI-compatible API.

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{prompts, ChatCompleter, CollaboratorError, SpeechSynthesizer, TextGenerator};
use crate::models::{Language, Persona, SentenceData, Vocabulary};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TTS_MODEL: &str = "gpt-4o-mini-tts";
pub const DEFAULT_TTS_VOICE: &str = "coral";
const USER_AGENT: &str = concat!("glosa-ai/", env!("CARGO_PKG_VERSION"));

const VOCABULARY_MAX_TOKENS: u32 = 500;
const SENTENCE_MAX_TOKENS: u32 = 300;
const CHAT_MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;

/// Connection and model settings
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub request_timeout: Duration,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tts_voice: DEFAULT_TTS_VOICE.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    instructions: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// JSON object requested by the vocabulary prompt
#[derive(Debug, Deserialize)]
struct VocabularyReply {
    #[serde(alias = "單字清單")]
    words: Vec<String>,
    #[serde(alias = "單字中文意思")]
    meanings: Vec<String>,
}

/// JSON object requested by the sentence prompt
#[derive(Debug, Deserialize)]
struct SentenceReply {
    #[serde(alias = "例句")]
    example: String,
    #[serde(alias = "例句中文意思")]
    translation: String,
}

/// OpenAI-compatible API client
pub struct OpenAiClient {
    http_client: reqwest::Client,
    settings: OpenAiSettings,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings) -> Result<Self, CollaboratorError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| CollaboratorError::Unreachable(e.to_string()))?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    fn api_key(&self) -> Result<&str, CollaboratorError> {
        self.settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CollaboratorError::NotConfigured("OpenAI API key is not set".to_string())
            })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    /// POST a JSON body and return the response if the status is a success
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, CollaboratorError> {
        let api_key = self.api_key()?;
        let url = self.endpoint(path);

        tracing::debug!(url = %url, "Calling OpenAI API");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| CollaboratorError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }

        Ok(response)
    }

    /// Run one chat completion and return the first choice's content
    async fn chat_completion(
        &self,
        system_prompt: String,
        user_prompt: String,
        max_tokens: u32,
        json_reply: bool,
    ) -> Result<String, CollaboratorError> {
        let request = ChatCompletionRequest {
            model: &self.settings.chat_model,
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: system_prompt,
                },
                RequestMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens,
            temperature: TEMPERATURE,
            response_format: json_reply.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response: ChatCompletionResponse = self
            .post_json("chat/completions", &request)
            .await?
            .json()
            .await
            .map_err(|e| CollaboratorError::Format(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CollaboratorError::Format("completion contained no reply".to_string()))
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate_vocabulary(
        &self,
        keyword: &str,
        language: &Language,
        count: usize,
    ) -> Result<Vocabulary, CollaboratorError> {
        let content = self
            .chat_completion(
                prompts::vocabulary_system_prompt(language, count),
                prompts::vocabulary_user_prompt(keyword),
                VOCABULARY_MAX_TOKENS,
                true,
            )
            .await?;

        let reply: VocabularyReply = parse_json_reply(&content)?;

        tracing::info!(
            keyword = %keyword,
            language = %language.code,
            words = reply.words.len(),
            "Vocabulary generated"
        );

        Ok(Vocabulary {
            words: reply.words,
            meanings: reply.meanings,
        })
    }

    async fn generate_sentence(
        &self,
        word: &str,
        language: &Language,
    ) -> Result<SentenceData, CollaboratorError> {
        let content = self
            .chat_completion(
                prompts::sentence_system_prompt(language),
                prompts::sentence_user_prompt(word),
                SENTENCE_MAX_TOKENS,
                true,
            )
            .await?;

        let reply: SentenceReply = parse_json_reply(&content)?;
        if reply.example.trim().is_empty() || reply.translation.trim().is_empty() {
            return Err(CollaboratorError::Format(
                "sentence reply has an empty field".to_string(),
            ));
        }

        Ok(SentenceData {
            example: reply.example,
            translation: reply.translation,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiClient {
    async fn synthesize(
        &self,
        text: &str,
        language_code: &str,
    ) -> Result<String, CollaboratorError> {
        let request = SpeechRequest {
            model: &self.settings.tts_model,
            voice: &self.settings.tts_voice,
            input: text,
            instructions: prompts::speech_instructions(language_code),
        };

        let bytes = self
            .post_json("audio/speech", &request)
            .await?
            .bytes()
            .await
            .map_err(|e| CollaboratorError::Unreachable(e.to_string()))?;

        if bytes.is_empty() {
            return Err(CollaboratorError::Format("missing audio".to_string()));
        }

        tracing::debug!(bytes = bytes.len(), language = %language_code, "Speech synthesized");

        Ok(base64::engine::general_purpose::STANDARD.encode(&bytes))
    }
}

#[async_trait]
impl ChatCompleter for OpenAiClient {
    async fn complete(&self, message: &str, persona: &str) -> Result<String, CollaboratorError> {
        let persona = Persona::parse(persona)
            .ok_or_else(|| CollaboratorError::Rejected("invalid persona selection".to_string()))?;

        self.chat_completion(
            prompts::persona_system_prompt(persona).to_string(),
            message.to_string(),
            CHAT_MAX_TOKENS,
            false,
        )
        .await
    }
}

/// Map a non-success status and its body into a collaborator error
fn status_error(status: u16, body: &str) -> CollaboratorError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    CollaboratorError::Status { status, message }
}

/// Slice out the outermost `{...}` of a model reply
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(&raw[start..=end])
}

fn parse_json_reply<T: DeserializeOwned>(content: &str) -> Result<T, CollaboratorError> {
    let json = extract_json_object(content)
        .ok_or_else(|| CollaboratorError::Format("reply is not a JSON object".to_string()))?;
    serde_json::from_str(json).map_err(|e| CollaboratorError::Format(e.to_string()))
}
