use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use stamp_core::model::{Motivation, MotivationRequest};

use crate::error::MotivationError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can write a motivation pair for a freshly collected stamp.
#[async_trait]
pub trait MotivationSource: Send + Sync {
    /// Produce a message pair for `request`.
    ///
    /// # Errors
    ///
    /// Returns `MotivationError` for any transport, status, or payload problem.
    async fn generate(&self, request: MotivationRequest) -> Result<Motivation, MotivationError>;
}

#[derive(Clone, Debug)]
pub struct MotivationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl MotivationConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("STAMP_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("STAMP_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("STAMP_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// OpenAI-compatible chat completion endpoint asked for a JSON object.
#[derive(Clone)]
pub struct HttpMotivationSource {
    client: Client,
    config: Option<MotivationConfig>,
}

impl HttpMotivationSource {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(MotivationConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<MotivationConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl MotivationSource for HttpMotivationSource {
    async fn generate(&self, request: MotivationRequest) -> Result<Motivation, MotivationError> {
        let config = self.config.as_ref().ok_or(MotivationError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(request),
            }],
            temperature: 0.9,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MotivationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(MotivationError::EmptyResponse)?;

        parse_motivation(&content)
    }
}

fn build_prompt(request: MotivationRequest) -> String {
    format!(
        "A visitor just collected stamp #{} out of {} on a loyalty stamp card. \
         Reply with a JSON object with two string fields: \"message\", one short, \
         enthusiastic sentence in Traditional Chinese (Taiwan); and \"encouragement\", \
         a very short \"did you know?\" fact about stamp collecting.",
        request.ordinal(),
        request.total
    )
}

fn parse_motivation(content: &str) -> Result<Motivation, MotivationError> {
    let payload: MotivationPayload = serde_json::from_str(content.trim())?;
    let message = payload.message.trim();
    let encouragement = payload.encouragement.trim();
    if message.is_empty() || encouragement.is_empty() {
        return Err(MotivationError::EmptyResponse);
    }
    Ok(Motivation::new(message, encouragement))
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MotivationPayload {
    message: String,
    encouragement: String,
}

/// Wraps a `MotivationSource` so that asking for a message always yields one.
#[derive(Clone)]
pub struct MotivationFetcher {
    source: Arc<dyn MotivationSource>,
    timeout: Duration,
}

impl MotivationFetcher {
    #[must_use]
    pub fn new(source: Arc<dyn MotivationSource>) -> Self {
        Self {
            source,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// HTTP source configured from `STAMP_AI_*`; `STAMP_AI_TIMEOUT_SECS` sets the timeout.
    #[must_use]
    pub fn from_env() -> Self {
        let timeout = env::var("STAMP_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        Self::new(Arc::new(HttpMotivationSource::from_env())).with_timeout(timeout)
    }

    /// A fetcher that never calls out and always answers with the fallback pair.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(Arc::new(HttpMotivationSource::new(None)))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Message pair for `request`; any failure resolves to `Motivation::fallback()`.
    pub async fn fetch(&self, request: MotivationRequest) -> Motivation {
        let result = match tokio::time::timeout(self.timeout, self.source.generate(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(MotivationError::Timeout(self.timeout)),
        };

        match result {
            Ok(motivation) => motivation,
            Err(MotivationError::Disabled) => {
                tracing::debug!("motivation endpoint not configured, using fallback");
                Motivation::fallback()
            }
            Err(err) => {
                tracing::warn!(
                    stamp_index = request.stamp_index,
                    error = %err,
                    "motivation fetch failed, using fallback"
                );
                Motivation::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Motivation);

    #[async_trait]
    impl MotivationSource for Fixed {
        async fn generate(&self, _: MotivationRequest) -> Result<Motivation, MotivationError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl MotivationSource for Failing {
        async fn generate(&self, _: MotivationRequest) -> Result<Motivation, MotivationError> {
            Err(MotivationError::EmptyResponse)
        }
    }

    struct Slow;

    #[async_trait]
    impl MotivationSource for Slow {
        async fn generate(&self, _: MotivationRequest) -> Result<Motivation, MotivationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Motivation::new("late", "too late"))
        }
    }

    fn request() -> MotivationRequest {
        MotivationRequest {
            stamp_index: 2,
            total: 6,
        }
    }

    #[tokio::test]
    async fn passes_through_generated_text() {
        let fetcher = MotivationFetcher::new(Arc::new(Fixed(Motivation::new("Go!", "Fact."))));
        assert_eq!(fetcher.fetch(request()).await, Motivation::new("Go!", "Fact."));
    }

    #[tokio::test]
    async fn failure_resolves_to_fallback() {
        let fetcher = MotivationFetcher::new(Arc::new(Failing));
        assert_eq!(fetcher.fetch(request()).await, Motivation::fallback());
    }

    #[tokio::test]
    async fn offline_fetcher_uses_fallback() {
        assert_eq!(
            MotivationFetcher::offline().fetch(request()).await,
            Motivation::fallback()
        );
    }

    #[tokio::test]
    async fn timeout_resolves_to_fallback() {
        let fetcher =
            MotivationFetcher::new(Arc::new(Slow)).with_timeout(Duration::from_millis(20));
        assert_eq!(fetcher.fetch(request()).await, Motivation::fallback());
    }

    #[test]
    fn parses_json_payload() {
        let parsed =
            parse_motivation(r#" {"message":" 加油！ ","encouragement":"Fact."} "#).unwrap();
        assert_eq!(parsed, Motivation::new("加油！", "Fact."));
    }

    #[test]
    fn rejects_malformed_or_blank_payloads() {
        assert!(matches!(
            parse_motivation("plain text"),
            Err(MotivationError::Malformed(_))
        ));
        assert!(matches!(
            parse_motivation(r#"{"message":"hi"}"#),
            Err(MotivationError::Malformed(_))
        ));
        assert!(matches!(
            parse_motivation(r#"{"message":" ","encouragement":"x"}"#),
            Err(MotivationError::EmptyResponse)
        ));
    }

    #[test]
    fn prompt_counts_from_one() {
        let prompt = build_prompt(request());
        assert!(prompt.contains("stamp #3 out of 6"), "{prompt}");
    }
}
