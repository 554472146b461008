use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Serialize, Debug, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatCompletionRequest {
    pub fn system_prompt(model: &str, temperature: f32, prompt: &str) -> Self {
        Self {
            model: model.into(),
            temperature,
            messages: vec![ChatMessage {
                role: "system".into(),
                content: prompt.into(),
            }],
        }
    }
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ChatMessageResponse,
}

#[derive(Deserialize)]
pub struct ChatMessageResponse {
    pub content: String,
}

/// Generated text of the first choice, if the body is a usable completion.
pub fn completion_text(body: &str) -> Option<String> {
    let resp: ChatCompletionResponse = serde_json::from_str(body).ok()?;
    resp.choices.into_iter().next().map(|c| c.message.content)
}

/// Status and body of one backend reply, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Timeout,
    Network(String),
}

/// One network round trip to the generation backend.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatCompletionRequest) -> Result<RawReply, TransportError>;
}

/// OpenAI-compatible `/v1/chat/completions` endpoint (LM Studio, OpenAI, ...).
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatCompletionRequest) -> Result<RawReply, TransportError> {
        let mut builder = self.client.post(&self.url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let resp = builder.send().await.map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(classify)?;

        Ok(RawReply { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}
