use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::engine::llm_client::{
    completion_text, ChatCompletionRequest, ChatTransport, RawReply, TransportError,
};
use crate::engine::protocol::UpstreamFailure;

/// Upper bound on how much of a backend body is kept in diagnostics.
const DETAIL_LIMIT: usize = 2000;

/// What a single attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Reply(RawReply),
    TimedOut,
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryState {
    /// About to issue attempt number `attempt` (1-based).
    Attempting { attempt: u32 },
    BackoffWait { attempt: u32, delay: Duration },
    Succeeded(String),
    Failed(UpstreamFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Linear backoff after the given failed attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    pub fn is_retryable_status(status: u16) -> bool {
        status == 429 || (500..600).contains(&status)
    }

    /// State that follows attempt number `attempt` ending with `outcome`.
    pub fn next(&self, attempt: u32, outcome: AttemptOutcome) -> RetryState {
        let attempts_left = attempt < self.max_attempts();

        match outcome {
            AttemptOutcome::Reply(RawReply { status, body }) if (200..300).contains(&status) => {
                match completion_text(&body) {
                    Some(text) => RetryState::Succeeded(text),
                    None => RetryState::Failed(UpstreamFailure::MalformedBody {
                        status,
                        detail: truncate(&body),
                    }),
                }
            }
            AttemptOutcome::Reply(RawReply { status, .. })
                if attempts_left && Self::is_retryable_status(status) =>
            {
                self.wait(attempt)
            }
            AttemptOutcome::Reply(RawReply { status, body }) => {
                RetryState::Failed(UpstreamFailure::Status {
                    status,
                    body: truncate(&body),
                })
            }
            AttemptOutcome::TimedOut if attempts_left => self.wait(attempt),
            AttemptOutcome::TimedOut => RetryState::Failed(UpstreamFailure::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
            AttemptOutcome::Network(_) if attempts_left => self.wait(attempt),
            AttemptOutcome::Network(detail) => RetryState::Failed(UpstreamFailure::Network(detail)),
        }
    }

    fn wait(&self, attempt: u32) -> RetryState {
        RetryState::BackoffWait {
            attempt,
            delay: self.backoff(attempt),
        }
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(DETAIL_LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Clock used between attempts, swapped out in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Calls the backend with a hard per-attempt timeout and bounded retries.
pub struct UpstreamInvoker {
    transport: Arc<dyn ChatTransport>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    model: String,
    temperature: f32,
}

impl UpstreamInvoker {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        sleeper: Arc<dyn Sleeper>,
        policy: RetryPolicy,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            transport,
            sleeper,
            policy,
            model: model.into(),
            temperature,
        }
    }

    /// Generated text on success, the last failure once retries are spent.
    pub async fn invoke(&self, prompt: &str) -> Result<String, UpstreamFailure> {
        let request = ChatCompletionRequest::system_prompt(&self.model, self.temperature, prompt);
        let mut state = RetryState::Attempting { attempt: 1 };

        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    debug!(attempt, model = %self.model, "calling generation backend");
                    let outcome = self.attempt(&request).await;
                    self.policy.next(attempt, outcome)
                }
                RetryState::BackoffWait { attempt, delay } => {
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "backend attempt failed, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                    RetryState::Attempting {
                        attempt: attempt + 1,
                    }
                }
                RetryState::Succeeded(text) => return Ok(text),
                RetryState::Failed(failure) => return Err(failure),
            };
        }
    }

    async fn attempt(&self, request: &ChatCompletionRequest) -> AttemptOutcome {
        match tokio::time::timeout(self.policy.timeout, self.transport.send(request)).await {
            Ok(Ok(reply)) => AttemptOutcome::Reply(reply),
            Ok(Err(TransportError::Timeout)) | Err(_) => AttemptOutcome::TimedOut,
            Ok(Err(TransportError::Network(detail))) => AttemptOutcome::Network(detail),
        }
    }
}
