use thiserror::Error;

/// Terminal failure of the upstream invoker, after retries are spent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamFailure {
    /// Last non-2xx reply from the backend.
    #[error("backend returned HTTP {status}")]
    Status { status: u16, body: String },
    /// The attempt did not finish inside the configured timeout.
    #[error("backend did not answer within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    /// Connection-level failure before any status was seen.
    #[error("backend unreachable: {0}")]
    Network(String),
    /// 2xx reply whose body is not a usable completion.
    #[error("backend returned HTTP {status} with an unusable body")]
    MalformedBody { status: u16, detail: String },
}

/// Failure classes surfaced by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller data is structurally invalid.
    #[error("{0}")]
    Request(String),

    #[error("Upstream error: {0}")]
    Upstream(UpstreamFailure),

    /// The backend answered but its payload breaks the contract.
    #[error("{message}")]
    Contract { message: String, raw: String },

    #[error("{0}")]
    Internal(String),
}

impl EngineError {
    pub fn contract(message: impl Into<String>, raw: &str) -> Self {
        EngineError::Contract {
            message: message.into(),
            raw: raw.to_string(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
