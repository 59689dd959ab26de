use research_core::{RequestId, ResearchResult, TimerId};
use thiserror::Error;

/// Why a research call did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResearchError {
    /// The request never got a response; carries the transport's own message.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("Server error: {0}")]
    HttpStatus(u16),
    /// 2xx, but the body is not `{ "result": { "content", "sources" } }`.
    #[error("{0}")]
    MalformedResponse(String),
}

impl ResearchError {
    /// True for failures that happened before or during transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, ResearchError::Transport(_) | ResearchError::HttpStatus(_))
    }
}

/// Failure to bring the engine up.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build research client: {0}")]
    Client(#[from] ResearchError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ResearchCompleted {
        request_id: RequestId,
        result: Result<ResearchResult, ResearchError>,
    },
    StepTimerFired {
        timer_id: TimerId,
    },
}
