use std::time::Duration;

use research_core::ResearchResult;
use research_logging::{research_debug, research_warn};
use serde::{Deserialize, Serialize};

use crate::ResearchError;

pub const DEFAULT_ENDPOINT: &str = "https://web-research-agent-nd8o.onrender.com/execute-research";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// `None` leaves the overall deadline to the service and transport.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait ResearchClient: Send + Sync {
    async fn execute(&self, query: &str) -> Result<ResearchResult, ResearchError>;
}

#[derive(Serialize)]
struct ResearchRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct ResearchEnvelope {
    result: ResearchPayload,
}

#[derive(Deserialize)]
struct ResearchPayload {
    content: String,
    sources: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestResearchClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestResearchClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ResearchError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ResearchError::Transport(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }
}

#[async_trait::async_trait]
impl ResearchClient for ReqwestResearchClient {
    async fn execute(&self, query: &str) -> Result<ResearchResult, ResearchError> {
        let response = self
            .client
            .post(&self.settings.endpoint)
            .json(&ResearchRequest { query })
            .send()
            .await
            .map_err(|err| ResearchError::Transport(err.to_string()))?;

        let status = response.status();
        research_debug!("POST {} -> {}", self.settings.endpoint, status);
        if !status.is_success() {
            return Err(ResearchError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| ResearchError::Transport(err.to_string()))?;
        let envelope: ResearchEnvelope = serde_json::from_slice(&body).map_err(|err| {
            research_warn!("Malformed research response ({} bytes): {}", body.len(), err);
            ResearchError::MalformedResponse(err.to_string())
        })?;

        Ok(ResearchResult {
            content: envelope.result.content,
            sources: envelope.result.sources,
        })
    }
}
