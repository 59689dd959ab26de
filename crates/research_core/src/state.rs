use std::time::Duration;

use crate::stepper::{ProgressStepper, STEP_INTERVAL};
use crate::view_model::{AppViewModel, StatusView};

pub type RequestId = u64;
pub type TimerId = u64;

/// Answer returned by the research service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResearchResult {
    /// Markdown body.
    pub content: String,
    /// Source URLs in the order the service returned them.
    pub sources: Vec<String>,
}

/// The single source of truth for the current or most recent submission.
///
/// The progress stepper only exists while a request is loading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        request_id: RequestId,
        stepper: ProgressStepper,
    },
    Succeeded(ResearchResult),
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    query_input: String,
    submitted_query: Option<String>,
    request: RequestState,
    step_interval: Duration,
    last_request_id: RequestId,
    last_timer_id: TimerId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_step_interval(STEP_INTERVAL)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step_interval(step_interval: Duration) -> Self {
        Self {
            query_input: String::new(),
            submitted_query: None,
            request: RequestState::Idle,
            step_interval,
            last_request_id: 0,
            last_timer_id: 0,
            dirty: false,
        }
    }

    pub fn request(&self) -> &RequestState {
        &self.request
    }

    pub fn query_input(&self) -> &str {
        &self.query_input
    }

    /// The query behind the current request state, which may differ from
    /// the input box once the user starts typing the next one.
    pub fn submitted_query(&self) -> Option<&str> {
        self.submitted_query.as_deref()
    }

    pub fn step_interval(&self) -> Duration {
        self.step_interval
    }

    pub fn view(&self) -> AppViewModel {
        let mut view = AppViewModel {
            query: self.query_input.clone(),
            submitted_query: self.submitted_query.clone(),
            dirty: self.dirty,
            ..AppViewModel::default()
        };
        match &self.request {
            RequestState::Idle => {}
            RequestState::Loading { stepper, .. } => {
                view.status = StatusView::Loading;
                view.loading_step = Some(stepper.step());
                view.loading_label = Some(stepper.label());
            }
            RequestState::Succeeded(result) => {
                view.status = StatusView::Succeeded;
                view.content = Some(result.content.clone());
                view.sources = result.sources.clone();
            }
            RequestState::Failed(message) => {
                view.status = StatusView::Failed;
                view.error = Some(message.clone());
            }
        }
        view
    }

    /// Returns whether the state changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_query_input(&mut self, text: String) {
        if self.query_input != text {
            self.query_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_submitted_query(&mut self, query: String) {
        self.submitted_query = Some(query);
    }

    pub(crate) fn request_mut(&mut self) -> &mut RequestState {
        &mut self.request
    }

    pub(crate) fn set_request(&mut self, request: RequestState) {
        self.request = request;
        self.mark_dirty();
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    pub(crate) fn next_timer_id(&mut self) -> TimerId {
        self.last_timer_id += 1;
        self.last_timer_id
    }
}
