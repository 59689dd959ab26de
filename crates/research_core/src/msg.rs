#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the query input box.
    QueryChanged(String),
    /// User submitted the current query.
    QuerySubmitted,
    /// A repeating step timer fired.
    StepTimerFired { timer_id: crate::TimerId },
    /// The research call for a request settled.
    ///
    /// The error side carries the human-readable failure text.
    ResearchCompleted {
        request_id: crate::RequestId,
        result: Result<crate::ResearchResult, String>,
    },
}
