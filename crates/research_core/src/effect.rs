use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the query to the research service.
    ExecuteResearch {
        request_id: crate::RequestId,
        query: String,
    },
    /// Start a repeating timer that reports `Msg::StepTimerFired` every `period`.
    ArmStepTimer {
        timer_id: crate::TimerId,
        period: Duration,
    },
    /// Tear down a previously armed timer.
    CancelStepTimer { timer_id: crate::TimerId },
}
