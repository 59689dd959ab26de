use std::sync::{mpsc, Arc};

use research_core::{Effect, Msg};
use research_engine::{EngineError, EngineEvent, EngineHandle, EventSink};
use research_logging::{research_debug, research_info, research_warn};

use super::app::AppEvent;
use super::config::AppConfig;

pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(config: &AppConfig, tx: mpsc::Sender<AppEvent>) -> Result<Self, EngineError> {
        let sink = Arc::new(MsgSink { tx });
        let engine = EngineHandle::new(config.client_settings(), sink)?;
        Ok(Self { engine })
    }

    pub(crate) fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ExecuteResearch { request_id, query } => {
                    research_info!(
                        "ExecuteResearch request_id={} query_len={}",
                        request_id,
                        query.len()
                    );
                    self.engine.execute(request_id, query);
                }
                Effect::ArmStepTimer { timer_id, period } => {
                    research_debug!("ArmStepTimer timer_id={} period={:?}", timer_id, period);
                    self.engine.arm_timer(timer_id, period);
                }
                Effect::CancelStepTimer { timer_id } => {
                    research_debug!("CancelStepTimer timer_id={}", timer_id);
                    self.engine.cancel_timer(timer_id);
                }
            }
        }
    }
}

/// Forwards engine events to the message loop untouched. Runs on engine
/// threads, so it must not log or otherwise touch the terminal.
struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Engine(event));
    }
}

/// Converts an engine event into a core message. Called on the message loop thread.
pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StepTimerFired { timer_id } => Msg::StepTimerFired { timer_id },
        EngineEvent::ResearchCompleted { request_id, result } => Msg::ResearchCompleted {
            request_id,
            result: result.map_err(|err| {
                if err.is_transport() {
                    research_warn!("Request {} transport failure: {}", request_id, err);
                } else {
                    research_warn!("Request {} malformed response: {}", request_id, err);
                }
                err.to_string()
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use research_core::{Msg, ResearchResult};
    use research_engine::{EngineEvent, ResearchError};

    use super::map_event;

    #[test]
    fn status_failure_becomes_display_text() {
        let msg = map_event(EngineEvent::ResearchCompleted {
            request_id: 3,
            result: Err(ResearchError::HttpStatus(500)),
        });
        assert_eq!(
            msg,
            Msg::ResearchCompleted {
                request_id: 3,
                result: Err("Server error: 500".to_string()),
            }
        );
    }

    #[test]
    fn transport_failure_text_is_verbatim() {
        let msg = map_event(EngineEvent::ResearchCompleted {
            request_id: 1,
            result: Err(ResearchError::Transport("connection refused".to_string())),
        });
        assert_eq!(
            msg,
            Msg::ResearchCompleted {
                request_id: 1,
                result: Err("connection refused".to_string()),
            }
        );
    }

    #[test]
    fn success_and_ticks_pass_through() {
        let result = ResearchResult {
            content: "body".to_string(),
            sources: vec!["https://a.test".to_string()],
        };
        assert_eq!(
            map_event(EngineEvent::ResearchCompleted {
                request_id: 2,
                result: Ok(result.clone()),
            }),
            Msg::ResearchCompleted {
                request_id: 2,
                result: Ok(result),
            }
        );
        assert_eq!(
            map_event(EngineEvent::StepTimerFired { timer_id: 5 }),
            Msg::StepTimerFired { timer_id: 5 }
        );
    }
}
