use research_logging::{research_debug, research_info, research_warn};

use crate::{AppState, Effect, Msg, ProgressStepper, RequestState, TickOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(text) => {
            state.set_query_input(text);
            Vec::new()
        }
        Msg::QuerySubmitted => submit(&mut state),
        Msg::StepTimerFired { timer_id } => {
            let RequestState::Loading { stepper, .. } = state.request_mut() else {
                research_debug!("Dropping tick from timer_id={} while not loading", timer_id);
                return (state, Vec::new());
            };
            match stepper.tick(timer_id) {
                TickOutcome::Ignored => Vec::new(),
                TickOutcome::Advanced => {
                    state.mark_dirty();
                    Vec::new()
                }
                TickOutcome::Saturated(cancel) => {
                    state.mark_dirty();
                    vec![cancel]
                }
            }
        }
        Msg::ResearchCompleted { request_id, result } => {
            let RequestState::Loading {
                request_id: current,
                stepper,
                ..
            } = state.request_mut()
            else {
                research_debug!(
                    "Discarding completion for request {} while not loading",
                    request_id
                );
                return (state, Vec::new());
            };
            if *current != request_id {
                research_debug!(
                    "Discarding stale completion for request {} (current {})",
                    request_id,
                    current
                );
                return (state, Vec::new());
            }

            let effects: Vec<Effect> = stepper.stop().into_iter().collect();
            let next = match result {
                Ok(result) => {
                    research_info!(
                        "Request {} succeeded content_len={} sources={}",
                        request_id,
                        result.content.len(),
                        result.sources.len()
                    );
                    RequestState::Succeeded(result)
                }
                Err(message) => {
                    research_warn!("Request {} failed: {}", request_id, message);
                    RequestState::Failed(message)
                }
            };
            state.set_request(next);
            effects
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    let query = state.query_input().trim().to_owned();
    if query.is_empty() {
        return Vec::new();
    }

    let mut effects = Vec::with_capacity(3);
    if let RequestState::Loading {
        request_id,
        stepper,
        ..
    } = state.request_mut()
    {
        // Last submission wins; the superseded response is dropped on arrival.
        research_info!("Superseding in-flight request {}", request_id);
        effects.extend(stepper.stop());
    }

    let request_id = state.next_request_id();
    let timer_id = state.next_timer_id();
    let mut stepper = ProgressStepper::new();
    effects.extend(stepper.start(timer_id, state.step_interval()));
    research_info!("Submitting request {} query_len={}", request_id, query.len());

    state.set_submitted_query(query.clone());
    state.set_request(RequestState::Loading {
        request_id,
        stepper,
    });
    effects.push(Effect::ExecuteResearch { request_id, query });
    effects
}
