use research_core::{update, AppState, Effect, Msg, ResearchResult, StatusView, LOADING_STEPS};

fn loading_state() -> AppState {
    let (state, _) = update(AppState::new(), Msg::QueryChanged("q".to_string()));
    let (mut state, _) = update(state, Msg::QuerySubmitted);
    state.consume_dirty();
    state
}

fn tick(state: AppState, timer_id: u64) -> (AppState, Vec<Effect>) {
    update(state, Msg::StepTimerFired { timer_id })
}

#[test]
fn ticks_advance_the_displayed_label() {
    let state = loading_state();
    let (mut state, effects) = tick(state, 1);

    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.loading_step, Some(1));
    assert_eq!(view.loading_label, Some(LOADING_STEPS[1]));
}

#[test]
fn ticks_saturate_and_cancel_the_timer() {
    let n = LOADING_STEPS.len();
    let mut state = loading_state();
    let mut emitted = Vec::new();
    for _ in 0..n - 2 {
        let (next, effects) = tick(state, 1);
        emitted.extend(effects);
        state = next;
    }

    assert_eq!(emitted, vec![Effect::CancelStepTimer { timer_id: 1 }]);
    assert_eq!(state.view().loading_step, Some(n - 2));

    // Extra firings never reach the finishing label.
    let (mut state, effects) = tick(state, 1);
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let (mut state, _) = tick(state, 1);
    assert!(!state.consume_dirty());
    assert_eq!(state.view().loading_step, Some(n - 2));

    // The timer is already gone, so settling does not cancel it again.
    let (state, effects) = update(
        state,
        Msg::ResearchCompleted {
            request_id: 1,
            result: Ok(ResearchResult::default()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().status, StatusView::Succeeded);
}

#[test]
fn stale_timer_ticks_are_ignored() {
    let state = loading_state();
    let (state, _) = update(state, Msg::QuerySubmitted);
    let (mut state, effects) = tick(state, 1);

    assert!(effects.is_empty());
    assert_eq!(state.view().loading_step, Some(0));
    state.consume_dirty();

    let (mut state, _) = tick(state, 2);
    assert!(state.consume_dirty());
    assert_eq!(state.view().loading_step, Some(1));
}

#[test]
fn ticks_while_idle_are_ignored() {
    let (mut state, effects) = tick(AppState::new(), 1);

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state.view().loading_label, None);
}
