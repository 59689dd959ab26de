//! Research core: pure request-lifecycle state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod stepper;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, RequestId, RequestState, ResearchResult, TimerId};
pub use stepper::{ProgressStepper, TickOutcome, LOADING_STEPS, STEP_INTERVAL};
pub use update::update;
pub use view_model::{AppViewModel, StatusView};
