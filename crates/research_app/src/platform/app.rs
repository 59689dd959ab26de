use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use research_core::{update, AppState, AppViewModel, Effect, Msg, RequestState};
use research_engine::{EngineEvent, PulldownRenderer, ReportWriter};
use research_logging::{research_info, research_warn};

use super::config::AppConfig;
use super::effects::{map_event, EffectRunner};
use super::ui;

/// Everything the message loop reacts to.
pub(crate) enum AppEvent {
    Input(Msg),
    Engine(EngineEvent),
    InputClosed,
}

pub(crate) fn run(config: AppConfig) -> anyhow::Result<()> {
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(&config, event_tx.clone())?;
    let report = config
        .report_dir
        .clone()
        .map(|dir| ReportWriter::new(dir, Box::new(PulldownRenderer)));

    spawn_input_reader(event_tx);

    let mut session = Session::new(AppState::with_step_interval(config.step_interval()), report);
    // Unlocked handle: each write takes the lock briefly, so terminal
    // loggers on engine threads are never stalled by this loop.
    let mut out = io::stdout();
    writeln!(out, "{}", ui::render::PROMPT)?;

    while let Ok(event) = event_rx.recv() {
        let effects = session.handle(event, &mut out)?;
        runner.enqueue(effects);

        if session.is_finished() {
            break;
        }
    }

    research_info!("Research client exiting");
    Ok(())
}

/// Owns the core state on the message loop thread and turns events into
/// terminal output and effects.
pub(crate) struct Session {
    state: AppState,
    shown: AppViewModel,
    report: Option<ReportWriter>,
    input_closed: bool,
}

impl Session {
    pub(crate) fn new(state: AppState, report: Option<ReportWriter>) -> Self {
        let shown = state.view();
        Self {
            state,
            shown,
            report,
            input_closed: false,
        }
    }

    pub(crate) fn handle(
        &mut self,
        event: AppEvent,
        out: &mut impl Write,
    ) -> io::Result<Vec<Effect>> {
        let msg = match event {
            AppEvent::Input(msg) => msg,
            AppEvent::Engine(event) => map_event(event),
            AppEvent::InputClosed => {
                self.input_closed = true;
                return Ok(Vec::new());
            }
        };

        let (state, effects) = update(std::mem::take(&mut self.state), msg);
        self.state = state;

        if self.state.consume_dirty() {
            let view = self.state.view();
            for line in ui::render::render(&self.shown, &view) {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
            if ui::render::just_succeeded(&self.shown, &view) {
                self.write_report();
            }
            self.shown = view;
        }
        Ok(effects)
    }

    /// Input is exhausted and no answer is still on its way.
    pub(crate) fn is_finished(&self) -> bool {
        self.input_closed && !self.state.request().is_loading()
    }

    fn write_report(&self) {
        let (Some(report), Some(query), RequestState::Succeeded(result)) = (
            self.report.as_ref(),
            self.state.submitted_query(),
            self.state.request(),
        ) else {
            return;
        };
        match report.write(query, result) {
            Ok(path) => research_info!("Wrote report to {:?}", path),
            Err(err) => research_warn!("Failed to write report: {}", err),
        }
    }
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let query = line.trim();
            if query == ui::render::QUIT_COMMAND {
                break;
            }
            if query.is_empty() {
                continue;
            }
            let submitted = tx
                .send(AppEvent::Input(Msg::QueryChanged(query.to_string())))
                .and_then(|()| tx.send(AppEvent::Input(Msg::QuerySubmitted)));
            if submitted.is_err() {
                return;
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

#[cfg(test)]
mod tests {
    use std::fs;

    use research_core::{AppState, Effect, Msg, RequestState, ResearchResult};
    use research_engine::{EngineEvent, PulldownRenderer, ReportWriter, ResearchError, REPORT_FILENAME};
    use tempfile::TempDir;

    use super::{AppEvent, Session};

    fn submit(session: &mut Session, out: &mut Vec<u8>, query: &str) -> Vec<Effect> {
        session
            .handle(AppEvent::Input(Msg::QueryChanged(query.to_string())), out)
            .unwrap();
        session.handle(AppEvent::Input(Msg::QuerySubmitted), out).unwrap()
    }

    fn completed(request_id: u64, result: Result<ResearchResult, ResearchError>) -> AppEvent {
        AppEvent::Engine(EngineEvent::ResearchCompleted { request_id, result })
    }

    #[test]
    fn failed_request_settles_and_prints_error() {
        let mut session = Session::new(AppState::new(), None);
        let mut out = Vec::new();
        submit(&mut session, &mut out, "hello");

        let effects = session
            .handle(completed(1, Err(ResearchError::HttpStatus(500))), &mut out)
            .unwrap();

        assert_eq!(effects, vec![Effect::CancelStepTimer { timer_id: 1 }]);
        assert_eq!(
            session.state.request(),
            &RequestState::Failed("Server error: 500".to_string())
        );
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Error: Server error: 500"), "{printed}");
    }

    #[test]
    fn transport_failure_text_reaches_the_terminal() {
        let mut session = Session::new(AppState::new(), None);
        let mut out = Vec::new();
        submit(&mut session, &mut out, "hello");

        session
            .handle(
                completed(1, Err(ResearchError::Transport("connection refused".to_string()))),
                &mut out,
            )
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Error: connection refused"), "{printed}");
    }

    #[test]
    fn report_is_titled_with_the_submitted_query() {
        let temp = TempDir::new().unwrap();
        let report = ReportWriter::new(temp.path().to_path_buf(), Box::new(PulldownRenderer));
        let mut session = Session::new(AppState::new(), Some(report));
        let mut out = Vec::new();
        submit(&mut session, &mut out, "first");

        // The next line is typed before the first answer lands.
        session
            .handle(AppEvent::Input(Msg::QueryChanged("second".to_string())), &mut out)
            .unwrap();
        session
            .handle(
                completed(
                    1,
                    Ok(ResearchResult {
                        content: "# Hi".to_string(),
                        sources: vec!["https://a.test".to_string()],
                    }),
                ),
                &mut out,
            )
            .unwrap();

        let page = fs::read_to_string(temp.path().join(REPORT_FILENAME)).unwrap();
        assert!(page.contains("<title>first</title>"), "{page}");
        assert!(page.contains("<h1>Hi</h1>"), "{page}");
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Hi\n==\n"), "{printed}");
        assert!(!printed.contains("# Hi"), "{printed}");
    }

    #[test]
    fn step_ticks_print_progress_labels() {
        let mut session = Session::new(AppState::new(), None);
        let mut out = Vec::new();
        submit(&mut session, &mut out, "hello");

        session
            .handle(
                AppEvent::Engine(EngineEvent::StepTimerFired { timer_id: 1 }),
                &mut out,
            )
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains(research_core::LOADING_STEPS[0]), "{printed}");
        assert!(printed.contains(research_core::LOADING_STEPS[1]), "{printed}");
    }

    #[test]
    fn closed_input_waits_for_the_answer() {
        let mut session = Session::new(AppState::new(), None);
        let mut out = Vec::new();
        submit(&mut session, &mut out, "hello");

        session.handle(AppEvent::InputClosed, &mut out).unwrap();
        assert!(!session.is_finished());

        session
            .handle(completed(1, Ok(ResearchResult::default())), &mut out)
            .unwrap();
        assert!(session.is_finished());
    }
}
