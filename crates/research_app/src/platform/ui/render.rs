use research_core::{AppViewModel, StatusView};
use research_engine::render_terminal_lines;

pub(crate) const PROMPT: &str = "Enter a query (:q to quit)";
pub(crate) const QUIT_COMMAND: &str = ":q";

/// Terminal lines to print when moving from the `shown` view to `view`.
///
/// Only changes are printed: a new progress label, a fresh answer, or a
/// fresh error.
pub(crate) fn render(shown: &AppViewModel, view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    match view.status {
        StatusView::Idle => {}
        StatusView::Loading => {
            let restarted = shown.status != StatusView::Loading;
            if restarted || shown.loading_label != view.loading_label {
                if let Some(label) = view.loading_label {
                    lines.push(format!("  {label}"));
                }
            }
        }
        StatusView::Succeeded => {
            if just_succeeded(shown, view) {
                if let Some(content) = view.content.as_deref() {
                    lines.push(String::new());
                    lines.extend(render_terminal_lines(content));
                }
                lines.push(String::new());
                lines.push("Sources:".to_string());
                for (idx, source) in view.sources.iter().enumerate() {
                    lines.push(format!("  {}. {}", idx + 1, source));
                }
                lines.push(String::new());
                lines.push(PROMPT.to_string());
            }
        }
        StatusView::Failed => {
            if shown.status != StatusView::Failed || shown.error != view.error {
                if let Some(error) = view.error.as_deref() {
                    lines.push(format!("Error: {error}"));
                }
                lines.push(PROMPT.to_string());
            }
        }
    }
    lines
}

pub(crate) fn just_succeeded(shown: &AppViewModel, view: &AppViewModel) -> bool {
    view.status == StatusView::Succeeded && shown.status != StatusView::Succeeded
}
