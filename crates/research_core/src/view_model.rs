#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusView {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub query: String,
    pub submitted_query: Option<String>,
    pub status: StatusView,
    pub loading_step: Option<usize>,
    pub loading_label: Option<&'static str>,
    pub content: Option<String>,
    pub sources: Vec<String>,
    pub error: Option<String>,
    pub dirty: bool,
}
