//! Research engine: HTTP client, step timers, and answer rendering.
mod client;
mod engine;
mod render;
mod report;
mod timer;
mod types;

pub use client::{ClientSettings, ReqwestResearchClient, ResearchClient, DEFAULT_ENDPOINT};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use render::{render_result_html, render_terminal_lines, MarkdownRenderer, PulldownRenderer};
pub use report::{ReportError, ReportWriter, REPORT_FILENAME};
pub use types::{EngineError, EngineEvent, ResearchError};
