use std::fmt::{self, Write as _};

use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use pulldown_cmark_escape::{escape_href, escape_html};
use research_core::ResearchResult;

pub trait MarkdownRenderer: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

fn gfm_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// CommonMark with the GitHub-flavored extensions turned on.
#[derive(Debug, Default, Clone, Copy)]
pub struct PulldownRenderer;

impl MarkdownRenderer for PulldownRenderer {
    fn to_html(&self, markdown: &str) -> String {
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(markdown, gfm_options()));
        out
    }
}

/// Renders the answer body followed by a "Sources" section listing every
/// source link in received order.
pub fn render_result_html(renderer: &dyn MarkdownRenderer, result: &ResearchResult) -> String {
    let mut out = renderer.to_html(&result.content);
    // Writing into a String cannot fail.
    let _ = write_sources(&mut out, &result.sources);
    out
}

fn write_sources(out: &mut String, sources: &[String]) -> fmt::Result {
    out.push_str("<div class=\"sources\">\n<h2>Sources</h2>\n<ul>\n");
    for source in sources {
        out.push_str("<li><a href=\"");
        escape_href(&mut *out, source)?;
        out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
        escape_html(&mut *out, source)?;
        out.push_str("</a></li>\n");
    }
    out.write_str("</ul>\n</div>\n")
}

/// Lays markdown out as plain terminal lines: headings are underlined,
/// list items get bullets or numbers, code blocks are indented and link
/// targets follow their text.
pub fn render_terminal_lines(markdown: &str) -> Vec<String> {
    let mut text = TerminalText::default();
    for event in Parser::new_ext(markdown, gfm_options()) {
        text.push(event);
    }
    text.finish()
}

#[derive(Default)]
struct TerminalText {
    lines: Vec<String>,
    line: String,
    // One entry per open list; `Some(n)` is the next number of an ordered list.
    lists: Vec<Option<u64>>,
    links: Vec<String>,
    quote_depth: usize,
    in_code_block: bool,
}

impl TerminalText {
    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) if self.in_code_block => {
                for (idx, part) in text.split('\n').enumerate() {
                    if idx > 0 {
                        self.flush_line();
                    }
                    if !part.is_empty() {
                        if self.line.is_empty() {
                            self.line.push_str("    ");
                        }
                        self.line.push_str(part);
                    }
                }
            }
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.line.push_str(&text);
            }
            Event::Code(code) => {
                self.line.push('`');
                self.line.push_str(&code);
                self.line.push('`');
            }
            Event::FootnoteReference(name) => {
                self.line.push_str(&format!("[^{name}]"));
            }
            Event::SoftBreak => self.line.push(' '),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push("─".repeat(40));
                self.blank();
            }
            Event::TaskListMarker(done) => {
                self.line.push_str(if done { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } | Tag::Table(_) | Tag::TableHead | Tag::TableRow => {
                self.flush_line();
            }
            Tag::TableCell => {
                if !self.line.is_empty() {
                    self.line.push_str(" | ");
                }
            }
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Tag::List(first) => {
                self.flush_line();
                self.lists.push(first);
            }
            Tag::Item => {
                self.flush_line();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{next}.");
                        *next += 1;
                        marker
                    }
                    _ => "-".to_string(),
                };
                self.line = format!("{indent}{marker} ");
            }
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.links.push(dest_url.into_string());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(level) => {
                let title = std::mem::take(&mut self.line);
                let rule = if level == HeadingLevel::H1 { '=' } else { '-' };
                let width = title.chars().count().max(1);
                self.lines.push(title);
                self.lines.push(rule.to_string().repeat(width));
                self.blank();
            }
            TagEnd::Paragraph => {
                self.flush_line();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    self.blank();
                }
            }
            TagEnd::CodeBlock => {
                self.flush_line();
                self.in_code_block = false;
                self.blank();
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item | TagEnd::TableHead | TagEnd::TableRow => self.flush_line(),
            TagEnd::Table => self.blank(),
            TagEnd::Link | TagEnd::Image => {
                if let Some(dest) = self.links.pop() {
                    // Autolinks already show their target.
                    if !dest.is_empty() && !self.line.ends_with(&dest) {
                        self.line.push_str(&format!(" ({dest})"));
                    }
                }
            }
            _ => {}
        }
    }

    fn flush_line(&mut self) {
        if self.line.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.line);
        let prefix = "> ".repeat(self.quote_depth);
        self.lines.push(format!("{prefix}{}", line.trim_end()));
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|last| !last.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush_line();
        while self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
        self.lines
    }
}
