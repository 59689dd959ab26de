use pretty_assertions::assert_eq;
use research_core::ResearchResult;
use research_engine::{render_result_html, MarkdownRenderer, PulldownRenderer};

#[test]
fn heading_and_sources_render_in_order() {
    let result = ResearchResult {
        content: "# Hi".to_string(),
        sources: vec!["https://a.test".to_string(), "https://b.test".to_string()],
    };

    let html = render_result_html(&PulldownRenderer, &result);

    assert!(html.contains("<h1>Hi</h1>"), "{html}");
    let first = html.find("href=\"https://a.test\"").expect("first link");
    let second = html.find("href=\"https://b.test\"").expect("second link");
    assert!(first < second);
    assert_eq!(html.matches("<li>").count(), 2);
}

#[test]
fn empty_sources_render_empty_list() {
    let result = ResearchResult {
        content: "No citations.".to_string(),
        sources: Vec::new(),
    };

    let html = render_result_html(&PulldownRenderer, &result);

    assert_eq!(
        html,
        "<p>No citations.</p>\n<div class=\"sources\">\n<h2>Sources</h2>\n<ul>\n</ul>\n</div>\n"
    );
}

#[test]
fn duplicate_sources_are_kept() {
    let result = ResearchResult {
        content: String::new(),
        sources: vec!["https://a.test".to_string(), "https://a.test".to_string()],
    };

    let html = render_result_html(&PulldownRenderer, &result);
    assert_eq!(html.matches("<li>").count(), 2);
}

#[test]
fn github_extensions_are_enabled() {
    let html = PulldownRenderer.to_html("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n");

    assert!(html.contains("<table>"), "{html}");
    assert!(html.contains("<del>gone</del>"), "{html}");
    assert!(html.contains("type=\"checkbox\""), "{html}");
}

#[test]
fn source_urls_are_escaped() {
    let result = ResearchResult {
        content: String::new(),
        sources: vec!["https://x.test/?a=1&b=2".to_string()],
    };

    let html = render_result_html(&PulldownRenderer, &result);
    assert!(html.contains("href=\"https://x.test/?a=1&amp;b=2\""), "{html}");
}

#[test]
fn quotes_in_source_urls_cannot_break_the_href() {
    let result = ResearchResult {
        content: String::new(),
        sources: vec!["https://x.test/\"onmouseover=\"x".to_string()],
    };

    let html = render_result_html(&PulldownRenderer, &result);
    assert!(
        html.contains("href=\"https://x.test/%22onmouseover=%22x\""),
        "{html}"
    );
    assert!(html.contains(">https://x.test/&quot;onmouseover=&quot;x</a>"), "{html}");
}
