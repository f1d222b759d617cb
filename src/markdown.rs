//! Markdown rendering for article bodies

use pulldown_cmark::{html, Options, Parser};

/// Render CommonMark (plus tables, footnotes, strikethrough) to HTML.
/// Raw HTML in the source passes through; article content is authored
/// in-house, not user-submitted.
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(source, options);

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
