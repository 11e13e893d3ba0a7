// src/render.rs
//! Server-side rendering of the chat page.

use pulldown_cmark::{Event, Options, Parser, html};

use crate::services::transcript::Exchange;

pub const TITLE: &str = "Social Media Performance Analysis";
pub const PLACEHOLDER: &str = "How can we assist you today?";
pub const SUBMIT_LABEL: &str = "Generate Insights";
pub const PENDING_LABEL: &str = "Running flow...";

/// Everything the page needs for one render.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub session_id: Option<&'a str>,
    pub draft: &'a str,
    pub error: Option<&'a str>,
    pub exchanges: &'a [Exchange],
}

/// HTML for the chat history: a labelled user block and reply block per
/// exchange, each pair closed by a rule.
///
/// Every text is rendered as its own document, so markup left open in one
/// message cannot run into the next.
pub fn history_html(exchanges: &[Exchange]) -> String {
    let mut out = String::new();
    for exchange in exchanges {
        out.push_str("<div class=\"exchange\">\n");
        push_turn(&mut out, "user", "You:", exchange.user_text());
        push_turn(&mut out, "bot", "Bot:", exchange.bot_text());
        out.push_str("<hr />\n</div>\n");
    }
    out
}

fn push_turn(out: &mut String, class: &str, label: &str, text: &str) {
    out.push_str(&format!("<div class=\"turn {class}\"><strong>{label}</strong>\n"));
    out.push_str(&markdown_to_html(text));
    out.push_str("</div>\n");
}

/// Render markdown to HTML. Raw HTML in the source comes out as escaped text.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    page.push_str(&format!("<title>{TITLE}</title>\n"));
    page.push_str(STYLE);
    page.push_str("</head>\n<body>\n<main>\n");
    page.push_str(&format!("<h1>{TITLE}</h1>\n"));

    // Disable the button and show the pending note while the flow runs.
    page.push_str(
        "<form method=\"post\" action=\"/\" onsubmit=\"this.querySelector('button').disabled = true; \
         document.getElementById('pending').hidden = false;\">\n",
    );
    if let Some(id) = view.session_id {
        page.push_str("<input type=\"hidden\" name=\"session_id\" value=\"");
        push_text(&mut page, id);
        page.push_str("\">\n");
    }
    page.push_str(&format!(
        "<textarea name=\"message\" rows=\"4\" placeholder=\"{PLACEHOLDER}\">"
    ));
    push_text(&mut page, view.draft);
    page.push_str("</textarea>\n");
    page.push_str(&format!("<button type=\"submit\">{SUBMIT_LABEL}</button>\n"));
    page.push_str(&format!(
        "<p id=\"pending\" class=\"pending\" role=\"status\" hidden>{PENDING_LABEL}</p>\n</form>\n"
    ));

    if let Some(error) = view.error {
        page.push_str("<div class=\"error\" role=\"alert\">");
        push_text(&mut page, error);
        page.push_str("</div>\n");
    }

    page.push_str("<h2>Chat History</h2>\n<section class=\"history\">\n");
    page.push_str(&history_html(view.exchanges));
    page.push_str("</section>\n</main>\n</body>\n</html>\n");
    page
}

fn push_text(out: &mut String, text: &str) {
    html::push_html(out, std::iter::once(Event::Text(text.into())));
}

const STYLE: &str = "<style>
body { font-family: sans-serif; margin: 0; background: #fafafa; }
main { max-width: 760px; margin: 2rem auto; padding: 0 1rem; }
textarea { width: 100%; box-sizing: border-box; font: inherit; padding: .5rem; }
button { margin-top: .5rem; padding: .5rem 1rem; }
.error { margin-top: 1rem; padding: .75rem; background: #fdecea; color: #8a1c14; border-radius: 4px; }
.pending { color: #555; font-style: italic; }
.turn p:first-of-type { display: inline; }
.history hr { border: 0; border-top: 1px solid #ddd; }
</style>
";
