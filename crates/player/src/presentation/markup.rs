//! Game text markup
//!
//! The server writes game text with a few bracket tags. They are turned into
//! HTML when text enters the store, and HTML is flattened again for the terminal.

use std::sync::LazyLock;

use regex_lite::Regex;

static CMD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[cmd=([^\]]*)\]").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));

/// Convert server markup to HTML.
///
/// - newline to `<br>`
/// - `[b]..[/b]` to a bold span
/// - `[cmd=/x]..[/cmd]` to an inline command anchor carrying `/x`
pub fn render_markup(text: &str) -> String {
    let html = text
        .replace('\n', "<br>")
        .replace("[b]", "<span style='font-weight:600'>")
        .replace("[/b]", "</span>");

    CMD_OPEN
        .replace_all(
            &html,
            "<a href='#' class='inline-command' data-command='${1}'>",
        )
        .replace("[/cmd]", "</a>")
}

/// Flatten rendered HTML to plain text.
pub fn to_plain_text(html: &str) -> String {
    let text = BREAK.replace_all(html, "\n");
    let text = TAG.replace_all(&text, "");

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
