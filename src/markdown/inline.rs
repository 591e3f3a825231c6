//! Inline spans: code, links and emphasis.
//!
//! Code spans are atomic, so nothing inside backticks is interpreted.
//! Emphasis and link text are rendered recursively. Every character that
//! reaches the output as text goes through [`escape`] exactly once.

/// Escape `&`, `<` and `>` for HTML text content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        push_escaped(&mut out, ch);
    }
    out
}

/// Escape for use inside a double-quoted attribute value.
pub fn escape_attr(text: &str) -> String {
    escape(text).replace('"', "&quot;")
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(ch),
    }
}

/// Render one line of inline Markdown to HTML.
pub fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        let span = match ch {
            '`' => code_span(rest),
            '[' => link(rest),
            '*' => emphasis(rest),
            _ => None,
        };
        match span {
            Some((html, consumed)) => {
                out.push_str(&html);
                rest = &rest[consumed..];
            }
            None => {
                push_escaped(&mut out, ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    out
}

/// `` `code` `` → `<code>`. Returns the HTML and the bytes consumed.
fn code_span(rest: &str) -> Option<(String, usize)> {
    let body = &rest[1..];
    let end = body.find('`')?;
    if end == 0 {
        return None;
    }
    Some((format!("<code>{}</code>", escape(&body[..end])), end + 2))
}

/// `[text](url)` → anchor.
fn link(rest: &str) -> Option<(String, usize)> {
    let body = &rest[1..];
    let label_end = body.find(']')?;
    let label = &body[..label_end];
    let after = body[label_end + 1..].strip_prefix('(')?;
    let url_end = after.find(')')?;
    let url = &after[..url_end];
    if label.is_empty() || url.is_empty() {
        return None;
    }
    let consumed = 1 + label_end + 2 + url_end + 1;
    Some((
        format!("<a href=\"{}\">{}</a>", escape_attr(url), render_inline(label)),
        consumed,
    ))
}

/// `***x***`, `**x**` or `*x*`, longest delimiter first, shortest match.
fn emphasis(rest: &str) -> Option<(String, usize)> {
    let run = rest.bytes().take_while(|b| *b == b'*').count().min(3);
    (1..=run).rev().find_map(|width| {
        let delim = &rest[..width];
        let body = &rest[width..];
        // At least one character of content.
        let first = body.chars().next()?;
        let close = body[first.len_utf8()..].find(delim)? + first.len_utf8();
        let inner = render_inline(&body[..close]);
        let html = match width {
            3 => format!("<strong><em>{}</em></strong>", inner),
            2 => format!("<strong>{}</strong>", inner),
            _ => format!("<em>{}</em>", inner),
        };
        Some((html, width + close + width))
    })
}
