//! Post body markup to readable text
//!
//! Stack Exchange bodies are HTML fragments. Block elements become paragraphs,
//! `<pre>` becomes a fenced code block, inline `<code>` keeps backticks and
//! links keep their target. Entities are decoded by the parser.

use scraper::{ElementRef, Html, Node};

/// Tags whose entire subtree is dropped
const SKIP_TAGS: [&str; 4] = ["script", "style", "noscript", "svg"];

const BLOCK_TAGS: [&str; 13] = [
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "table", "tr", "section", "article", "hr",
];

const FENCE: &str = "```";

/// Convert an HTML fragment to plain text with light Markdown structure
pub fn markup_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    render_children(fragment.root_element(), &mut out);
    tidy(&out)
}

/// [`markup_to_text`] folded onto a single line, for list bullets
pub fn markup_to_line(html: &str) -> String {
    markup_to_text(html)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != FENCE)
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_children(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_inline(out, text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    render_element(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn render_element(element: ElementRef, out: &mut String) {
    let name = element.value().name();
    if SKIP_TAGS.contains(&name) {
        return;
    }

    match name {
        "pre" => {
            let code: String = element.text().collect();
            block_break(out);
            out.push_str(FENCE);
            out.push('\n');
            out.push_str(code.trim_matches('\n'));
            out.push('\n');
            out.push_str(FENCE);
            block_break(out);
        }
        "code" => {
            let code: String = element.text().collect();
            out.push('`');
            out.push_str(&code);
            out.push('`');
        }
        "br" => {
            trim_trailing_spaces(out);
            out.push('\n');
        }
        "a" => {
            let mut label = String::new();
            render_children(element, &mut label);
            let label = label.trim();
            match element.value().attr("href") {
                Some(href) if !href.is_empty() && href != label => {
                    out.push_str(&format!("[{}]({})", label, href));
                }
                _ => out.push_str(label),
            }
        }
        "img" => {
            if let Some(alt) = element.value().attr("alt").filter(|a| !a.trim().is_empty()) {
                push_inline(out, &format!("[image: {}]", alt.trim()));
            }
        }
        "li" => {
            let mut inner = String::new();
            render_children(element, &mut inner);
            line_break(out);
            out.push_str("- ");
            out.push_str(&tidy(&inner).replace('\n', "\n  "));
            line_break(out);
        }
        "ul" | "ol" => {
            block_break(out);
            render_children(element, out);
            block_break(out);
        }
        "blockquote" => {
            let mut inner = String::new();
            render_children(element, &mut inner);
            block_break(out);
            for line in tidy(&inner).lines() {
                out.push_str("> ");
                out.push_str(line);
                out.push('\n');
            }
            block_break(out);
        }
        _ if BLOCK_TAGS.contains(&name) => {
            block_break(out);
            render_children(element, out);
            block_break(out);
        }
        _ => render_children(element, out),
    }
}

/// Append text, collapsing whitespace runs to one space
fn push_inline(out: &mut String, text: &str) {
    if text.starts_with(char::is_whitespace) {
        soft_space(out);
    }
    let mut wrote = false;
    for word in text.split_whitespace() {
        if wrote {
            out.push(' ');
        }
        out.push_str(word);
        wrote = true;
    }
    if wrote && text.ends_with(char::is_whitespace) {
        soft_space(out);
    }
}

fn soft_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

fn trim_trailing_spaces(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
}

fn line_break(out: &mut String) {
    trim_trailing_spaces(out);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn block_break(out: &mut String) {
    trim_trailing_spaces(out);
    if out.is_empty() {
        return;
    }
    while !out.ends_with("\n\n") {
        out.push('\n');
    }
}

/// Strip trailing spaces and collapse blank-line runs outside code fences
fn tidy(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_fence = false;
    let mut blank_run = 0;

    for line in text.lines() {
        let line = line.trim_end();
        if line == FENCE {
            in_fence = !in_fence;
        }
        if line.is_empty() && !in_fence {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        result.push_str(line);
        result.push('\n');
    }

    result.trim_matches('\n').to_string()
}
