use std::fmt::Write as _;

use crate::document::{Display, Document, Element};

pub fn render_html(document: &Document) -> String {
    let mut out = String::new();
    for alert in document.alerts() {
        let _ = writeln!(out, "<div class=\"alert\" role=\"alert\">{}</div>", escape_html(alert));
    }
    for root in document.roots() {
        render_element(root, 0, &mut out);
    }
    out
}

fn render_element(element: &Element, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}<{}", element.tag.name());
    if let Some(id) = &element.id {
        let _ = write!(out, " id=\"{}\"", escape_html(id));
    }
    for (name, value) in &element.attributes {
        let _ = write!(out, " {name}=\"{}\"", escape_html(value));
    }
    match element.display {
        Display::Inherit => {}
        Display::Block => out.push_str(" style=\"display: block\""),
        Display::None => out.push_str(" style=\"display: none\""),
    }

    if element.tag.is_void() {
        out.push_str(">\n");
        return;
    }
    out.push('>');
    out.push_str(&escape_html(&element.text));

    if element.children.is_empty() {
        let _ = writeln!(out, "</{}>", element.tag.name());
        return;
    }
    out.push('\n');
    for child in &element.children {
        render_element(child, depth + 1, out);
    }
    let _ = writeln!(out, "{indent}</{}>", element.tag.name());
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
