//! Markdown to XHTML fragment conversion.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;

/// Markdown converter with the extensions used for book chapters
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    options: Options,
}

impl MarkdownConverter {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        Self { options }
    }

    /// Convert `markdown`, appending the HTML fragment to `out`
    ///
    /// Headings without an explicit `{#id}` get one derived from their text,
    /// unique within the document.
    pub fn convert(&self, markdown: &str, out: &mut String) {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();
        let events = attach_heading_ids(events);
        html::push_html(out, events.into_iter());
    }

    pub fn convert_to_string(&self, markdown: &str) -> String {
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        self.convert(markdown, &mut out);
        out
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

fn attach_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let ids = heading_ids(&events);
    let mut ids = ids.into_iter();

    events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let generated = ids.next().flatten();
                let id = id.or_else(|| generated.map(|s| CowStr::Boxed(s.into_boxed_str())));
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                })
            }
            other => other,
        })
        .collect()
}

/// One entry per heading: the generated id, or `None` when it has its own
fn heading_ids(events: &[Event<'_>]) -> Vec<Option<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut ids = Vec::new();
    let mut current: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { id, .. }) => {
                if let Some(explicit) = id {
                    seen.entry(explicit.to_string()).or_insert(1);
                    current = None;
                    ids.push(None);
                } else {
                    current = Some(String::new());
                    ids.push(Some(String::new()));
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(title) = current.as_mut() {
                    title.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(title) = current.take() {
                    let mut id = anchor_id(&title);
                    if id.is_empty() {
                        id.push_str("section");
                    }
                    let count = seen.entry(id.clone()).or_insert(0);
                    *count += 1;
                    if *count > 1 {
                        id = format!("{}-{}", id, *count - 1);
                    }
                    if let Some(slot) = ids.last_mut() {
                        *slot = Some(id);
                    }
                }
            }
            _ => {}
        }
    }

    ids
}

/// Lowercase, alphanumerics kept, runs of anything else become one hyphen
fn anchor_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            id.push(ch);
        } else if !id.is_empty() && !id.ends_with('-') {
            id.push('-');
        }
    }
    id.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(markdown: &str) -> String {
        MarkdownConverter::new().convert_to_string(markdown)
    }

    #[test]
    fn test_paragraphs_are_separated_by_newlines() {
        let html = convert("First paragraph.\n\nSecond paragraph.\n");
        assert_eq!(html, "<p>First paragraph.</p>\n<p>Second paragraph.</p>\n");
    }

    #[test]
    fn test_extensions_enabled() {
        let html = convert("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_smart_punctuation() {
        let html = convert("\"Quoted\" -- and...\n");
        assert!(html.contains('\u{201c}'));
        assert!(html.contains('\u{2013}'));
        assert!(html.contains('\u{2026}'));
    }

    #[test]
    fn test_footnotes() {
        let html = convert("Text[^1].\n\n[^1]: Note.\n");
        assert!(html.contains("footnote-reference"));
        assert!(html.contains("footnote-definition"));
    }

    #[test]
    fn test_heading_ids_generated() {
        let html = convert("# Глава первая\n\n## Notes\n\n## Notes\n");
        assert!(html.contains("<h1 id=\"глава-первая\">"));
        assert!(html.contains("<h2 id=\"notes\">"));
        assert!(html.contains("<h2 id=\"notes-1\">"));
    }

    #[test]
    fn test_explicit_heading_id_kept() {
        let html = convert("# Intro {#start}\n\n# Start\n");
        assert!(html.contains("<h1 id=\"start\">Intro</h1>"));
        assert!(html.contains("<h1 id=\"start-1\">Start</h1>"));
    }

    #[test]
    fn test_appends_to_buffer() {
        let mut out = String::from("<!-- head -->\n");
        MarkdownConverter::new().convert("text", &mut out);
        assert_eq!(out, "<!-- head -->\n<p>text</p>\n");
    }
}
