//! Canonical form for converted markup.
//!
//! The fragment produced by the markdown converter is split into top-level
//! nodes. A top-level text node made only of two or more line breaks becomes a
//! single line break; every other node is copied byte for byte, descendants
//! included. Blank-line runs nested inside an element are left as they are.
//!
//! Markup the reader cannot tokenize, such as an unclosed `<!--` block that
//! runs to the end of a chapter, is copied verbatim from that point on.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Elements that never have content or a closing tag in HTML
const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

/// Normalize a fragment into a new string
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    normalize_into(raw, &mut out);
    out
}

/// Normalize a fragment, appending the canonical markup to `out`
pub fn normalize_into(raw: &str, out: &mut String) {
    let mut reader = Reader::from_str(raw);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;

    let mut depth = 0usize;
    // Byte range of the top-level text node being accumulated
    let mut text: Option<(usize, usize)> = None;

    loop {
        let start = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                tracing::debug!(
                    "Copying markup verbatim from byte {}: {}",
                    reader.error_position(),
                    err
                );
                if let Some((from, to)) = text.take() {
                    push_text(&raw[from..to], out);
                }
                out.push_str(&raw[start..]);
                break;
            }
        };
        let end = reader.buffer_position() as usize;

        // Character data arrives as several events when it contains references
        if depth == 0 && matches!(event, Event::Text(_) | Event::GeneralRef(_)) {
            text = Some(text.map_or((start, end), |(from, _)| (from, end)));
            continue;
        }
        if let Some((from, to)) = text.take() {
            push_text(&raw[from..to], out);
        }

        match event {
            Event::Eof => break,
            Event::Start(ref tag) => {
                if !is_void(tag.local_name().as_ref()) {
                    depth += 1;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        out.push_str(&raw[start..end]);
    }
}

fn is_void(name: &[u8]) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

fn push_text(node: &str, out: &mut String) {
    if is_blank_run(node) {
        out.push('\n');
    } else {
        out.push_str(node);
    }
}

/// Two or more line breaks and nothing else
fn is_blank_run(node: &str) -> bool {
    node.len() >= 2 && node.bytes().all(|b| b == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_top_level_blank_runs() {
        let raw = "<p>One</p>\n\n\n<p>Two</p>\n\n<hr />\n";
        assert_eq!(normalize(raw), "<p>One</p>\n<p>Two</p>\n<hr />\n");
    }

    #[test]
    fn test_single_line_breaks_are_kept() {
        let raw = "<h1 id=\"a\">A</h1>\n<p>b</p>\n";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn test_nested_blank_runs_are_untouched() {
        let raw = "<div>\n\n\n<p>x</p>\n\n</div>\n\n<pre><code>a\n\n\nb</code></pre>";
        assert_eq!(
            normalize(raw),
            "<div>\n\n\n<p>x</p>\n\n</div>\n<pre><code>a\n\n\nb</code></pre>"
        );
    }

    #[test]
    fn test_text_with_other_characters_is_untouched() {
        let raw = "<p>a</p>\n \n<p>b</p>\n\nplain &amp; text\n\n";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn test_void_elements_do_not_nest() {
        let raw = "<p>a<br>b</p>\n\n<img src=\"x.png\">\n\n\n<p>c</p>";
        assert_eq!(
            normalize(raw),
            "<p>a<br>b</p>\n<img src=\"x.png\">\n<p>c</p>"
        );
    }

    #[test]
    fn test_comments_and_raw_html_are_verbatim() {
        let raw = "<!-- note -->\n\n<div class=x>\n\nraw\n</div>";
        assert_eq!(
            normalize(raw),
            "<!-- note -->\n<div class=x>\n\nraw\n</div>"
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "<p>One</p>\n\n\n<p>Two</p>\n\n",
            "\n\n<div>\n\n</div>\n\n\n\n<p>x &lt; y</p>",
            "<table>\n<tr><td>1</td></tr>\n</table>\n\n\n<ul>\n<li>a</li>\n</ul>\n",
            "",
        ];
        for input in inputs {
            let once = normalize(input);
            let twice = normalize(&once);
            assert_eq!(once, twice, "input: {:?}", input);
        }
    }

    #[test]
    fn test_appends_to_existing_buffer() {
        let mut out = String::from("prefix:");
        normalize_into("<p>a</p>\n\n", &mut out);
        assert_eq!(out, "prefix:<p>a</p>\n");
    }

    #[test]
    fn test_void_elements_match_any_case() {
        let raw = "<P>a<BR>b</P>\n\n<IMG SRC=\"x.png\">\n\n\n<p>c</p>";
        assert_eq!(
            normalize(raw),
            "<P>a<BR>b</P>\n<IMG SRC=\"x.png\">\n<p>c</p>"
        );
    }

    #[test]
    fn test_unclosed_comment_is_copied_verbatim() {
        let raw = "<p>Intro</p>\n\n<!-- TODO: finish this chapter\n\n\nstill inside\n";
        assert_eq!(
            normalize(raw),
            "<p>Intro</p>\n<!-- TODO: finish this chapter\n\n\nstill inside\n"
        );
        assert_eq!(normalize(&normalize(raw)), normalize(raw));
    }

    #[test]
    fn test_unclosed_cdata_is_copied_verbatim() {
        let raw = "<p>a</p>\n\n\n<![CDATA[ x < y\n\n";
        assert_eq!(normalize(raw), "<p>a</p>\n<![CDATA[ x < y\n\n");
    }
}
