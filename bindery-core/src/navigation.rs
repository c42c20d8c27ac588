//! Table of contents: navigation entries collected in discovery order.

use crate::archive::ContentType;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

/// Internal name of the synthesized table of contents.
pub const TOC_FILENAME: &str = "_toc.xhtml";

/// Title of the synthesized table of contents.
pub const TOC_TITLE: &str = "Оглавление";

/// Characters escaped in an href: everything except path separators and unreserved marks
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode a relative archive path for use in an href
pub fn encode_href(path: &str) -> String {
    utf8_percent_encode(path, HREF).to_string()
}

/// A link from the table of contents to one compiled document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    pub level: u32,
    pub filename: String,
    pub content_type: ContentType,
}

impl NavigationItem {
    /// Href of the target document, relative to the archive content root
    pub fn href(&self) -> String {
        encode_href(&self.filename)
    }
}

/// Two-state marker that can be claimed once
///
/// `Open` → `Claimed` is the only transition. A concurrent traversal can swap
/// this for an atomic compare-and-set without changing callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OneShot {
    #[default]
    Open,
    Claimed,
}

impl OneShot {
    /// Claim the slot, returning whether this call made the transition
    pub fn try_claim(&mut self) -> bool {
        match self {
            OneShot::Open => {
                *self = OneShot::Claimed;
                true
            }
            OneShot::Claimed => false,
        }
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self, OneShot::Claimed)
    }
}

/// Whether an author-declared navigation document has been seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavState {
    #[default]
    Pending,
    Satisfied,
}

/// Accumulates navigation entries during traversal
#[derive(Debug, Default)]
pub struct NavigationBuilder {
    items: Vec<NavigationItem>,
    state: NavState,
}

impl NavigationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; order is discovery order
    pub fn push(&mut self, item: NavigationItem) {
        self.items.push(item);
    }

    /// Record that a document declared the navigation role
    ///
    /// Repeated declarations are accepted; the state stays `Satisfied`.
    pub fn mark_declared(&mut self) {
        self.state = NavState::Satisfied;
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    /// A fallback table of contents is needed when no document declared the role
    pub fn needs_fallback(&self) -> bool {
        self.state == NavState::Pending
    }

    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    /// Freeze the collected entries
    pub fn finish(self) -> Navigation {
        Navigation { items: self.items }
    }
}

/// Frozen table of contents of a finished compile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Navigation {
    items: Vec<NavigationItem>,
}

impl Navigation {
    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NavigationItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Navigation {
    type Item = &'a NavigationItem;
    type IntoIter = std::slice::Iter<'a, NavigationItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, filename: &str) -> NavigationItem {
        NavigationItem {
            title: title.to_string(),
            subtitle: String::new(),
            level: 0,
            filename: filename.to_string(),
            content_type: ContentType::Primary,
        }
    }

    #[test]
    fn test_one_shot_claims_once() {
        let mut slot = OneShot::default();
        assert!(slot.try_claim());
        assert!(!slot.try_claim());
        assert!(slot.is_claimed());
    }

    #[test]
    fn test_discovery_order_is_kept() {
        let mut nav = NavigationBuilder::new();
        nav.push(item("Zeta", "z.xhtml"));
        nav.push(item("Alpha", "a.xhtml"));
        let titles: Vec<_> = nav.finish().iter().map(|i| i.title.clone()).collect();
        assert_eq!(titles, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_fallback_until_declared() {
        let mut nav = NavigationBuilder::new();
        assert!(nav.needs_fallback());
        nav.mark_declared();
        nav.mark_declared();
        assert_eq!(nav.state(), NavState::Satisfied);
        assert!(!nav.needs_fallback());
    }

    #[test]
    fn test_href_is_percent_encoded() {
        let entry = item("Intro", "part one/intro #1.xhtml");
        assert_eq!(entry.href(), "part%20one/intro%20%231.xhtml");
        assert_eq!(encode_href("глава.xhtml"), "%D0%B3%D0%BB%D0%B0%D0%B2%D0%B0.xhtml");
    }
}
