//! Headless document model.
//!
//! A flat map of element id → [`Element`] standing in for the browser DOM.
//! Renderers and the view controller mutate it; the web front-end mirrors it
//! into a real page and the CLI reads it back.
//!
//! Every mutator takes an `Option<ElementId>` (as produced by the typed
//! bindings in [`crate::view::View`]) and is a no-op when the id is `None` or
//! no longer present. A missing element is never an error.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Element ids are compile-time constants (see [`crate::view::ELEMENT_IDS`]).
pub type ElementId = &'static str;

/// Class that hides an element.
pub const HIDDEN: &str = "hidden";

/// What an element displays. `None` on [`Element::content`] leaves the
/// page's own markup alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Content {
    Text(String),
    Html(String),
}

/// Mutable state of one element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    pub content: Option<Content>,
    pub classes: BTreeSet<String>,
    pub style: BTreeMap<String, String>,
    pub disabled: bool,
    pub value: String,
    pub data: BTreeMap<String, String>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hidden() -> Self {
        Self::new().with_class(HIDDEN)
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn with_html(mut self, html: &str) -> Self {
        self.content = Some(Content::Html(html.to_string()));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.content = Some(Content::Text(text.to_string()));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// The whole page state plus queued blocking alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    elements: BTreeMap<String, Element>,
    #[serde(skip)]
    alerts: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, element: Element) {
        self.elements.insert(id.to_string(), element);
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn elements(&self) -> &BTreeMap<String, Element> {
        &self.elements
    }

    fn get_mut(&mut self, id: Option<ElementId>) -> Option<&mut Element> {
        self.elements.get_mut(id?)
    }

    // -- Content --

    pub fn set_text(&mut self, id: Option<ElementId>, text: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.content = Some(Content::Text(text.into()));
        }
    }

    pub fn set_html(&mut self, id: Option<ElementId>, html: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.content = Some(Content::Html(html.into()));
        }
    }

    pub fn set_content(&mut self, id: Option<ElementId>, content: Option<Content>) {
        if let Some(el) = self.get_mut(id) {
            el.content = content;
        }
    }

    pub fn content(&self, id: &str) -> Option<&Content> {
        self.get(id)?.content.as_ref()
    }

    /// Text content, or `""` when the element is missing or holds HTML.
    pub fn text(&self, id: &str) -> &str {
        match self.content(id) {
            Some(Content::Text(text)) => text,
            _ => "",
        }
    }

    /// HTML content, or `""` when the element is missing or holds text.
    pub fn html(&self, id: &str) -> &str {
        match self.content(id) {
            Some(Content::Html(html)) => html,
            _ => "",
        }
    }

    // -- Visibility and classes --

    pub fn show(&mut self, id: Option<ElementId>) {
        self.remove_class(id, HIDDEN);
    }

    pub fn hide(&mut self, id: Option<ElementId>) {
        self.add_class(id, HIDDEN);
    }

    pub fn set_visible(&mut self, id: Option<ElementId>, visible: bool) {
        if visible {
            self.show(id);
        } else {
            self.hide(id);
        }
    }

    /// Present and not hidden.
    pub fn is_visible(&self, id: &str) -> bool {
        self.get(id).is_some_and(|el| !el.classes.contains(HIDDEN))
    }

    pub fn add_class(&mut self, id: Option<ElementId>, class: &str) {
        if let Some(el) = self.get_mut(id) {
            el.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: Option<ElementId>, class: &str) {
        if let Some(el) = self.get_mut(id) {
            el.classes.remove(class);
        }
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.get(id).is_some_and(|el| el.classes.contains(class))
    }

    /// Replace the whole class list, keeping `hidden` as it was.
    pub fn set_classes(&mut self, id: Option<ElementId>, classes: &[&str]) {
        if let Some(el) = self.get_mut(id) {
            let hidden = el.classes.contains(HIDDEN);
            el.classes = classes.iter().map(|c| c.to_string()).collect();
            if hidden {
                el.classes.insert(HIDDEN.to_string());
            }
        }
    }

    // -- Style, state, value, data --

    pub fn set_style(&mut self, id: Option<ElementId>, property: &str, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.style.insert(property.to_string(), value.into());
        }
    }

    pub fn style(&self, id: &str, property: &str) -> Option<&str> {
        self.get(id)?.style.get(property).map(String::as_str)
    }

    pub fn set_disabled(&mut self, id: Option<ElementId>, disabled: bool) {
        if let Some(el) = self.get_mut(id) {
            el.disabled = disabled;
        }
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.get(id).is_some_and(|el| el.disabled)
    }

    pub fn set_value(&mut self, id: Option<ElementId>, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.value = value.into();
        }
    }

    pub fn value(&self, id: &str) -> &str {
        self.get(id).map(|el| el.value.as_str()).unwrap_or("")
    }

    pub fn set_data(&mut self, id: Option<ElementId>, key: &str, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.data.insert(key.to_string(), value.into());
        }
    }

    pub fn data(&self, id: &str, key: &str) -> Option<&str> {
        self.get(id)?.data.get(key).map(String::as_str)
    }

    // -- Alerts --

    /// Queue a blocking user-facing alert.
    pub fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("alert: {message}");
        self.alerts.push(message);
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Drain queued alerts for display.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(id: &str) -> Document {
        let mut doc = Document::new();
        doc.insert(id, Element::hidden());
        doc
    }

    #[test]
    fn mutations_on_missing_ids_are_noops() {
        let mut doc = Document::new();
        doc.set_text(Some("ghost"), "boo");
        doc.show(None);
        doc.set_disabled(Some("ghost"), true);
        assert!(doc.elements().is_empty());
        assert_eq!(doc.text("ghost"), "");
    }

    #[test]
    fn removed_element_is_not_resurrected() {
        let mut doc = doc_with("card");
        doc.remove("card");
        doc.show(Some("card"));
        assert!(!doc.contains("card"));
        assert!(!doc.is_visible("card"));
    }

    #[test]
    fn show_and_hide_toggle_hidden_class() {
        let mut doc = doc_with("card");
        assert!(!doc.is_visible("card"));
        doc.show(Some("card"));
        assert!(doc.is_visible("card"));
        doc.set_visible(Some("card"), false);
        assert!(doc.has_class("card", HIDDEN));
    }

    #[test]
    fn text_and_html_replace_each_other() {
        let mut doc = doc_with("label");
        doc.set_html(Some("label"), "<b>x</b>");
        assert_eq!(doc.html("label"), "<b>x</b>");
        doc.set_text(Some("label"), "plain");
        assert_eq!(doc.text("label"), "plain");
        assert_eq!(doc.html("label"), "");
    }

    #[test]
    fn set_classes_preserves_visibility() {
        let mut doc = doc_with("verdict");
        doc.add_class(Some("verdict"), "old");
        doc.set_classes(Some("verdict"), &["win"]);
        assert!(doc.has_class("verdict", "win"));
        assert!(!doc.has_class("verdict", "old"));
        assert!(doc.has_class("verdict", HIDDEN));
    }

    #[test]
    fn alerts_drain_in_order() {
        let mut doc = Document::new();
        doc.alert("one");
        doc.alert("two");
        assert_eq!(doc.take_alerts(), vec!["one", "two"]);
        assert!(doc.alerts().is_empty());
    }
}
