//! Plain-value model of the browser elements the tracker inspects
//!
//! Event targets arrive as an [`ElementPath`]: the target element followed by
//! its ancestors, nearest first. Handlers ask capability questions
//! (`is_button`, `is_form_field`) instead of poking at arbitrary objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bounding client rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
}

/// One element on the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name; compared case-insensitively
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub rect: Rect,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_rect(mut self, left: f64, top: f64) -> Self {
        self.rect = Rect { left, top };
        self
    }

    fn tag_is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn is_button(&self) -> bool {
        self.tag_is("button")
    }

    /// Inputs and selects count as form fields; textareas do not
    pub fn is_form_field(&self) -> bool {
        self.tag_is("input") || self.tag_is("select")
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Whitespace-separated class list contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Field label for form events: non-empty name, else id, else empty
    pub fn field_label(&self) -> String {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.id.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

/// Event target plus ancestors, nearest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementPath(Vec<Element>);

impl ElementPath {
    pub fn new(path: Vec<Element>) -> Self {
        Self(path)
    }

    pub fn target(&self) -> Option<&Element> {
        self.0.first()
    }

    /// Nearest element (target included) that is a button, with its index
    pub fn closest_button(&self) -> Option<(usize, &Element)> {
        self.0.iter().enumerate().find(|(_, el)| el.is_button())
    }

    /// Strict ancestors of the element at `index`, nearest first
    pub fn ancestors_of(&self, index: usize) -> impl Iterator<Item = &Element> {
        self.0.iter().skip(index + 1)
    }

    /// True if any element on the path (target included) has this id
    pub fn contains_id(&self, id: &str) -> bool {
        self.0.iter().any(|el| el.has_id(id))
    }
}

impl From<Vec<Element>> for ElementPath {
    fn from(path: Vec<Element>) -> Self {
        Self(path)
    }
}
