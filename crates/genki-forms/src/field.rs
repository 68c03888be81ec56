//! The form field abstraction shared by all field widgets.
//!
//! A field goes through a fixed lifecycle driven by the owning form:
//!
//! 1. **Construct** from a [`FieldConfig`] and a unique [`FieldId`]
//! 2. **Render** to an HTML fragment, which the host inserts into the document
//! 3. **Activate** to attach the field's observers
//! 4. **Deactivate** when the form drops the field; markup stays in place
//!
//! [`Field::value`] can be queried at any point after insertion.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use genki_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::FormResult;

/// Identity token of a rendered field.
///
/// Region ids of compound widgets are derived from it, so it must be unique
/// within the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Wrap an externally assigned id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Hand out a process-unique id.
    pub fn generate() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(format!("genki-{}", NEXT.fetch_add(1, Ordering::Relaxed)))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One selectable entry of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectItem {
    /// Submitted value.
    pub value: String,
    /// Display text.
    pub text: String,
}

impl SelectItem {
    /// Create an item.
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }
}

/// Field configuration as supplied by the form definition.
///
/// Deserializes from the camelCase JSON shape forms are described in:
///
/// ```
/// use genki_forms::FieldConfig;
///
/// let config = FieldConfig::from_json(r#"{
///     "name": "fruit",
///     "defaultValue": "b",
///     "items": [{"value": "a", "text": "Alpha"}, {"value": "b", "text": "Beta"}]
/// }"#).unwrap();
/// assert_eq!(config.items.len(), 2);
/// assert_eq!(config.default_value, "b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    /// The field's `name` attribute.
    pub name: String,
    /// Value pre-selected at render time. Empty means no selection.
    #[serde(default)]
    pub default_value: String,
    /// Entries in rendering order.
    #[serde(default)]
    pub items: Vec<SelectItem>,
}

impl FieldConfig {
    /// Create a configuration with no items and no default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> FormResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the default value.
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Append an item.
    pub fn with_item(mut self, value: impl Into<String>, text: impl Into<String>) -> Self {
        self.items.push(SelectItem::new(value, text));
        self
    }

    /// Replace the items.
    pub fn with_items(mut self, items: impl IntoIterator<Item = SelectItem>) -> Self {
        self.items = items.into_iter().collect();
        self
    }
}

/// Lifecycle contract between a field widget and its owning form.
pub trait Field: Send + Sync {
    /// The field's identity.
    fn id(&self) -> &FieldId;

    /// Produce the field's markup.
    fn render(&self) -> FormResult<String>;

    /// Attach the field's observers. The markup must already be in `document`.
    fn activate(&mut self, document: &mut Document) -> FormResult<()>;

    /// Detach every observer attached by [`activate`](Self::activate).
    fn deactivate(&mut self, document: &mut Document);

    /// The field's current value.
    fn value(&self, document: &Document) -> String;

    /// Render, insert below `parent`, and activate.
    ///
    /// Returns the inserted top-level nodes.
    fn mount(&mut self, document: &mut Document, parent: NodeId) -> FormResult<Vec<NodeId>> {
        let markup = self.render()?;
        let inserted = document.insert_html(parent, &markup)?;
        self.activate(document)?;
        Ok(inserted)
    }
}
