//! Custom dropdown select field.
//!
//! A [`Select`] renders three regions inside a wrapper:
//!
//! - a **display surface** showing the chosen option's text
//! - an **option list**, hidden until the surface is clicked
//! - an **icon** that rotates while the list is open
//!
//! # Interaction
//!
//! | Click on                | List was | Effect                                    |
//! |-------------------------|----------|-------------------------------------------|
//! | display surface         | any      | list and icon toggle                      |
//! | an option entry         | open     | surface shows entry text, list closes     |
//! | empty option-list space | open     | list closes                               |
//! | anywhere else           | open     | list closes, icon flattens                |
//! | anywhere else           | closed   | nothing                                   |
//!
//! # Example
//!
//! ```
//! use genki_dom::Document;
//! use genki_forms::{Field, FieldConfig, FieldId, Select};
//!
//! let config = FieldConfig::new("fruit")
//!     .with_item("a", "Alpha")
//!     .with_item("b", "Beta")
//!     .with_default_value("b");
//! let mut select = Select::new(FieldId::new("fruit-1"), config);
//!
//! let mut document = Document::new();
//! let body = document.body();
//! select.mount(&mut document, body).unwrap();
//!
//! document.click_by_id("fruit-1");
//! assert!(select.visual_state(&document).unwrap().is_open());
//! assert_eq!(select.get_value(&document), "b");
//! ```

mod controller;
mod render;
mod state;

use genki_dom::{Document, ListenerId, NodeId, WatchId};

use self::controller::{Controller, Regions};
use crate::error::{FormError, FormResult, Region};
use crate::field::{Field, FieldConfig, FieldId};
use crate::logging::targets;

pub use self::render::{ICON_CLASS, LIST_CLASS, RegionIds, SURFACE_CLASS, WRAPPER_CLASS};
pub use self::state::{IconOrientation, ListVisibility, SelectedOption, ValueSource, VisualState};

/// Handles of everything attached by one activation.
#[derive(Debug, Clone, Copy)]
struct Attachment {
    surface_listener: ListenerId,
    list_listener: ListenerId,
    outside_watch: WatchId,
}

impl Attachment {
    fn is_live(&self, document: &Document) -> bool {
        document.has_listener(self.surface_listener)
            && document.has_listener(self.list_listener)
            && document.is_watching(self.outside_watch)
    }
}

/// A dropdown select field.
#[derive(Debug)]
pub struct Select {
    id: FieldId,
    regions: RegionIds,
    config: FieldConfig,
    style_class: String,
    controller: Controller,
    attachment: Option<Attachment>,
}

impl Select {
    /// Create a select. Nothing is rendered or attached yet.
    pub fn new(id: FieldId, config: FieldConfig) -> Self {
        let regions = RegionIds::for_field(&id);
        Self {
            id,
            regions,
            config,
            style_class: String::new(),
            controller: Controller::new(),
            attachment: None,
        }
    }

    /// Add a style class to the display surface.
    pub fn with_style_class(mut self, class: impl Into<String>) -> Self {
        self.style_class = class.into();
        self
    }

    /// The field configuration.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Element ids of the rendered regions.
    pub fn region_ids(&self) -> &RegionIds {
        &self.regions
    }

    /// Markup of the entry at `index`, or `None` past the end.
    pub fn render_option(&self, index: usize) -> Option<String> {
        self.config
            .items
            .get(index)
            .map(|item| render::render_option(item, &self.config.default_value))
    }

    /// Markup of the whole field. Fails when there are no items.
    pub fn render(&self) -> FormResult<String> {
        let html = render::render_select(&self.regions, &self.config, &self.style_class)?;
        tracing::trace!(target: targets::FIELD, id = %self.id, len = html.len(), "rendered select");
        Ok(html)
    }

    /// Attach click handling to the rendered regions in `document`.
    ///
    /// Activating an already active select does nothing. If the document
    /// dropped some of the select's observers, for example because its
    /// markup was removed, the rest are detached and everything is attached
    /// again.
    pub fn activate(&mut self, document: &mut Document) -> FormResult<()> {
        if let Some(attachment) = self.attachment {
            if attachment.is_live(document) {
                tracing::warn!(target: targets::FIELD, id = %self.id, "select is already active");
                return Ok(());
            }
            tracing::debug!(target: targets::FIELD, id = %self.id, "replacing stale observers");
            self.detach(document);
        }

        let regions = self.locate(document)?;

        let surface_listener =
            document.add_shared_listener(regions.surface, self.controller.surface_handler())?;
        let list_listener =
            match document.add_shared_listener(regions.list, self.controller.list_handler()) {
                Ok(id) => id,
                Err(err) => {
                    document.remove_listener(surface_listener);
                    return Err(err.into());
                }
            };
        let outside_watch =
            match document.watch_outside_clicks(regions.surface, self.controller.outside_handler())
            {
                Ok(id) => id,
                Err(err) => {
                    document.remove_listener(surface_listener);
                    document.remove_listener(list_listener);
                    return Err(err.into());
                }
            };

        self.controller.bind(regions);
        self.attachment = Some(Attachment {
            surface_listener,
            list_listener,
            outside_watch,
        });
        tracing::debug!(target: targets::FIELD, id = %self.id, "select activated");
        Ok(())
    }

    /// Detach everything [`activate`](Self::activate) attached. The markup
    /// stays in the document.
    pub fn deactivate(&mut self, document: &mut Document) {
        if self.detach(document) {
            tracing::debug!(target: targets::FIELD, id = %self.id, "select deactivated");
        }
    }

    /// Whether click handling is attached.
    ///
    /// This reports what the select holds. Use
    /// [`is_live_in`](Self::is_live_in) to check against a document that
    /// may have dropped the observers.
    pub fn is_active(&self) -> bool {
        self.attachment.is_some()
    }

    /// Whether every observer attached by [`activate`](Self::activate) is
    /// still registered in `document`.
    pub fn is_live_in(&self, document: &Document) -> bool {
        self.attachment
            .is_some_and(|attachment| attachment.is_live(document))
    }

    fn detach(&mut self, document: &mut Document) -> bool {
        let Some(attachment) = self.attachment.take() else {
            return false;
        };
        document.remove_listener(attachment.surface_listener);
        document.remove_listener(attachment.list_listener);
        document.unwatch_outside_clicks(attachment.outside_watch);
        self.controller.unbind();
        true
    }

    /// Value of the last option-list entry marked `selected`, or `""`.
    ///
    /// The mark is placed at render time and never moved, so this stays the
    /// default value after the user picks another option. See
    /// [`value_from`](Self::value_from) for the clicked value.
    pub fn get_value(&self, document: &Document) -> String {
        let Some(list) = document.element_by_id(&self.regions.list) else {
            return String::new();
        };
        let dom = document.dom();
        dom.element_children(list)
            .unwrap_or_default()
            .into_iter()
            .filter(|&entry| dom.has_attribute(entry, "selected"))
            .last()
            .and_then(|entry| dom.attribute(entry, "value"))
            .unwrap_or_default()
            .to_string()
    }

    /// The value according to `source`.
    pub fn value_from(&self, document: &Document, source: ValueSource) -> String {
        match source {
            ValueSource::RenderedDefault => self.get_value(document),
            ValueSource::LastSelection => match self.controller.selection() {
                Some(option) => option.value,
                None => self.get_value(document),
            },
        }
    }

    /// The option last chosen by a click, if any.
    pub fn selection(&self) -> Option<SelectedOption> {
        self.controller.selection()
    }

    /// Read the current visual state back from `document`.
    pub fn visual_state(&self, document: &Document) -> FormResult<VisualState> {
        let regions = self.locate(document)?;
        let dom = document.dom();
        Ok(VisualState {
            list: ListVisibility::of(dom, regions.list),
            icon: IconOrientation::of(dom, regions.icon),
            display_text: dom.text_content(regions.surface),
        })
    }

    fn locate(&self, document: &Document) -> FormResult<Regions> {
        let find = |region: Region, id: &str| -> FormResult<NodeId> {
            document
                .element_by_id(id)
                .ok_or_else(|| FormError::region_missing(region, id))
        };
        Ok(Regions {
            surface: find(Region::DisplaySurface, &self.regions.surface)?,
            list: find(Region::OptionList, &self.regions.list)?,
            icon: find(Region::Icon, &self.regions.icon)?,
        })
    }
}

impl Field for Select {
    fn id(&self) -> &FieldId {
        &self.id
    }

    fn render(&self) -> FormResult<String> {
        Select::render(self)
    }

    fn activate(&mut self, document: &mut Document) -> FormResult<()> {
        Select::activate(self, document)
    }

    fn deactivate(&mut self, document: &mut Document) {
        Select::deactivate(self, document)
    }

    fn value(&self, document: &Document) -> String {
        self.get_value(document)
    }
}

static_assertions::assert_impl_all!(Select: Send, Sync);
