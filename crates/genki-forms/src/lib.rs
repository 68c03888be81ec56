//! Form field widgets for Genki.
//!
//! Fields render to HTML fragments, get inserted into a
//! [`genki_dom::Document`], and then observe clicks on their own regions.
//! The crate currently ships one widget, the dropdown [`Select`].
//!
//! # Example
//!
//! ```
//! use genki_forms::prelude::*;
//!
//! let config = FieldConfig::from_json(r#"{
//!     "name": "fruit",
//!     "defaultValue": "b",
//!     "items": [{"value": "a", "text": "Alpha"}, {"value": "b", "text": "Beta"}]
//! }"#).unwrap();
//!
//! let mut document = Document::new();
//! let body = document.body();
//! let mut select = Select::new(FieldId::new("fruit"), config);
//! select.mount(&mut document, body).unwrap();
//!
//! // Open the list and pick "Alpha".
//! document.click_by_id("fruit");
//! let alpha = document.dom().element_children(
//!     document.element_by_id("select-menu-fruit").unwrap()
//! ).unwrap()[0];
//! document.click(alpha);
//!
//! let state = select.visual_state(&document).unwrap();
//! assert_eq!(state.display_text, "Alpha");
//! assert!(!state.is_open());
//!
//! assert_eq!(select.value_from(&document, ValueSource::LastSelection), "a");
//! assert_eq!(select.get_value(&document), "b");
//! ```
//!
//! # Logging
//!
//! Lifecycle and state transitions are reported through `tracing` under the
//! targets in [`logging::targets`].

mod assets;
mod error;
mod field;
pub mod logging;
pub mod prelude;
pub mod select;

pub use assets::ARROW_ICON;
pub use error::{FormError, FormResult, Region};
pub use field::{Field, FieldConfig, FieldId, SelectItem};
pub use select::{Select, SelectedOption, ValueSource, VisualState};
