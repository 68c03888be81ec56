//! Markup generation for the select field.
//!
//! Values and texts are interpolated as-is. Markup-significant characters in
//! either end up as markup in the document.

use crate::assets::ARROW_ICON;
use crate::error::{FormError, FormResult};
use crate::field::{FieldConfig, FieldId, SelectItem};

/// Class of the outer wrapper.
pub const WRAPPER_CLASS: &str = "form-genki-select-wrapper";
/// Base class of the display surface.
pub const SURFACE_CLASS: &str = "form-genki-select";
/// Class of the option list.
pub const LIST_CLASS: &str = "form-genki-select-items";
/// Class of the icon region.
pub const ICON_CLASS: &str = "form-genki-arrow";

/// Element ids of the three rendered regions.
///
/// All three are derived from the field id, so two selects built from the
/// same id render the same ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionIds {
    /// Display surface, the field id itself.
    pub surface: String,
    /// Option list, `select-menu-{id}`.
    pub list: String,
    /// Icon, `select-menu-arrow-{id}`.
    pub icon: String,
}

impl RegionIds {
    /// Derive region ids from a field id.
    pub fn for_field(id: &FieldId) -> Self {
        Self {
            surface: id.to_string(),
            list: format!("select-menu-{id}"),
            icon: format!("select-menu-arrow-{id}"),
        }
    }
}

/// One `<li>` entry. Carries the `selected` marker iff the item's value is
/// `default_value`.
pub(crate) fn render_option(item: &SelectItem, default_value: &str) -> String {
    let marker = if item.value == default_value {
        " selected"
    } else {
        ""
    };
    format!(r#"<li value="{}"{marker}>{}</li>"#, item.value, item.text)
}

/// The full wrapper fragment.
pub(crate) fn render_select(
    ids: &RegionIds,
    config: &FieldConfig,
    style_class: &str,
) -> FormResult<String> {
    if config.items.is_empty() {
        return Err(FormError::EmptyOptions {
            name: config.name.clone(),
        });
    }

    let items: String = config
        .items
        .iter()
        .map(|item| render_option(item, &config.default_value))
        .collect();

    let class = if style_class.is_empty() {
        SURFACE_CLASS.to_string()
    } else {
        format!("{SURFACE_CLASS} {style_class}")
    };

    Ok(format!(
        "<div class=\"{WRAPPER_CLASS}\">\
         <div id=\"{surface}\" name=\"{name}\" class=\"{class}\"></div>\n        \
         <div class=\"{LIST_CLASS}\" id=\"{list}\" style=\"display: none\">{items}</div>\
         <span class=\"{ICON_CLASS}\" id=\"{icon}\">{ARROW_ICON}</span>\
         </div>",
        surface = ids.surface,
        name = config.name,
        list = ids.list,
        icon = ids.icon,
    ))
}
