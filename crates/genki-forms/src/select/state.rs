//! Visual and selection state of a select.
//!
//! Visual state is never stored: it is read back from the inline styles and
//! text of the rendered regions. Selection state is the one piece the widget
//! keeps itself, updated on every option click.

use genki_dom::{Dom, NodeId};

/// `display` value of an open option list.
pub(crate) const DISPLAY_OPEN: &str = "block";
/// `display` value of a closed option list.
pub(crate) const DISPLAY_CLOSED: &str = "none";
/// `transform` value of a rotated icon.
pub(crate) const TRANSFORM_ROTATED: &str = "rotate(180deg)";
/// `transform` value of a flat icon.
pub(crate) const TRANSFORM_FLAT: &str = "unset";

/// Whether the option list is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListVisibility {
    /// `display: block`.
    Open,
    /// Any other `display` value, including none at all.
    Closed,
}

impl ListVisibility {
    /// Read the visibility of an option list node.
    pub fn of(dom: &Dom, list: NodeId) -> Self {
        match dom.style(list, "display").as_deref() {
            Some(DISPLAY_OPEN) => Self::Open,
            _ => Self::Closed,
        }
    }
}

/// Orientation of the arrow icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconOrientation {
    /// No transform, or `transform: unset`.
    Flat,
    /// Any other transform.
    Rotated,
}

impl IconOrientation {
    /// Read the orientation of an icon node.
    pub fn of(dom: &Dom, icon: NodeId) -> Self {
        match dom.style(icon, "transform").as_deref() {
            None | Some("") | Some(TRANSFORM_FLAT) => Self::Flat,
            Some(_) => Self::Rotated,
        }
    }
}

/// Snapshot of what the user currently sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualState {
    /// Option list visibility.
    pub list: ListVisibility,
    /// Icon orientation.
    pub icon: IconOrientation,
    /// Text shown in the display surface.
    pub display_text: String,
}

impl VisualState {
    /// Whether the option list is open.
    pub fn is_open(&self) -> bool {
        self.list == ListVisibility::Open
    }

    /// Open list with rotated icon, or closed list with flat icon.
    pub fn is_consistent(&self) -> bool {
        matches!(
            (self.list, self.icon),
            (ListVisibility::Open, IconOrientation::Rotated)
                | (ListVisibility::Closed, IconOrientation::Flat)
        )
    }
}

/// The option a user last picked by clicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedOption {
    /// The entry's `value` attribute.
    pub value: String,
    /// The entry's text.
    pub text: String,
}

/// Which notion of "the value" a caller wants from a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueSource {
    /// The entry pre-marked `selected` at render time. Clicking an option
    /// does not move this mark.
    #[default]
    RenderedDefault,
    /// The entry the user last clicked, falling back to the rendered
    /// default until the first click.
    LastSelection,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_with_style(style: Option<&str>) -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let node = dom.create_element("div");
        if let Some(style) = style {
            dom.set_attribute(node, "style", style).unwrap();
        }
        (dom, node)
    }

    #[test]
    fn test_list_visibility() {
        let (dom, node) = element_with_style(Some("display: block"));
        assert_eq!(ListVisibility::of(&dom, node), ListVisibility::Open);

        let (dom, node) = element_with_style(Some("display: none"));
        assert_eq!(ListVisibility::of(&dom, node), ListVisibility::Closed);

        let (dom, node) = element_with_style(None);
        assert_eq!(ListVisibility::of(&dom, node), ListVisibility::Closed);
    }

    #[test]
    fn test_icon_orientation() {
        let (dom, node) = element_with_style(None);
        assert_eq!(IconOrientation::of(&dom, node), IconOrientation::Flat);

        let (dom, node) = element_with_style(Some("transform: unset"));
        assert_eq!(IconOrientation::of(&dom, node), IconOrientation::Flat);

        let (dom, node) = element_with_style(Some("transform: rotate(180deg)"));
        assert_eq!(IconOrientation::of(&dom, node), IconOrientation::Rotated);
    }

    #[test]
    fn test_consistency() {
        let state = VisualState {
            list: ListVisibility::Closed,
            icon: IconOrientation::Rotated,
            display_text: String::new(),
        };
        assert!(!state.is_consistent());
        assert!(!state.is_open());
    }
}
