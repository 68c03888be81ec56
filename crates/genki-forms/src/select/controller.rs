//! Click handling for the select field.
//!
//! The three handlers are built once per select and registered by handle on
//! every activation. They share one [`ControllerState`] which knows the
//! rendered regions while the select is active.

use std::fmt;
use std::sync::Arc;

use genki_dom::{ClickEvent, ClickHandler, Dom, NodeId, OutsideClickHandler};
use parking_lot::Mutex;

use super::state::{
    DISPLAY_CLOSED, DISPLAY_OPEN, IconOrientation, ListVisibility, SelectedOption,
    TRANSFORM_FLAT, TRANSFORM_ROTATED,
};
use crate::logging::targets;

/// Node ids of the rendered regions, resolved at activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Regions {
    pub surface: NodeId,
    pub list: NodeId,
    pub icon: NodeId,
}

#[derive(Debug, Default)]
struct ControllerState {
    regions: Option<Regions>,
    selection: Option<SelectedOption>,
}

/// Owner of the select's click handlers and their shared state.
pub(crate) struct Controller {
    state: Arc<Mutex<ControllerState>>,
    on_surface: ClickHandler,
    on_list: ClickHandler,
    on_outside: OutsideClickHandler,
}

impl Controller {
    pub(crate) fn new() -> Self {
        let state = Arc::new(Mutex::new(ControllerState::default()));

        let on_surface: ClickHandler = {
            let state = state.clone();
            Arc::new(move |dom: &mut Dom, event: &mut ClickEvent| {
                let Some(regions) = state.lock().regions else {
                    return;
                };
                event.claim(regions.surface);
                toggle(dom, regions);
            })
        };

        let on_list: ClickHandler = {
            let state = state.clone();
            Arc::new(move |dom: &mut Dom, event: &mut ClickEvent| {
                let Some(regions) = state.lock().regions else {
                    return;
                };
                event.claim(regions.surface);

                let entry = event.target();
                if dom.tag_name(entry) == Some("li") {
                    let chosen = SelectedOption {
                        value: dom.attribute(entry, "value").unwrap_or_default().to_string(),
                        text: dom.text_content(entry),
                    };
                    if let Err(err) = dom.set_text_content(regions.surface, &chosen.text) {
                        tracing::warn!(target: targets::SELECT, %err, "failed to update display surface");
                    }
                    tracing::debug!(target: targets::SELECT, value = %chosen.value, "option chosen");
                    state.lock().selection = Some(chosen);
                }
                close(dom, regions);
            })
        };

        let on_outside: OutsideClickHandler = {
            let state = state.clone();
            Arc::new(move |dom: &mut Dom, _event: &ClickEvent| {
                if let Some(regions) = state.lock().regions {
                    close(dom, regions);
                }
            })
        };

        Self {
            state,
            on_surface,
            on_list,
            on_outside,
        }
    }

    pub(crate) fn surface_handler(&self) -> ClickHandler {
        self.on_surface.clone()
    }

    pub(crate) fn list_handler(&self) -> ClickHandler {
        self.on_list.clone()
    }

    pub(crate) fn outside_handler(&self) -> OutsideClickHandler {
        self.on_outside.clone()
    }

    pub(crate) fn bind(&self, regions: Regions) {
        self.state.lock().regions = Some(regions);
    }

    pub(crate) fn unbind(&self) {
        self.state.lock().regions = None;
    }

    pub(crate) fn selection(&self) -> Option<SelectedOption> {
        self.state.lock().selection.clone()
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Controller")
            .field("regions", &state.regions)
            .field("selection", &state.selection)
            .finish_non_exhaustive()
    }
}

/// Flip list visibility and icon orientation.
fn toggle(dom: &mut Dom, regions: Regions) {
    let list_display = match ListVisibility::of(dom, regions.list) {
        ListVisibility::Open => DISPLAY_CLOSED,
        ListVisibility::Closed => DISPLAY_OPEN,
    };
    let icon_transform = match IconOrientation::of(dom, regions.icon) {
        IconOrientation::Flat => TRANSFORM_ROTATED,
        IconOrientation::Rotated => TRANSFORM_FLAT,
    };
    write_style(dom, regions.list, "display", list_display);
    write_style(dom, regions.icon, "transform", icon_transform);
    tracing::debug!(target: targets::SELECT, list_display, icon_transform, "toggled");
}

/// Force the closed, flat state. Writes nothing when already there.
fn close(dom: &mut Dom, regions: Regions) {
    let hidden = dom.style(regions.list, "display").as_deref() == Some(DISPLAY_CLOSED);
    let flat = IconOrientation::of(dom, regions.icon) == IconOrientation::Flat;
    if hidden && flat {
        return;
    }
    write_style(dom, regions.list, "display", DISPLAY_CLOSED);
    write_style(dom, regions.icon, "transform", TRANSFORM_FLAT);
    tracing::debug!(target: targets::SELECT, "closed");
}

fn write_style(dom: &mut Dom, node: NodeId, name: &str, value: &str) {
    if let Err(err) = dom.set_style(node, name, value) {
        tracing::warn!(target: targets::SELECT, ?node, name, %err, "style write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Dom, Regions) {
        let mut dom = Dom::new();
        let root = dom.root();
        let surface = dom.create_element("div");
        let list = dom.create_element("div");
        let icon = dom.create_element("span");
        for node in [surface, list, icon] {
            dom.append_child(root, node).unwrap();
        }
        dom.set_style(list, "display", "none").unwrap();
        (dom, Regions { surface, list, icon })
    }

    #[test]
    fn test_toggle_round_trip() {
        let (mut dom, regions) = setup();

        toggle(&mut dom, regions);
        assert_eq!(dom.style(regions.list, "display").as_deref(), Some("block"));
        assert_eq!(
            dom.style(regions.icon, "transform").as_deref(),
            Some("rotate(180deg)")
        );

        toggle(&mut dom, regions);
        assert_eq!(dom.style(regions.list, "display").as_deref(), Some("none"));
        assert_eq!(dom.style(regions.icon, "transform").as_deref(), Some("unset"));
    }

    #[test]
    fn test_close_is_idempotent() {
        let (mut dom, regions) = setup();
        let before = dom.attribute(regions.icon, "style").map(str::to_string);

        close(&mut dom, regions);
        // Already hidden with no transform: nothing written.
        assert_eq!(dom.attribute(regions.icon, "style").map(str::to_string), before);
    }

    #[test]
    fn test_close_normalizes_rotated_icon() {
        let (mut dom, regions) = setup();
        dom.set_style(regions.icon, "transform", "rotate(180deg)").unwrap();

        close(&mut dom, regions);
        assert_eq!(dom.style(regions.list, "display").as_deref(), Some("none"));
        assert_eq!(dom.style(regions.icon, "transform").as_deref(), Some("unset"));
    }

    #[test]
    fn test_unbound_handlers_do_nothing() {
        let (mut dom, regions) = setup();
        let controller = Controller::new();
        let handler = controller.surface_handler();

        let mut event = ClickEvent::new(regions.surface);
        handler(&mut dom, &mut event);

        assert!(!event.is_claimed_by(regions.surface));
        assert_eq!(dom.style(regions.list, "display").as_deref(), Some("none"));
    }
}
