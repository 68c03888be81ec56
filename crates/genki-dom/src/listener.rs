//! Click listener registry.
//!
//! Listeners are stored once and addressed by the [`ListenerId`] handed out at
//! registration. Removal goes through that ID, so detaching never depends on
//! comparing handler closures.
//!
//! # Example
//!
//! ```
//! use genki_dom::Document;
//!
//! let mut document = Document::new();
//! let body = document.body();
//!
//! let id = document.add_listener(body, |_dom, _event| {}).unwrap();
//! assert_eq!(document.listener_count_on(body), 1);
//!
//! assert!(document.remove_listener(id));
//! assert!(!document.remove_listener(id));
//! assert_eq!(document.listener_count(), 0);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};

use crate::event::ClickEvent;
use crate::node::{Dom, NodeId};

new_key_type! {
    /// A unique identifier for a registered listener.
    ///
    /// Pass it to [`Document::remove_listener`](crate::Document::remove_listener)
    /// to detach exactly that listener.
    pub struct ListenerId;
}

/// A shareable click handler.
///
/// Widgets build their handlers once, keep the `Arc`, and register clones of
/// it, so the same handler can be attached again after a detach.
pub type ClickHandler = Arc<dyn Fn(&mut Dom, &mut ClickEvent) + Send + Sync>;

struct Listener {
    target: NodeId,
    handler: ClickHandler,
}

/// Storage for all listeners of one document.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: SlotMap<ListenerId, Listener>,
    /// Registration order per target node.
    by_target: HashMap<NodeId, Vec<ListenerId>>,
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, target: NodeId, handler: ClickHandler) -> ListenerId {
        let id = self.listeners.insert(Listener { target, handler });
        self.by_target.entry(target).or_default().push(id);
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let Some(listener) = self.listeners.remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_target.get_mut(&listener.target) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.by_target.remove(&listener.target);
            }
        }
        true
    }

    /// Drop every listener registered on `target`.
    pub(crate) fn remove_all_on(&mut self, target: NodeId) -> usize {
        let Some(ids) = self.by_target.remove(&target) else {
            return 0;
        };
        for id in &ids {
            self.listeners.remove(*id);
        }
        ids.len()
    }

    /// Snapshot of the handlers on `target`, in registration order.
    pub(crate) fn handlers_for(&self, target: NodeId) -> Vec<ClickHandler> {
        self.by_target
            .get(&target)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.listeners.get(*id))
                    .map(|l| l.handler.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn count_on(&self, target: NodeId) -> usize {
        self.by_target.get(&target).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recording(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> ClickHandler {
        let log = log.clone();
        Arc::new(move |_dom: &mut Dom, _event: &mut ClickEvent| log.lock().push(name))
    }

    #[test]
    fn test_handlers_keep_registration_order() {
        let mut dom = Dom::new();
        let node = dom.create_element("div");
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut registry = ListenerRegistry::default();
        registry.add(node, recording(&log, "first"));
        registry.add(node, recording(&log, "second"));
        registry.add(node, recording(&log, "third"));

        let mut event = ClickEvent::new(node);
        for handler in registry.handlers_for(node) {
            handler(&mut dom, &mut event);
        }
        assert_eq!(*log.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut dom = Dom::new();
        let node = dom.create_element("div");
        let log = Arc::new(Mutex::new(Vec::new()));
        let shared = recording(&log, "shared");

        let mut registry = ListenerRegistry::default();
        let a = registry.add(node, shared.clone());
        let b = registry.add(node, shared);
        assert_eq!(registry.count_on(node), 2);

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert!(registry.contains(b));
        assert_eq!(registry.count_on(node), 1);

        assert!(registry.remove(b));
        assert_eq!(registry.len(), 0);
        assert!(registry.handlers_for(node).is_empty());
    }

    #[test]
    fn test_remove_all_on_target() {
        let mut dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut registry = ListenerRegistry::default();
        registry.add(a, recording(&log, "a1"));
        registry.add(a, recording(&log, "a2"));
        let kept = registry.add(b, recording(&log, "b"));

        assert_eq!(registry.remove_all_on(a), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(kept));
    }
}
