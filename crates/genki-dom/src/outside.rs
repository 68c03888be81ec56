//! Shared outside-click dispatch.
//!
//! Popups close when the user clicks anywhere outside them. Instead of every
//! widget adding its own document-level listener, a document keeps one
//! dispatcher with one root listener. Each widget registers a *watch* keyed by
//! the node it owns; on every click the dispatcher looks up the watches whose
//! owner does not contain the click target and runs their handlers.
//!
//! A watch is skipped for a click that was [claimed](crate::ClickEvent::claim)
//! on behalf of its owner, which lets a widget's own listeners handle a click
//! completely without the document-level pass touching it again.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::event::ClickEvent;
use crate::listener::ClickHandler;
use crate::logging::targets;
use crate::node::{Dom, NodeId};

new_key_type! {
    /// A unique identifier for an outside-click watch.
    pub struct WatchId;
}

/// Handler run when a click lands outside the watched node.
pub type OutsideClickHandler = Arc<dyn Fn(&mut Dom, &ClickEvent) + Send + Sync>;

struct Watch {
    owner: NodeId,
    handler: OutsideClickHandler,
}

/// The set of outside-click watches of one document.
///
/// Cloning shares the underlying set; the root listener holds one clone.
#[derive(Clone, Default)]
pub(crate) struct OutsideClickDispatcher {
    watches: Arc<Mutex<SlotMap<WatchId, Watch>>>,
}

impl OutsideClickDispatcher {
    pub(crate) fn watch(&self, owner: NodeId, handler: OutsideClickHandler) -> WatchId {
        self.watches.lock().insert(Watch { owner, handler })
    }

    pub(crate) fn unwatch(&self, id: WatchId) -> bool {
        self.watches.lock().remove(id).is_some()
    }

    pub(crate) fn contains(&self, id: WatchId) -> bool {
        self.watches.lock().contains_key(id)
    }

    /// Drop every watch whose owner is in `removed`.
    pub(crate) fn unwatch_owned_by(&self, removed: &[NodeId]) -> usize {
        let mut watches = self.watches.lock();
        let before = watches.len();
        watches.retain(|_, watch| !removed.contains(&watch.owner));
        before - watches.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.watches.lock().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.watches.lock().is_empty()
    }

    /// Run the handlers of every watch the click falls outside of.
    pub(crate) fn dispatch(&self, dom: &mut Dom, event: &ClickEvent) {
        // Snapshot so handlers run without the lock held.
        let candidates: Vec<(NodeId, OutsideClickHandler)> = self
            .watches
            .lock()
            .values()
            .map(|w| (w.owner, w.handler.clone()))
            .collect();

        let mut fired = 0usize;
        for (owner, handler) in candidates {
            if event.is_claimed_by(owner) || dom.contains(owner, event.target()) {
                continue;
            }
            handler(dom, event);
            fired += 1;
        }

        tracing::trace!(
            target: targets::OUTSIDE,
            fired,
            "outside-click dispatch complete"
        );
    }

    /// The single root listener that feeds this dispatcher.
    pub(crate) fn root_listener(&self) -> ClickHandler {
        let dispatcher = self.clone();
        Arc::new(move |dom: &mut Dom, event: &mut ClickEvent| dispatcher.dispatch(dom, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(hits: &Arc<Mutex<Vec<NodeId>>>, owner: NodeId) -> OutsideClickHandler {
        let hits = hits.clone();
        Arc::new(move |_dom: &mut Dom, _event: &ClickEvent| hits.lock().push(owner))
    }

    #[test]
    fn test_only_outside_watches_fire() {
        let mut dom = Dom::new();
        let root = dom.root();
        let a = dom.create_element("div");
        let a_child = dom.create_element("span");
        let b = dom.create_element("div");
        dom.append_child(root, a).unwrap();
        dom.append_child(a, a_child).unwrap();
        dom.append_child(root, b).unwrap();

        let hits = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = OutsideClickDispatcher::default();
        dispatcher.watch(a, counter(&hits, a));
        dispatcher.watch(b, counter(&hits, b));

        dispatcher.dispatch(&mut dom, &ClickEvent::new(a_child));
        assert_eq!(*hits.lock(), vec![b]);
    }

    #[test]
    fn test_claimed_owner_is_skipped() {
        let mut dom = Dom::new();
        let root = dom.root();
        let a = dom.create_element("div");
        dom.append_child(root, a).unwrap();

        let hits = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = OutsideClickDispatcher::default();
        dispatcher.watch(a, counter(&hits, a));

        let mut event = ClickEvent::new(root);
        event.claim(a);
        dispatcher.dispatch(&mut dom, &event);
        assert!(hits.lock().is_empty());
    }

    #[test]
    fn test_unwatch() {
        let mut dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        let hits = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = OutsideClickDispatcher::default();

        let id = dispatcher.watch(a, counter(&hits, a));
        dispatcher.watch(b, counter(&hits, b));
        assert_eq!(dispatcher.len(), 2);

        assert!(dispatcher.unwatch(id));
        assert!(!dispatcher.unwatch(id));
        assert_eq!(dispatcher.unwatch_owned_by(&[b]), 1);
        assert!(dispatcher.is_empty());
    }
}
