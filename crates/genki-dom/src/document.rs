//! The document: node tree, listeners and click dispatch in one place.
//!
//! # Event Flow
//!
//! [`Document::click`] delivers a click in a single synchronous turn:
//!
//! 1. **Target**: listeners registered on the clicked node run in
//!    registration order.
//! 2. **Bubbling**: listeners on each ancestor run, nearest first, up to and
//!    including the document root.
//! 3. **Outside clicks**: the shared outside-click dispatcher is one of the
//!    root listeners, so every click that reaches the root is also checked
//!    against all watched nodes.
//!
//! A listener that calls [`ClickEvent::stop_propagation`] prevents delivery to
//! further ancestors, including the root.

use tracing::Level;

use crate::error::{DomError, DomResult};
use crate::event::{ClickEvent, DispatchResult};
use crate::listener::{ClickHandler, ListenerId, ListenerRegistry};
use crate::logging::{DomTreeDebug, targets};
use crate::node::{Dom, NodeId};
use crate::outside::{OutsideClickDispatcher, OutsideClickHandler, WatchId};

/// A live document that widgets render into and observe.
pub struct Document {
    dom: Dom,
    body: NodeId,
    listeners: ListenerRegistry,
    outside: OutsideClickDispatcher,
    /// Root listener feeding `outside`, present while any watch exists.
    outside_listener: Option<ListenerId>,
}

impl Document {
    /// Create an empty document with a `<body>` element.
    pub fn new() -> Self {
        let mut dom = Dom::new();
        let body = dom.create_element("body");
        let root = dom.root();
        // a fresh element always attaches to the root
        let _ = dom.append_child(root, body);

        Self {
            dom,
            body,
            listeners: ListenerRegistry::default(),
            outside: OutsideClickDispatcher::default(),
            outside_listener: None,
        }
    }

    /// The node tree.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Mutable access to the node tree.
    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        self.dom.root()
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Shorthand for [`Dom::element_by_id`].
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.dom.element_by_id(id)
    }

    /// Parse `html` and append it to `parent`.
    pub fn insert_html(&mut self, parent: NodeId, html: &str) -> DomResult<Vec<NodeId>> {
        let inserted = self.dom.insert_html(parent, html)?;
        if tracing::enabled!(target: targets::CORE, Level::TRACE) {
            let tree_debug = DomTreeDebug::new();
            for &node in &inserted {
                tracing::trace!(
                    target: targets::CORE,
                    tree = %tree_debug.format_subtree(&self.dom, node),
                    "inserted fragment"
                );
            }
        }
        Ok(inserted)
    }

    /// Remove a node and its subtree, dropping every listener and
    /// outside-click watch attached to the removed nodes.
    pub fn remove_node(&mut self, id: NodeId) -> DomResult<()> {
        let removed = self.dom.remove(id)?;

        let listeners: usize = removed
            .iter()
            .map(|&node| self.listeners.remove_all_on(node))
            .sum();
        let watches = self.outside.unwatch_owned_by(&removed);
        if watches > 0 {
            self.release_outside_listener();
        }

        if listeners > 0 || watches > 0 {
            tracing::debug!(
                target: targets::CORE,
                nodes = removed.len(),
                listeners,
                watches,
                "removed node with attached observers"
            );
        }
        Ok(())
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a click listener on `target`.
    pub fn add_listener<F>(&mut self, target: NodeId, handler: F) -> DomResult<ListenerId>
    where
        F: Fn(&mut Dom, &mut ClickEvent) + Send + Sync + 'static,
    {
        self.add_shared_listener(target, std::sync::Arc::new(handler))
    }

    /// Register a shared click handler on `target`.
    ///
    /// The same handler may be registered any number of times; each
    /// registration gets its own [`ListenerId`].
    pub fn add_shared_listener(
        &mut self,
        target: NodeId,
        handler: ClickHandler,
    ) -> DomResult<ListenerId> {
        if !self.dom.is_alive(target) {
            return Err(DomError::InvalidNode);
        }
        let id = self.listeners.add(target, handler);
        tracing::trace!(target: targets::LISTENER, ?target, ?id, "listener added");
        Ok(id)
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(id);
        tracing::trace!(target: targets::LISTENER, ?id, removed, "listener removed");
        removed
    }

    /// Whether a listener is still registered.
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(id)
    }

    /// Total number of registered listeners, including the shared
    /// outside-click listener.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of listeners registered on one node.
    pub fn listener_count_on(&self, target: NodeId) -> usize {
        self.listeners.count_on(target)
    }

    // =========================================================================
    // Outside clicks
    // =========================================================================

    /// Run `handler` for every click whose target is outside `owner`.
    ///
    /// All watches share a single root listener, installed with the first
    /// watch and removed with the last.
    pub fn watch_outside_clicks(
        &mut self,
        owner: NodeId,
        handler: OutsideClickHandler,
    ) -> DomResult<WatchId> {
        if !self.dom.is_alive(owner) {
            return Err(DomError::InvalidNode);
        }
        if self.outside_listener.is_none() {
            let root = self.dom.root();
            let listener = self.listeners.add(root, self.outside.root_listener());
            self.outside_listener = Some(listener);
            tracing::debug!(target: targets::OUTSIDE, "installed shared outside-click listener");
        }
        Ok(self.outside.watch(owner, handler))
    }

    /// Stop an outside-click watch. Returns `true` if it was active.
    pub fn unwatch_outside_clicks(&mut self, id: WatchId) -> bool {
        let removed = self.outside.unwatch(id);
        self.release_outside_listener();
        removed
    }

    /// Whether an outside-click watch is still active.
    ///
    /// Watches end with [`unwatch_outside_clicks`](Self::unwatch_outside_clicks)
    /// or when [`remove_node`](Self::remove_node) removes their owner.
    pub fn is_watching(&self, id: WatchId) -> bool {
        self.outside.contains(id)
    }

    /// Number of active outside-click watches.
    pub fn outside_watch_count(&self) -> usize {
        self.outside.len()
    }

    fn release_outside_listener(&mut self) {
        if self.outside.is_empty()
            && let Some(listener) = self.outside_listener.take()
        {
            self.listeners.remove(listener);
            tracing::debug!(target: targets::OUTSIDE, "removed shared outside-click listener");
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Deliver a click to `target`, bubbling up to the root.
    #[tracing::instrument(skip(self), target = "genki_dom::dispatch", level = "trace")]
    pub fn click(&mut self, target: NodeId) -> DispatchResult {
        if !self.dom.is_alive(target) {
            tracing::warn!(target: targets::DISPATCH, ?target, "click on a missing node");
            return DispatchResult::TargetNotFound;
        }

        let mut path = vec![target];
        path.extend(self.dom.ancestors(target));

        let mut event = ClickEvent::new(target);
        let mut invoked = 0usize;

        for node in path {
            let handlers = self.listeners.handlers_for(node);
            if handlers.is_empty() {
                continue;
            }
            event.set_current_target(node);
            for handler in handlers {
                handler(&mut self.dom, &mut event);
                invoked += 1;
            }
            if event.is_propagation_stopped() {
                tracing::trace!(target: targets::DISPATCH, ?node, invoked, "propagation stopped");
                return DispatchResult::Stopped;
            }
        }

        tracing::trace!(target: targets::DISPATCH, invoked, "click delivered");
        if invoked == 0 {
            DispatchResult::Ignored
        } else {
            DispatchResult::Delivered
        }
    }

    /// Click the element with the given `id` attribute.
    pub fn click_by_id(&mut self, id: &str) -> DispatchResult {
        match self.dom.element_by_id(id) {
            Some(node) => self.click(node),
            None => DispatchResult::TargetNotFound,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("dom", &self.dom)
            .field("listeners", &self.listeners.len())
            .field("outside_watches", &self.outside.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Document: Send, Sync);
