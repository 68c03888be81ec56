//! Click events and dispatch results.

use crate::node::NodeId;

/// Which stage of dispatch the event is in for the current listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    /// The listener is registered on the target itself.
    AtTarget,
    /// The listener is registered on an ancestor of the target.
    Bubbling,
}

/// A click travelling from its target up to the document root.
///
/// Listeners can stop further propagation, and widgets can *claim* the event
/// for the node they own so that document-level outside-click handling skips
/// them for the rest of the turn.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    target: NodeId,
    current_target: NodeId,
    phase: EventPhase,
    propagation_stopped: bool,
    claimed_by: Vec<NodeId>,
}

impl ClickEvent {
    /// Create a click on `target`.
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            current_target: target,
            phase: EventPhase::AtTarget,
            propagation_stopped: false,
            claimed_by: Vec::new(),
        }
    }

    /// The node that was clicked.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listeners are currently running.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    /// The dispatch phase.
    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub(crate) fn set_current_target(&mut self, node: NodeId) {
        self.current_target = node;
        self.phase = if node == self.target {
            EventPhase::AtTarget
        } else {
            EventPhase::Bubbling
        };
    }

    /// Stop the event from reaching listeners on further ancestors.
    ///
    /// Remaining listeners on the current node still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether [`stop_propagation`](Self::stop_propagation) was called.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Mark the event as already handled on behalf of `owner`.
    pub fn claim(&mut self, owner: NodeId) {
        if !self.claimed_by.contains(&owner) {
            self.claimed_by.push(owner);
        }
    }

    /// Whether the event was claimed on behalf of `owner`.
    pub fn is_claimed_by(&self, owner: NodeId) -> bool {
        self.claimed_by.contains(&owner)
    }
}

/// Result of dispatching a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// At least one listener ran and the event reached the root.
    Delivered,
    /// A listener stopped propagation before the root.
    Stopped,
    /// No listener was registered along the path.
    Ignored,
    /// The target node does not exist.
    TargetNotFound,
}

impl DispatchResult {
    /// Check if any listener saw the event.
    pub fn was_handled(&self) -> bool {
        matches!(self, Self::Delivered | Self::Stopped)
    }
}
