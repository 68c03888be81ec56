//! Logging and debugging facilities for the document model.
//!
//! This module provides:
//! - Target names for filtering the crate's `tracing` output by subsystem
//! - A debug visualizer for node trees
//!
//! # Tracing Integration
//!
//! The crate emits `tracing` events and never installs a subscriber. To see
//! logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("genki_dom::dispatch=trace")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! ```
//! use genki_dom::{parse_fragment, logging::DomTreeDebug};
//!
//! let dom = parse_fragment("<ul><li>a</li></ul>").unwrap();
//! let tree = DomTreeDebug::new().format_subtree(&dom, dom.root());
//! assert!(tree.contains("<li>"));
//! ```

use std::fmt::Write as _;

use crate::node::{Dom, NodeId, NodeKind};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core document target.
    pub const CORE: &str = "genki_dom";
    /// Click dispatch target.
    pub const DISPATCH: &str = "genki_dom::dispatch";
    /// Listener registration target.
    pub const LISTENER: &str = "genki_dom::listener";
    /// Outside-click dispatcher target.
    pub const OUTSIDE: &str = "genki_dom::outside";
    /// HTML fragment parser target.
    pub const PARSER: &str = "genki_dom::parser";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node IDs.
    pub show_ids: bool,
    /// Whether to show element attributes.
    pub show_attributes: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_attributes: true,
            max_depth: None,
        }
    }
}

/// Debug utility for visualizing node trees.
#[derive(Debug, Clone, Default)]
pub struct DomTreeDebug {
    options: TreeFormatOptions,
}

impl DomTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`, one node per line.
    pub fn format_subtree(&self, dom: &Dom, root: NodeId) -> String {
        let mut output = String::new();
        self.format_into(dom, root, "", true, 0, &mut output);
        output
    }

    fn format_into(
        &self,
        dom: &Dom,
        id: NodeId,
        prefix: &str,
        is_last: bool,
        depth: usize,
        output: &mut String,
    ) {
        if let Some(max) = self.options.max_depth
            && depth > max
        {
            return;
        }
        let Ok(kind) = dom.kind(id) else {
            return;
        };

        let (branch, continuation) = match (self.options.style, depth, is_last) {
            (_, 0, _) => ("", ""),
            (TreeStyle::Unicode, _, true) => ("└── ", "    "),
            (TreeStyle::Unicode, _, false) => ("├── ", "│   "),
            (TreeStyle::Ascii, _, true) => ("`-- ", "    "),
            (TreeStyle::Ascii, _, false) => ("|-- ", "|   "),
        };

        let _ = write!(output, "{prefix}{branch}{}", self.describe(kind));
        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        output.push('\n');

        let child_prefix = format!("{prefix}{continuation}");
        let children = dom.children(id).unwrap_or(&[]);
        for (i, &child) in children.iter().enumerate() {
            self.format_into(
                dom,
                child,
                &child_prefix,
                i + 1 == children.len(),
                depth + 1,
                output,
            );
        }
    }

    fn describe(&self, kind: &NodeKind) -> String {
        match kind {
            NodeKind::Document => "#document".to_string(),
            NodeKind::Text(text) => format!("{:?}", text),
            NodeKind::Element(element) => {
                let mut label = format!("<{}", element.tag());
                if self.options.show_attributes {
                    for (name, value) in element.attributes() {
                        if value.is_empty() {
                            let _ = write!(label, " {name}");
                        } else {
                            let _ = write!(label, " {name}={value:?}");
                        }
                    }
                }
                label.push('>');
                label
            }
        }
    }
}
