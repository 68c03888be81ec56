//! Document model for Genki form widgets.
//!
//! This crate provides the host side that form widgets render into and
//! observe:
//!
//! - **Node Tree**: Arena-backed elements and text with attributes, inline
//!   styles and inclusive containment checks
//! - **Fragment Parser**: Turns widget markup into nodes
//! - **Listeners**: Click handlers registered and removed by [`ListenerId`]
//! - **Dispatch**: Synchronous, run-to-completion click delivery that bubbles
//!   from the target to the document root
//! - **Outside Clicks**: One shared root listener routing "clicked outside"
//!   notifications to every watching widget
//!
//! # Example
//!
//! ```
//! use genki_dom::{Document, DispatchResult};
//!
//! let mut document = Document::new();
//! let body = document.body();
//! document
//!     .insert_html(body, r#"<div id="panel" style="display: none"></div>"#)
//!     .unwrap();
//!
//! let panel = document.element_by_id("panel").unwrap();
//! document
//!     .add_listener(panel, |dom, event| {
//!         let _ = dom.set_style(event.current_target(), "display", "block");
//!     })
//!     .unwrap();
//!
//! assert_eq!(document.click(panel), DispatchResult::Delivered);
//! assert_eq!(document.dom().style(panel, "display").as_deref(), Some("block"));
//! ```

mod document;
mod error;
mod event;
pub mod listener;
pub mod logging;
mod node;
pub mod outside;
mod parser;
mod style;

pub use document::Document;
pub use error::{DomError, DomResult};
pub use event::{ClickEvent, DispatchResult, EventPhase};
pub use listener::{ClickHandler, ListenerId};
pub use node::{Dom, ElementData, NodeId, NodeKind};
pub use outside::{OutsideClickHandler, WatchId};
pub use parser::parse_fragment;
