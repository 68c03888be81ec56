//! Prelude module for Genki forms.
//!
//! ```ignore
//! use genki_forms::prelude::*;
//! ```
//!
//! This provides access to:
//! - The field lifecycle (`Field`, `FieldConfig`, `FieldId`)
//! - The select widget and its state types
//! - The host document (`Document`)

// ============================================================================
// Field Foundation
// ============================================================================

pub use crate::error::{FormError, FormResult};
pub use crate::field::{Field, FieldConfig, FieldId, SelectItem};

// ============================================================================
// Select
// ============================================================================

pub use crate::select::{Select, SelectedOption, ValueSource, VisualState};

// ============================================================================
// Document
// ============================================================================

pub use genki_dom::{DispatchResult, Document};
